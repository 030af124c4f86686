#![forbid(unsafe_code)]

//! A cell buffer the demo draws into each frame, flushed to the terminal with
//! crossterm. Only rows that differ from the previous frame are rewritten.

use std::io::{self, Write};

use crossterm::style::{Attribute, Color, Print, SetAttribute, SetBackgroundColor, SetForegroundColor};
use crossterm::{cursor, queue};
use swapgrid_core::geometry::Rect;
use unicode_width::UnicodeWidthChar;

/// One terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
    pub bold: bool,
    /// Right half of a wide character; not printed.
    continuation: bool,
}

impl Cell {
    fn blank(bg: Color) -> Self {
        Self {
            ch: ' ',
            fg: Color::Reset,
            bg,
            bold: false,
            continuation: false,
        }
    }
}

/// Text style for [`Canvas::put_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub fg: Color,
    pub bg: Option<Color>,
    pub bold: bool,
}

impl Style {
    pub const fn fg(fg: Color) -> Self {
        Self {
            fg,
            bg: None,
            bold: false,
        }
    }

    #[must_use]
    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    #[must_use]
    pub const fn on(mut self, bg: Color) -> Self {
        self.bg = Some(bg);
        self
    }
}

/// Integer cell rectangle, clipped against the canvas when drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl CellRect {
    /// Snap a pointer-space rectangle to whole cells.
    pub fn from_rect(rect: Rect) -> Self {
        Self {
            x: rect.x.round() as i32,
            y: rect.y.round() as i32,
            width: rect.width.round() as i32,
            height: rect.height.round() as i32,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width - 1
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height - 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Canvas {
    pub fn new(width: u16, height: u16, bg: Color) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::blank(bg); usize::from(width) * usize::from(height)],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let x = u16::try_from(x).ok()?;
        let y = u16::try_from(y).ok()?;
        (x < self.width && y < self.height)
            .then(|| usize::from(y) * usize::from(self.width) + usize::from(x))
    }

    pub fn cell(&self, x: i32, y: i32) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    fn set(&mut self, x: i32, y: i32, ch: char, style: Style) {
        if let Some(i) = self.index(x, y) {
            let cell = &mut self.cells[i];
            cell.ch = ch;
            cell.fg = style.fg;
            cell.bold = style.bold;
            cell.continuation = false;
            if let Some(bg) = style.bg {
                cell.bg = bg;
            }
        }
    }

    pub fn fill(&mut self, area: CellRect, bg: Color) {
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                if let Some(i) = self.index(x, y) {
                    self.cells[i] = Cell::blank(bg);
                }
            }
        }
    }

    /// Write `text` starting at (`x`, `y`), truncated to `max_width` columns.
    /// Returns the number of columns used.
    pub fn put_str(&mut self, x: i32, y: i32, text: &str, style: Style, max_width: usize) -> usize {
        let mut used = 0;
        for ch in text.chars() {
            let w = ch.width().unwrap_or(0);
            if w == 0 {
                continue;
            }
            if used + w > max_width {
                break;
            }
            let col = x + used as i32;
            self.set(col, y, ch, style);
            if w == 2
                && let Some(i) = self.index(col + 1, y)
            {
                self.cells[i].continuation = true;
                if let Some(bg) = style.bg {
                    self.cells[i].bg = bg;
                }
            }
            used += w;
        }
        used
    }

    /// Rounded single-line border.
    pub fn draw_box(&mut self, area: CellRect, style: Style) {
        if area.width < 2 || area.height < 2 {
            return;
        }
        let (left, right, top, bottom) = (area.x, area.right(), area.y, area.bottom());
        for x in left + 1..right {
            self.set(x, top, '─', style);
            self.set(x, bottom, '─', style);
        }
        for y in top + 1..bottom {
            self.set(left, y, '│', style);
            self.set(right, y, '│', style);
        }
        self.set(left, top, '╭', style);
        self.set(right, top, '╮', style);
        self.set(left, bottom, '╰', style);
        self.set(right, bottom, '╯', style);
    }

    /// The characters of row `y`, for tests and snapshots.
    pub fn row_text(&self, y: u16) -> String {
        if y >= self.height {
            return String::new();
        }
        let start = usize::from(y) * usize::from(self.width);
        self.cells[start..start + usize::from(self.width)]
            .iter()
            .filter(|c| !c.continuation)
            .map(|c| c.ch)
            .collect()
    }

    /// Write the frame, skipping rows equal to `previous` when it has the
    /// same dimensions.
    pub fn flush<W: Write>(&self, out: &mut W, previous: Option<&Canvas>) -> io::Result<()> {
        let previous = previous.filter(|p| p.width == self.width && p.height == self.height);
        let width = usize::from(self.width);
        for y in 0..self.height {
            let start = usize::from(y) * width;
            let row = &self.cells[start..start + width];
            if previous.is_some_and(|p| p.cells[start..start + width] == *row) {
                continue;
            }
            queue!(out, cursor::MoveTo(0, y))?;
            let mut current: Option<(Color, Color, bool)> = None;
            for cell in row.iter().filter(|c| !c.continuation) {
                let style = (cell.fg, cell.bg, cell.bold);
                if current != Some(style) {
                    queue!(
                        out,
                        SetAttribute(if cell.bold { Attribute::Bold } else { Attribute::NormalIntensity }),
                        SetForegroundColor(cell.fg),
                        SetBackgroundColor(cell.bg)
                    )?;
                    current = Some(style);
                }
                queue!(out, Print(cell.ch))?;
            }
        }
        queue!(out, SetAttribute(Attribute::Reset))?;
        out.flush()
    }
}
