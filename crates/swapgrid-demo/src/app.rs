#![forbid(unsafe_code)]

//! The company selector: engine, animated layout, preferences, and drawing.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, SystemTime};

use crossterm::style::Color;
use swapgrid_core::animation::{Animation, Pulse};
use swapgrid_core::event::PointerEvent;
use swapgrid_core::geometry::{Point, Rect, Size};
use swapgrid_core::terminal_session::{Key, KeyPress, TerminalEvent};
use swapgrid_runtime::{StateRegistry, SubscriptionId, ThemeMode, ThemeStore};
use swapgrid_widgets::animator::SlideAnimator;
use swapgrid_widgets::layout::{AnimatedLayout, GridLayout, LayoutSnapshot};
use swapgrid_widgets::tile::TileApi;
use swapgrid_widgets::{DragEnd, EventOutcome, Keyed, ReorderConfig, ReorderGrid, TileId, order};
use unicode_width::UnicodeWidthStr;

use crate::canvas::{Canvas, CellRect, Style};
use crate::cli::{CliError, Opts};
use crate::company::{Accent, Company, DeadlineFx, Urgency, default_companies};
use crate::i18n::{LANG_KEY, LANG_VERSION, Lang, Text};

/// Registry key of the saved tile order.
pub const ORDER_KEY: &str = "tile-order";
pub const ORDER_VERSION: u32 = 1;

const MARGIN_X: f32 = 2.0;
const TOP: f32 = 2.0;
const GAP: f32 = 1.0;
const TILE_HEIGHT: f32 = 8.0;
const MIN_TILE_WIDTH: f32 = 28.0;
const MAX_FIT_COLUMNS: usize = 3;

/// Everything the app needs from the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub reorder: ReorderConfig,
    /// Fixed column count; 0 fits the terminal width.
    pub columns: usize,
    pub slide: Duration,
    pub exit_after: Option<Duration>,
    /// Forced language for this run; `None` uses the saved one.
    pub lang: Option<Lang>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            reorder: ReorderConfig::company_options(),
            columns: 0,
            slide: SlideAnimator::DEFAULT_DURATION,
            exit_after: None,
            lang: None,
        }
    }
}

impl AppConfig {
    pub fn from_opts(opts: &Opts) -> Result<Self, CliError> {
        Ok(Self {
            reorder: opts.reorder_config()?,
            columns: opts.columns,
            exit_after: (opts.exit_after_ms > 0).then(|| Duration::from_millis(opts.exit_after_ms)),
            lang: opts.lang,
            ..Self::default()
        })
    }
}

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub surface: Color,
    pub lifted: Color,
    pub text: Color,
    pub muted: Color,
    pub border: Color,
    pub ok: Color,
    pub due: Color,
    pub overdue: Color,
    mode: ThemeMode,
}

impl Palette {
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Self {
                background: Color::Rgb { r: 10, g: 12, b: 18 },
                surface: Color::Rgb { r: 18, g: 22, b: 32 },
                lifted: Color::Rgb { r: 28, g: 34, b: 50 },
                text: Color::Rgb { r: 230, g: 236, b: 245 },
                muted: Color::Rgb { r: 130, g: 140, b: 160 },
                border: Color::Rgb { r: 60, g: 70, b: 90 },
                ok: Color::Rgb { r: 120, g: 220, b: 160 },
                due: Color::Rgb { r: 255, g: 186, b: 0 },
                overdue: Color::Rgb { r: 255, g: 80, b: 80 },
                mode,
            },
            ThemeMode::Light => Self {
                background: Color::Rgb { r: 244, g: 246, b: 250 },
                surface: Color::Rgb { r: 255, g: 255, b: 255 },
                lifted: Color::Rgb { r: 232, g: 238, b: 248 },
                text: Color::Rgb { r: 20, g: 24, b: 32 },
                muted: Color::Rgb { r: 100, g: 110, b: 125 },
                border: Color::Rgb { r: 190, g: 198, b: 210 },
                ok: Color::Rgb { r: 30, g: 150, b: 90 },
                due: Color::Rgb { r: 200, g: 130, b: 0 },
                overdue: Color::Rgb { r: 200, g: 40, b: 40 },
                mode,
            },
        }
    }

    pub fn accent(&self, accent: Accent) -> Color {
        let (r, g, b) = match accent {
            Accent::Cyan => (0, 220, 255),
            Accent::Blue => (90, 180, 255),
            Accent::Amber => (255, 190, 90),
            Accent::Magenta => (255, 90, 230),
            Accent::Green => (60, 255, 170),
            Accent::Orange => (255, 140, 90),
        };
        match self.mode {
            ThemeMode::Dark => Color::Rgb { r, g, b },
            // Neon reads poorly on white.
            ThemeMode::Light => Color::Rgb {
                r: darken(r),
                g: darken(g),
                b: darken(b),
            },
        }
    }
}

fn darken(channel: u8) -> u8 {
    (u16::from(channel) * 7 / 10) as u8
}

// ---------------------------------------------------------------------------
// Tile views
// ---------------------------------------------------------------------------

/// What a tile looks like this frame. Produced by the render pass, drawn after.
#[derive(Debug, Clone, PartialEq)]
pub struct TileView {
    pub id: TileId,
    pub rect: Rect,
    pub name: String,
    pub subtitle: String,
    pub accent: Accent,
    pub progress: u8,
    /// PR number, `-` without an active request.
    pub pr_no: String,
    pub status: String,
    pub next_actor: Option<String>,
    /// Age of the last update, e.g. `6h`.
    pub updated: Option<String>,
    /// Blocker label; takes the place of the deadline.
    pub blocked: Option<String>,
    pub deadline: Option<DeadlineFx>,
    pub lifted: bool,
}

impl TileView {
    fn of(company: &Company, rect: Rect, lifted: bool, now: SystemTime, text: &Text) -> Self {
        let request = company.request.as_ref();
        Self {
            id: company.tile_id().clone(),
            rect,
            name: company.name.clone(),
            subtitle: company.subtitle.clone(),
            accent: company.accent,
            progress: company.progress(),
            pr_no: request.map_or_else(|| "-".to_string(), |r| r.pr_no.clone()),
            status: company.status_label(text).to_string(),
            next_actor: request.and_then(|r| r.next_actor.clone()),
            updated: request.map(|r| r.age(now)),
            blocked: request
                .and_then(|r| r.blocked.as_ref())
                .map(|reason| format!("{}: {}", text.blocked, reason.label())),
            deadline: company.deadline(now),
            lifted,
        }
    }
}

/// The `::` grip region of a tile: the top-right corner inside the border.
pub fn grip_rect(tile: Rect) -> Rect {
    Rect::new(tile.right() - 5.0, tile.y + 1.0, 3.0, 1.0)
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App<'t> {
    grid: ReorderGrid<Company>,
    layout: AnimatedLayout<SlideAnimator>,
    default_order: Vec<TileId>,
    prefs: Arc<StateRegistry>,
    theme: &'t ThemeStore,
    subscription: SubscriptionId,
    theme_changed: Arc<AtomicBool>,
    lang: Lang,
    fixed_columns: usize,
    viewport: (u16, u16),
    pulses: HashMap<TileId, Pulse>,
    status: String,
    elapsed: Duration,
    exit_after: Option<Duration>,
    quit: bool,
}

impl<'t> App<'t> {
    /// Build the app, restoring the saved order from `prefs`.
    pub fn new(
        config: AppConfig,
        prefs: Arc<StateRegistry>,
        theme: &'t ThemeStore,
        now: SystemTime,
    ) -> Self {
        let companies = default_companies(now);
        let default_order = order::ids(&companies);
        let saved: Vec<TileId> = prefs
            .get_json::<Vec<String>>(ORDER_KEY)
            .unwrap_or_default()
            .into_iter()
            .map(TileId::from)
            .collect();
        let items = order::reconcile(&saved, companies);
        tracing::debug!(saved = saved.len(), tiles = items.len(), "restored tile order");

        let grid = GridLayout::new(
            Point::new(MARGIN_X, TOP),
            Size::new(MIN_TILE_WIDTH, TILE_HEIGHT),
            GAP,
            config.columns.max(1),
        );
        let layout = AnimatedLayout::new(grid, SlideAnimator::new(config.slide));
        let lang = config.lang.unwrap_or_else(|| {
            prefs
                .get_json::<String>(LANG_KEY)
                .map(|saved| Lang::parse(&saved))
                .unwrap_or_default()
        });

        let theme_changed = Arc::new(AtomicBool::new(false));
        let subscription = {
            let flag = Arc::clone(&theme_changed);
            theme.subscribe(move |mode| {
                tracing::debug!(mode = mode.as_str(), "theme changed");
                flag.store(true, Ordering::Release);
            })
        };

        Self {
            grid: ReorderGrid::with_config(items, config.reorder),
            layout,
            default_order,
            prefs,
            theme,
            subscription,
            theme_changed,
            lang,
            fixed_columns: config.columns,
            viewport: (80, 24),
            pulses: HashMap::new(),
            status: String::new(),
            elapsed: Duration::ZERO,
            exit_after: config.exit_after,
            quit: false,
        }
    }

    pub fn grid(&self) -> &ReorderGrid<Company> {
        &self.grid
    }

    pub fn layout(&self) -> &AnimatedLayout<SlideAnimator> {
        &self.layout
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn lang(&self) -> Lang {
        self.lang
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Whether the theme changed since the last call.
    pub fn take_theme_changed(&self) -> bool {
        self.theme_changed.swap(false, Ordering::AcqRel)
    }

    /// Fit the grid to a `width` x `height` terminal.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.viewport = (width, height);
        let avail = (f32::from(width) - 2.0 * MARGIN_X).max(MIN_TILE_WIDTH);
        let columns = if self.fixed_columns > 0 {
            self.fixed_columns
        } else {
            let fit = ((avail + GAP) / (MIN_TILE_WIDTH + GAP)).floor() as usize;
            fit.clamp(1, MAX_FIT_COLUMNS)
        };
        let tile_width = ((avail - GAP * (columns as f32 - 1.0)) / columns as f32)
            .floor()
            .max(12.0);

        let grid = self.layout.grid_mut();
        grid.set_columns(columns);
        grid.set_tile_size(Size::new(tile_width, TILE_HEIGHT));
        self.layout.refresh(&self.grid.ids());
        tracing::debug!(width, height, columns, tile_width, "layout fitted");
    }

    pub fn handle_event(&mut self, event: TerminalEvent) {
        match event {
            TerminalEvent::Pointer(pointer) => self.handle_pointer(pointer),
            TerminalEvent::Key(key) => self.handle_key(key),
            TerminalEvent::Resize { width, height } => self.resize(width, height),
        }
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match self.grid.handle_event(event, &mut self.layout) {
            EventOutcome::Started(id) => {
                self.status = format!("Moving {}", self.name_of(&id));
            }
            EventOutcome::Ended(end) => self.finish_drag(end),
            EventOutcome::Queued | EventOutcome::Ignored => {}
        }
    }

    pub fn handle_key(&mut self, press: KeyPress) {
        match press.key {
            Key::Char('c') if press.ctrl => self.quit = true,
            Key::Char('q') => self.quit = true,
            Key::Char('t') => {
                let mode = self.theme.toggle();
                self.status = format!("Theme: {mode}");
            }
            Key::Char('l') => self.toggle_lang(),
            Key::Char('r') => self.reset_order(),
            Key::Escape => {
                if let Some(end) = self.grid.cancel_drag() {
                    self.finish_drag(end);
                }
            }
            _ => {}
        }
    }

    fn finish_drag(&mut self, end: DragEnd) {
        self.layout.settle_from(&end.id, end.ghost_rect);
        if end.swaps > 0 {
            self.persist_order();
            self.status = format!("Placed {}", self.name_of(&end.id));
        } else {
            self.status.clear();
        }
    }

    /// Put the tiles back in the stock order.
    pub fn reset_order(&mut self) {
        if let Some(end) = self.grid.end_drag() {
            self.layout.settle_from(&end.id, end.ghost_rect);
        }
        let items = std::mem::take(self.grid.items_mut());
        self.grid.set_items(order::reconcile(&self.default_order, items));
        self.layout.refresh(&self.grid.ids());
        self.persist_order();
        self.status = "Order reset".to_string();
    }

    /// Switch between English and Tagalog and remember the choice.
    pub fn toggle_lang(&mut self) {
        self.lang = self.lang.toggled();
        self.status = format!("Language: {}", self.lang);
        if let Err(e) = self.prefs.set_json(LANG_KEY, LANG_VERSION, self.lang.as_str()) {
            tracing::warn!(error = %e, "failed to encode language");
            return;
        }
        if let Err(e) = self.prefs.flush() {
            tracing::warn!(backend = self.prefs.backend_name(), error = %e, "failed to save language");
        }
    }

    /// Save the current order. Failures are logged, never fatal.
    pub fn persist_order(&self) {
        let ids: Vec<&str> = self.grid.items().iter().map(|c| c.tile_id().as_str()).collect();
        if let Err(e) = self.prefs.set_json(ORDER_KEY, ORDER_VERSION, &ids) {
            tracing::warn!(error = %e, "failed to encode tile order");
            return;
        }
        if let Err(e) = self.prefs.flush() {
            tracing::warn!(backend = self.prefs.backend_name(), error = %e, "failed to save tile order");
        }
    }

    /// Advance one frame.
    pub fn frame(&mut self, dt: Duration, now: SystemTime) {
        self.layout.tick(dt);
        if let Some(swap) = self.grid.tick(&mut self.layout) {
            self.status = format!(
                "{} <-> {}",
                self.name_of(&swap.dragged),
                self.name_of(&swap.target)
            );
        }
        self.refresh_pulses(now);
        for pulse in self.pulses.values_mut() {
            pulse.tick(dt);
        }

        self.elapsed += dt;
        if self.exit_after.is_some_and(|limit| self.elapsed >= limit) {
            self.quit = true;
        }
    }

    fn refresh_pulses(&mut self, now: SystemTime) {
        for company in self.grid.items() {
            let id = company.tile_id();
            match company.deadline(now).and_then(|fx| fx.pulse()) {
                Some(pulse) => {
                    let stale = self
                        .pulses
                        .get(id)
                        .is_none_or(|p| p.period() != pulse.period());
                    if stale {
                        self.pulses.insert(id.clone(), pulse);
                    }
                }
                None => {
                    self.pulses.remove(id);
                }
            }
        }
    }

    fn name_of(&self, id: &TileId) -> String {
        self.grid
            .items()
            .iter()
            .find(|c| c.tile_id() == id)
            .map_or_else(|| id.to_string(), |c| c.name.clone())
    }

    fn blink_on(&self, id: &TileId) -> bool {
        self.pulses.get(id).is_none_or(Pulse::is_on)
    }

    /// Describe every tile (binding the grips) and draw the frame.
    pub fn render(&mut self, now: SystemTime) -> Canvas {
        let palette = Palette::for_mode(self.theme.get());
        let (width, height) = self.viewport;
        let mut canvas = Canvas::new(width, height, palette.background);

        self.layout.refresh(&self.grid.ids());
        let layout = &self.layout;
        let text = self.lang.text();
        let mut describe = |company: &Company, api: &mut TileApi<'_>| -> Option<TileView> {
            let rect = layout.rect_of(company.tile_id())?;
            api.bind_handle(grip_rect(rect));
            Some(TileView::of(company, rect, api.is_dragging(), now, text))
        };
        let tiles = self.grid.render(&mut describe);
        let ghost = self.grid.render_ghost(&mut describe);

        self.draw_header(&mut canvas, &palette);
        for tile in tiles.iter().filter(|t| t.visible) {
            if let Some(view) = &tile.output {
                self.draw_tile(&mut canvas, &palette, view);
            }
        }
        if let Some(ghost) = ghost {
            if let Some(slot) = self.layout.resting_rect(&ghost.id) {
                canvas.draw_box(CellRect::from_rect(slot), Style::fg(palette.border));
            }
            if let Some(mut view) = ghost.output {
                view.rect = ghost.rect;
                self.draw_tile(&mut canvas, &palette, &view);
            }
        }
        self.draw_footer(&mut canvas, &palette);
        canvas
    }

    fn draw_header(&self, canvas: &mut Canvas, palette: &Palette) {
        let title = Style::fg(palette.text).bold();
        let text = self.lang.text();
        let used = canvas.put_str(MARGIN_X as i32, 0, text.choose_company, title, usize::from(canvas.width()));
        canvas.put_str(
            MARGIN_X as i32 + used as i32 + 2,
            0,
            text.tip,
            Style::fg(palette.muted),
            usize::from(canvas.width()),
        );
    }

    fn draw_footer(&self, canvas: &mut Canvas, palette: &Palette) {
        let Some(y) = canvas.height().checked_sub(1) else {
            return;
        };
        let keys = format!(
            "[t] {} theme  [l] {}  [r] reset  [q] quit",
            self.theme.get().toggled(),
            self.lang.toggled()
        );
        let width = usize::from(canvas.width());
        let used = canvas.put_str(MARGIN_X as i32, i32::from(y), &self.status, Style::fg(palette.text), width / 2);
        let keys_x = (width.saturating_sub(keys.len() + MARGIN_X as usize)).max(used + MARGIN_X as usize + 1);
        canvas.put_str(keys_x as i32, i32::from(y), &keys, Style::fg(palette.muted), width);
    }

    fn draw_tile(&self, canvas: &mut Canvas, palette: &Palette, view: &TileView) {
        let area = CellRect::from_rect(view.rect);
        let accent = palette.accent(view.accent);
        let bg = if view.lifted { palette.lifted } else { palette.surface };
        canvas.fill(area, bg);
        canvas.draw_box(area, Style::fg(if view.lifted { accent } else { palette.border }).on(bg));

        let inner_x = area.x + 2;
        let inner_w = usize::try_from(area.width - 4).unwrap_or(0);

        let text = self.lang.text();
        let muted = Style::fg(palette.muted).on(bg);
        let right = |label: &str| area.right() - 1 - label.width() as i32;

        // Row 1: name, progress, grip.
        let percent = format!("{}%", view.progress);
        let name_w = inner_w.saturating_sub(percent.len() + 4);
        canvas.put_str(inner_x, area.y + 1, &view.name, Style::fg(palette.text).bold().on(bg), name_w);
        canvas.put_str(
            area.right() - 5 - percent.len() as i32,
            area.y + 1,
            &percent,
            Style::fg(accent).on(bg),
            percent.len(),
        );
        canvas.put_str(area.right() - 3, area.y + 1, "::", Style::fg(palette.muted).bold().on(bg), 2);

        // Row 2: subtitle.
        canvas.put_str(inner_x, area.y + 2, &view.subtitle, muted, inner_w);

        // Row 3: PR number and last update.
        let updated = view.updated.as_ref().map(|age| format!("{} {age}", text.updated));
        let updated_w = updated.as_ref().map_or(0, |u| u.width() + 1);
        canvas.put_str(
            inner_x,
            area.y + 3,
            &view.pr_no,
            Style::fg(palette.text).bold().on(bg),
            inner_w.saturating_sub(updated_w),
        );
        if let Some(updated) = updated {
            canvas.put_str(right(updated.as_str()), area.y + 3, &updated, muted, updated.width());
        }

        // Row 4: status and the blocker or deadline chip.
        let chip = if let Some(blocked) = &view.blocked {
            Some((blocked.clone(), palette.overdue))
        } else {
            view.deadline.map(|fx| {
                let color = match fx.urgency {
                    Urgency::Ok => palette.ok,
                    Urgency::Due => palette.due,
                    Urgency::Overdue => palette.overdue,
                };
                let color = if self.blink_on(&view.id) { color } else { palette.muted };
                (fx.label(text), color)
            })
        };
        let chip_w = chip.as_ref().map_or(0, |(label, _)| label.width() + 1);
        let status_w = inner_w.saturating_sub(chip_w).max(inner_w / 2);
        canvas.put_str(inner_x, area.y + 4, &view.status, Style::fg(accent).on(bg), status_w);
        if let Some((label, color)) = chip {
            let x = right(label.as_str()).max(inner_x + status_w as i32 + 1);
            let room = usize::try_from(area.right() - 1 - x).unwrap_or(0);
            canvas.put_str(x, area.y + 4, &label, Style::fg(color).bold().on(bg), room);
        }

        // Row 5: who acts next.
        if let Some(actor) = &view.next_actor {
            canvas.put_str(inner_x, area.y + 5, &format!("{}: {actor}", text.next), muted, inner_w);
        }

        // Row 6: progress bar.
        let filled = inner_w * usize::from(view.progress.min(100)) / 100;
        let bar: String = "█".repeat(filled) + &"░".repeat(inner_w - filled);
        canvas.put_str(inner_x, area.y + 6, &bar, Style::fg(accent).on(bg), inner_w);
    }
}

impl Drop for App<'_> {
    fn drop(&mut self) {
        self.theme.unsubscribe(self.subscription);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;
    use swapgrid_runtime::THEME_KEY;

    const FRAME: Duration = Duration::from_millis(16);

    fn now() -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000)
    }

    fn app(prefs: Arc<StateRegistry>, theme: &ThemeStore) -> App<'_> {
        let config = AppConfig {
            columns: 2,
            slide: Duration::from_millis(64),
            ..AppConfig::default()
        };
        let mut app = App::new(config, prefs, theme, now());
        app.resize(80, 30);
        app
    }

    fn order_of(app: &App<'_>) -> Vec<String> {
        app.grid().items().iter().map(|c| c.tile_id().to_string()).collect()
    }

    fn center_of(app: &App<'_>, id: &str) -> Point {
        app.layout().resting_rect(&TileId::from(id)).unwrap().center()
    }

    fn grip_of(app: &App<'_>, id: &str) -> Point {
        grip_rect(app.layout().resting_rect(&TileId::from(id)).unwrap()).origin()
    }

    #[test]
    fn fits_columns_to_terminal() {
        let theme = ThemeStore::default();
        let mut app = App::new(AppConfig::default(), StateRegistry::in_memory().shared(), &theme, now());
        app.resize(120, 40);
        assert_eq!(app.layout().grid().columns(), 3);
        app.resize(50, 40);
        assert_eq!(app.layout().grid().columns(), 1);
        assert_eq!(app.layout().grid().tile_size().width, 46.0);
    }

    #[test]
    fn drag_by_grip_swaps_and_persists() {
        let prefs = StateRegistry::in_memory().shared();
        let theme = ThemeStore::default();
        let mut app = app(Arc::clone(&prefs), &theme);
        app.render(now());

        let t0 = Instant::now();
        let grip = grip_of(&app, "synercore");
        app.handle_pointer(PointerEvent::down(grip.x, grip.y, t0));
        assert!(app.grid().is_dragging());
        assert_eq!(app.status(), "Moving Synercore");

        let target = center_of(&app, "kes");
        app.handle_pointer(PointerEvent::moved(target.x, target.y, t0 + FRAME));
        app.frame(FRAME, now());
        assert_eq!(order_of(&app)[..3], ["kes", "sy3", "synercore"]);

        app.handle_pointer(PointerEvent::up(target.x, target.y, t0 + 2 * FRAME));
        assert!(!app.grid().is_dragging());
        assert_eq!(app.status(), "Placed Synercore");
        assert_eq!(
            prefs.get_json::<Vec<String>>(ORDER_KEY).unwrap()[..3],
            ["kes", "sy3", "synercore"]
        );
    }

    #[test]
    fn pressing_outside_a_grip_does_nothing() {
        let theme = ThemeStore::default();
        let mut app = app(StateRegistry::in_memory().shared(), &theme);
        app.render(now());
        let body = center_of(&app, "sy3");
        app.handle_pointer(PointerEvent::down(body.x, body.y, Instant::now()));
        assert!(!app.grid().is_dragging());
    }

    #[test]
    fn saved_order_is_restored() {
        let prefs = StateRegistry::in_memory().shared();
        prefs
            .set_json(ORDER_KEY, ORDER_VERSION, &["gemotra", "retired-co", "kes"])
            .unwrap();
        let theme = ThemeStore::default();
        let app = app(prefs, &theme);
        assert_eq!(
            order_of(&app),
            ["gemotra", "kes", "synercore", "sy3", "gen3", "philweld"]
        );
    }

    #[test]
    fn reset_restores_stock_order() {
        let prefs = StateRegistry::in_memory().shared();
        prefs.set_json(ORDER_KEY, ORDER_VERSION, &["philweld"]).unwrap();
        let theme = ThemeStore::default();
        let mut app = app(Arc::clone(&prefs), &theme);
        assert_eq!(order_of(&app)[0], "philweld");

        app.handle_key(KeyPress { key: Key::Char('r'), ctrl: false });
        assert_eq!(order_of(&app)[0], "synercore");
        assert_eq!(prefs.get_json::<Vec<String>>(ORDER_KEY).unwrap()[0], "synercore");
    }

    #[test]
    fn escape_cancels_the_drag() {
        let theme = ThemeStore::default();
        let mut app = app(StateRegistry::in_memory().shared(), &theme);
        app.render(now());
        let grip = grip_of(&app, "sy3");
        app.handle_pointer(PointerEvent::down(grip.x, grip.y, Instant::now()));
        assert!(app.grid().is_dragging());

        app.handle_key(KeyPress { key: Key::Escape, ctrl: false });
        assert!(!app.grid().is_dragging());
        assert!(app.status().is_empty());
    }

    #[test]
    fn theme_toggle_is_observed_and_persisted() {
        let prefs = StateRegistry::in_memory().shared();
        let theme = ThemeStore::with_registry(Arc::clone(&prefs));
        let mut app = app(Arc::clone(&prefs), &theme);
        assert!(!app.take_theme_changed());

        app.handle_key(KeyPress { key: Key::Char('t'), ctrl: false });
        assert!(app.take_theme_changed());
        assert!(!app.take_theme_changed());
        assert_eq!(theme.get(), ThemeMode::Light);
        assert_eq!(prefs.get(THEME_KEY).unwrap().text(), Some("\"light\""));

        let canvas = app.render(now());
        assert_eq!(
            canvas.cell(0, 0).unwrap().bg,
            Palette::for_mode(ThemeMode::Light).background
        );
    }

    #[test]
    fn language_toggle_is_drawn_and_persisted() {
        let prefs = StateRegistry::in_memory().shared();
        let theme = ThemeStore::default();
        let mut app = app(Arc::clone(&prefs), &theme);
        assert_eq!(app.lang(), Lang::En);

        app.handle_key(KeyPress { key: Key::Char('l'), ctrl: false });
        assert_eq!(app.lang(), Lang::Tl);
        assert_eq!(prefs.get_json::<String>(LANG_KEY).as_deref(), Some("tl"));

        let canvas = app.render(now());
        let text: String = (0..canvas.height()).map(|y| canvas.row_text(y) + "\n").collect();
        assert!(text.contains("Pumili ng kumpanya"));
        assert!(text.contains("Susunod: "));
        assert!(!text.contains("Choose a company"));

        drop(app);
        let app = self::app(Arc::clone(&prefs), &theme);
        assert_eq!(app.lang(), Lang::Tl);
    }

    #[test]
    fn forced_language_wins_over_saved() {
        let prefs = StateRegistry::in_memory().shared();
        prefs.set_json(LANG_KEY, LANG_VERSION, "tl").unwrap();
        let theme = ThemeStore::default();
        let config = AppConfig {
            lang: Some(Lang::En),
            ..AppConfig::default()
        };
        let app = App::new(config, prefs, &theme, now());
        assert_eq!(app.lang(), Lang::En);
    }

    #[test]
    fn dropping_the_app_unsubscribes() {
        let theme = ThemeStore::default();
        {
            let _app = app(StateRegistry::in_memory().shared(), &theme);
            assert_eq!(theme.subscriber_count(), 1);
        }
        assert_eq!(theme.subscriber_count(), 0);
    }

    #[test]
    fn render_draws_tiles_and_hides_dragged() {
        let theme = ThemeStore::default();
        let mut app = app(StateRegistry::in_memory().shared(), &theme);
        let canvas = app.render(now());
        let text: String = (0..canvas.height()).map(|y| canvas.row_text(y) + "\n").collect();
        assert!(text.contains("Synercore"));
        assert!(text.contains("KES Prime"));
        assert!(text.contains("Choose a company to continue"));
        assert!(text.contains("PR-2025-1025"));
        assert!(text.contains("Approved for PO"));
        assert!(text.contains("Next: Procurement - Create PO"));
        assert!(text.contains("Updated 3h"));
        assert!(text.contains("75%"));
        assert!(text.contains("Due 5h"));
        assert!(text.contains("Overdue 4h"));
        assert!(text.contains("Blocked:"));

        let grip = grip_of(&app, "synercore");
        app.handle_pointer(PointerEvent::down(grip.x, grip.y, Instant::now()));
        let canvas = app.render(now());
        // The footer names the dragged tile; skip it.
        let tiles: String = (0..canvas.height() - 1).map(|y| canvas.row_text(y) + "\n").collect();
        // Drawn once, as the ghost.
        assert_eq!(tiles.matches("Synercore").count(), 1);
    }

    #[test]
    fn overfull_progress_draws_a_full_bar() {
        let theme = ThemeStore::default();
        let app = app(StateRegistry::in_memory().shared(), &theme);
        let palette = Palette::for_mode(ThemeMode::Dark);
        let view = TileView {
            id: TileId::from("x"),
            rect: Rect::new(0.0, 0.0, 20.0, 8.0),
            name: "X".into(),
            subtitle: String::new(),
            accent: Accent::Cyan,
            progress: 250,
            pr_no: "-".into(),
            status: String::new(),
            next_actor: None,
            updated: None,
            blocked: None,
            deadline: None,
            lifted: false,
        };
        let mut canvas = Canvas::new(20, 8, palette.background);
        app.draw_tile(&mut canvas, &palette, &view);
        let bar = canvas.row_text(6);
        assert_eq!(bar.trim_matches(|c| c == '│' || c == ' '), "█".repeat(16));
    }

    #[test]
    fn exits_after_deadline() {
        let theme = ThemeStore::default();
        let config = AppConfig {
            exit_after: Some(Duration::from_millis(40)),
            ..AppConfig::default()
        };
        let mut app = App::new(config, StateRegistry::in_memory().shared(), &theme, now());
        app.frame(FRAME, now());
        app.frame(FRAME, now());
        assert!(!app.should_quit());
        app.frame(FRAME, now());
        assert!(app.should_quit());
    }
}
