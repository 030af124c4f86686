#![forbid(unsafe_code)]

//! Layout snapshots: where each tile is on screen right now.
//!
//! The engine never computes positions. Before every hit test it calls
//! [`LayoutSnapshot::refresh`] with the current order and then reads
//! rectangles through [`LayoutSnapshot::rect_of`]. A tile without a rectangle
//! is treated as unmounted and is never hit.
//!
//! Three implementations are provided:
//!
//! | Type | Use |
//! |------|-----|
//! | [`StaticLayout`] | fixed rectangles keyed by id (tests, external measurement) |
//! | [`GridLayout`] | column grid of fixed-size tiles, recomputed lazily |
//! | [`AnimatedLayout`] | a [`GridLayout`] whose moves are eased by a [`LayoutAnimator`] |

use std::collections::HashMap;
use std::time::Duration;

use swapgrid_core::geometry::{Point, Rect, Size};

use crate::TileId;
use crate::animator::LayoutAnimator;

/// Source of current tile rectangles.
pub trait LayoutSnapshot {
    /// Bring the snapshot up to date with `order`. Called before every hit test.
    fn refresh(&mut self, order: &[TileId]) {
        let _ = order;
    }

    /// The tile's current on-screen rectangle, or `None` if it is not mounted.
    fn rect_of(&self, id: &TileId) -> Option<Rect>;
}

impl<L: LayoutSnapshot + ?Sized> LayoutSnapshot for &mut L {
    fn refresh(&mut self, order: &[TileId]) {
        (**self).refresh(order);
    }

    fn rect_of(&self, id: &TileId) -> Option<Rect> {
        (**self).rect_of(id)
    }
}

// ---------------------------------------------------------------------------
// StaticLayout
// ---------------------------------------------------------------------------

/// Explicit rectangles keyed by id. Refreshing does not move anything.
#[derive(Debug, Clone, Default)]
pub struct StaticLayout {
    rects: HashMap<TileId, Rect>,
    refreshes: u64,
}

impl StaticLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rectangle (builder).
    #[must_use]
    pub fn with(mut self, id: impl Into<TileId>, rect: Rect) -> Self {
        self.insert(id, rect);
        self
    }

    /// Set or replace the rectangle of `id`.
    pub fn insert(&mut self, id: impl Into<TileId>, rect: Rect) {
        self.rects.insert(id.into(), rect);
    }

    /// Unmount `id`.
    pub fn remove(&mut self, id: &TileId) -> Option<Rect> {
        self.rects.remove(id)
    }

    /// How many times the engine refreshed this snapshot.
    pub fn refresh_count(&self) -> u64 {
        self.refreshes
    }
}

impl LayoutSnapshot for StaticLayout {
    fn refresh(&mut self, _order: &[TileId]) {
        self.refreshes += 1;
    }

    fn rect_of(&self, id: &TileId) -> Option<Rect> {
        self.rects.get(id).copied()
    }
}

// ---------------------------------------------------------------------------
// GridLayout
// ---------------------------------------------------------------------------

/// A tile that landed in a different rectangle during a refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotChange {
    pub id: TileId,
    /// Previous slot rectangle; `None` for a tile that just appeared.
    pub from: Option<Rect>,
    pub to: Rect,
}

/// Row-major grid of equally sized tiles.
///
/// A refresh only recomputes slots whose occupant changed since the previous
/// refresh, unless the geometry itself changed (columns, origin, tile size,
/// gap, or item count), which recomputes everything.
#[derive(Debug, Clone)]
pub struct GridLayout {
    origin: Point,
    tile: Size,
    gap: f32,
    columns: usize,
    slots: Vec<TileId>,
    rects: HashMap<TileId, Rect>,
    changes: Vec<SlotChange>,
    invalidated: bool,
    recomputed: u64,
}

impl GridLayout {
    /// Create a grid with `columns` columns (at least one) of `tile`-sized
    /// tiles separated by `gap`, starting at `origin`.
    pub fn new(origin: Point, tile: Size, gap: f32, columns: usize) -> Self {
        Self {
            origin,
            tile,
            gap: gap.max(0.0),
            columns: columns.max(1),
            slots: Vec::new(),
            rects: HashMap::new(),
            changes: Vec::new(),
            invalidated: true,
            recomputed: 0,
        }
    }

    /// Number of columns.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Tile size.
    pub fn tile_size(&self) -> Size {
        self.tile
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn gap(&self) -> f32 {
        self.gap
    }

    /// Change the column count. Forces a full recompute on the next refresh.
    pub fn set_columns(&mut self, columns: usize) {
        let columns = columns.max(1);
        if columns != self.columns {
            self.columns = columns;
            self.invalidated = true;
        }
    }

    /// Move the grid. Forces a full recompute on the next refresh.
    pub fn set_origin(&mut self, origin: Point) {
        if origin != self.origin {
            self.origin = origin;
            self.invalidated = true;
        }
    }

    /// Resize every tile. Forces a full recompute on the next refresh.
    pub fn set_tile_size(&mut self, tile: Size) {
        if tile != self.tile {
            self.tile = tile;
            self.invalidated = true;
        }
    }

    /// Change the gap. Forces a full recompute on the next refresh.
    pub fn set_gap(&mut self, gap: f32) {
        let gap = gap.max(0.0);
        if gap != self.gap {
            self.gap = gap;
            self.invalidated = true;
        }
    }

    /// Rectangle of the slot at `index` (row-major).
    pub fn slot_rect(&self, index: usize) -> Rect {
        let col = index % self.columns;
        let row = index / self.columns;
        Rect::new(
            self.origin.x + col as f32 * (self.tile.width + self.gap),
            self.origin.y + row as f32 * (self.tile.height + self.gap),
            self.tile.width,
            self.tile.height,
        )
    }

    /// Total extent of a grid holding `count` tiles.
    pub fn content_size(&self, count: usize) -> Size {
        if count == 0 {
            return Size::default();
        }
        let cols = count.min(self.columns);
        let rows = count.div_ceil(self.columns);
        Size::new(
            cols as f32 * self.tile.width + (cols - 1) as f32 * self.gap,
            rows as f32 * self.tile.height + (rows - 1) as f32 * self.gap,
        )
    }

    /// Occupants as of the last refresh, in slot order.
    pub fn slots(&self) -> &[TileId] {
        &self.slots
    }

    /// Slot rectangles computed since creation, for observing laziness.
    pub fn recompute_count(&self) -> u64 {
        self.recomputed
    }

    /// Take the tiles that changed rectangle since the last call.
    pub fn drain_changes(&mut self) -> Vec<SlotChange> {
        std::mem::take(&mut self.changes)
    }

    fn place(&mut self, index: usize, id: &TileId) {
        let to = self.slot_rect(index);
        self.recomputed += 1;
        let from = self.rects.insert(id.clone(), to);
        if from != Some(to) {
            self.changes.push(SlotChange {
                id: id.clone(),
                from,
                to,
            });
        }
    }
}

impl LayoutSnapshot for GridLayout {
    fn refresh(&mut self, order: &[TileId]) {
        let full = std::mem::take(&mut self.invalidated) || self.slots.len() != order.len();

        if full {
            let stale: Vec<TileId> = self
                .rects
                .keys()
                .filter(|id| !order.contains(id))
                .cloned()
                .collect();
            for id in &stale {
                self.rects.remove(id);
            }
            for (index, id) in order.iter().enumerate() {
                self.place(index, id);
            }
            self.slots = order.to_vec();
            return;
        }

        let mut evicted = Vec::new();
        for (index, id) in order.iter().enumerate() {
            if self.slots[index] == *id {
                continue;
            }
            self.place(index, id);
            let previous = std::mem::replace(&mut self.slots[index], id.clone());
            evicted.push(previous);
        }
        for id in evicted {
            if !order.contains(&id) {
                self.rects.remove(&id);
            }
        }
    }

    fn rect_of(&self, id: &TileId) -> Option<Rect> {
        self.rects.get(id).copied()
    }
}

// ---------------------------------------------------------------------------
// AnimatedLayout
// ---------------------------------------------------------------------------

/// A [`GridLayout`] whose slot changes are eased by an animator.
///
/// [`rect_of`](LayoutSnapshot::rect_of) returns the in-flight rectangle while
/// a tile slides, so hit tests match what is drawn.
#[derive(Debug, Clone)]
pub struct AnimatedLayout<A> {
    grid: GridLayout,
    animator: A,
}

impl<A: LayoutAnimator> AnimatedLayout<A> {
    pub fn new(grid: GridLayout, animator: A) -> Self {
        Self { grid, animator }
    }

    /// Advance running slides by `dt`.
    pub fn tick(&mut self, dt: Duration) {
        self.animator.tick(dt);
    }

    /// Whether any tile is still sliding.
    pub fn is_animating(&self) -> bool {
        self.animator.is_animating()
    }

    /// Slide `id` from `from` into its slot, e.g. from the ghost after a drop.
    pub fn settle_from(&mut self, id: &TileId, from: Rect) {
        if let Some(to) = self.grid.rect_of(id) {
            self.animator.transition(id, from, to);
        }
    }

    /// Slot rectangle of `id`, ignoring any slide in progress.
    pub fn resting_rect(&self, id: &TileId) -> Option<Rect> {
        self.grid.rect_of(id)
    }

    pub fn grid(&self) -> &GridLayout {
        &self.grid
    }

    /// Mutable access to the grid geometry. Geometry changes snap on the next
    /// refresh; they are not animated.
    pub fn grid_mut(&mut self) -> &mut GridLayout {
        &mut self.grid
    }

    pub fn animator(&self) -> &A {
        &self.animator
    }

    pub fn animator_mut(&mut self) -> &mut A {
        &mut self.animator
    }
}

impl<A: LayoutAnimator> LayoutSnapshot for AnimatedLayout<A> {
    fn refresh(&mut self, order: &[TileId]) {
        let geometry_changed = self.grid.invalidated;
        self.grid.refresh(order);
        let changes = self.grid.drain_changes();
        if geometry_changed {
            self.animator.clear();
            return;
        }
        for change in changes {
            let Some(from) = change.from else {
                continue;
            };
            let visual = self.animator.current(&change.id).unwrap_or(from);
            self.animator.transition(&change.id, visual, change.to);
        }
    }

    fn rect_of(&self, id: &TileId) -> Option<Rect> {
        self.animator
            .current(id)
            .or_else(|| self.grid.rect_of(id))
    }
}
