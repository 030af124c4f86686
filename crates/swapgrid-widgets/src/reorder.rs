#![forbid(unsafe_code)]

//! Drag-to-reorder engine.
//!
//! [`ReorderGrid`] owns the ordered items and at most one [`DragSession`].
//! While a tile is dragged, every animation frame re-evaluates which other
//! tile's inner hit region holds the pointer and moves the dragged item there
//! in the backing order.
//!
//! # Frame model
//!
//! Pointer moves are only queued ([`ReorderGrid::pointer_move`]); the latest
//! one is evaluated on the next [`ReorderGrid::tick`]. A tick:
//!
//! 1. retargets the ghost at `pointer - pointer_offset` (if a move is pending);
//! 2. eases the ghost a `follow_factor` fraction toward its target;
//! 3. refreshes the layout snapshot and hit-tests the pending pointer.
//!
//! # Swap rules
//!
//! A hit on tile `t` reorders only when all hold:
//!
//! - `t` is not the tile of the previous reorder (`last_over`). Leaving every
//!   hit region clears `last_over`.
//! - at least `swap_cooldown` has passed since the previous reorder, measured
//!   with event timestamps.
//!
//! # Failure modes
//!
//! | Situation | Behavior |
//! |-----------|----------|
//! | Pointer outside every inner region | Drag continues, no reorder |
//! | Press on a tile the layout cannot measure | Drag does not start |
//! | Dragged or target id removed mid-drag | Lookup miss, no reorder |
//! | Second press while dragging | Ignored, first session stays |
//! | Release never observed, only cancel | Same teardown as release |

use std::fmt;
use std::time::{Duration, Instant};

use swapgrid_core::animation::Follow;
use swapgrid_core::event::{PointerEvent, PointerKind};
use swapgrid_core::event_coalescer::MoveCoalescer;
use swapgrid_core::geometry::{Point, Rect, Size};

use crate::layout::LayoutSnapshot;
use crate::order;
use crate::tile::{HandleMap, RenderedGhost, RenderedTile, TileApi, TileRenderer};
use crate::{Keyed, TileId};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// How the dragged item moves into the target's slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReorderStrategy {
    /// Exchange the dragged item with the target. Only two items move.
    #[default]
    Swap,
    /// Remove the dragged item and reinsert it at the target's index; items
    /// in between shift by one.
    Shift,
}

impl ReorderStrategy {
    /// Parse a strategy name (`"swap"` or `"shift"`, case-insensitive).
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "swap" => Some(Self::Swap),
            "shift" => Some(Self::Shift),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Swap => "swap",
            Self::Shift => "shift",
        }
    }
}

/// Tunables of the reorder gesture.
///
/// They trade "easy to grab a neighbor" against "accidental reorders while
/// passing through".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReorderConfig {
    /// Side scale of the inner hit region, strictly in `(0, 1)` (default: 0.92).
    pub hit_shrink: f32,
    /// Minimum time between two reorders (default: 60 ms).
    pub swap_cooldown: Duration,
    /// Fraction of the remaining distance the ghost covers per frame, in
    /// `(0, 1]`; `1.0` snaps (default: 0.30).
    pub follow_factor: f32,
    /// Reorder strategy (default: [`ReorderStrategy::Swap`]).
    pub strategy: ReorderStrategy,
}

impl Default for ReorderConfig {
    fn default() -> Self {
        Self {
            hit_shrink: 0.92,
            swap_cooldown: Duration::from_millis(60),
            follow_factor: 0.30,
            strategy: ReorderStrategy::Swap,
        }
    }
}

impl ReorderConfig {
    /// Tighter targets and a slower ghost, for dense dashboards.
    #[must_use]
    pub fn dashboard() -> Self {
        Self {
            hit_shrink: 0.82,
            swap_cooldown: Duration::from_millis(90),
            follow_factor: 0.24,
            strategy: ReorderStrategy::Swap,
        }
    }

    /// Small central targets, long cooldown, and a ghost pinned to the pointer.
    #[must_use]
    pub fn company_options() -> Self {
        Self {
            hit_shrink: 0.55,
            swap_cooldown: Duration::from_millis(170),
            follow_factor: 1.0,
            strategy: ReorderStrategy::Swap,
        }
    }

    /// Look up a preset by name: `default`, `dashboard`, or `company-options`.
    pub fn preset(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "default" | "grid" => Some(Self::default()),
            "dashboard" => Some(Self::dashboard()),
            "company-options" | "companies" => Some(Self::company_options()),
            _ => None,
        }
    }

    #[must_use]
    pub fn with_hit_shrink(mut self, hit_shrink: f32) -> Self {
        self.hit_shrink = hit_shrink;
        self
    }

    #[must_use]
    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.swap_cooldown = cooldown;
        self
    }

    #[must_use]
    pub fn with_follow_factor(mut self, factor: f32) -> Self {
        self.follow_factor = factor;
        self
    }

    #[must_use]
    pub fn with_strategy(mut self, strategy: ReorderStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Check that every tunable is in range.
    ///
    /// # Errors
    ///
    /// Returns the first out-of-range value found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.hit_shrink > 0.0 && self.hit_shrink < 1.0) {
            return Err(ConfigError::HitShrinkOutOfRange(self.hit_shrink));
        }
        if !(self.follow_factor > 0.0 && self.follow_factor <= 1.0) {
            return Err(ConfigError::FollowFactorOutOfRange(self.follow_factor));
        }
        Ok(())
    }

    /// Replace out-of-range tunables with their defaults.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.hit_shrink > 0.0 && self.hit_shrink < 1.0) {
            swapgrid_core::warn!(
                target: "swapgrid::reorder",
                hit_shrink = self.hit_shrink,
                "hit shrink out of range, using default"
            );
            self.hit_shrink = defaults.hit_shrink;
        }
        if !(self.follow_factor > 0.0 && self.follow_factor <= 1.0) {
            swapgrid_core::warn!(
                target: "swapgrid::reorder",
                follow_factor = self.follow_factor,
                "follow factor out of range, using default"
            );
            self.follow_factor = defaults.follow_factor;
        }
        self
    }
}

/// A [`ReorderConfig`] value outside its accepted range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// `hit_shrink` must lie strictly between 0 and 1.
    HitShrinkOutOfRange(f32),
    /// `follow_factor` must lie in `(0, 1]`.
    FollowFactorOutOfRange(f32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HitShrinkOutOfRange(v) => {
                write!(f, "hit shrink factor {v} is outside (0, 1)")
            }
            Self::FollowFactorOutOfRange(v) => {
                write!(f, "follow factor {v} is outside (0, 1]")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Session and outcomes
// ---------------------------------------------------------------------------

/// A reorder performed during a drag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Swap {
    pub dragged: TileId,
    pub target: TileId,
    /// Index of the dragged item before the reorder.
    pub from: usize,
    /// Index of the target before the reorder; the dragged item's new index.
    pub to: usize,
    pub strategy: ReorderStrategy,
}

/// State of the active drag. Exists only between press and release.
#[derive(Debug, Clone)]
pub struct DragSession {
    dragged: TileId,
    pointer_offset: Point,
    ghost_size: Size,
    ghost: Follow,
    pointer: Point,
    last_over: Option<TileId>,
    last_swap_at: Option<Instant>,
    started_at: Instant,
    swaps: u32,
}

impl DragSession {
    /// The item being moved.
    pub fn dragged(&self) -> &TileId {
        &self.dragged
    }

    /// Vector from the tile's top-left corner to the grab point.
    pub fn pointer_offset(&self) -> Point {
        self.pointer_offset
    }

    /// Size of the tile when it was picked up.
    pub fn ghost_size(&self) -> Size {
        self.ghost_size
    }

    /// Where the ghost's top-left corner is drawn this frame.
    pub fn ghost_position(&self) -> Point {
        self.ghost.position()
    }

    /// Where the ghost is heading.
    pub fn ghost_target(&self) -> Point {
        self.ghost.target()
    }

    pub fn ghost_rect(&self) -> Rect {
        Rect::from_origin_size(self.ghost.position(), self.ghost_size)
    }

    /// Last evaluated pointer position.
    pub fn pointer(&self) -> Point {
        self.pointer
    }

    /// The tile of the most recent reorder while the pointer stays on it.
    pub fn last_over(&self) -> Option<&TileId> {
        self.last_over.as_ref()
    }

    /// Timestamp of the most recent reorder in this session.
    pub fn last_swap_at(&self) -> Option<Instant> {
        self.last_swap_at
    }

    /// Timestamp of the press that started the session.
    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    /// Reorders performed in this session.
    pub fn swap_count(&self) -> u32 {
        self.swaps
    }
}

/// Summary of a finished drag.
#[derive(Debug, Clone, PartialEq)]
pub struct DragEnd {
    pub id: TileId,
    /// Ghost rectangle at release; the layout can slide the tile home from here.
    pub ghost_rect: Rect,
    /// `true` when the gesture was cancelled rather than released.
    pub cancelled: bool,
    pub swaps: u32,
}

/// What [`ReorderGrid::handle_event`] did with an event.
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    /// The event did not concern the grid.
    Ignored,
    /// A drag started on this tile.
    Started(TileId),
    /// A move was queued for the next tick.
    Queued,
    /// The active drag ended.
    Ended(DragEnd),
}

type ReorderCallback<T> = Box<dyn FnMut(&[T])>;
type SwapCallback = Box<dyn FnMut(&Swap)>;
type IdCallback = Box<dyn FnMut(&TileId)>;

// ---------------------------------------------------------------------------
// Hit testing
// ---------------------------------------------------------------------------

/// Find the tile other than `exclude` whose inner region contains `pointer`.
///
/// Tiles the layout cannot measure are skipped. When inner regions overlap,
/// the tile whose center is nearest the pointer wins; on equal distance the
/// earlier tile in `order` wins.
pub fn hit_test<L: LayoutSnapshot + ?Sized>(
    order: &[TileId],
    exclude: &TileId,
    pointer: Point,
    hit_shrink: f32,
    layout: &L,
) -> Option<TileId> {
    let mut best: Option<(&TileId, f32)> = None;
    for id in order {
        if id == exclude {
            continue;
        }
        let Some(rect) = layout.rect_of(id) else {
            continue;
        };
        if !rect.inner_contains(pointer, hit_shrink) {
            continue;
        }
        let d2 = rect.center().distance_squared(pointer);
        if best.is_none_or(|(_, best_d2)| d2 < best_d2) {
            best = Some((id, d2));
        }
    }
    best.map(|(id, _)| id.clone())
}

// ---------------------------------------------------------------------------
// ReorderGrid
// ---------------------------------------------------------------------------

/// An ordered collection of tiles that can be reordered by dragging.
pub struct ReorderGrid<T> {
    items: Vec<T>,
    config: ReorderConfig,
    session: Option<DragSession>,
    coalescer: MoveCoalescer,
    handles: HandleMap,
    on_reorder: Option<ReorderCallback<T>>,
    on_swap: Option<SwapCallback>,
    on_drag_start: Option<IdCallback>,
    on_drag_end: Option<IdCallback>,
}

impl<T: Keyed> ReorderGrid<T> {
    /// Create a grid with the default configuration.
    pub fn new(items: Vec<T>) -> Self {
        Self::with_config(items, ReorderConfig::default())
    }

    /// Create a grid with `config`. Out-of-range tunables fall back to their
    /// defaults; see [`try_new`](Self::try_new) to reject them instead.
    pub fn with_config(items: Vec<T>, config: ReorderConfig) -> Self {
        Self {
            items,
            config: config.sanitized(),
            session: None,
            coalescer: MoveCoalescer::new(),
            handles: HandleMap::new(),
            on_reorder: None,
            on_swap: None,
            on_drag_start: None,
            on_drag_end: None,
        }
    }

    /// Create a grid after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a tunable is out of range.
    pub fn try_new(items: Vec<T>, config: ReorderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_config(items, config))
    }

    /// Called with the full new order after every reorder.
    #[must_use]
    pub fn on_reorder(mut self, callback: impl FnMut(&[T]) + 'static) -> Self {
        self.on_reorder = Some(Box::new(callback));
        self
    }

    /// Called with each reorder's details.
    #[must_use]
    pub fn on_swap(mut self, callback: impl FnMut(&Swap) + 'static) -> Self {
        self.on_swap = Some(Box::new(callback));
        self
    }

    /// Called with the dragged id when a drag starts.
    #[must_use]
    pub fn on_drag_start(mut self, callback: impl FnMut(&TileId) + 'static) -> Self {
        self.on_drag_start = Some(Box::new(callback));
        self
    }

    /// Called with the dragged id when a drag ends or is cancelled.
    #[must_use]
    pub fn on_drag_end(mut self, callback: impl FnMut(&TileId) + 'static) -> Self {
        self.on_drag_end = Some(Box::new(callback));
        self
    }

    // --- accessors -------------------------------------------------------

    /// Items in display order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Mutable access to the items. Ids that disappear while dragging are
    /// treated as lookup misses.
    pub fn items_mut(&mut self) -> &mut Vec<T> {
        &mut self.items
    }

    /// Replace the items.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Ids in display order.
    pub fn ids(&self) -> Vec<TileId> {
        order::ids(&self.items)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn config(&self) -> &ReorderConfig {
        &self.config
    }

    /// Replace the tunables, sanitized as in [`with_config`](Self::with_config).
    /// A running drag keeps its ghost factor.
    pub fn set_config(&mut self, config: ReorderConfig) {
        self.config = config.sanitized();
    }

    /// The active drag, if any.
    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Id of the dragged tile, if any.
    pub fn dragged_id(&self) -> Option<&TileId> {
        self.session.as_ref().map(|s| &s.dragged)
    }

    /// Handles bound during the last [`render`](Self::render).
    pub fn handles(&self) -> &HandleMap {
        &self.handles
    }

    /// Whether a move is waiting for the next tick.
    pub fn has_pending_move(&self) -> bool {
        self.coalescer.has_pending()
    }

    // --- gesture ---------------------------------------------------------

    /// Start dragging `id` from a primary press.
    ///
    /// Returns `false` without side effects when a drag is already active,
    /// the press is not a primary-button press, `id` is not in the order, or
    /// the layout cannot measure the tile.
    pub fn begin_drag<L: LayoutSnapshot + ?Sized>(
        &mut self,
        id: &TileId,
        event: &PointerEvent,
        layout: &mut L,
    ) -> bool {
        if let Some(active) = &self.session {
            swapgrid_core::trace!(
                target: "swapgrid::reorder",
                active = %active.dragged,
                ignored = %id,
                "begin ignored: drag already active"
            );
            return false;
        }
        if !event.is_primary_down() {
            return false;
        }
        if order::position_of(&self.items, id).is_none() {
            return false;
        }
        layout.refresh(&order::ids(&self.items));
        let Some(rect) = layout.rect_of(id) else {
            swapgrid_core::trace!(target: "swapgrid::reorder", tile = %id, "begin ignored: tile not mounted");
            return false;
        };

        let origin = rect.origin();
        self.coalescer.clear();
        self.session = Some(DragSession {
            dragged: id.clone(),
            pointer_offset: event.position - origin,
            ghost_size: rect.size(),
            ghost: Follow::new(origin, self.config.follow_factor),
            pointer: event.position,
            last_over: None,
            last_swap_at: None,
            started_at: event.at,
            swaps: 0,
        });

        swapgrid_core::debug!(
            target: "swapgrid::reorder",
            tile = %id,
            x = event.position.x,
            y = event.position.y,
            "drag started"
        );
        if let Some(callback) = self.on_drag_start.as_mut() {
            callback(id);
        }
        true
    }

    /// Start a drag if `event` presses a bound handle.
    ///
    /// Handles come from the last [`render`](Self::render) pass.
    pub fn pointer_down<L: LayoutSnapshot + ?Sized>(
        &mut self,
        event: &PointerEvent,
        layout: &mut L,
    ) -> bool {
        if !event.is_primary_down() {
            return false;
        }
        let Some(id) = self.handles.hit(event.position).cloned() else {
            return false;
        };
        self.begin_drag(&id, event, layout)
    }

    /// Queue a move for the next [`tick`](Self::tick). Ignored when idle.
    pub fn pointer_move(&mut self, event: PointerEvent) {
        if self.session.is_none() || event.kind != PointerKind::Move {
            return;
        }
        let _ = self.coalescer.push(event);
    }

    /// Run one frame: ease the ghost and evaluate the pending move, if any.
    pub fn tick<L: LayoutSnapshot + ?Sized>(&mut self, layout: &mut L) -> Option<Swap> {
        let session = self.session.as_mut()?;
        let pending = self.coalescer.take_for_frame();
        if let Some(event) = &pending {
            session.pointer = event.position;
            session.ghost.set_target(event.position - session.pointer_offset);
        }
        session.ghost.step();

        let event = pending?;
        self.evaluate(event.position, event.at, layout)
    }

    /// Queue `event` and evaluate it immediately.
    pub fn process_move<L: LayoutSnapshot + ?Sized>(
        &mut self,
        event: PointerEvent,
        layout: &mut L,
    ) -> Option<Swap> {
        self.pointer_move(event);
        self.tick(layout)
    }

    /// End the drag on release.
    pub fn pointer_up(&mut self, _event: &PointerEvent) -> Option<DragEnd> {
        self.finish(false)
    }

    /// End the drag on a platform cancel.
    pub fn pointer_cancel(&mut self, _event: &PointerEvent) -> Option<DragEnd> {
        self.finish(true)
    }

    /// End the drag programmatically. No-op when idle.
    pub fn end_drag(&mut self) -> Option<DragEnd> {
        self.finish(false)
    }

    /// Cancel the drag programmatically. Reorders already made are kept.
    pub fn cancel_drag(&mut self) -> Option<DragEnd> {
        self.finish(true)
    }

    /// Route a viewport-wide pointer event.
    ///
    /// Moves, releases, and cancels must reach the grid even when the pointer
    /// is outside it.
    pub fn handle_event<L: LayoutSnapshot + ?Sized>(
        &mut self,
        event: PointerEvent,
        layout: &mut L,
    ) -> EventOutcome {
        match event.kind {
            PointerKind::Down => {
                if self.pointer_down(&event, layout) {
                    match self.dragged_id() {
                        Some(id) => EventOutcome::Started(id.clone()),
                        None => EventOutcome::Ignored,
                    }
                } else {
                    EventOutcome::Ignored
                }
            }
            PointerKind::Move => {
                if self.session.is_some() {
                    self.pointer_move(event);
                    EventOutcome::Queued
                } else {
                    EventOutcome::Ignored
                }
            }
            PointerKind::Up => self
                .pointer_up(&event)
                .map_or(EventOutcome::Ignored, EventOutcome::Ended),
            PointerKind::Cancel => self
                .pointer_cancel(&event)
                .map_or(EventOutcome::Ignored, EventOutcome::Ended),
        }
    }

    fn evaluate<L: LayoutSnapshot + ?Sized>(
        &mut self,
        pointer: Point,
        now: Instant,
        layout: &mut L,
    ) -> Option<Swap> {
        let order = order::ids(&self.items);
        layout.refresh(&order);

        let session = self.session.as_mut()?;
        let Some(target) =
            hit_test(&order, &session.dragged, pointer, self.config.hit_shrink, &*layout)
        else {
            if let Some(left) = session.last_over.take() {
                swapgrid_core::trace!(target: "swapgrid::reorder", tile = %left, "left hit region");
            }
            return None;
        };

        if session.last_over.as_ref() == Some(&target) {
            return None;
        }
        if let Some(last) = session.last_swap_at
            && now.saturating_duration_since(last) < self.config.swap_cooldown
        {
            swapgrid_core::trace!(target: "swapgrid::reorder", tile = %target, "reorder cooling down");
            return None;
        }

        let strategy = self.config.strategy;
        let (from, to) = match strategy {
            ReorderStrategy::Swap => order::swap_ids(&mut self.items, &session.dragged, &target)?,
            ReorderStrategy::Shift => order::shift_id(&mut self.items, &session.dragged, &target)?,
        };

        session.last_over = Some(target.clone());
        session.last_swap_at = Some(now);
        session.swaps = session.swaps.saturating_add(1);
        let swap = Swap {
            dragged: session.dragged.clone(),
            target,
            from,
            to,
            strategy,
        };

        swapgrid_core::debug!(
            target: "swapgrid::reorder",
            dragged = %swap.dragged,
            over = %swap.target,
            from = swap.from,
            to = swap.to,
            strategy = swap.strategy.as_str(),
            "reordered"
        );
        if let Some(callback) = self.on_reorder.as_mut() {
            callback(&self.items);
        }
        if let Some(callback) = self.on_swap.as_mut() {
            callback(&swap);
        }
        Some(swap)
    }

    fn finish(&mut self, cancelled: bool) -> Option<DragEnd> {
        self.coalescer.clear();
        let session = self.session.take()?;
        let end = DragEnd {
            ghost_rect: session.ghost_rect(),
            id: session.dragged,
            cancelled,
            swaps: session.swaps,
        };
        swapgrid_core::debug!(
            target: "swapgrid::reorder",
            tile = %end.id,
            cancelled = end.cancelled,
            swaps = end.swaps,
            "drag ended"
        );
        if let Some(callback) = self.on_drag_end.as_mut() {
            callback(&end.id);
        }
        Some(end)
    }

    // --- rendering -------------------------------------------------------

    /// Render every tile in display order and rebuild the handle map.
    ///
    /// The dragged tile is reported with `visible = false` while a drag is
    /// active; draw the ghost in its place.
    pub fn render<R: TileRenderer<T>>(&mut self, renderer: &mut R) -> Vec<RenderedTile<R::Output>> {
        self.handles.clear();
        let dragged = self.session.as_ref().map(|s| &s.dragged);
        let mut out = Vec::with_capacity(self.items.len());
        for item in &self.items {
            let id = item.tile_id();
            let mut api = TileApi::new(id, false, Some(&mut self.handles));
            let output = renderer.render(item, &mut api);
            out.push(RenderedTile {
                id: id.clone(),
                visible: dragged != Some(id),
                output,
            });
        }
        out
    }

    /// Render the dragged item as the ghost, or `None` when idle (or when the
    /// dragged item has been removed).
    pub fn render_ghost<R: TileRenderer<T>>(&self, renderer: &mut R) -> Option<RenderedGhost<R::Output>> {
        let session = self.session.as_ref()?;
        let item = self
            .items
            .iter()
            .find(|item| item.tile_id() == &session.dragged)?;
        let mut api = TileApi::detached(&session.dragged, true);
        let output = renderer.render(item, &mut api);
        Some(RenderedGhost {
            id: session.dragged.clone(),
            rect: session.ghost_rect(),
            output,
        })
    }
}

impl<T> fmt::Debug for ReorderGrid<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReorderGrid")
            .field("items", &self.items.len())
            .field("config", &self.config)
            .field("session", &self.session)
            .field("pending_move", &self.coalescer.has_pending())
            .field("handles", &self.handles.len())
            .field("on_reorder", &self.on_reorder.is_some())
            .field("on_swap", &self.on_swap.is_some())
            .field("on_drag_start", &self.on_drag_start.is_some())
            .field("on_drag_end", &self.on_drag_end.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{GridLayout, StaticLayout};
    use std::cell::RefCell;
    use std::rc::Rc;
    use swapgrid_core::event::PointerButton;

    const MS: Duration = Duration::from_millis(1);

    /// Three 100x100 tiles left to right with no gap.
    fn row_layout() -> StaticLayout {
        StaticLayout::new()
            .with("A", Rect::new(0.0, 0.0, 100.0, 100.0))
            .with("B", Rect::new(100.0, 0.0, 100.0, 100.0))
            .with("C", Rect::new(200.0, 0.0, 100.0, 100.0))
    }

    fn abc() -> Vec<TileId> {
        vec!["A".into(), "B".into(), "C".into()]
    }

    fn names(grid: &ReorderGrid<TileId>) -> Vec<&str> {
        grid.items().iter().map(TileId::as_str).collect()
    }

    fn id(s: &str) -> TileId {
        TileId::from(s)
    }

    #[test]
    fn config_defaults_and_presets() {
        let d = ReorderConfig::default();
        assert_eq!(d.hit_shrink, 0.92);
        assert_eq!(d.swap_cooldown, 60 * MS);
        assert_eq!(d.follow_factor, 0.30);
        assert_eq!(d.strategy, ReorderStrategy::Swap);

        let dash = ReorderConfig::dashboard();
        assert_eq!((dash.hit_shrink, dash.swap_cooldown, dash.follow_factor), (0.82, 90 * MS, 0.24));

        let co = ReorderConfig::company_options();
        assert_eq!((co.hit_shrink, co.swap_cooldown, co.follow_factor), (0.55, 170 * MS, 1.0));

        assert_eq!(ReorderConfig::preset("Company_Options"), Some(co));
        assert_eq!(ReorderConfig::preset("nope"), None);
        for preset in [d, dash, co] {
            assert!(preset.validate().is_ok());
        }
    }

    #[test]
    fn config_validation_rejects_out_of_range() {
        let base = ReorderConfig::default();
        assert_eq!(
            base.with_hit_shrink(1.0).validate(),
            Err(ConfigError::HitShrinkOutOfRange(1.0))
        );
        assert!(base.with_hit_shrink(0.0).validate().is_err());
        assert!(base.with_hit_shrink(f32::NAN).validate().is_err());
        assert!(base.with_follow_factor(0.0).validate().is_err());
        assert!(base.with_follow_factor(1.0).validate().is_ok());
        assert!(base.with_follow_factor(1.5).validate().is_err());
        assert!(ReorderGrid::try_new(abc(), base.with_hit_shrink(2.0)).is_err());

        let msg = ConfigError::FollowFactorOutOfRange(1.5).to_string();
        assert!(msg.contains("1.5"));
    }

    #[test]
    fn unchecked_constructors_sanitize_tunables() {
        let defaults = ReorderConfig::default();
        let bad = ReorderConfig::company_options()
            .with_hit_shrink(1.5)
            .with_follow_factor(f32::NAN);
        let grid = ReorderGrid::with_config(abc(), bad);
        assert_eq!(grid.config().hit_shrink, defaults.hit_shrink);
        assert_eq!(grid.config().follow_factor, defaults.follow_factor);
        // Valid fields are kept.
        assert_eq!(
            grid.config().swap_cooldown,
            ReorderConfig::company_options().swap_cooldown
        );
        assert!(grid.config().validate().is_ok());

        let mut grid = ReorderGrid::new(abc());
        grid.set_config(ReorderConfig::dashboard().with_hit_shrink(f32::INFINITY));
        assert_eq!(grid.config().hit_shrink, defaults.hit_shrink);
        assert_eq!(grid.config().follow_factor, ReorderConfig::dashboard().follow_factor);
    }

    #[test]
    fn oversized_hit_shrink_cannot_widen_hits() {
        // A shrink of 1.0 or more would make the region touch or pass the
        // neighbor's edge.
        let mut layout = row_layout();
        let mut grid = ReorderGrid::with_config(abc(), ReorderConfig::default().with_hit_shrink(3.0));
        let t0 = Instant::now();
        grid.begin_drag(&id("A"), &PointerEvent::down(50.0, 50.0, t0), &mut layout);
        // Inside B's box but outside its default inner region.
        let swap = grid.process_move(PointerEvent::moved(101.0, 50.0, t0), &mut layout);
        assert!(swap.is_none());
        assert_eq!(names(&grid), ["A", "B", "C"]);
    }

    #[test]
    fn strategy_parse() {
        assert_eq!(ReorderStrategy::parse("SHIFT"), Some(ReorderStrategy::Shift));
        assert_eq!(ReorderStrategy::parse(" swap "), Some(ReorderStrategy::Swap));
        assert_eq!(ReorderStrategy::parse("drop"), None);
    }

    #[test]
    fn hit_test_prefers_nearest_center() {
        // Overlapping tiles: both inner regions contain (60, 50).
        let layout = StaticLayout::new()
            .with("X", Rect::new(0.0, 0.0, 100.0, 100.0))
            .with("Y", Rect::new(40.0, 0.0, 100.0, 100.0))
            .with("D", Rect::new(500.0, 0.0, 10.0, 10.0));
        let order = vec![id("D"), id("X"), id("Y")];
        let hit = hit_test(&order, &id("D"), Point::new(60.0, 50.0), 0.92, &layout);
        assert_eq!(hit, Some(id("X")));
        let hit = hit_test(&order, &id("D"), Point::new(85.0, 50.0), 0.92, &layout);
        assert_eq!(hit, Some(id("Y")));
    }

    #[test]
    fn hit_test_tie_goes_to_first_in_order() {
        let layout = StaticLayout::new()
            .with("X", Rect::new(0.0, 0.0, 100.0, 100.0))
            .with("Y", Rect::new(0.0, 0.0, 100.0, 100.0));
        let order = vec![id("Y"), id("X")];
        let hit = hit_test(&order, &id("Z"), Point::new(50.0, 50.0), 0.5, &layout);
        assert_eq!(hit, Some(id("Y")));
    }

    #[test]
    fn hit_test_excludes_dragged_and_unmounted() {
        let layout = StaticLayout::new().with("A", Rect::new(0.0, 0.0, 100.0, 100.0));
        let order = vec![id("A"), id("ghost")];
        assert_eq!(hit_test(&order, &id("A"), Point::new(50.0, 50.0), 0.9, &layout), None);
    }

    #[test]
    fn hit_region_boundaries_on_all_sides() {
        // W=200, H=100 at (10, 20), f=0.5 -> inner region x in [60, 160], y in [45, 95].
        let layout = StaticLayout::new().with("T", Rect::new(10.0, 20.0, 200.0, 100.0));
        let order = vec![id("T")];
        let probe = |x: f32, y: f32| hit_test(&order, &id("D"), Point::new(x, y), 0.5, &layout).is_some();

        assert!(probe(60.0, 70.0), "left edge inside");
        assert!(!probe(59.9, 70.0), "left edge outside");
        assert!(probe(160.0, 70.0), "right edge inside");
        assert!(!probe(160.1, 70.0), "right edge outside");
        assert!(probe(110.0, 45.0), "top edge inside");
        assert!(!probe(110.0, 44.9), "top edge outside");
        assert!(probe(110.0, 95.0), "bottom edge inside");
        assert!(!probe(110.0, 95.1), "bottom edge outside");
    }

    #[test]
    fn begin_drag_records_offset_and_ghost() {
        let mut layout = row_layout();
        let mut grid = ReorderGrid::new(abc());
        let t0 = Instant::now();
        assert!(grid.begin_drag(&id("B"), &PointerEvent::down(130.0, 40.0, t0), &mut layout));

        let session = grid.session().unwrap();
        assert_eq!(session.dragged(), &id("B"));
        assert_eq!(session.pointer_offset(), Point::new(30.0, 40.0));
        assert_eq!(session.ghost_size(), Size::new(100.0, 100.0));
        assert_eq!(session.ghost_position(), Point::new(100.0, 0.0));
        assert_eq!(session.last_over(), None);
        assert_eq!(session.last_swap_at(), None);
        assert_eq!(session.started_at(), t0);
    }

    #[test]
    fn begin_drag_preconditions() {
        let mut layout = row_layout();
        layout.remove(&id("C"));
        let mut grid = ReorderGrid::new(abc());
        let now = Instant::now();

        let secondary = PointerEvent::down(10.0, 10.0, now).with_button(PointerButton::Secondary);
        assert!(!grid.begin_drag(&id("A"), &secondary, &mut layout));
        assert!(!grid.begin_drag(&id("A"), &PointerEvent::moved(10.0, 10.0, now), &mut layout));
        assert!(!grid.begin_drag(&id("Q"), &PointerEvent::down(10.0, 10.0, now), &mut layout));
        assert!(!grid.begin_drag(&id("C"), &PointerEvent::down(210.0, 10.0, now), &mut layout));
        assert!(!grid.is_dragging());
    }

    #[test]
    fn example_scenario_a_over_c() {
        let started = Rc::new(RefCell::new(Vec::new()));
        let ended = Rc::new(RefCell::new(Vec::new()));
        let swaps = Rc::new(RefCell::new(Vec::new()));
        let orders = Rc::new(RefCell::new(Vec::new()));

        let mut grid = ReorderGrid::new(abc())
            .on_drag_start({
                let started = Rc::clone(&started);
                move |id| started.borrow_mut().push(id.clone())
            })
            .on_drag_end({
                let ended = Rc::clone(&ended);
                move |id| ended.borrow_mut().push(id.clone())
            })
            .on_swap({
                let swaps = Rc::clone(&swaps);
                move |swap| swaps.borrow_mut().push((swap.dragged.clone(), swap.target.clone()))
            })
            .on_reorder({
                let orders = Rc::clone(&orders);
                move |items: &[TileId]| orders.borrow_mut().push(items.to_vec())
            });

        let mut layout = row_layout();
        let t0 = Instant::now();
        assert!(grid.begin_drag(&id("A"), &PointerEvent::down(50.0, 50.0, t0), &mut layout));
        assert_eq!(*started.borrow(), vec![id("A")]);

        // Through B's dead zone margin: nothing.
        assert_eq!(grid.process_move(PointerEvent::moved(199.0, 50.0, t0 + 5 * MS), &mut layout), None);

        let swap = grid
            .process_move(PointerEvent::moved(250.0, 50.0, t0 + 100 * MS), &mut layout)
            .expect("swap with C");
        assert_eq!((swap.from, swap.to), (0, 2));
        assert_eq!(names(&grid), ["C", "B", "A"]);
        assert_eq!(*swaps.borrow(), vec![(id("A"), id("C"))]);
        assert_eq!(orders.borrow().len(), 1);

        // Wiggling inside C's region, well after the cooldown.
        for (i, x) in [255.0, 245.0, 260.0].into_iter().enumerate() {
            let at = t0 + (300 + 100 * i as u32) * MS;
            assert_eq!(grid.process_move(PointerEvent::moved(x, 50.0, at), &mut layout), None);
        }
        assert_eq!(names(&grid), ["C", "B", "A"]);

        let end = grid.pointer_up(&PointerEvent::up(260.0, 50.0, t0 + 900 * MS)).unwrap();
        assert_eq!(end.id, id("A"));
        assert!(!end.cancelled);
        assert_eq!(end.swaps, 1);
        assert_eq!(*ended.borrow(), vec![id("A")]);
        assert_eq!(names(&grid), ["C", "B", "A"]);
        assert!(!grid.is_dragging());
    }

    #[test]
    fn cooldown_blocks_a_new_target_until_elapsed() {
        let mut layout = row_layout();
        let mut grid = ReorderGrid::new(abc());
        let t0 = Instant::now();
        grid.begin_drag(&id("A"), &PointerEvent::down(50.0, 50.0, t0), &mut layout);

        assert!(grid.process_move(PointerEvent::moved(250.0, 50.0, t0), &mut layout).is_some());
        // New target B inside the 60 ms window.
        assert!(grid.process_move(PointerEvent::moved(150.0, 50.0, t0 + 30 * MS), &mut layout).is_none());
        assert_eq!(names(&grid), ["C", "B", "A"]);
        // Same target B once the window has passed.
        let swap = grid.process_move(PointerEvent::moved(150.0, 50.0, t0 + 61 * MS), &mut layout);
        assert_eq!(swap.map(|s| s.target), Some(id("B")));
        assert_eq!(names(&grid), ["C", "A", "B"]);
    }

    #[test]
    fn same_target_is_suppressed_after_cooldown() {
        let mut layout = row_layout();
        let mut grid = ReorderGrid::new(abc());
        let t0 = Instant::now();
        grid.begin_drag(&id("A"), &PointerEvent::down(50.0, 50.0, t0), &mut layout);

        assert!(grid.process_move(PointerEvent::moved(250.0, 50.0, t0), &mut layout).is_some());
        assert!(grid.process_move(PointerEvent::moved(251.0, 50.0, t0 + 10 * MS), &mut layout).is_none());
        assert!(grid.process_move(PointerEvent::moved(252.0, 50.0, t0 + 500 * MS), &mut layout).is_none());
        assert_eq!(grid.session().unwrap().swap_count(), 1);
        assert_eq!(grid.session().unwrap().last_over(), Some(&id("C")));
    }

    #[test]
    fn leaving_all_regions_rearms_the_same_target() {
        let mut layout = row_layout();
        let mut grid = ReorderGrid::new(abc());
        let t0 = Instant::now();
        grid.begin_drag(&id("A"), &PointerEvent::down(50.0, 50.0, t0), &mut layout);

        grid.process_move(PointerEvent::moved(250.0, 50.0, t0), &mut layout);
        grid.process_move(PointerEvent::moved(250.0, 500.0, t0 + 100 * MS), &mut layout);
        assert_eq!(grid.session().unwrap().last_over(), None);

        let swap = grid.process_move(PointerEvent::moved(250.0, 50.0, t0 + 200 * MS), &mut layout);
        assert_eq!(swap.map(|s| s.target), Some(id("C")));
        assert_eq!(names(&grid), ["A", "B", "C"]);
    }

    #[test]
    fn second_begin_is_ignored() {
        let mut layout = row_layout();
        let mut grid = ReorderGrid::new(abc());
        let t0 = Instant::now();
        assert!(grid.begin_drag(&id("A"), &PointerEvent::down(10.0, 10.0, t0), &mut layout));
        grid.process_move(PointerEvent::moved(250.0, 50.0, t0), &mut layout);
        let before = grid.session().cloned().unwrap();

        assert!(!grid.begin_drag(&id("B"), &PointerEvent::down(150.0, 20.0, t0 + MS), &mut layout));
        let after = grid.session().unwrap();
        assert_eq!(after.dragged(), before.dragged());
        assert_eq!(after.pointer_offset(), before.pointer_offset());
        assert_eq!(after.last_over(), before.last_over());
        assert_eq!(after.last_swap_at(), before.last_swap_at());
    }

    #[test]
    fn teardown_then_begin_starts_clean() {
        let mut layout = row_layout();
        let mut grid = ReorderGrid::new(abc());
        let t0 = Instant::now();
        grid.begin_drag(&id("A"), &PointerEvent::down(50.0, 50.0, t0), &mut layout);
        grid.process_move(PointerEvent::moved(250.0, 50.0, t0), &mut layout);
        grid.pointer_move(PointerEvent::moved(150.0, 50.0, t0 + MS));
        assert!(grid.has_pending_move());

        let end = grid.pointer_cancel(&PointerEvent::cancel(0.0, 0.0, t0 + 2 * MS)).unwrap();
        assert!(end.cancelled);
        assert!(!grid.has_pending_move());
        assert!(grid.end_drag().is_none());

        assert!(grid.begin_drag(&id("B"), &PointerEvent::down(150.0, 50.0, t0 + 3 * MS), &mut layout));
        let session = grid.session().unwrap();
        assert_eq!(session.dragged(), &id("B"));
        assert_eq!(session.last_over(), None);
        assert_eq!(session.last_swap_at(), None);
        assert_eq!(session.swap_count(), 0);

        // No cooldown carried over: an immediate hit swaps.
        let swap = grid.process_move(PointerEvent::moved(50.0, 50.0, t0 + 4 * MS), &mut layout);
        assert_eq!(swap.map(|s| s.target), Some(id("A")));
        assert_eq!(names(&grid), ["C", "A", "B"]);
    }

    #[test]
    fn cancel_drag_keeps_committed_swaps() {
        let mut layout = row_layout();
        let mut grid = ReorderGrid::new(abc());
        let t0 = Instant::now();
        assert!(grid.cancel_drag().is_none());

        grid.begin_drag(&id("A"), &PointerEvent::down(50.0, 50.0, t0), &mut layout);
        grid.process_move(PointerEvent::moved(250.0, 50.0, t0), &mut layout);
        let end = grid.cancel_drag().unwrap();
        assert!(end.cancelled);
        assert_eq!(end.id, id("A"));
        assert_eq!(end.swaps, 1);
        assert!(!grid.is_dragging());
        assert_eq!(names(&grid), ["C", "B", "A"]);
    }

    #[test]
    fn moves_are_coalesced_per_tick() {
        let mut layout = row_layout();
        let mut grid = ReorderGrid::new(abc());
        let t0 = Instant::now();
        grid.begin_drag(&id("A"), &PointerEvent::down(50.0, 50.0, t0), &mut layout);
        let refreshes = layout.refresh_count();

        grid.pointer_move(PointerEvent::moved(150.0, 50.0, t0 + MS));
        grid.pointer_move(PointerEvent::moved(250.0, 50.0, t0 + 2 * MS));
        let swap = grid.tick(&mut layout).unwrap();
        assert_eq!(swap.target, id("C"));
        assert_eq!(layout.refresh_count(), refreshes + 1);

        // Nothing pending: the ghost eases but nothing is hit-tested.
        assert!(grid.tick(&mut layout).is_none());
        assert_eq!(layout.refresh_count(), refreshes + 1);
    }

    #[test]
    fn idle_moves_are_dropped() {
        let mut layout = row_layout();
        let mut grid = ReorderGrid::new(abc());
        grid.pointer_move(PointerEvent::moved(250.0, 50.0, Instant::now()));
        assert!(!grid.has_pending_move());
        assert!(grid.tick(&mut layout).is_none());
    }

    #[test]
    fn ghost_trails_then_converges() {
        let mut layout = row_layout();
        let config = ReorderConfig::default().with_follow_factor(0.5);
        let mut grid = ReorderGrid::with_config(abc(), config);
        let t0 = Instant::now();
        grid.begin_drag(&id("A"), &PointerEvent::down(50.0, 50.0, t0), &mut layout);

        grid.pointer_move(PointerEvent::moved(50.0, 450.0, t0 + MS));
        grid.tick(&mut layout);
        assert_eq!(grid.session().unwrap().ghost_position(), Point::new(0.0, 200.0));
        grid.tick(&mut layout);
        assert_eq!(grid.session().unwrap().ghost_position(), Point::new(0.0, 300.0));
        assert_eq!(grid.session().unwrap().ghost_target(), Point::new(0.0, 400.0));
    }

    #[test]
    fn follow_factor_one_snaps() {
        let mut layout = row_layout();
        let mut grid = ReorderGrid::with_config(abc(), ReorderConfig::company_options());
        let t0 = Instant::now();
        grid.begin_drag(&id("B"), &PointerEvent::down(110.0, 10.0, t0), &mut layout);
        grid.process_move(PointerEvent::moved(40.0, 300.0, t0 + MS), &mut layout);
        assert_eq!(grid.session().unwrap().ghost_position(), Point::new(30.0, 290.0));
    }

    #[test]
    fn shift_strategy_reinserts() {
        let mut layout = StaticLayout::new()
            .with("A", Rect::new(0.0, 0.0, 10.0, 10.0))
            .with("B", Rect::new(10.0, 0.0, 10.0, 10.0))
            .with("C", Rect::new(20.0, 0.0, 10.0, 10.0))
            .with("D", Rect::new(30.0, 0.0, 10.0, 10.0));
        let items: Vec<TileId> = vec!["A".into(), "B".into(), "C".into(), "D".into()];
        let config = ReorderConfig::default().with_strategy(ReorderStrategy::Shift);
        let mut grid = ReorderGrid::with_config(items, config);
        let t0 = Instant::now();
        grid.begin_drag(&id("A"), &PointerEvent::down(5.0, 5.0, t0), &mut layout);
        let swap = grid.process_move(PointerEvent::moved(25.0, 5.0, t0), &mut layout).unwrap();
        assert_eq!(swap.strategy, ReorderStrategy::Shift);
        assert_eq!(names(&grid), ["B", "C", "A", "D"]);
    }

    #[test]
    fn removed_items_are_lookup_misses() {
        let mut layout = row_layout();
        let mut grid = ReorderGrid::new(abc());
        let t0 = Instant::now();
        grid.begin_drag(&id("A"), &PointerEvent::down(50.0, 50.0, t0), &mut layout);

        grid.items_mut().retain(|item| item.as_str() != "A");
        assert_eq!(grid.process_move(PointerEvent::moved(250.0, 50.0, t0), &mut layout), None);
        assert_eq!(names(&grid), ["B", "C"]);

        let mut renderer = |item: &TileId, _: &mut TileApi<'_>| item.to_string();
        assert!(grid.render_ghost(&mut renderer).is_none());
        assert!(grid.end_drag().is_some());
    }

    #[test]
    fn render_hides_dragged_and_binds_handles() {
        let mut layout = GridLayout::new(Point::ZERO, Size::new(100.0, 100.0), 0.0, 3);
        layout.refresh(&abc());
        let mut grid = ReorderGrid::new(abc());

        let measured = layout.clone();
        let handle_of = |id: &TileId| {
            let rect = measured.rect_of(id).unwrap_or_default();
            Rect::new(rect.x, rect.y, rect.width, 10.0)
        };
        let mut renderer = |item: &TileId, api: &mut TileApi<'_>| {
            api.bind_handle(handle_of(item));
            format!("{}{}", item, if api.is_dragging() { "*" } else { "" })
        };

        let tiles = grid.render(&mut renderer);
        assert_eq!(tiles.len(), 3);
        assert!(tiles.iter().all(|t| t.visible));
        assert_eq!(grid.handles().len(), 3);

        // Press below B's handle strip: not a handle.
        let t0 = Instant::now();
        assert!(!grid.pointer_down(&PointerEvent::down(150.0, 50.0, t0), &mut layout));
        assert!(grid.pointer_down(&PointerEvent::down(150.0, 5.0, t0), &mut layout));
        assert_eq!(grid.dragged_id(), Some(&id("B")));

        let tiles = grid.render(&mut renderer);
        let b = tiles.iter().find(|t| t.id == id("B")).unwrap();
        assert!(!b.visible);
        assert_eq!(b.output, "B");

        let ghost = grid.render_ghost(&mut renderer).unwrap();
        assert_eq!(ghost.output, "B*");
        assert_eq!(ghost.rect, Rect::new(100.0, 0.0, 100.0, 100.0));
        // The ghost pass binds nothing.
        assert_eq!(grid.handles().len(), 3);

        grid.end_drag();
        let tiles = grid.render(&mut renderer);
        assert!(tiles.iter().all(|t| t.visible));
    }

    #[test]
    fn handle_event_routes_by_kind() {
        let mut layout = GridLayout::new(Point::ZERO, Size::new(100.0, 100.0), 0.0, 3);
        let mut grid = ReorderGrid::new(abc());
        layout.refresh(&abc());
        let mut renderer = |_: &TileId, api: &mut TileApi<'_>| {
            if let Some(rect) = layout.rect_of(api.id()) {
                api.bind_handle(rect);
            }
        };
        grid.render(&mut renderer);

        let t0 = Instant::now();
        assert_eq!(grid.handle_event(PointerEvent::moved(5.0, 5.0, t0), &mut layout), EventOutcome::Ignored);
        assert_eq!(
            grid.handle_event(PointerEvent::down(5.0, 5.0, t0), &mut layout),
            EventOutcome::Started(id("A"))
        );
        assert_eq!(grid.handle_event(PointerEvent::moved(250.0, 50.0, t0), &mut layout), EventOutcome::Queued);
        assert_eq!(grid.tick(&mut layout).map(|s| s.target), Some(id("C")));

        match grid.handle_event(PointerEvent::up(250.0, 50.0, t0), &mut layout) {
            EventOutcome::Ended(end) => assert_eq!(end.id, id("A")),
            other => panic!("expected drag end, got {other:?}"),
        }
        assert_eq!(grid.handle_event(PointerEvent::up(0.0, 0.0, t0), &mut layout), EventOutcome::Ignored);
    }

    #[test]
    fn debug_reports_shape_without_items() {
        let grid = ReorderGrid::new(abc()).on_swap(|_| {});
        let dbg = format!("{grid:?}");
        assert!(dbg.contains("items: 3"));
        assert!(dbg.contains("on_swap: true"));
    }
}
