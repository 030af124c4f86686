#![forbid(unsafe_code)]

//! Render contract between the grid and caller-supplied tile visuals.
//!
//! The grid hands each item to a [`TileRenderer`] together with a
//! [`TileApi`]. The renderer draws whatever it likes and calls
//! [`TileApi::bind_handle`] to mark the region that starts a drag. Only a
//! press inside a bound handle begins a drag, so the rest of the tile stays
//! free for clicks.

use swapgrid_core::geometry::{Point, Rect};

use crate::TileId;

/// Handle regions registered during the last render pass.
#[derive(Debug, Clone, Default)]
pub struct HandleMap {
    entries: Vec<(TileId, Rect)>,
}

impl HandleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `area` as a handle of `id`. A tile may bind several handles.
    pub fn bind(&mut self, id: &TileId, area: Rect) {
        self.entries.push((id.clone(), area));
    }

    /// The tile whose handle contains `point`. Later bindings are on top.
    pub fn hit(&self, point: Point) -> Option<&TileId> {
        self.entries
            .iter()
            .rev()
            .find(|(_, area)| area.contains(point))
            .map(|(id, _)| id)
    }

    /// Handles bound for `id`.
    pub fn handles_of<'a>(&'a self, id: &'a TileId) -> impl Iterator<Item = Rect> + 'a {
        self.entries
            .iter()
            .filter(move |(owner, _)| owner == id)
            .map(|(_, area)| *area)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Per-tile view of the grid handed to the renderer.
#[derive(Debug)]
pub struct TileApi<'a> {
    id: &'a TileId,
    dragging: bool,
    handles: Option<&'a mut HandleMap>,
}

impl<'a> TileApi<'a> {
    pub(crate) fn new(id: &'a TileId, dragging: bool, handles: Option<&'a mut HandleMap>) -> Self {
        Self {
            id,
            dragging,
            handles,
        }
    }

    /// An api whose handle bindings go nowhere. Useful for previews.
    pub fn detached(id: &'a TileId, dragging: bool) -> Self {
        Self::new(id, dragging, None)
    }

    /// Id of the tile being rendered.
    pub fn id(&self) -> &TileId {
        self.id
    }

    /// `true` only when rendering the drag ghost.
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Mark `area` as a drag handle for this tile.
    pub fn bind_handle(&mut self, area: Rect) {
        if let Some(handles) = self.handles.as_deref_mut() {
            handles.bind(self.id, area);
        }
    }
}

/// Produces the visual for one item.
///
/// Implemented for any `FnMut(&T, &mut TileApi<'_>) -> O`.
pub trait TileRenderer<T> {
    type Output;

    fn render(&mut self, item: &T, api: &mut TileApi<'_>) -> Self::Output;
}

impl<T, O, F> TileRenderer<T> for F
where
    F: FnMut(&T, &mut TileApi<'_>) -> O,
{
    type Output = O;

    fn render(&mut self, item: &T, api: &mut TileApi<'_>) -> O {
        self(item, api)
    }
}

/// One entry of a render pass, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedTile<O> {
    pub id: TileId,
    /// `false` for the dragged tile while a drag is active; the ghost stands
    /// in for it.
    pub visible: bool,
    pub output: O,
}

/// The floating copy of the dragged tile.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedGhost<O> {
    pub id: TileId,
    /// Where to draw the ghost this frame.
    pub rect: Rect,
    pub output: O,
}
