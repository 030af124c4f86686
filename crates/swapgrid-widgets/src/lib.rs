#![forbid(unsafe_code)]

//! Reorderable tile grid.
//!
//! The engine ([`reorder::ReorderGrid`]) owns an ordered collection of items
//! and one optional drag session. It never measures or draws anything itself:
//!
//! - tile rectangles come from a [`layout::LayoutSnapshot`] refreshed before
//!   every hit test;
//! - visual sliding between slots is delegated to an
//!   [`animator::LayoutAnimator`];
//! - tile visuals come from a caller-supplied [`tile::TileRenderer`], which
//!   binds the drag handle through [`tile::TileApi`].

pub mod animator;
pub mod layout;
pub mod order;
pub mod reorder;
pub mod tile;

use std::borrow::Borrow;
use std::fmt;

pub use reorder::{
    ConfigError, DragEnd, DragSession, EventOutcome, ReorderConfig, ReorderGrid, ReorderStrategy,
    Swap,
};

/// Stable identity of an item across renders and drags.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(String);

impl TileId {
    /// Create an id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TileId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for TileId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for TileId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Items the grid can reorder.
///
/// The id is the only thing the engine reads from an item; every other field
/// is payload for the renderer.
pub trait Keyed {
    fn tile_id(&self) -> &TileId;
}

impl Keyed for TileId {
    fn tile_id(&self) -> &TileId {
        self
    }
}
