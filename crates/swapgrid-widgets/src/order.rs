#![forbid(unsafe_code)]

//! Order manipulation by id.
//!
//! Every function here preserves the multiset of items: results are always a
//! permutation of the input. Lookups that miss are no-ops, never panics.

use std::collections::HashMap;

use crate::{Keyed, TileId};

/// Index of the item with `id`, if present.
pub fn position_of<T: Keyed>(items: &[T], id: &TileId) -> Option<usize> {
    items.iter().position(|item| item.tile_id() == id)
}

/// The ids of `items`, in order.
pub fn ids<T: Keyed>(items: &[T]) -> Vec<TileId> {
    items.iter().map(|item| item.tile_id().clone()).collect()
}

/// Exchange the positions of `a` and `b`.
///
/// Returns the two indices `(index_of_a, index_of_b)` as they were before the
/// exchange. No-op returning `None` when the ids are equal or either is absent.
/// Symmetric: `swap_ids(a, b)` and `swap_ids(b, a)` produce the same order.
pub fn swap_ids<T: Keyed>(items: &mut [T], a: &TileId, b: &TileId) -> Option<(usize, usize)> {
    if a == b {
        return None;
    }
    let ia = position_of(items, a)?;
    let ib = position_of(items, b)?;
    items.swap(ia, ib);
    Some((ia, ib))
}

/// Move `moving` into the slot of `target`, shifting the items in between by
/// one toward the vacated slot.
///
/// Equivalent to removing `moving` and reinserting it at `target`'s original
/// index. Returns `(from, to)` indices; `None` when the ids are equal or
/// either is absent.
pub fn shift_id<T: Keyed>(items: &mut [T], moving: &TileId, target: &TileId) -> Option<(usize, usize)> {
    if moving == target {
        return None;
    }
    let from = position_of(items, moving)?;
    let to = position_of(items, target)?;
    if from < to {
        items[from..=to].rotate_left(1);
    } else {
        items[to..=from].rotate_right(1);
    }
    Some((from, to))
}

/// Restore a previously saved order onto the current items.
///
/// Items named in `saved` come first, in saved order. Saved ids with no
/// matching item, and repeated saved ids, are skipped. Items the saved order
/// does not mention follow in their current relative order.
pub fn reconcile<T: Keyed>(saved: &[TileId], items: Vec<T>) -> Vec<T> {
    let mut index: HashMap<TileId, usize> = HashMap::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        index.entry(item.tile_id().clone()).or_insert(i);
    }

    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    let mut out = Vec::with_capacity(slots.len());

    for id in saved {
        if let Some(&i) = index.get(id)
            && let Some(item) = slots[i].take()
        {
            out.push(item);
        }
    }
    out.extend(slots.into_iter().flatten());
    out
}
