//! Dense position planning for owner-scoped ordered lists
//!
//! A user's queue and a playlist's items both keep an integer `position` that
//! must always be exactly `0..len` with no gaps or duplicates. Every mutation
//! is expressed as at most one [`Shift`] of a contiguous block of neighbours
//! plus a write of the target row. The storage layer turns a `Shift` into a
//! single range `UPDATE` inside the operation's transaction.

use crate::error::{PodError, Result};
use crate::types::Reorder;
use std::collections::HashSet;
use std::fmt::Display;
use std::hash::Hash;

/// Positions `start..=end` move by `delta` (always +1 or -1)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shift {
    pub start: i64,
    pub end: i64,
    pub delta: i64,
}

impl Shift {
    /// Whether `position` lies inside the shifted block
    pub fn contains(&self, position: i64) -> bool {
        (self.start..=self.end).contains(&position)
    }

    /// Position after the shift has been applied
    pub fn apply(&self, position: i64) -> i64 {
        if self.contains(position) {
            position + self.delta
        } else {
            position
        }
    }
}

/// Position for an item appended to a list of `len` items
pub fn append_position(len: usize) -> i64 {
    len as i64
}

/// Plan inserting a new item at `target` in a list of `len` items
///
/// Items at `target` and after move up by one. `target == len` is an append.
pub fn plan_insert(target: i64, len: usize) -> Result<Option<Shift>> {
    let len = len as i64;
    if !(0..=len).contains(&target) {
        return Err(PodError::invalid_input(format!(
            "position {target} is out of range 0..={len}"
        )));
    }

    if target == len {
        return Ok(None);
    }

    Ok(Some(Shift {
        start: target,
        end: len - 1,
        delta: 1,
    }))
}

/// Plan closing the gap left by removing the item at `removed`
///
/// `len` is the list length before the removal.
pub fn plan_remove(removed: i64, len: usize) -> Option<Shift> {
    let last = len as i64 - 1;
    if removed >= last {
        return None;
    }

    Some(Shift {
        start: removed + 1,
        end: last,
        delta: -1,
    })
}

/// Plan moving the item at `old` to `new` in a list of `len` items
///
/// Returns `None` when the move is a no-op.
pub fn plan_move(old: i64, new: i64, len: usize) -> Result<Option<Shift>> {
    let len = len as i64;
    if !(0..len).contains(&new) {
        return Err(PodError::invalid_input(format!(
            "position {new} is out of range 0..{len}"
        )));
    }
    if !(0..len).contains(&old) {
        return Err(PodError::storage(format!(
            "stored position {old} is outside 0..{len}"
        )));
    }

    let shift = match new.cmp(&old) {
        std::cmp::Ordering::Equal => None,
        // Moving later: the items it passes slide back
        std::cmp::Ordering::Greater => Some(Shift {
            start: old + 1,
            end: new,
            delta: -1,
        }),
        // Moving earlier: the items it passes slide forward
        std::cmp::Ordering::Less => Some(Shift {
            start: new,
            end: old - 1,
            delta: 1,
        }),
    };

    Ok(shift)
}

/// Insert position for "play next": right after the current item, or the front
pub fn play_next_position(current: Option<i64>) -> i64 {
    current.map_or(0, |position| position + 1)
}

/// Check that a batch reorder names every item of `current` exactly once and
/// assigns exactly the positions `0..len`.
pub fn validate_reorder<Id>(current: &[Id], requested: &[Reorder<Id>]) -> Result<()>
where
    Id: Eq + Hash + Display,
{
    if requested.len() != current.len() {
        return Err(PodError::invalid_input(format!(
            "reorder must list all {} items, got {}",
            current.len(),
            requested.len()
        )));
    }

    let len = current.len() as i64;
    let known: HashSet<&Id> = current.iter().collect();
    let mut seen_ids = HashSet::with_capacity(requested.len());
    let mut seen_positions = HashSet::with_capacity(requested.len());

    for entry in requested {
        if !known.contains(&entry.id) {
            return Err(PodError::invalid_input(format!(
                "item {} is not part of this list",
                entry.id
            )));
        }
        if !seen_ids.insert(&entry.id) {
            return Err(PodError::invalid_input(format!(
                "item {} is listed more than once",
                entry.id
            )));
        }
        if !(0..len).contains(&entry.position) {
            return Err(PodError::invalid_input(format!(
                "position {} is out of range 0..{len}",
                entry.position
            )));
        }
        if !seen_positions.insert(entry.position) {
            return Err(PodError::invalid_input(format!(
                "position {} is assigned more than once",
                entry.position
            )));
        }
    }

    Ok(())
}

/// Whether `positions` are exactly `0..n` in some order
pub fn is_dense(positions: impl IntoIterator<Item = i64>) -> bool {
    let mut positions: Vec<i64> = positions.into_iter().collect();
    positions.sort_unstable();
    positions
        .iter()
        .enumerate()
        .all(|(index, &position)| position == index as i64)
}
