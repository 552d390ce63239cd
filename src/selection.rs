//! Selection Constraint Engine - Bounded Choice Sets
//!
//! Every operation is a pure function from the current selection to the next.
//! A mutation that would exceed the cap is rejected by returning the input
//! unchanged; removal is never blocked.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("Selection holds {current} of {limit}; adding {requested} would exceed the limit")]
    CapacityExceeded {
        current: usize,
        requested: usize,
        limit: usize,
    },
}

/// Remove `item` if present, otherwise append it when under `limit`.
pub fn toggle<T: PartialEq + Clone>(current: &[T], item: T, limit: usize) -> Vec<T> {
    if current.contains(&item) {
        return current.iter().filter(|c| **c != item).cloned().collect();
    }
    let mut next = current.to_vec();
    if next.len() < limit {
        next.push(item);
    }
    next
}

/// Append `new_items` in order until `limit` is reached; the rest are dropped.
///
/// Returns the next selection and how many items were dropped.
pub fn add_many<T: Clone>(current: &[T], new_items: &[T], limit: usize) -> (Vec<T>, usize) {
    let room = limit.saturating_sub(current.len());
    let taken = new_items.len().min(room);

    let mut next = current.to_vec();
    next.extend_from_slice(&new_items[..taken]);
    (next, new_items.len() - taken)
}

/// All-or-nothing variant of [`add_many`].
pub fn try_add_many<T: Clone>(
    current: &[T],
    new_items: &[T],
    limit: usize,
) -> Result<Vec<T>, SelectionError> {
    if current.len() + new_items.len() > limit {
        return Err(SelectionError::CapacityExceeded {
            current: current.len(),
            requested: new_items.len(),
            limit,
        });
    }
    let mut next = current.to_vec();
    next.extend_from_slice(new_items);
    Ok(next)
}

/// Remove the element at `index`. Out-of-range indices are a no-op.
pub fn remove_at<T: Clone>(current: &[T], index: usize) -> Vec<T> {
    current
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, item)| item.clone())
        .collect()
}
