//! Drag-and-drop reorder persistence.
//!
//! The editor submits the complete list of child ids in their new order.
//! [`plan_reorder`] checks that list against what is stored and works out
//! which rows actually need a new `order_index`.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::error::CoreError;
use crate::types::DbId;

/// A single `order_index` update to persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderChange {
    pub id: DbId,
    pub order_index: i32,
}

/// Diff the stored order against the submitted id list.
///
/// `current` holds `(id, order_index)` for every child of the parent.
/// `submitted` must be a permutation of those ids; duplicates, unknown ids
/// and missing ids are rejected. The returned changes assign each id its
/// 0-based position in `submitted`, omitting rows already in place.
pub fn plan_reorder(
    current: &[(DbId, i32)],
    submitted: &[DbId],
) -> Result<Vec<OrderChange>, CoreError> {
    let stored: HashMap<DbId, i32> = current.iter().copied().collect();

    let mut seen = HashSet::with_capacity(submitted.len());
    for id in submitted {
        if !seen.insert(*id) {
            return Err(CoreError::Validation(format!(
                "Duplicate id {id} in reorder request"
            )));
        }
        if !stored.contains_key(id) {
            return Err(CoreError::Validation(format!(
                "Id {id} does not belong to this list"
            )));
        }
    }

    if seen.len() != stored.len() {
        let mut missing: Vec<_> = stored.keys().filter(|id| !seen.contains(*id)).collect();
        missing.sort();
        return Err(CoreError::Validation(format!(
            "Reorder request is missing ids: {missing:?}"
        )));
    }

    let changes = submitted
        .iter()
        .enumerate()
        .filter_map(|(position, id)| {
            let order_index = position as i32;
            (stored[id] != order_index).then_some(OrderChange {
                id: *id,
                order_index,
            })
        })
        .collect();

    Ok(changes)
}
