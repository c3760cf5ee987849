//! Shared reorder persistence for ordered child tables.

use kittie_core::reorder::plan_reorder;
use kittie_core::types::DbId;
use sqlx::{Postgres, Transaction};

use crate::error::RepoError;

/// A table whose rows are ordered within a parent by `order_index`.
#[derive(Debug, Clone, Copy)]
pub struct OrderedTable {
    pub table: &'static str,
    pub parent_column: &'static str,
}

pub const SECTIONS: OrderedTable = OrderedTable {
    table: "sections",
    parent_column: "kit_id",
};

pub const ASSETS: OrderedTable = OrderedTable {
    table: "assets",
    parent_column: "section_id",
};

pub const TEAM_MEMBERS: OrderedTable = OrderedTable {
    table: "team_members",
    parent_column: "section_id",
};

/// Persist `submitted` as the new order of `parent_id`'s children.
///
/// Locks the children, validates the list with [`plan_reorder`] and writes
/// only the rows whose index changed. Returns the number of rows updated.
pub async fn reorder_children(
    tx: &mut Transaction<'_, Postgres>,
    target: OrderedTable,
    parent_id: DbId,
    submitted: &[DbId],
) -> Result<usize, RepoError> {
    let select = format!(
        "SELECT id, order_index FROM {} WHERE {} = $1 ORDER BY order_index FOR UPDATE",
        target.table, target.parent_column
    );
    let current: Vec<(DbId, i32)> = sqlx::query_as(&select)
        .bind(parent_id)
        .fetch_all(&mut **tx)
        .await?;

    let changes = plan_reorder(&current, submitted)?;

    let update = format!("UPDATE {} SET order_index = $2 WHERE id = $1", target.table);
    for change in &changes {
        sqlx::query(&update)
            .bind(change.id)
            .bind(change.order_index)
            .execute(&mut **tx)
            .await?;
    }

    tracing::debug!(
        table = target.table,
        parent_id,
        updated = changes.len(),
        "Applied reorder"
    );

    Ok(changes.len())
}
