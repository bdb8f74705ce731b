//! Transactional position manager shared by the queue and playlist slices
//!
//! Every method takes the caller's open transaction connection; the caller
//! commits once the whole operation (shift + target write) has succeeded, so
//! a failure part-way never leaves a gap or a duplicate behind.

use podshelf_core::ordering::{self, Shift};
use podshelf_core::{Reorder, Result};
use sqlx::{Row, SqliteConnection};

/// A table holding `(id, <owner>, position)` rows ordered per owner
#[derive(Debug, Clone, Copy)]
pub(crate) struct OrderedTable {
    pub table: &'static str,
    pub owner_column: &'static str,
}

/// A user's play queue
pub(crate) const QUEUE_ITEMS: OrderedTable = OrderedTable {
    table: "queue_items",
    owner_column: "user_id",
};

/// A playlist's items
pub(crate) const PLAYLIST_ITEMS: OrderedTable = OrderedTable {
    table: "playlist_items",
    owner_column: "playlist_id",
};

/// Where a row currently sits
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Placement {
    pub owner: String,
    pub position: i64,
}

impl OrderedTable {
    /// Number of rows belonging to `owner`
    pub async fn len(&self, conn: &mut SqliteConnection, owner: &str) -> Result<usize> {
        let sql = format!(
            "SELECT COUNT(*) AS count FROM {} WHERE {} = ?",
            self.table, self.owner_column
        );
        let row = sqlx::query(&sql).bind(owner).fetch_one(&mut *conn).await?;

        Ok(row.get::<i64, _>("count") as usize)
    }

    /// Find the owner and position of a row by ID
    pub async fn locate(&self, conn: &mut SqliteConnection, id: &str) -> Result<Option<Placement>> {
        let sql = format!(
            "SELECT {} AS owner, position FROM {} WHERE id = ?",
            self.owner_column, self.table
        );
        let row = sqlx::query(&sql).bind(id).fetch_optional(&mut *conn).await?;

        Ok(row.map(|row| Placement {
            owner: row.get("owner"),
            position: row.get("position"),
        }))
    }

    /// Row IDs of `owner` in position order
    pub async fn ids_in_order(&self, conn: &mut SqliteConnection, owner: &str) -> Result<Vec<String>> {
        let sql = format!(
            "SELECT id FROM {} WHERE {} = ? ORDER BY position",
            self.table, self.owner_column
        );
        let rows = sqlx::query(&sql).bind(owner).fetch_all(&mut *conn).await?;

        Ok(rows.into_iter().map(|row| row.get("id")).collect())
    }

    /// Apply a planned shift as one range update
    pub async fn shift(
        &self,
        conn: &mut SqliteConnection,
        owner: &str,
        shift: Option<Shift>,
    ) -> Result<()> {
        let Some(shift) = shift else {
            return Ok(());
        };

        let sql = format!(
            "UPDATE {} SET position = position + ? WHERE {} = ? AND position BETWEEN ? AND ?",
            self.table, self.owner_column
        );
        sqlx::query(&sql)
            .bind(shift.delta)
            .bind(owner)
            .bind(shift.start)
            .bind(shift.end)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    /// Open a slot at `target` for a row about to be inserted
    pub async fn make_room(&self, conn: &mut SqliteConnection, owner: &str, target: i64) -> Result<()> {
        let len = self.len(conn, owner).await?;
        let shift = ordering::plan_insert(target, len)?;
        self.shift(conn, owner, shift).await
    }

    /// Delete a row and close the gap it leaves
    pub async fn detach(
        &self,
        conn: &mut SqliteConnection,
        owner: &str,
        id: &str,
        position: i64,
    ) -> Result<()> {
        let len = self.len(conn, owner).await?;

        let sql = format!("DELETE FROM {} WHERE id = ?", self.table);
        sqlx::query(&sql).bind(id).execute(&mut *conn).await?;

        self.shift(conn, owner, ordering::plan_remove(position, len))
            .await
    }

    /// Move a row from `old` to `new`, shifting the rows in between
    ///
    /// Returns `false` when the move was a no-op.
    pub async fn move_to(
        &self,
        conn: &mut SqliteConnection,
        owner: &str,
        id: &str,
        old: i64,
        new: i64,
    ) -> Result<bool> {
        let len = self.len(conn, owner).await?;
        let Some(shift) = ordering::plan_move(old, new, len)? else {
            return Ok(false);
        };

        self.shift(conn, owner, Some(shift)).await?;

        let sql = format!("UPDATE {} SET position = ? WHERE id = ?", self.table);
        sqlx::query(&sql)
            .bind(new)
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(true)
    }

    /// Assign every row of `owner` a new position in one go
    ///
    /// `order` must be a full permutation of the owner's rows.
    pub async fn reorder(
        &self,
        conn: &mut SqliteConnection,
        owner: &str,
        order: &[Reorder<String>],
    ) -> Result<()> {
        let current = self.ids_in_order(conn, owner).await?;
        ordering::validate_reorder(&current, order)?;

        let sql = format!(
            "UPDATE {} SET position = ? WHERE id = ? AND {} = ?",
            self.table, self.owner_column
        );
        for entry in order {
            sqlx::query(&sql)
                .bind(entry.position)
                .bind(&entry.id)
                .bind(owner)
                .execute(&mut *conn)
                .await?;
        }

        Ok(())
    }
}
