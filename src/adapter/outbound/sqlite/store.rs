//! SQLite position store implementation.
//!
//! Provides durable storage for the position ledger using SQLite and
//! Diesel ORM. Each operation is a single statement, so writes are atomic
//! per key.

use std::str::FromStr;

use chrono::Utc;
use diesel::prelude::*;
use rust_decimal::Decimal;

use super::database::connection::{DbPool, run_migrations};
use super::database::model::PositionRow;
use super::database::schema::positions;
use crate::domain::{PairId, Position};
use crate::error::{Result, StorageError};
use crate::port::PositionStore;

/// SQLite-backed position store.
pub struct SqlitePositionStore {
    /// Database connection pool.
    pool: DbPool,
}

impl SqlitePositionStore {
    /// Create a store over `pool`, creating the schema if it is absent.
    ///
    /// # Errors
    /// Returns an error if the migrations cannot be applied.
    pub fn new(pool: DbPool) -> Result<Self> {
        run_migrations(&pool)?;
        Ok(Self { pool })
    }

    fn conn(
        &self,
    ) -> Result<diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<SqliteConnection>>>
    {
        self.pool
            .get()
            .map_err(|e| StorageError::Connection(e.to_string()).into())
    }

    fn to_row(position: &Position) -> PositionRow {
        PositionRow {
            pair: position.pair().to_string(),
            amount: position.amount().to_string(),
            avg_price: position.avg_price().to_string(),
            updated_at: Utc::now().to_rfc3339(),
        }
    }

    fn from_row(row: PositionRow) -> Result<Position> {
        let amount = row.amount.parse::<u128>().map_err(|e| StorageError::Corrupt {
            pair: row.pair.clone(),
            reason: format!("amount {:?}: {e}", row.amount),
        })?;
        let avg_price = Decimal::from_str(&row.avg_price).map_err(|e| StorageError::Corrupt {
            pair: row.pair.clone(),
            reason: format!("avg_price {:?}: {e}", row.avg_price),
        })?;
        Ok(Position::new(PairId::new(row.pair), amount, avg_price))
    }
}

fn query_error(e: diesel::result::Error) -> StorageError {
    StorageError::Query(e.to_string())
}

impl PositionStore for SqlitePositionStore {
    fn upsert(&self, position: &Position) -> Result<()> {
        let row = Self::to_row(position);
        let mut conn = self.conn()?;

        diesel::replace_into(positions::table)
            .values(&row)
            .execute(&mut conn)
            .map_err(query_error)?;

        Ok(())
    }

    fn remove(&self, pair: &PairId) -> Result<bool> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(positions::table.find(pair.as_str()))
            .execute(&mut conn)
            .map_err(query_error)?;

        Ok(deleted > 0)
    }

    fn get(&self, pair: &PairId) -> Result<Option<Position>> {
        let mut conn = self.conn()?;

        let row: Option<PositionRow> = positions::table
            .find(pair.as_str())
            .select(PositionRow::as_select())
            .first(&mut conn)
            .optional()
            .map_err(query_error)?;

        row.map(Self::from_row).transpose()
    }

    fn list_all(&self) -> Result<Vec<Position>> {
        let mut conn = self.conn()?;

        let rows: Vec<PositionRow> = positions::table
            .order(positions::pair.asc())
            .select(PositionRow::as_select())
            .load(&mut conn)
            .map_err(query_error)?;

        rows.into_iter().map(Self::from_row).collect()
    }

    fn clear_all(&self) -> Result<usize> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(positions::table)
            .execute(&mut conn)
            .map_err(query_error)?;

        Ok(deleted)
    }
}
