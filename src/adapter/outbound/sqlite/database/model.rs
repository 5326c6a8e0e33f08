//! Database model types for Diesel ORM.

use diesel::prelude::*;

use super::schema::positions;

/// Database row for an open position.
///
/// Amounts are `u128` and prices exact decimals, neither of which SQLite
/// stores natively, so both are kept as text.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = positions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PositionRow {
    pub pair: String,
    pub amount: String,
    pub avg_price: String,
    pub updated_at: String,
}
