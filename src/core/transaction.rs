//! Payment history queries.
//!
//! Transactions are written by the payment path in [`crate::core::request`]
//! and are read-only here. The optional year filter works on the payment
//! timestamp, so a request created in one year but paid in the next shows
//! up under the year the money actually moved.

use crate::{
    core::budget,
    entities::{Transaction, transaction},
    errors::{Error, Result},
};
use chrono::{TimeZone, Utc};
use sea_orm::{QueryOrder, prelude::*};

/// All transactions, most recent payment first, optionally limited to one
/// fiscal year.
///
/// # Errors
/// Returns a validation error for an out-of-range year filter.
pub async fn list(
    db: &DatabaseConnection,
    year: Option<i32>,
) -> Result<Vec<transaction::Model>> {
    let mut query = Transaction::find().order_by_desc(transaction::Column::PaidAt);

    if let Some(year) = year {
        budget::validate_year(year)?;
        let start = year_start(year)?;
        let end = year_start(year + 1)?;
        query = query
            .filter(transaction::Column::PaidAt.gte(start))
            .filter(transaction::Column::PaidAt.lt(end));
    }

    query.all(db).await.map_err(Into::into)
}

/// Looks up one transaction by id.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn find_by_id(
    db: &DatabaseConnection,
    id: i64,
) -> Result<Option<transaction::Model>> {
    Transaction::find_by_id(id).one(db).await.map_err(Into::into)
}

fn year_start(year: i32) -> Result<chrono::DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| Error::Internal {
            message: format!("Unrepresentable year boundary: {year}"),
        })
}
