//! Yearly budget ledger business logic.
//!
//! Each fiscal year has one ledger row holding the total allocation and the
//! funds still available. Payments debit `remaining_amount` through a single
//! conditional `UPDATE`, so two competing payments can never spend the same
//! funds: whichever statement runs second sees the already-reduced balance
//! and affects zero rows when the money is gone. Payment reversals credit
//! the same column back.
//!
//! Functions that participate in payment settlement are generic over
//! [`ConnectionTrait`] so they run inside the settlement transaction as well
//! as against the plain connection.

use crate::{
    entities::{Budget, budget},
    errors::{Error, Result},
};
use sea_orm::sea_query::Expr;
use sea_orm::{ConnectionTrait, DatabaseConnection, QueryOrder, Set, prelude::*};

/// Allocation given to a year whose ledger is created implicitly, e.g. when
/// a payment lands in a year nobody configured.
pub const DEFAULT_BUDGET_AMOUNT: f64 = 50_000.0;

const MIN_YEAR: i32 = 2000;
const MAX_YEAR: i32 = 2100;

/// Checks that a fiscal year is inside the supported range.
///
/// # Errors
/// Returns [`Error::Validation`] for years outside 2000 to 2100.
pub fn validate_year(year: i32) -> Result<()> {
    if (MIN_YEAR..=MAX_YEAR).contains(&year) {
        Ok(())
    } else {
        Err(Error::Validation {
            message: format!("Year must be between {MIN_YEAR} and {MAX_YEAR}, got {year}"),
        })
    }
}

/// Fetches the ledger row for a year, if one exists.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn find_by_year<C>(conn: &C, year: i32) -> Result<Option<budget::Model>>
where
    C: ConnectionTrait,
{
    Budget::find()
        .filter(budget::Column::Year.eq(year))
        .one(conn)
        .await
        .map_err(Into::into)
}

/// Returns the ledger row for a year, creating it when absent.
///
/// A newly created row starts with `remaining_amount` equal to its total,
/// which is `total` when given and [`DEFAULT_BUDGET_AMOUNT`] otherwise.
/// An existing row is returned untouched, so seeding and re-initializing
/// are idempotent.
///
/// # Errors
/// Returns an error for an out-of-range year, a negative total, or a
/// database failure.
pub async fn ensure_for_year<C>(conn: &C, year: i32, total: Option<f64>) -> Result<budget::Model>
where
    C: ConnectionTrait,
{
    validate_year(year)?;

    if let Some(existing) = find_by_year(conn, year).await? {
        return Ok(existing);
    }

    let total = total.unwrap_or(DEFAULT_BUDGET_AMOUNT);
    if !total.is_finite() || total < 0.0 {
        return Err(Error::Validation {
            message: format!("Budget amount must be non-negative, got {total}"),
        });
    }

    let now = chrono::Utc::now();
    let model = budget::ActiveModel {
        year: Set(year),
        total_amount: Set(total),
        remaining_amount: Set(total),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    model.insert(conn).await.map_err(Into::into)
}

/// Admin upsert of a year's ledger amounts.
///
/// When the row exists, only the provided fields change. When it does not,
/// `total` is required and `remaining` defaults to it.
///
/// # Errors
/// Returns a validation error for out-of-range years, negative amounts, or
/// a creation attempt without a total.
pub async fn update_amounts(
    db: &DatabaseConnection,
    year: i32,
    total: Option<f64>,
    remaining: Option<f64>,
) -> Result<budget::Model> {
    validate_year(year)?;

    for amount in [total, remaining].into_iter().flatten() {
        if !amount.is_finite() || amount < 0.0 {
            return Err(Error::Validation {
                message: format!("Budget amounts must be non-negative, got {amount}"),
            });
        }
    }

    let now = chrono::Utc::now();
    match find_by_year(db, year).await? {
        Some(existing) => {
            let mut model: budget::ActiveModel = existing.into();
            if let Some(total) = total {
                model.total_amount = Set(total);
            }
            if let Some(remaining) = remaining {
                model.remaining_amount = Set(remaining);
            }
            model.updated_at = Set(now);
            model.update(db).await.map_err(Into::into)
        }
        None => {
            let total = total.ok_or_else(|| Error::Validation {
                message: format!("total_amount is required to create the {year} budget"),
            })?;
            let model = budget::ActiveModel {
                year: Set(year),
                total_amount: Set(total),
                remaining_amount: Set(remaining.unwrap_or(total)),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            };
            model.insert(db).await.map_err(Into::into)
        }
    }
}

/// All ledger rows, newest fiscal year first.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn history(db: &DatabaseConnection) -> Result<Vec<budget::Model>> {
    Budget::find()
        .order_by_desc(budget::Column::Year)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Whether the year's ledger can cover `amount`.
///
/// A year with no ledger row cannot cover anything.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn has_sufficient<C>(conn: &C, year: i32, amount: f64) -> Result<bool>
where
    C: ConnectionTrait,
{
    Ok(find_by_year(conn, year)
        .await?
        .is_some_and(|b| b.remaining_amount >= amount))
}

/// Atomically takes `amount` out of the year's remaining funds.
///
/// The debit happens in one conditional `UPDATE` that only matches when the
/// remaining amount still covers the debit. Zero affected rows means the
/// funds are gone (or the row vanished), and the current remainder is
/// re-read purely to report it.
///
/// # Errors
/// Returns [`Error::InsufficientBudget`] when the ledger cannot cover the
/// amount.
pub async fn debit<C>(conn: &C, year: i32, amount: f64) -> Result<()>
where
    C: ConnectionTrait,
{
    let result = Budget::update_many()
        .col_expr(
            budget::Column::RemainingAmount,
            Expr::col(budget::Column::RemainingAmount).sub(amount),
        )
        .col_expr(budget::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
        .filter(budget::Column::Year.eq(year))
        .filter(budget::Column::RemainingAmount.gte(amount))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        let remaining = find_by_year(conn, year)
            .await?
            .map_or(0.0, |b| b.remaining_amount);
        return Err(Error::InsufficientBudget {
            remaining,
            requested: amount,
        });
    }

    Ok(())
}

/// Puts `amount` back into the year's remaining funds.
///
/// Used when a payment is reversed. Crediting a year that has no ledger row
/// is a no-op; the reversal still proceeds, but the mismatch is logged.
///
/// # Errors
/// Returns an error if the database update fails.
pub async fn credit<C>(conn: &C, year: i32, amount: f64) -> Result<()>
where
    C: ConnectionTrait,
{
    let result = Budget::update_many()
        .col_expr(
            budget::Column::RemainingAmount,
            Expr::col(budget::Column::RemainingAmount).add(amount),
        )
        .col_expr(budget::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
        .filter(budget::Column::Year.eq(year))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        tracing::warn!("no budget ledger for year {year}, credit of {amount:.2} skipped");
    }

    Ok(())
}
