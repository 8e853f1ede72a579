use chrono::NaiveDate;
use thiserror::Error;

/// Failures on the write side of the store.
#[derive(Debug, Error)]
pub(crate) enum StoreError {
    #[error("Cannot delete category '{name}': {count} expense(s) still use it")]
    ReferentialIntegrity { name: String, count: i64 },
    #[error("Category not found: {0}")]
    CategoryNotFound(String),
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Bad user input, rejected before it reaches the store.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum ValidationError {
    #[error("Please enter an amount")]
    EmptyAmount,
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Amount must be greater than zero")]
    NonPositiveAmount,
    #[error("Name cannot be empty")]
    EmptyCategoryName,
    #[error("Invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),
    #[error("Date {0} is in the future")]
    FutureDate(NaiveDate),
    #[error("Invalid color '{0}' (expected #RRGGBB or a palette number 1-{1})")]
    InvalidColor(String, usize),
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
}
