use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::models::{parse_hex_color, Category, ColorValue, PALETTE};

/// Parse a user-typed amount. Accepts an optional leading `$` and thousands
/// separators.
pub(crate) fn parse_amount(input: &str) -> Result<f64, ValidationError> {
    let cleaned: String = input
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    if cleaned.is_empty() {
        return Err(ValidationError::EmptyAmount);
    }
    let amount: f64 = cleaned
        .parse()
        .map_err(|_| ValidationError::InvalidAmount(input.trim().to_string()))?;
    if !amount.is_finite() {
        return Err(ValidationError::InvalidAmount(input.trim().to_string()));
    }
    if amount <= 0.0 {
        return Err(ValidationError::NonPositiveAmount);
    }
    Ok(amount)
}

pub(crate) fn category_name(input: &str) -> Result<String, ValidationError> {
    let name = input.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyCategoryName);
    }
    Ok(name.to_string())
}

pub(crate) fn parse_date(input: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(input.trim().to_string()))
}

/// Expenses record money already spent, so their day may not be after `today`.
pub(crate) fn expense_day(day: NaiveDate, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
    if day > today {
        return Err(ValidationError::FutureDate(day));
    }
    Ok(day)
}

/// `#RRGGBB`, or a 1-based index into the palette.
pub(crate) fn parse_color(input: &str) -> Result<ColorValue, ValidationError> {
    let trimmed = input.trim();
    if let Ok(n) = trimmed.parse::<usize>() {
        if (1..=PALETTE.len()).contains(&n) {
            return Ok(PALETTE[n - 1]);
        }
    }
    parse_hex_color(trimmed)
        .ok_or_else(|| ValidationError::InvalidColor(trimmed.to_string(), PALETTE.len()))
}

pub(crate) fn find_category<'a>(
    categories: &'a [Category],
    name: &str,
) -> Result<&'a Category, ValidationError> {
    Category::find_by_name(categories, name.trim())
        .ok_or_else(|| ValidationError::UnknownCategory(name.trim().to_string()))
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
