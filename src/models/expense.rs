/// A single recorded expense.
///
/// `amount` is expected to be a positive, finite number. That is checked at the
/// input boundary when the entry is created; the analytics engine tolerates
/// anything but treats NaN, infinite and negative amounts as bad data and
/// leaves them out of its sums.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseEntry {
    pub id: String,
    pub amount: f64,
    pub category_id: String,
    /// Milliseconds since the Unix epoch. Only the local calendar day matters
    /// for filtering.
    pub created_at: i64,
}

impl ExpenseEntry {
    pub fn new(amount: f64, category_id: String, created_at: i64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            amount,
            category_id,
            created_at,
        }
    }

    pub fn has_valid_amount(&self) -> bool {
        self.amount.is_finite() && self.amount >= 0.0
    }
}
