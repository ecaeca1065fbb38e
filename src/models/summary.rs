use serde::Serialize;

/// Derived month totals, recomputed on demand from the month's daily
/// balances.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlySummary {
    pub month: String, // YYYY-MM
    pub days_worked: u32,
    pub worked_minutes: i64,
    /// Sum of positive daily balances (time worked beyond expected).
    pub credit_minutes: i64,
    /// Sum of negative daily balances, as a positive number.
    pub debit_minutes: i64,
    pub violation_count: usize,
    pub absence_count: u32,
    pub bonus_eligible: bool,
    pub bonus_amount: i64,
}
