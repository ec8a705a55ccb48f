//! Monthly aggregation of transactions for the evolution chart.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::ledger::Transaction;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// The sums for a single calendar month.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct MonthlyTotals {
    pub year: i32,
    /// The month number, 1 to 12.
    pub month: u8,
    /// The sum of the gross amounts.
    pub amount: Decimal,
    /// The sum of the treasury impacts.
    pub treasury_impact: Decimal,
}

impl MonthlyTotals {
    /// A short label such as "Jan 2025".
    pub fn label(&self) -> String {
        let name = MONTH_NAMES
            .get(usize::from(self.month.saturating_sub(1)))
            .copied()
            .unwrap_or("???");

        format!("{name} {}", self.year)
    }
}

/// Sums the amount and treasury impact of `transactions` per calendar month.
///
/// # Returns
/// One entry per calendar month from the earliest to the latest transaction,
/// in chronological order. Months without transactions have zero totals.
pub(super) fn aggregate_by_month(transactions: &[Transaction]) -> Vec<MonthlyTotals> {
    let mut totals: BTreeMap<(i32, u8), (Decimal, Decimal)> = BTreeMap::new();

    for transaction in transactions {
        let key = (transaction.date.year(), u8::from(transaction.date.month()));
        let (amount, treasury_impact) = totals.entry(key).or_default();
        *amount += transaction.amount;
        *treasury_impact += transaction.treasury_impact;
    }

    let (Some(&first), Some(&last)) = (totals.keys().next(), totals.keys().next_back()) else {
        return Vec::new();
    };

    let mut key = first;
    while key < last {
        totals.entry(key).or_default();
        key = next_month(key);
    }

    totals
        .into_iter()
        .map(|((year, month), (amount, treasury_impact))| MonthlyTotals {
            year,
            month,
            amount,
            treasury_impact,
        })
        .collect()
}

fn next_month((year, month): (i32, u8)) -> (i32, u8) {
    if month >= 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}
