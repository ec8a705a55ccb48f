//! Totals and per-type counts over the transactions table.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::ledger::{Transaction, TransactionType};

/// Totals over a snapshot of the transactions table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LedgerStats {
    /// The number of rows.
    pub total_count: usize,
    /// The sum of `amount` over every row.
    pub total_amount: Decimal,
    /// The sum of `commission_amount` over every row.
    pub total_commission: Decimal,
    /// The sum of `treasury_impact` over every row, i.e. the current treasury.
    pub total_treasury_impact: Decimal,
    /// The number of rows of each type. Types without rows are absent.
    pub types: BTreeMap<TransactionType, usize>,
    /// The sum of `amount` for each type. Types without rows are absent.
    pub amount_by_type: BTreeMap<TransactionType, Decimal>,
}

impl LedgerStats {
    /// Aggregate `transactions`.
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        transactions
            .iter()
            .fold(Self::default(), |mut stats, transaction| {
                stats.total_count += 1;
                stats.total_amount += transaction.amount;
                stats.total_commission += transaction.commission_amount;
                stats.total_treasury_impact += transaction.treasury_impact;
                *stats.types.entry(transaction.transaction_type).or_default() += 1;
                *stats
                    .amount_by_type
                    .entry(transaction.transaction_type)
                    .or_default() += transaction.amount;

                stats
            })
    }

    /// The total amount invoiced to clients.
    pub fn total_invoiced(&self) -> Decimal {
        self.amount_by_type
            .get(&TransactionType::ClientInvoice)
            .copied()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use time::macros::date;

    use crate::ledger::{LedgerStats, Transaction, TransactionId, TransactionType};

    fn transaction(transaction_type: TransactionType, amount: Decimal) -> Transaction {
        Transaction::build(transaction_type, amount, date!(2025 - 01 - 01))
            .finalize()
            .unwrap()
            .with_id(TransactionId::new_random())
    }

    #[test]
    fn empty_ledger_has_zero_totals() {
        let stats = LedgerStats::from_transactions(&[]);

        assert_eq!(stats, LedgerStats::default());
        assert_eq!(stats.total_invoiced(), Decimal::ZERO);
    }

    #[test]
    fn totals_are_sums_over_rows() {
        let transactions = vec![
            transaction(TransactionType::ClientInvoice, dec!(1000)),
            transaction(TransactionType::ClientInvoice, dec!(250.50)),
            transaction(TransactionType::Salary, dec!(500)),
        ];

        let stats = LedgerStats::from_transactions(&transactions);

        assert_eq!(stats.total_count, 3);
        assert_eq!(stats.total_amount, dec!(1750.50));
        assert_eq!(stats.total_commission, dec!(187.575));
        assert_eq!(
            stats.total_treasury_impact,
            transactions.iter().map(|t| t.treasury_impact).sum::<Decimal>()
        );
        assert_eq!(stats.total_invoiced(), dec!(1250.50));
    }

    #[test]
    fn type_counts_sum_to_total_count() {
        let transactions = vec![
            transaction(TransactionType::ClientInvoice, dec!(1)),
            transaction(TransactionType::TreasuryDraw, dec!(2)),
            transaction(TransactionType::TreasuryDraw, dec!(3)),
        ];

        let stats = LedgerStats::from_transactions(&transactions);

        assert_eq!(stats.types.values().sum::<usize>(), stats.total_count);
        assert_eq!(stats.types[&TransactionType::TreasuryDraw], 2);
        assert!(!stats.types.contains_key(&TransactionType::Salary));
    }
}
