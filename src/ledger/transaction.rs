//! Defines the transaction model and the rules for deriving commission and
//! treasury impact.

use std::fmt::Display;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use time::Date;
use uuid::Uuid;

use crate::Error;

/// The commission percentage suggested for new client invoices.
pub const DEFAULT_COMMISSION_PERCENT: Decimal = Decimal::from_parts(15, 0, 0, false, 0);

/// The kind of financial event a transaction records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TransactionType {
    /// Money invoiced to a client, minus the commission taken by the umbrella company.
    #[serde(alias = "Facturation Client")]
    ClientInvoice,
    /// A salary paid out of the treasury.
    #[serde(alias = "Salaire")]
    Salary,
    /// Any other withdrawal from the treasury.
    #[serde(alias = "Utilisation Trésorerie")]
    TreasuryDraw,
    /// A row whose `type` is none of the above, e.g. one written by another client.
    ///
    /// It has no commission and no effect on the treasury.
    #[serde(other)]
    Other,
}

impl TransactionType {
    /// Every transaction type that can be entered, in the order they are offered to the user.
    pub const ALL: [TransactionType; 3] = [
        TransactionType::ClientInvoice,
        TransactionType::Salary,
        TransactionType::TreasuryDraw,
    ];

    /// The value stored in the `type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::ClientInvoice => "ClientInvoice",
            TransactionType::Salary => "Salary",
            TransactionType::TreasuryDraw => "TreasuryDraw",
            TransactionType::Other => "Other",
        }
    }

    /// A human readable name for display.
    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::ClientInvoice => "Client invoice",
            TransactionType::Salary => "Salary",
            TransactionType::TreasuryDraw => "Treasury draw",
            TransactionType::Other => "Other",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The unique ID of a row in the transactions table.
///
/// New IDs are random UUIDs assigned by the store. Rows written by older
/// versions of the tracker may carry other unique strings, so the ID is kept
/// as an opaque string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// Create a new, random transaction ID.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The ID as stored in the `id` column.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TransactionId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A financial event stored in the transactions table.
///
/// To create a new `Transaction`, use [Transaction::build] and hand the
/// resulting [NewTransaction] to [crate::LedgerStore::add].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The unique ID of the transaction.
    pub id: TransactionId,
    /// The economic date of the event.
    #[serde(deserialize_with = "date_format::deserialize")]
    pub date: Date,
    /// What kind of event this is.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The client that was invoiced, only meaningful for client invoices.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub client: Option<String>,
    /// The gross amount of the event.
    #[serde(default, deserialize_with = "null_as_zero")]
    pub amount: Decimal,
    /// The commission taken from a client invoice, zero for other types.
    #[serde(default, deserialize_with = "null_as_zero")]
    pub commission_amount: Decimal,
    /// The net effect of the event on the treasury.
    #[serde(default, deserialize_with = "null_as_zero")]
    pub treasury_impact: Decimal,
    /// Free text notes.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub notes: Option<String>,
}

impl Transaction {
    /// Start building a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(transaction_type: TransactionType, amount: Decimal, date: Date) -> TransactionBuilder {
        TransactionBuilder {
            transaction_type,
            amount,
            date,
            client: None,
            commission_percent: DEFAULT_COMMISSION_PERCENT,
            notes: None,
        }
    }
}

/// A builder for [NewTransaction] that derives the commission and treasury impact.
///
/// # Examples
///
/// ```
/// use freelance_tracker::ledger::{Transaction, TransactionType};
/// use rust_decimal::Decimal;
/// use time::macros::date;
///
/// let invoice = Transaction::build(TransactionType::ClientInvoice, Decimal::from(1000), date!(2025-01-15))
///     .client("ACME")
///     .commission_percent(Decimal::from(15))
///     .finalize()
///     .unwrap();
///
/// assert_eq!(invoice.commission_amount, Decimal::from(150));
/// assert_eq!(invoice.treasury_impact, Decimal::from(850));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionBuilder {
    transaction_type: TransactionType,
    amount: Decimal,
    date: Date,
    client: Option<String>,
    commission_percent: Decimal,
    notes: Option<String>,
}

impl TransactionBuilder {
    /// Set the invoiced client. Ignored for types other than client invoices.
    pub fn client(mut self, client: &str) -> Self {
        self.client = Some(client.to_owned());
        self
    }

    /// Set the commission percentage taken from a client invoice.
    ///
    /// Defaults to [DEFAULT_COMMISSION_PERCENT]. Ignored for types other than client invoices.
    pub fn commission_percent(mut self, percent: Decimal) -> Self {
        self.commission_percent = percent;
        self
    }

    /// Set the notes for the transaction.
    pub fn notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.to_owned());
        self
    }

    /// Validate the inputs and compute the derived fields.
    ///
    /// # Errors
    /// Returns:
    /// - [Error::NegativeAmount] if the amount is less than zero,
    /// - [Error::InvalidCommissionPercent] if a client invoice has a
    ///   commission percentage outside of 0 to 100.
    pub fn finalize(self) -> Result<NewTransaction, Error> {
        if self.amount.is_sign_negative() && !self.amount.is_zero() {
            return Err(Error::NegativeAmount(self.amount));
        }

        let is_invoice = self.transaction_type == TransactionType::ClientInvoice;

        if is_invoice
            && (self.commission_percent < Decimal::ZERO
                || self.commission_percent > Decimal::ONE_HUNDRED)
        {
            return Err(Error::InvalidCommissionPercent(self.commission_percent));
        }

        let commission_amount =
            commission_amount(self.transaction_type, self.amount, self.commission_percent);
        let treasury_impact = treasury_impact(self.transaction_type, self.amount, commission_amount);

        let client = if is_invoice {
            non_blank(self.client)
        } else {
            None
        };

        Ok(NewTransaction {
            date: self.date,
            transaction_type: self.transaction_type,
            client,
            amount: self.amount,
            commission_amount,
            treasury_impact,
            notes: non_blank(self.notes),
        })
    }
}

fn non_blank(text: Option<String>) -> Option<String> {
    text.map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

/// The commission taken from `amount`: `amount × percent / 100` for client
/// invoices, zero for every other type.
pub fn commission_amount(
    transaction_type: TransactionType,
    amount: Decimal,
    percent: Decimal,
) -> Decimal {
    match transaction_type {
        TransactionType::ClientInvoice => amount * percent / Decimal::ONE_HUNDRED,
        TransactionType::Salary | TransactionType::TreasuryDraw | TransactionType::Other => {
            Decimal::ZERO
        }
    }
}

/// The net effect of a transaction on the treasury.
pub fn treasury_impact(
    transaction_type: TransactionType,
    amount: Decimal,
    commission_amount: Decimal,
) -> Decimal {
    match transaction_type {
        TransactionType::ClientInvoice => amount - commission_amount,
        TransactionType::Salary | TransactionType::TreasuryDraw => -amount,
        TransactionType::Other => Decimal::ZERO,
    }
}

/// A fully populated transaction that has not been given an ID yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// The economic date of the event.
    pub date: Date,
    /// What kind of event this is.
    pub transaction_type: TransactionType,
    /// The invoiced client, `None` for types other than client invoices.
    pub client: Option<String>,
    /// The gross amount of the event.
    pub amount: Decimal,
    /// The commission derived from the amount.
    pub commission_amount: Decimal,
    /// The net effect of the event on the treasury.
    pub treasury_impact: Decimal,
    /// Free text notes.
    pub notes: Option<String>,
}

impl NewTransaction {
    /// Attach `id` to create the row that will be inserted.
    pub fn with_id(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            date: self.date,
            transaction_type: self.transaction_type,
            client: self.client,
            amount: self.amount,
            commission_amount: self.commission_amount,
            treasury_impact: self.treasury_impact,
            notes: self.notes,
        }
    }
}

/// A partial update of a transaction. Only the fields that are `Some` are sent.
///
/// `client` and `notes` are doubly optional: `Some(None)` clears the column.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransactionPatch {
    /// The new date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<Date>,
    /// The new type.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<TransactionType>,
    /// The new client, or `Some(None)` to clear it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<Option<String>>,
    /// The new gross amount.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    /// The new commission. Keep it consistent with the amount and type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commission_amount: Option<Decimal>,
    /// The new treasury impact. Keep it consistent with the amount and type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub treasury_impact: Option<Decimal>,
    /// The new notes, or `Some(None)` to clear them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
}

impl TransactionPatch {
    /// Whether the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Replaces every field except the ID, keeping the derived fields consistent
/// with the new type and amount.
impl From<NewTransaction> for TransactionPatch {
    fn from(transaction: NewTransaction) -> Self {
        Self {
            date: Some(transaction.date),
            transaction_type: Some(transaction.transaction_type),
            client: Some(transaction.client),
            amount: Some(transaction.amount),
            commission_amount: Some(transaction.commission_amount),
            treasury_impact: Some(transaction.treasury_impact),
            notes: Some(transaction.notes),
        }
    }
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Decimal>::deserialize(deserializer)?.unwrap_or_default())
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|text| !text.is_empty()))
}

mod date_format {
    //! Reads the `date` column, which may hold either a date or a full
    //! timestamp depending on how the table was created.
    use serde::{Deserialize, Deserializer};
    use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

    const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Date, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        let date_part = text.get(..10).unwrap_or(&text);

        Date::parse(date_part, DATE_FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod derivation_tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use time::macros::date;

    use crate::{
        Error,
        ledger::{Transaction, TransactionPatch, TransactionType},
    };

    #[test]
    fn invoice_impact_is_amount_minus_commission() {
        let invoice = Transaction::build(TransactionType::ClientInvoice, dec!(1000), date!(2025 - 01 - 15))
            .commission_percent(dec!(15))
            .finalize()
            .unwrap();

        assert_eq!(invoice.commission_amount, dec!(150));
        assert_eq!(invoice.treasury_impact, invoice.amount - invoice.commission_amount);
    }

    #[test]
    fn invoice_uses_default_commission() {
        let invoice = Transaction::build(TransactionType::ClientInvoice, dec!(200), date!(2025 - 01 - 15))
            .finalize()
            .unwrap();

        assert_eq!(invoice.commission_amount, dec!(30));
        assert_eq!(invoice.treasury_impact, dec!(170));
    }

    #[test]
    fn salary_and_draw_impact_is_negative_amount() {
        for transaction_type in [TransactionType::Salary, TransactionType::TreasuryDraw] {
            let transaction = Transaction::build(transaction_type, dec!(500), date!(2025 - 02 - 01))
                .commission_percent(dec!(50))
                .client("Ignored")
                .finalize()
                .unwrap();

            assert_eq!(transaction.commission_amount, Decimal::ZERO);
            assert_eq!(transaction.treasury_impact, dec!(-500));
            assert_eq!(transaction.client, None);
        }
    }

    #[test]
    fn unknown_type_has_no_commission_or_impact() {
        let transaction = Transaction::build(TransactionType::Other, dec!(75), date!(2025 - 02 - 01))
            .finalize()
            .unwrap();

        assert_eq!(transaction.commission_amount, Decimal::ZERO);
        assert_eq!(transaction.treasury_impact, Decimal::ZERO);
    }

    #[test]
    fn rejects_negative_amount() {
        let result = Transaction::build(TransactionType::Salary, dec!(-1), date!(2025 - 02 - 01)).finalize();

        assert_eq!(result, Err(Error::NegativeAmount(dec!(-1))));
    }

    #[test]
    fn rejects_commission_outside_percentage_range() {
        let too_high = Transaction::build(TransactionType::ClientInvoice, dec!(10), date!(2025 - 02 - 01))
            .commission_percent(dec!(100.5))
            .finalize();
        let too_low = Transaction::build(TransactionType::ClientInvoice, dec!(10), date!(2025 - 02 - 01))
            .commission_percent(dec!(-0.1))
            .finalize();

        assert_eq!(too_high, Err(Error::InvalidCommissionPercent(dec!(100.5))));
        assert_eq!(too_low, Err(Error::InvalidCommissionPercent(dec!(-0.1))));
    }

    #[test]
    fn blank_client_and_notes_are_dropped() {
        let invoice = Transaction::build(TransactionType::ClientInvoice, dec!(10), date!(2025 - 02 - 01))
            .client("  ")
            .notes("")
            .finalize()
            .unwrap();

        assert_eq!(invoice.client, None);
        assert_eq!(invoice.notes, None);
    }

    #[test]
    fn patch_from_new_transaction_sets_every_field() {
        let draw = Transaction::build(TransactionType::TreasuryDraw, dec!(80), date!(2025 - 03 - 01))
            .notes("Laptop")
            .finalize()
            .unwrap();

        let patch = TransactionPatch::from(draw);

        assert!(!patch.is_empty());
        assert_eq!(patch.treasury_impact, Some(dec!(-80)));
        assert_eq!(patch.client, Some(None));
        assert_eq!(patch.notes, Some(Some("Laptop".to_owned())));
    }
}
