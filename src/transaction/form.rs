//! The form shared by the new and edit transaction pages.

use maud::{Markup, html};
use rust_decimal::Decimal;
use serde::Deserialize;
use time::Date;

use crate::{
    Error,
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
    ledger::{DEFAULT_COMMISSION_PERCENT, NewTransaction, Transaction, TransactionType},
};

/// The form data for creating or editing a transaction.
#[derive(Debug, Deserialize)]
pub struct TransactionForm {
    /// The date of the event.
    pub date: Date,
    /// The kind of event.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The gross amount in euros.
    pub amount: Decimal,
    /// The invoiced client.
    #[serde(default)]
    pub client: Option<String>,
    /// The percentage of an invoice taken as commission.
    #[serde(default)]
    pub commission_percent: Option<Decimal>,
    /// Free text notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl TransactionForm {
    /// Validate the form and derive the commission and treasury impact.
    ///
    /// # Errors
    /// Returns the validation errors of [crate::ledger::TransactionBuilder::finalize].
    pub fn into_new_transaction(self) -> Result<NewTransaction, Error> {
        let mut builder = Transaction::build(self.transaction_type, self.amount, self.date)
            .commission_percent(
                self.commission_percent
                    .unwrap_or(DEFAULT_COMMISSION_PERCENT),
            );

        if let Some(client) = &self.client {
            builder = builder.client(client);
        }

        if let Some(notes) = &self.notes {
            builder = builder.notes(notes);
        }

        builder.finalize()
    }
}

/// The initial values of the form fields.
pub struct TransactionFormDefaults<'a> {
    pub transaction_type: TransactionType,
    pub date: Date,
    pub amount: Option<Decimal>,
    pub client: Option<&'a str>,
    pub commission_percent: Decimal,
    pub notes: Option<&'a str>,
    pub autofocus_amount: bool,
}

impl<'a> TransactionFormDefaults<'a> {
    /// Defaults for a new client invoice dated `today`.
    pub fn new(today: Date) -> Self {
        Self {
            transaction_type: TransactionType::ClientInvoice,
            date: today,
            amount: None,
            client: None,
            commission_percent: DEFAULT_COMMISSION_PERCENT,
            notes: None,
            autofocus_amount: true,
        }
    }

    /// The current values of `transaction`.
    pub fn from_transaction(transaction: &'a Transaction) -> Self {
        Self {
            transaction_type: transaction.transaction_type,
            date: transaction.date,
            amount: Some(transaction.amount),
            client: transaction.client.as_deref(),
            commission_percent: commission_percent_of(transaction),
            notes: transaction.notes.as_deref(),
            autofocus_amount: false,
        }
    }
}

/// Recover the commission percentage that was used for `transaction`.
///
/// Falls back to [DEFAULT_COMMISSION_PERCENT] when it cannot be recovered,
/// e.g. for salaries or zero amounts.
fn commission_percent_of(transaction: &Transaction) -> Decimal {
    if transaction.transaction_type != TransactionType::ClientInvoice
        || transaction.amount.is_zero()
    {
        return DEFAULT_COMMISSION_PERCENT;
    }

    (transaction.commission_amount * Decimal::ONE_HUNDRED / transaction.amount).normalize()
}

pub fn transaction_form_fields(defaults: &TransactionFormDefaults<'_>) -> Markup {
    let amount = defaults.amount.map(|amount| format!("{amount:.2}"));

    html! {
        div
        {
            label for="type" class=(FORM_LABEL_STYLE) { "Type" }

            select
                name="type"
                id="type"
                required
                class=(FORM_TEXT_INPUT_STYLE)
            {
                @for transaction_type in TransactionType::ALL {
                    option
                        value=(transaction_type.as_str())
                        selected[transaction_type == defaults.transaction_type]
                    {
                        (transaction_type.label())
                    }
                }
            }
        }

        div
        {
            label for="date" class=(FORM_LABEL_STYLE) { "Date" }

            input
                name="date"
                id="date"
                type="date"
                value=(defaults.date)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

            // w-full needed to ensure input takes the full width when prefilled with a value
            div class="input-wrapper w-full"
            {
                input
                    name="amount"
                    id="amount"
                    type="number"
                    step="0.01"
                    min="0"
                    placeholder="0.00"
                    required
                    value=[amount.as_deref()]
                    autofocus[defaults.autofocus_amount]
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }

        fieldset class="space-y-4 p-4 rounded border border-gray-200 dark:border-gray-700"
        {
            legend class=(FORM_LABEL_STYLE) { "Client invoices only" }

            div
            {
                label for="client" class=(FORM_LABEL_STYLE) { "Client" }

                input
                    name="client"
                    id="client"
                    type="text"
                    placeholder="Client name"
                    value=[defaults.client]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="commission_percent" class=(FORM_LABEL_STYLE) { "Commission (%)" }

                input
                    name="commission_percent"
                    id="commission_percent"
                    type="number"
                    step="any"
                    min="0"
                    max="100"
                    value=(defaults.commission_percent)
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }

        div
        {
            label for="notes" class=(FORM_LABEL_STYLE) { "Notes" }

            textarea
                name="notes"
                id="notes"
                rows="3"
                class=(FORM_TEXT_INPUT_STYLE)
            {
                (defaults.notes.unwrap_or_default())
            }
        }
    }
}
