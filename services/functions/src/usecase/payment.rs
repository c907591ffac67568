use rand::RngExt;
use serde_json::{Value, json};

use crm_domain::entity::{INVOICES, PAYMENTS};
use crm_store::{Row, RowStore};

use crate::domain::types::{PaymentReceipt, PaymentRequest, PaymentStatus};
use crate::error::FunctionsError;

/// Card number that is declined regardless of the configured rate.
pub const DECLINE_TEST_CARD: &str = "4000000000000002";

const DEFAULT_CURRENCY: &str = "USD";
const DEFAULT_PROVIDER: &str = "stripe";

const TXN_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const TXN_LEN: usize = 16;

fn transaction_id() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..TXN_LEN)
        .map(|_| TXN_CHARSET[rng.random_range(0..TXN_CHARSET.len())] as char)
        .collect();
    format!("txn_{suffix}")
}

fn roll() -> f64 {
    rand::rng().random::<f64>()
}

/// Decide the outcome for `card` given a uniform `roll` in `[0, 1)`.
pub fn decide(card: Option<&str>, roll: f64, decline_rate: f64) -> PaymentStatus {
    let digits: Option<String> =
        card.map(|c| c.chars().filter(|ch| ch.is_ascii_digit()).collect());
    if digits.as_deref() == Some(DECLINE_TEST_CARD) || roll < decline_rate {
        PaymentStatus::Declined
    } else {
        PaymentStatus::Succeeded
    }
}

/// Simulated card charge. Nothing leaves the process; a `payments` row is
/// written either way and a successful charge marks the invoice paid.
pub struct MockPaymentUseCase<S: RowStore> {
    pub store: S,
    pub decline_rate: f64,
}

impl<S: RowStore> MockPaymentUseCase<S> {
    pub async fn execute(&self, input: PaymentRequest) -> Result<PaymentReceipt, FunctionsError> {
        if !input.amount.is_finite() || input.amount <= 0.0 {
            return Err(FunctionsError::InvalidAmount);
        }

        let receipt = PaymentReceipt {
            transaction_id: transaction_id(),
            status: decide(input.card_number.as_deref(), roll(), self.decline_rate),
            amount: input.amount,
            currency: input
                .currency
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_owned())
                .to_ascii_uppercase(),
            provider: input
                .provider
                .unwrap_or_else(|| DEFAULT_PROVIDER.to_owned()),
        };

        let mut payment = Row::new();
        payment.insert("transaction_id".into(), json!(receipt.transaction_id));
        payment.insert("amount".into(), json!(receipt.amount));
        payment.insert("currency".into(), json!(receipt.currency));
        payment.insert("provider".into(), json!(receipt.provider));
        payment.insert("status".into(), json!(receipt.status.as_str()));

        if let Some(invoice_id) = input.invoice_id {
            payment.insert("invoice_id".into(), json!(invoice_id.to_string()));
            match self.store.find_by_id(INVOICES.table, invoice_id).await? {
                Some(invoice) => {
                    if let Some(company) = invoice.get(INVOICES.tenant_column).filter(|v| !v.is_null()) {
                        payment.insert(PAYMENTS.tenant_column.into(), company.clone());
                    }
                }
                None => tracing::warn!(%invoice_id, "payment for unknown invoice"),
            }
        }

        self.store.insert(PAYMENTS.table, payment).await?;

        if let (PaymentStatus::Succeeded, Some(invoice_id)) = (receipt.status, input.invoice_id) {
            let mut patch = Row::new();
            patch.insert("status".into(), Value::String("paid".into()));
            self.store.update(INVOICES.table, invoice_id, patch).await?;
        }

        tracing::info!(
            transaction_id = %receipt.transaction_id,
            status = receipt.status.as_str(),
            invoice_id = ?input.invoice_id,
            "mock payment processed"
        );
        Ok(receipt)
    }
}
