use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::config::{AppConfig, PricingConfig};
use crate::core::pricing::MobileMoneyQuote;
use crate::domain::model::{
    PaymentDetails, PaymentMethod, PaymentResult, PaymentStatus, Service,
};
use crate::domain::ports::{Latency, OutcomeStrategy, PaymentGateway};
use crate::utils::error::{BookingError, Result};
use crate::utils::validation::digits_only;

pub const COUNTRY_CODE: &str = "254";
pub const PHONE_DIGITS: usize = 12;

pub const INVALID_PHONE: &str = "Please enter a valid M-Pesa phone number";
pub const MPESA_FAILED: &str = "M-Pesa payment was cancelled or failed. Please try again.";

/// Normalizes a Kenyan mobile number to `254XXXXXXXXX`.
pub fn format_phone(input: &str) -> String {
    let digits = digits_only(input);
    if digits.starts_with(COUNTRY_CODE) {
        digits.chars().take(PHONE_DIGITS).collect()
    } else if let Some(rest) = digits.strip_prefix('0') {
        format!("{}{}", COUNTRY_CODE, rest.chars().take(9).collect::<String>())
    } else if digits.starts_with('7') || digits.starts_with('1') {
        format!("{}{}", COUNTRY_CODE, digits.chars().take(9).collect::<String>())
    } else {
        digits.chars().take(PHONE_DIGITS).collect()
    }
}

/// "254712345678" -> "+254 712 345 678"
pub fn display_phone(phone: &str) -> String {
    if phone.len() >= PHONE_DIGITS && phone.is_ascii() {
        format!(
            "+{} {} {} {}",
            &phone[..3],
            &phone[3..6],
            &phone[6..9],
            &phone[9..]
        )
    } else {
        phone.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MobileMoneyRequest {
    pub phone: String,
}

impl MobileMoneyRequest {
    pub fn new(phone: &str) -> Self {
        Self {
            phone: format_phone(phone),
        }
    }
}

/// An STK push sent to the customer's handset, waiting for confirmation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingPush {
    pub phone: String,
    pub transaction_code: String,
    pub quote: MobileMoneyQuote,
}

pub struct MockMpesaGateway {
    outcome: Arc<dyn OutcomeStrategy>,
    latency: Arc<dyn Latency>,
    push_delay: Duration,
    confirm_delay: Duration,
    success_rate: f64,
    pricing: PricingConfig,
}

impl MockMpesaGateway {
    pub fn new(
        config: &AppConfig,
        outcome: Arc<dyn OutcomeStrategy>,
        latency: Arc<dyn Latency>,
    ) -> Self {
        Self {
            outcome,
            latency,
            push_delay: config.delays.push(),
            confirm_delay: config.delays.confirm(),
            success_rate: config.payments.mobile_money_success_rate,
            pricing: config.pricing.clone(),
        }
    }

    pub fn quote(&self, service: &Service) -> MobileMoneyQuote {
        MobileMoneyQuote::for_service(service, &self.pricing)
    }

    pub async fn request_push(&self, service: &Service, phone: &str) -> Result<PendingPush> {
        if service.is_free() {
            return Err(BookingError::validation(
                "service",
                "free services do not take payment",
            ));
        }
        let phone = format_phone(phone);
        if phone.len() < PHONE_DIGITS {
            return Err(BookingError::payment(INVALID_PHONE));
        }

        tracing::debug!(phone = %display_phone(&phone), "sending M-Pesa payment request");
        self.latency.wait(self.push_delay).await;

        Ok(PendingPush {
            phone,
            transaction_code: format!("MP{}", self.outcome.token(8).to_ascii_uppercase()),
            quote: self.quote(service),
        })
    }

    pub async fn confirm(&self, push: &PendingPush) -> Result<PaymentResult> {
        self.latency.wait(self.confirm_delay).await;

        if !self.outcome.approve(self.success_rate) {
            tracing::warn!(code = %push.transaction_code, "M-Pesa payment failed");
            return Err(BookingError::payment(MPESA_FAILED));
        }

        Ok(PaymentResult {
            payment_id: format!("mpesa_{}", self.outcome.token(9)),
            amount: push.quote.usd_amount,
            currency: "KSH".to_string(),
            status: PaymentStatus::Succeeded,
            method: PaymentMethod::MobileMoney,
            details: PaymentDetails::MobileMoney {
                phone: display_phone(&push.phone),
                transaction_code: push.transaction_code.clone(),
                amount_ksh: push.quote.total_ksh,
            },
        })
    }
}

#[async_trait]
impl PaymentGateway for MockMpesaGateway {
    type Request = MobileMoneyRequest;

    fn method(&self) -> PaymentMethod {
        PaymentMethod::MobileMoney
    }

    async fn charge(&self, service: &Service, request: &MobileMoneyRequest) -> Result<PaymentResult> {
        let push = self.request_push(service, &request.phone).await?;
        self.confirm(&push).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::outcome::{FixedOutcome, NoLatency};
    use crate::domain::model::{find_service, ServiceId};

    fn gateway(outcome: FixedOutcome) -> MockMpesaGateway {
        MockMpesaGateway::new(&AppConfig::instant(), Arc::new(outcome), Arc::new(NoLatency))
    }

    #[test]
    fn test_format_phone() {
        assert_eq!(format_phone("0712 345 678"), "254712345678");
        assert_eq!(format_phone("712345678"), "254712345678");
        assert_eq!(format_phone("110345678"), "254110345678");
        assert_eq!(format_phone("+254 722 123 456 99"), "254722123456");
        assert_eq!(format_phone("0712"), "254712");
        assert_eq!(format_phone("44 20 7946 0958 11"), "442079460958");
    }

    #[test]
    fn test_display_phone() {
        assert_eq!(display_phone("254712345678"), "+254 712 345 678");
        assert_eq!(display_phone("254712"), "254712");
    }

    #[tokio::test]
    async fn test_short_number_is_rejected() {
        let err = gateway(FixedOutcome::approving())
            .request_push(find_service(ServiceId::Personal), "0712")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), INVALID_PHONE);
    }

    #[tokio::test]
    async fn test_push_then_confirm() {
        let gateway = gateway(FixedOutcome::approving());
        let push = gateway
            .request_push(find_service(ServiceId::Personal), "0712345678")
            .await
            .unwrap();
        assert!(push.transaction_code.starts_with("MP"));
        assert_eq!(push.transaction_code.len(), 10);
        assert_eq!(push.quote.total_ksh, 22725.0);

        let result = gateway.confirm(&push).await.unwrap();
        assert!(result.payment_id.starts_with("mpesa_"));
        assert_eq!(result.amount, 150.0);
        assert_eq!(result.currency, "KSH");
        assert_eq!(result.method_summary(), "M-Pesa +254 712 345 678");
        match result.details {
            PaymentDetails::MobileMoney {
                transaction_code,
                amount_ksh,
                ..
            } => {
                assert_eq!(transaction_code, push.transaction_code);
                assert_eq!(amount_ksh, 22725.0);
            }
            other => panic!("unexpected details: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_declined_confirmation() {
        let err = gateway(FixedOutcome::declining())
            .charge(
                find_service(ServiceId::Group),
                &MobileMoneyRequest::new("0712345678"),
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), MPESA_FAILED);
    }
}
