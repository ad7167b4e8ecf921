use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::config::{AppConfig, PricingConfig};
use crate::core::pricing::CardQuote;
use crate::domain::model::{
    PaymentDetails, PaymentMethod, PaymentResult, PaymentStatus, Service,
};
use crate::domain::ports::{Latency, OutcomeStrategy, PaymentGateway};
use crate::utils::error::{BookingError, Result};
use crate::utils::validation::{digits_only, is_blank};

pub const MAX_FORMATTED_CARD_LEN: usize = 19;
pub const MIN_CARD_DIGITS: usize = 13;

/// Groups digits in fours: "4242424242424242" -> "4242 4242 4242 4242".
pub fn format_card_number(input: &str) -> String {
    let digits: String = digits_only(input).chars().take(16).collect();
    digits
        .as_bytes()
        .chunks(4)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// "1227" -> "12/27"
pub fn format_expiry(input: &str) -> String {
    let digits: String = digits_only(input).chars().take(4).collect();
    if digits.len() >= 2 {
        format!("{}/{}", &digits[..2], &digits[2..])
    } else {
        digits
    }
}

pub fn sanitize_cvv(input: &str) -> String {
    digits_only(input).chars().take(4).collect()
}

pub fn card_brand(number: &str) -> &'static str {
    match digits_only(number).chars().next() {
        Some('4') => "Visa",
        Some('5') | Some('2') => "Mastercard",
        Some('3') => "American Express",
        _ => "Card",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDetails {
    pub cardholder: String,
    pub number: String,
    pub expiry: String,
    pub cvv: String,
    pub billing: BillingAddress,
}

impl CardDetails {
    /// Runs raw keyboard input through the same formatters as the payment form.
    pub fn from_input(cardholder: &str, number: &str, expiry: &str, cvv: &str) -> Self {
        Self {
            cardholder: cardholder.to_string(),
            number: format_card_number(number),
            expiry: format_expiry(expiry),
            cvv: sanitize_cvv(cvv),
            billing: BillingAddress::default(),
        }
    }

    pub fn last4(&self) -> String {
        let digits = digits_only(&self.number);
        digits[digits.len().saturating_sub(4)..].to_string()
    }

    pub fn validate(&self) -> Result<()> {
        if [&self.number, &self.expiry, &self.cvv, &self.cardholder]
            .iter()
            .any(|field| is_blank(field))
        {
            return Err(BookingError::payment("Please fill in all payment details"));
        }
        if digits_only(&self.number).len() < MIN_CARD_DIGITS {
            return Err(BookingError::payment("Please enter a valid card number"));
        }
        if self.cvv.len() < 3 {
            return Err(BookingError::payment("Please enter a valid CVV"));
        }
        Ok(())
    }
}

pub const CARD_DECLINED: &str = "Your card was declined. Please try a different payment method.";

pub struct MockCardGateway {
    outcome: Arc<dyn OutcomeStrategy>,
    latency: Arc<dyn Latency>,
    delay: Duration,
    success_rate: f64,
    pricing: PricingConfig,
}

impl MockCardGateway {
    pub fn new(
        config: &AppConfig,
        outcome: Arc<dyn OutcomeStrategy>,
        latency: Arc<dyn Latency>,
    ) -> Self {
        Self {
            outcome,
            latency,
            delay: config.delays.card(),
            success_rate: config.payments.card_success_rate,
            pricing: config.pricing.clone(),
        }
    }

    pub fn quote(&self, service: &Service) -> CardQuote {
        CardQuote::for_service(service, &self.pricing)
    }
}

#[async_trait]
impl PaymentGateway for MockCardGateway {
    type Request = CardDetails;

    fn method(&self) -> PaymentMethod {
        PaymentMethod::Card
    }

    async fn charge(&self, service: &Service, card: &CardDetails) -> Result<PaymentResult> {
        if service.is_free() {
            return Err(BookingError::validation(
                "service",
                "free services do not take payment",
            ));
        }
        card.validate()?;

        let quote = self.quote(service);
        tracing::debug!(service = %service.id, total = quote.total, "processing card payment");
        self.latency.wait(self.delay).await;

        if !self.outcome.approve(self.success_rate) {
            tracing::warn!(service = %service.id, "card payment declined");
            return Err(BookingError::payment(CARD_DECLINED));
        }

        Ok(PaymentResult {
            payment_id: format!("pi_{}", self.outcome.token(9)),
            amount: quote.total,
            currency: "usd".to_string(),
            status: PaymentStatus::Succeeded,
            method: PaymentMethod::Card,
            details: PaymentDetails::Card {
                last4: card.last4(),
                brand: card_brand(&card.number).to_string(),
            },
        })
    }
}
