use crate::config::PricingConfig;
use crate::domain::model::Service;
use serde::Serialize;

pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardQuote {
    pub subtotal: f64,
    pub tax: f64,
    pub processing_fee: f64,
    pub total: f64,
}

impl CardQuote {
    /// Free services quote zero across the board; the fixed fee only applies to a charge.
    pub fn for_service(service: &Service, pricing: &PricingConfig) -> Self {
        if service.is_free() {
            return Self {
                subtotal: 0.0,
                tax: 0.0,
                processing_fee: 0.0,
                total: 0.0,
            };
        }
        let subtotal = f64::from(service.price_usd);
        let tax = subtotal * pricing.tax_rate;
        let processing_fee = subtotal * pricing.card_fee_rate + pricing.card_fee_fixed_usd;
        Self {
            subtotal,
            tax: round_cents(tax),
            processing_fee: round_cents(processing_fee),
            total: round_cents(subtotal + tax + processing_fee),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MobileMoneyQuote {
    pub usd_amount: f64,
    pub ksh_amount: f64,
    pub fee_ksh: f64,
    pub total_ksh: f64,
}

impl MobileMoneyQuote {
    pub fn for_service(service: &Service, pricing: &PricingConfig) -> Self {
        let usd_amount = f64::from(service.price_usd);
        let ksh_amount = usd_amount * pricing.ksh_per_usd;
        let fee_ksh = ksh_amount * pricing.mobile_money_fee_rate;
        Self {
            usd_amount,
            ksh_amount: round_cents(ksh_amount),
            fee_ksh: round_cents(fee_ksh),
            total_ksh: round_cents(ksh_amount + fee_ksh),
        }
    }
}

/// Thousands separators, two decimals: `22,725.00`.
pub fn format_amount(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, fraction)
}
