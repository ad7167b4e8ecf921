use serde::Serialize;

use crate::domain::model::{BookingDraft, PaymentResult};
use crate::utils::error::{BookingError, Result};

const DATA_URI_PREFIX: &str = "data:application/json;charset=utf-8,";

/// Downloadable summary of a paid booking.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub payment_id: String,
    pub amount: f64,
    pub service: String,
    pub date: Option<String>,
    pub time: Option<String>,
    pub client: String,
    pub email: String,
}

impl Receipt {
    pub fn new(draft: &BookingDraft, payment: &PaymentResult) -> Result<Self> {
        let service = draft.service.ok_or_else(|| BookingError::validation(
            "service",
            "a receipt needs a booked service",
        ))?;
        Ok(Self {
            payment_id: payment.payment_id.clone(),
            amount: payment.amount,
            service: service.to_string(),
            date: draft.date.map(|d| d.format("%-m/%-d/%Y").to_string()),
            time: draft.time.map(|t| t.to_string()),
            client: draft.contact.full_name(),
            email: draft.contact.email.clone(),
        })
    }

    pub fn file_name(&self) -> String {
        format!("iron-nation-receipt-{}.json", self.payment_id)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Escapes every non-unreserved byte, `' ( ) ! *` included.
    pub fn data_uri(&self) -> Result<String> {
        Ok(format!(
            "{}{}",
            DATA_URI_PREFIX,
            urlencoding::encode(&self.to_json()?)
        ))
    }

    /// Writes `<dir>/<file_name>` and returns the full path.
    pub fn save_to(&self, dir: &std::path::Path) -> Result<std::path::PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name());
        std::fs::write(&path, self.to_json()?)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{
        ContactInfo, PaymentDetails, PaymentMethod, PaymentStatus, ServiceId, TimeSlot,
    };
    use chrono::NaiveDate;

    fn draft() -> BookingDraft {
        BookingDraft::default()
            .with_service(ServiceId::Nutrition)
            .with_date(NaiveDate::from_ymd_opt(2026, 3, 5).unwrap())
            .with_time(TimeSlot::at_hour(14).unwrap())
            .with_contact(ContactInfo {
                first_name: "Sarah".to_string(),
                last_name: "Johnson".to_string(),
                email: "sarah@example.com".to_string(),
                phone: "+1 (555) 987-6543".to_string(),
            })
    }

    fn payment() -> PaymentResult {
        PaymentResult {
            payment_id: "pi_abc123def".to_string(),
            amount: 222.1,
            currency: "usd".to_string(),
            status: PaymentStatus::Succeeded,
            method: PaymentMethod::Card,
            details: PaymentDetails::Card {
                last4: "4242".to_string(),
                brand: "Visa".to_string(),
            },
        }
    }

    #[test]
    fn test_receipt_fields() {
        let receipt = Receipt::new(&draft(), &payment()).unwrap();
        assert_eq!(receipt.service, "nutrition");
        assert_eq!(receipt.date.as_deref(), Some("3/5/2026"));
        assert_eq!(receipt.time.as_deref(), Some("2:00 PM"));
        assert_eq!(receipt.client, "Sarah Johnson");
        assert_eq!(receipt.file_name(), "iron-nation-receipt-pi_abc123def.json");
    }

    #[test]
    fn test_receipt_json_uses_camel_case() {
        let json = Receipt::new(&draft(), &payment()).unwrap().to_json().unwrap();
        assert!(json.contains("\n  \"paymentId\": \"pi_abc123def\""));
        assert!(json.contains("\"client\": \"Sarah Johnson\""));
    }

    #[test]
    fn test_data_uri_is_percent_encoded() {
        let uri = Receipt::new(&draft(), &payment()).unwrap().data_uri().unwrap();
        assert!(uri.starts_with("data:application/json;charset=utf-8,%7B%0A"));
        assert!(!uri.contains(' '));
    }

    #[test]
    fn test_data_uri_decodes_to_json() {
        let receipt = Receipt::new(&draft(), &payment()).unwrap();
        let uri = receipt.data_uri().unwrap();
        let encoded = uri.strip_prefix(DATA_URI_PREFIX).unwrap();
        let decoded = urlencoding::decode(encoded).unwrap();
        assert_eq!(decoded, receipt.to_json().unwrap());
    }

    #[test]
    fn test_receipt_is_written_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let receipt = Receipt::new(&draft(), &payment()).unwrap();
        let path = receipt.save_to(dir.path()).unwrap();
        let written = std::fs::read_to_string(path).unwrap();
        assert_eq!(written, receipt.to_json().unwrap());
    }

    #[test]
    fn test_receipt_requires_service() {
        assert!(Receipt::new(&BookingDraft::default(), &payment()).is_err());
    }
}
