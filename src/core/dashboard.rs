//! Admin view over booked sessions.
//!
//! 後台預約列表：搜尋、狀態篩選與統計。

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::core::wizard::{Step, WizardState};
use crate::utils::error::{BookingError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Pending,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentState {
    Paid,
    Pending,
    Failed,
    Refunded,
}

/// Status dropdown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(BookingStatus),
}

impl StatusFilter {
    fn matches(self, status: BookingStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "confirmed" => Ok(Self::Only(BookingStatus::Confirmed)),
            "pending" => Ok(Self::Only(BookingStatus::Pending)),
            "cancelled" => Ok(Self::Only(BookingStatus::Cancelled)),
            other => Err(BookingError::validation(
                "status",
                format!("'{}' is not one of all, confirmed, pending, cancelled", other),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRecord {
    pub id: String,
    pub client_name: String,
    pub email: String,
    pub phone: String,
    pub service: String,
    pub date: NaiveDate,
    pub time: String,
    pub status: BookingStatus,
    pub price_usd: u32,
    pub payment_status: PaymentState,
    pub payment_id: Option<String>,
    pub payment_method: Option<String>,
    pub mpesa_phone: Option<String>,
    pub transaction_code: Option<String>,
}

impl BookingRecord {
    pub fn price_label(&self) -> String {
        format!("${}", self.price_usd)
    }

    fn matches_search(&self, needle: &str) -> bool {
        self.client_name.to_lowercase().contains(needle) || self.email.to_lowercase().contains(needle)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total: usize,
    pub this_week: usize,
    pub confirmed: usize,
    pub pending: usize,
    pub revenue_usd: u32,
}

#[derive(Debug, Clone, Default)]
pub struct BookingLedger {
    records: Vec<BookingRecord>,
}

impl BookingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// The five demo bookings the dashboard ships with.
    pub fn with_demo_bookings() -> Self {
        Self {
            records: demo_bookings(),
        }
    }

    pub fn records(&self) -> &[BookingRecord] {
        &self.records
    }

    pub fn find(&self, id: &str) -> Result<&BookingRecord> {
        self.records
            .iter()
            .find(|record| record.id == id)
            .ok_or_else(|| BookingError::NotFound {
                kind: "booking",
                id: id.to_string(),
            })
    }

    /// Search is a case-insensitive substring match on client name or email.
    pub fn filter(&self, search: &str, status: StatusFilter) -> Vec<&BookingRecord> {
        let needle = search.trim().to_lowercase();
        self.records
            .iter()
            .filter(|record| record.matches_search(&needle) && status.matches(record.status))
            .collect()
    }

    /// `today` anchors the Monday-to-Sunday "this week" window.
    pub fn stats(&self, today: NaiveDate) -> DashboardStats {
        let week = today.iso_week();
        let count = |status: BookingStatus| self.records.iter().filter(|r| r.status == status).count();
        DashboardStats {
            total: self.records.len(),
            this_week: self
                .records
                .iter()
                .filter(|r| r.date.iso_week() == week)
                .count(),
            confirmed: count(BookingStatus::Confirmed),
            pending: count(BookingStatus::Pending),
            revenue_usd: self
                .records
                .iter()
                .filter(|r| r.payment_status == PaymentState::Paid)
                .map(|r| r.price_usd)
                .sum(),
        }
    }

    /// Turns a finished booking wizard into a dashboard row.
    ///
    /// Paid bookings are confirmed right away; free consultations stay pending
    /// until the team calls the client back.
    pub fn record_confirmation(&mut self, state: &WizardState) -> Result<&BookingRecord> {
        if state.step() != Step::Confirmation {
            return Err(BookingError::InvalidTransition {
                step: state.step().number(),
                action: "record booking",
            });
        }
        let draft = state.draft();
        let missing = |field: &'static str| BookingError::IncompleteStep {
            step: state.step().number(),
            missing: vec![field],
        };
        let service = draft.selected_service().ok_or_else(|| missing("service"))?;
        let date = draft.date.ok_or_else(|| missing("date"))?;
        let time = draft.time.ok_or_else(|| missing("time"))?;

        let payment = state.receipt();
        let (status, payment_status) = match payment {
            Some(_) => (BookingStatus::Confirmed, PaymentState::Paid),
            None => (BookingStatus::Pending, PaymentState::Pending),
        };
        let (mpesa_phone, transaction_code) = match payment.map(|p| &p.details) {
            Some(crate::domain::model::PaymentDetails::MobileMoney {
                phone,
                transaction_code,
                ..
            }) => (Some(phone.clone()), Some(transaction_code.clone())),
            _ => (None, None),
        };

        let record = BookingRecord {
            id: (self.records.len() + 1).to_string(),
            client_name: draft.contact.full_name(),
            email: draft.contact.email.clone(),
            phone: draft.contact.phone.clone(),
            service: service.name.to_string(),
            date,
            time: time.to_string(),
            status,
            price_usd: service.price_usd,
            payment_status,
            payment_id: payment.map(|p| p.payment_id.clone()),
            payment_method: payment.map(|p| p.method_summary()),
            mpesa_phone,
            transaction_code,
        };
        tracing::debug!(id = %record.id, client = %record.client_name, "booking recorded");
        self.records.push(record);
        self.records.last().ok_or_else(|| BookingError::NotFound {
            kind: "booking",
            id: "latest".to_string(),
        })
    }
}

#[allow(clippy::too_many_arguments)]
fn demo(
    id: &str,
    client_name: &str,
    email: &str,
    phone: &str,
    service: &str,
    (year, month, day): (i32, u32, u32),
    time: &str,
    status: BookingStatus,
    price_usd: u32,
    payment_status: PaymentState,
) -> BookingRecord {
    BookingRecord {
        id: id.to_string(),
        client_name: client_name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        service: service.to_string(),
        date: NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN),
        time: time.to_string(),
        status,
        price_usd,
        payment_status,
        payment_id: None,
        payment_method: None,
        mpesa_phone: None,
        transaction_code: None,
    }
}

fn demo_bookings() -> Vec<BookingRecord> {
    use BookingStatus::{Confirmed, Pending};

    vec![
        BookingRecord {
            payment_id: Some("pi_1234567890".to_string()),
            payment_method: Some("Visa •••• 4242".to_string()),
            ..demo(
                "1",
                "John Smith",
                "john@example.com",
                "+1 (555) 123-4567",
                "Personal Training",
                (2024, 1, 15),
                "9:00 AM",
                Confirmed,
                150,
                PaymentState::Paid,
            )
        },
        demo(
            "2",
            "Sarah Johnson",
            "sarah@example.com",
            "+1 (555) 987-6543",
            "Nutrition Coaching",
            (2024, 1, 16),
            "2:00 PM",
            Pending,
            200,
            PaymentState::Pending,
        ),
        BookingRecord {
            payment_id: Some("pi_0987654321".to_string()),
            payment_method: Some("Mastercard •••• 5555".to_string()),
            ..demo(
                "3",
                "Mike Wilson",
                "mike@example.com",
                "+1 (555) 456-7890",
                "Group Training",
                (2024, 1, 17),
                "6:00 PM",
                Confirmed,
                75,
                PaymentState::Paid,
            )
        },
        BookingRecord {
            payment_id: Some("mpesa_abc123def".to_string()),
            payment_method: Some("M-Pesa +254 722 123 456".to_string()),
            mpesa_phone: Some("+254 722 123 456".to_string()),
            transaction_code: Some("MP12345678".to_string()),
            ..demo(
                "4",
                "Grace Wanjiku",
                "grace@example.com",
                "+254 722 123 456",
                "Personal Training",
                (2024, 1, 18),
                "10:00 AM",
                Confirmed,
                150,
                PaymentState::Paid,
            )
        },
        BookingRecord {
            payment_method: Some("M-Pesa +254 733 987 654".to_string()),
            mpesa_phone: Some("+254 733 987 654".to_string()),
            ..demo(
                "5",
                "David Kimani",
                "david@example.com",
                "+254 733 987 654",
                "Group Training",
                (2024, 1, 19),
                "7:00 PM",
                Pending,
                75,
                PaymentState::Pending,
            )
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::wizard::WizardEvent;
    use crate::domain::model::{ContactInfo, ServiceId, TimeSlot};

    fn ledger() -> BookingLedger {
        BookingLedger::with_demo_bookings()
    }

    #[test]
    fn test_search_is_case_insensitive_on_name_and_email() {
        let ledger = ledger();
        let by_name = ledger.filter("SARAH", StatusFilter::All);
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].id, "2");

        assert!(ledger.filter("kamau", StatusFilter::All).is_empty());
        let by_email = ledger.filter("david@", StatusFilter::All);
        assert_eq!(by_email[0].client_name, "David Kimani");
    }

    #[test]
    fn test_status_filter() {
        let ledger = ledger();
        assert_eq!(ledger.filter("", StatusFilter::All).len(), 5);
        assert_eq!(ledger.filter("", "confirmed".parse().unwrap()).len(), 3);
        assert_eq!(ledger.filter("", "Pending".parse().unwrap()).len(), 2);
        assert!(ledger.filter("", "cancelled".parse().unwrap()).is_empty());
        assert!("archived".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn test_search_and_status_combine() {
        let ledger = ledger();
        let hits = ledger.filter("example.com", StatusFilter::Only(BookingStatus::Pending));
        let ids: Vec<&str> = hits.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "5"]);
    }

    #[test]
    fn test_stats() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 17).unwrap();
        let stats = ledger().stats(today);
        assert_eq!(stats.total, 5);
        assert_eq!(stats.this_week, 5);
        assert_eq!(stats.confirmed, 3);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.revenue_usd, 375);
    }

    #[test]
    fn test_record_free_consultation() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 12).unwrap();
        let events = vec![
            WizardEvent::ChooseService(ServiceId::Consultation),
            WizardEvent::Next,
            WizardEvent::ChooseDate {
                date: NaiveDate::from_ymd_opt(2026, 10, 14).unwrap(),
                today,
            },
            WizardEvent::ChooseTime(TimeSlot::at_hour(9).unwrap()),
            WizardEvent::Next,
            WizardEvent::UpdateContact(ContactInfo {
                first_name: "Amina".to_string(),
                last_name: "Otieno".to_string(),
                email: "amina@example.com".to_string(),
                phone: "0712345678".to_string(),
            }),
            WizardEvent::Next,
        ];
        let state = events
            .into_iter()
            .try_fold(WizardState::new(), |state, event| state.apply(event))
            .unwrap();

        let mut ledger = ledger();
        let record = ledger.record_confirmation(&state).unwrap();
        assert_eq!(record.id, "6");
        assert_eq!(record.status, BookingStatus::Pending);
        assert_eq!(record.price_label(), "$0");
        assert!(record.payment_id.is_none());
        assert_eq!(ledger.records().len(), 6);
    }

    #[test]
    fn test_record_requires_confirmation_step() {
        let mut ledger = ledger();
        assert!(ledger.record_confirmation(&WizardState::new()).is_err());
        assert!(ledger.find("9").is_err());
    }
}
