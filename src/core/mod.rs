pub mod calculator;
pub mod cart;
pub mod contact;
pub mod dashboard;
pub mod pricing;
pub mod receipt;
pub mod session;
pub mod wizard;

pub use crate::domain::model::{BookingDraft, PaymentResult, Service, ServiceId};
pub use crate::domain::ports::{Latency, OutcomeStrategy, PaymentGateway};
pub use crate::utils::error::Result;
