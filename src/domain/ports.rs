use crate::domain::model::{PaymentMethod, PaymentResult, Service};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Decides how a mock payment resolves and supplies the random material
/// for synthetic identifiers.
pub trait OutcomeStrategy: Send + Sync {
    /// `success_rate` is a probability in `[0, 1]`.
    fn approve(&self, success_rate: f64) -> bool;

    /// `len` lowercase base-36 characters.
    fn token(&self, len: usize) -> String;
}

#[async_trait]
pub trait Latency: Send + Sync {
    async fn wait(&self, duration: Duration);
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    type Request: Send + Sync;

    fn method(&self) -> PaymentMethod;

    async fn charge(&self, service: &Service, request: &Self::Request) -> Result<PaymentResult>;
}
