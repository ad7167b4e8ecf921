// Adapters layer: concrete implementations of the domain ports (mock gateways, outcome strategies, latency).

pub mod card;
pub mod mpesa;
pub mod outcome;

pub use card::{CardDetails, MockCardGateway};
pub use mpesa::{MobileMoneyRequest, MockMpesaGateway};
pub use outcome::{FixedOutcome, NoLatency, RandomOutcome, ScriptedOutcome, TokioLatency};
