//! API Lambda handler and request processing

pub mod handler;
pub mod helpers;
pub mod ingress;
pub mod sqs;

// Re-export the main handler for convenience
pub use handler::handler;
pub use ingress::{IngressOutcome, IngressRelay};
pub use sqs::{BusPublisher, SqsPublisher};
