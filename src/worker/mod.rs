//! Worker Lambda handler and bus message forwarding

pub mod egress;
pub mod handler;

// Re-export the main handler for convenience
pub use egress::EgressRelay;
pub use handler::handler;
