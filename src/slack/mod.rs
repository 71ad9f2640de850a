//! All Slack-specific functionality

pub mod webhook;

pub use webhook::{MessageSink, WebhookClient};
