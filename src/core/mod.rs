//! Configuration and the relayed message model

pub mod config;
pub mod models;
