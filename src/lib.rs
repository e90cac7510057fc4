//! Wellness onboarding — wizard state machine, answer record, and its
//! canonical JSON encoding.

pub mod cli;
pub mod config;
pub mod error;
pub mod onboarding;
pub mod store;
