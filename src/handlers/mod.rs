//! Command handlers. These own all user-facing console output.

pub mod fetch;
pub mod search;
