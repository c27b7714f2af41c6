//! Core data types for GreenQuote

pub mod money;
pub mod quote;
pub mod requester;
