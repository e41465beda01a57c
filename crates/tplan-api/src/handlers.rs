//! Request handlers.

pub mod ai;
pub mod asr;
pub mod auth;
pub mod expenses;
pub mod health;
pub mod oss;
pub mod plans;

pub use health::*;
