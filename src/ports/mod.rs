//! Ports Layer - Trait definitions for external dependencies
//!
//! Following hexagonal architecture, the session only sees the
//! `TokenSource` trait; the pump.fun HTTP feed and the synthetic generator
//! are adapters behind it.

pub mod token_source;

pub use token_source::TokenSource;

#[cfg(test)]
pub use token_source::MockTokenSource;
