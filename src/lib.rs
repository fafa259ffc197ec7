//! Meme Sniper - pump.fun launch scanner library
//!
//! Polls a feed of newly listed memecoins for a bounded session, scores each
//! listing and keeps the best of them in a live, deduplicated signal window.
//!
//! # Modules
//!
//! - `domain`: Core scoring logic (Candidate, ScoreEngine, SignalWindow, SessionStats)
//! - `ports`: Trait abstractions (TokenSource)
//! - `adapters`: External implementations (pump.fun feed, synthetic feed, CLI)
//! - `config`: Configuration loading and validation
//! - `application`: Scan session use case

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod config;
pub mod application;
