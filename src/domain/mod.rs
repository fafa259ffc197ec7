//! Domain Layer - Core scoring and windowing logic
//!
//! Pure types and logic with no I/O. Feeds and timers live in the
//! adapters and application layers.
//!
//! - `token`: Candidate / ScoredToken and their classifications
//! - `score`: ScoreEngine with an injectable noise source
//! - `window`: Deduplicated, capped, newest-first signal window
//! - `stats`: Running session statistics

pub mod token;
pub mod score;
pub mod window;
pub mod stats;

pub use token::{Action, Candidate, RiskTier, ScoredToken};
pub use score::{FixedNoise, NoiseSource, ScoreEngine, SeededNoise};
pub use window::SignalWindow;
pub use stats::SessionStats;
