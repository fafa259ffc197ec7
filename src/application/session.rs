//! Scan Session
//!
//! Time-boxed polling loop over a [`TokenSource`]. A session owns its signal
//! window and statistics; `start()` runs one cycle inline, then hands the
//! cadence and lifetime timers to a single driver task so cycles are
//! strictly serialized.
//!
//! ```text
//!   Idle --start()--> Scanning --lifetime elapsed / cancel()--> Idle
//! ```
//!
//! Each cycle: fetch -> score every candidate -> keep scores >= floor ->
//! merge newest-first into the window (dedup by mint, capped) -> fold the
//! whole batch into the stats.

use std::future::Future;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{watch, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep_until, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::adapters::build_source;
use crate::adapters::pump_fun::FeedError;
use crate::config::{Config, ConfigError, MAX_LIFETIME_SECS, MAX_POLL_INTERVAL_SECS};
use crate::domain::score::{FixedNoise, NoiseSource, ScoreEngine, SeededNoise};
use crate::domain::window::MAX_WINDOW_CAP;
use crate::domain::{ScoredToken, SessionStats, SignalWindow};
use crate::ports::TokenSource;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Feed setup failed: {0}")]
    Feed(#[from] FeedError),
}

/// Lifecycle state exposed to readers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Idle,
    Scanning,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Lifetime elapsed
    Expired,
    /// Stopped through `cancel()`
    Cancelled,
}

/// Session timing and filtering
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Time between cycles
    pub poll_interval: Duration,
    /// Total run time, measured from when the timers are armed
    pub lifetime: Duration,
    /// Maximum tokens kept in the window
    pub window_cap: usize,
    /// Minimum score to enter the window
    pub score_floor: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(30),
            lifetime: Duration::from_secs(60),
            window_cap: 50,
            score_floor: 70,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.poll_interval.is_zero() || self.poll_interval > Duration::from_secs(MAX_POLL_INTERVAL_SECS) {
            return Err(ConfigError::ValidationError(format!(
                "poll_interval must be > 0 and <= {}s",
                MAX_POLL_INTERVAL_SECS
            ))
            .into());
        }
        if self.lifetime.is_zero() || self.lifetime > Duration::from_secs(MAX_LIFETIME_SECS) {
            return Err(ConfigError::ValidationError(format!(
                "lifetime must be > 0 and <= {}s",
                MAX_LIFETIME_SECS
            ))
            .into());
        }
        if !(1..=MAX_WINDOW_CAP).contains(&self.window_cap) {
            return Err(ConfigError::ValidationError(format!(
                "window_cap must be 1-{}",
                MAX_WINDOW_CAP
            ))
            .into());
        }
        Ok(())
    }
}

impl From<&Config> for SessionConfig {
    fn from(config: &Config) -> Self {
        Self {
            poll_interval: Duration::from_secs(config.session.poll_interval_secs),
            lifetime: Duration::from_secs(config.session.lifetime_secs),
            window_cap: config.session.window_cap,
            score_floor: config.scoring.score_floor,
        }
    }
}

/// Read model for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub window: Vec<ScoredToken>,
    pub stats: SessionStats,
}

/// Outcome of one fetch/score/merge cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    /// Candidates returned by the source
    pub fetched: usize,
    /// Candidates that cleared the score floor
    pub qualified: usize,
    /// Window size after the merge
    pub window_len: usize,
    /// Session best after the merge
    pub highest_score: u32,
}

#[derive(Debug, Clone, Copy)]
struct Phase {
    run_id: u64,
    state: SessionState,
}

#[derive(Debug)]
struct SessionData {
    window: SignalWindow,
    stats: SessionStats,
}

struct SessionInner {
    config: SessionConfig,
    source: Arc<dyn TokenSource>,
    engine: Mutex<ScoreEngine>,
    data: RwLock<SessionData>,
    phase: watch::Sender<Phase>,
}

/// Stop signal and driver task for the current run
struct RunHandle {
    run_id: u64,
    stop: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

/// Owned handle to a scan session. Dropping it stops any active run.
pub struct ScanSession {
    inner: Arc<SessionInner>,
    run: StdMutex<Option<RunHandle>>,
}

impl ScanSession {
    /// Create an idle session
    pub fn new(
        config: SessionConfig,
        source: Arc<dyn TokenSource>,
        engine: ScoreEngine,
    ) -> Result<Self, SessionError> {
        config.validate()?;

        let (phase, _) = watch::channel(Phase {
            run_id: 0,
            state: SessionState::Idle,
        });

        Ok(Self {
            inner: Arc::new(SessionInner {
                data: RwLock::new(SessionData {
                    window: SignalWindow::new(config.window_cap),
                    stats: SessionStats::new(),
                }),
                config,
                source,
                engine: Mutex::new(engine),
                phase,
            }),
            run: StdMutex::new(None),
        })
    }

    /// Build the configured feed, score engine and session
    pub fn from_config(config: &Config) -> Result<Self, SessionError> {
        config.validate()?;

        let source = build_source(&config.feed)?;
        let noise: Box<dyn NoiseSource> = if config.scoring.noise {
            Box::new(SeededNoise::new(config.scoring.noise_seed))
        } else {
            Box::new(FixedNoise::zero())
        };
        let engine = ScoreEngine::new(config.scoring.buy_threshold, noise);

        Self::new(SessionConfig::from(config), source, engine)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    pub fn state(&self) -> SessionState {
        self.inner.phase.borrow().state
    }

    pub fn is_scanning(&self) -> bool {
        self.state() == SessionState::Scanning
    }

    /// Current window, newest first
    pub async fn window(&self) -> Vec<ScoredToken> {
        self.inner.data.read().await.window.to_vec()
    }

    pub async fn stats(&self) -> SessionStats {
        self.inner.data.read().await.stats
    }

    /// State, window and stats read together
    pub async fn snapshot(&self) -> SessionSnapshot {
        let data = self.inner.data.read().await;
        SessionSnapshot {
            state: self.state(),
            window: data.window.to_vec(),
            stats: data.stats,
        }
    }

    /// Begin a run.
    ///
    /// Clears the previous window and stats, runs one cycle before
    /// returning, then arms the cadence and lifetime timers. Returns `false`
    /// without doing anything if a run is already active.
    pub async fn start(&self) -> bool {
        let mut run_id = 0;
        let began = self.inner.phase.send_if_modified(|phase| {
            if phase.state != SessionState::Idle {
                return false;
            }
            phase.run_id += 1;
            phase.state = SessionState::Scanning;
            run_id = phase.run_id;
            true
        });

        if !began {
            debug!("Scan session already running, start ignored");
            return false;
        }

        self.inner.reset().await;

        let (stop_tx, mut stop_rx) = watch::channel(false);
        *self.lock_run() = Some(RunHandle {
            run_id,
            stop: stop_tx,
            task: None,
        });

        info!(
            source = self.inner.source.label(),
            poll_interval_secs = self.inner.config.poll_interval.as_secs(),
            lifetime_secs = self.inner.config.lifetime.as_secs(),
            window_cap = self.inner.config.window_cap,
            "Scan session started"
        );

        if let Err(termination) = self.inner.cycle(&mut stop_rx, None).await {
            self.inner.finish(run_id, termination).await;
            return true;
        }

        let Some(deadline) = Instant::now().checked_add(self.inner.config.lifetime) else {
            warn!("Session lifetime out of range, ending run");
            self.inner.finish(run_id, Termination::Expired).await;
            return true;
        };
        let task = tokio::spawn(Arc::clone(&self.inner).drive(run_id, stop_rx, deadline));

        let mut run = self.lock_run();
        match run.as_mut() {
            Some(handle) if handle.run_id == run_id => handle.task = Some(task),
            // Cancelled while arming: the driver sees the closed stop channel and exits
            _ => {}
        }

        true
    }

    /// Stop the active run before its lifetime elapses.
    ///
    /// Idempotent. Returns `true` if a run was active. Once this returns the
    /// driver task has exited and no further merges happen.
    pub async fn cancel(&self) -> bool {
        let Some(handle) = self.lock_run().take() else {
            return false;
        };

        let was_active = {
            let phase = self.inner.phase.borrow();
            phase.run_id == handle.run_id && phase.state == SessionState::Scanning
        };

        let _ = handle.stop.send(true);
        if let Some(task) = handle.task {
            if let Err(e) = task.await {
                warn!(error = %e, "Scan driver task ended abnormally");
            }
        }

        self.inner.finish(handle.run_id, Termination::Cancelled).await;
        was_active
    }

    /// Resolve once the session is idle
    pub async fn wait_idle(&self) {
        let mut phase = self.inner.phase.subscribe();
        let _ = phase.wait_for(|p| p.state == SessionState::Idle).await;
    }

    fn lock_run(&self) -> MutexGuard<'_, Option<RunHandle>> {
        self.run.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for ScanSession {
    fn drop(&mut self) {
        let run = self.run.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = run.take() {
            let _ = handle.stop.send(true);
            if let Some(task) = handle.task {
                task.abort();
            }
        }
    }
}

impl SessionInner {
    async fn reset(&self) {
        let mut data = self.data.write().await;
        data.window.clear();
        data.stats.reset();
    }

    /// Cadence loop. Runs until the lifetime elapses or a stop is signalled.
    async fn drive(self: Arc<Self>, run_id: u64, mut stop: watch::Receiver<bool>, deadline: Instant) {
        let Some(first_tick) = Instant::now().checked_add(self.config.poll_interval) else {
            warn!("Poll interval out of range, ending run");
            self.finish(run_id, Termination::Expired).await;
            return;
        };
        let mut ticker = interval_at(first_tick, self.config.poll_interval);
        // A tick missed during a slow fetch is dropped, never queued up
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let termination = loop {
            if let Err(termination) = until_stopped(&mut stop, Some(deadline), ticker.tick()).await {
                break termination;
            }
            if let Err(termination) = self.cycle(&mut stop, Some(deadline)).await {
                break termination;
            }
        };

        self.finish(run_id, termination).await;
    }

    /// One fetch, score and merge. A stop or expiry during the fetch
    /// abandons it before anything is merged.
    async fn cycle(
        &self,
        stop: &mut watch::Receiver<bool>,
        deadline: Option<Instant>,
    ) -> Result<CycleReport, Termination> {
        let candidates = until_stopped(stop, deadline, self.source.fetch()).await?;

        let now = Utc::now();
        let scored: Vec<ScoredToken> = {
            let mut engine = self.engine.lock().await;
            candidates.iter().map(|c| engine.score_at(c, now)).collect()
        };

        let report = self.merge(scored).await;
        info!(
            source = self.source.label(),
            fetched = report.fetched,
            qualified = report.qualified,
            window = report.window_len,
            highest_score = report.highest_score,
            "Scan cycle complete"
        );
        Ok(report)
    }

    async fn merge(&self, scored: Vec<ScoredToken>) -> CycleReport {
        let fetched = scored.len();
        let scores: Vec<u32> = scored.iter().map(|t| t.score).collect();
        let qualifying: Vec<ScoredToken> = scored
            .into_iter()
            .filter(|t| t.score >= self.config.score_floor)
            .collect();
        let qualified = qualifying.len();

        let mut data = self.data.write().await;
        data.window.merge(qualifying);
        data.stats.record(fetched, &scores);

        CycleReport {
            fetched,
            qualified,
            window_len: data.window.len(),
            highest_score: data.stats.highest_score,
        }
    }

    /// Move `run_id` back to Idle. Returns `false` if it already was, or if a
    /// newer run has started since.
    async fn finish(&self, run_id: u64, termination: Termination) -> bool {
        let ended = self.phase.send_if_modified(|phase| {
            if phase.run_id != run_id || phase.state != SessionState::Scanning {
                return false;
            }
            phase.state = SessionState::Idle;
            true
        });

        if ended {
            let data = self.data.read().await;
            info!(
                ?termination,
                scanned = data.stats.scanned_count,
                highest_score = data.stats.highest_score,
                cycles = data.stats.cycles,
                window = data.window.len(),
                "Scan session ended"
            );
        }
        ended
    }
}

/// Run `work` unless a stop is signalled or `deadline` passes first.
/// Stop wins over expiry, and both win over work that is ready at the same
/// instant.
async fn until_stopped<F: Future>(
    stop: &mut watch::Receiver<bool>,
    deadline: Option<Instant>,
    work: F,
) -> Result<F::Output, Termination> {
    let expiry = async move {
        match deadline {
            Some(at) => sleep_until(at).await,
            None => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        biased;
        _ = stop_requested(stop) => Err(Termination::Cancelled),
        _ = expiry => Err(Termination::Expired),
        output = work => Ok(output),
    }
}

/// Resolves when `true` is sent or the sender is gone
async fn stop_requested(stop: &mut watch::Receiver<bool>) {
    loop {
        if *stop.borrow_and_update() {
            return;
        }
        if stop.changed().await.is_err() {
            return;
        }
    }
}
