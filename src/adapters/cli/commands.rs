//! CLI Command Handlers
//!
//! Implementation of all CLI commands for the meme sniper.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use crate::application::{ScanSession, SessionSnapshot, SessionState};
use crate::config::{load_config, parse_config, Config, FeedKind};

/// Meme Sniper - scores new pump.fun listings and keeps a live ranked window
#[derive(Parser, Debug)]
#[command(
    name = "meme-sniper",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = "Memecoin launch scanner for pump.fun",
    long_about = "Polls the pump.fun coins feed for a fixed session, scores every new listing \
                  on market cap, community activity and age, and keeps the best of them in a \
                  deduplicated, newest-first signal window."
)]
pub struct CliApp {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one time-boxed scan session
    Hunt(HuntCmd),

    /// Validate configuration and print the effective settings
    Check(CheckCmd),
}

/// Output format for the final window
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Run a scan session
#[derive(Parser, Debug)]
pub struct HuntCmd {
    /// Path to configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Use the synthetic feed instead of pump.fun
    #[arg(long)]
    pub synthetic: bool,

    /// Override poll interval in seconds
    #[arg(long, value_name = "SECS")]
    pub interval: Option<u64>,

    /// Override session lifetime in seconds
    #[arg(long, value_name = "SECS")]
    pub lifetime: Option<u64>,

    /// Override window size
    #[arg(long, value_name = "N")]
    pub cap: Option<usize>,

    /// Output format for the final window
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Validate configuration
#[derive(Parser, Debug)]
pub struct CheckCmd {
    /// Path to configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Execute the CLI command
pub async fn execute(app: CliApp) -> Result<()> {
    match app.command {
        Command::Hunt(cmd) => {
            let mut config = resolve_config(cmd.config.as_deref())?;
            apply_overrides(&mut config, &cmd)?;
            init_logging(app.verbose, app.debug, &config.logging.level);
            hunt_command(config, cmd.format).await
        }
        Command::Check(cmd) => {
            let config = resolve_config(cmd.config.as_deref())?;
            init_logging(app.verbose, app.debug, &config.logging.level);
            check_command(&config)
        }
    }
}

/// Initialize logging system
fn init_logging(verbose: bool, debug: bool, configured: &str) {
    use tracing_subscriber::{fmt, EnvFilter};

    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        configured
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Load the config file, or defaults when no path is given
fn resolve_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => parse_config("").context("Invalid default configuration"),
    }
}

/// Apply command-line overrides and re-validate
fn apply_overrides(config: &mut Config, cmd: &HuntCmd) -> Result<()> {
    if cmd.synthetic {
        config.feed.kind = FeedKind::Synthetic;
    }
    if let Some(interval) = cmd.interval {
        config.session.poll_interval_secs = interval;
    }
    if let Some(lifetime) = cmd.lifetime {
        config.session.lifetime_secs = lifetime;
    }
    if let Some(cap) = cmd.cap {
        config.session.window_cap = cap;
    }
    config.validate().context("Invalid command-line override")?;
    Ok(())
}

/// Handle hunt command
async fn hunt_command(config: Config, format: OutputFormat) -> Result<()> {
    let session = ScanSession::from_config(&config).context("Failed to create scan session")?;

    tracing::info!(
        feed = ?config.feed.kind,
        lifetime_secs = config.session.lifetime_secs,
        "Hunting... Press Ctrl+C to stop early"
    );

    session.start().await;

    tokio::select! {
        _ = session.wait_idle() => {}
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl+C")?;
            tracing::info!("Shutdown signal received (Ctrl+C)");
            session.cancel().await;
        }
    }

    let snapshot = session.snapshot().await;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&snapshot)?),
        OutputFormat::Text => print!("{}", render_text(&snapshot)),
    }

    Ok(())
}

/// Handle check command
fn check_command(config: &Config) -> Result<()> {
    let rendered = toml::to_string_pretty(config).context("Failed to render configuration")?;
    println!("Configuration OK\n");
    print!("{}", rendered);
    Ok(())
}

/// Plain-text view of a session snapshot
pub fn render_text(snapshot: &SessionSnapshot) -> String {
    SnapshotTable(snapshot).to_string()
}

/// Stats header plus the ranked window
struct SnapshotTable<'a>(&'a SessionSnapshot);

impl fmt::Display for SnapshotTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.0;
        let state = match snapshot.state {
            SessionState::Idle => "idle",
            SessionState::Scanning => "scanning",
        };

        writeln!(f, "======================================")?;
        writeln!(f, "    Meme Sniper - Live Signals ({})", state)?;
        writeln!(f, "======================================")?;
        writeln!(f, "  Tokens Scanned: {}", snapshot.stats.scanned_count)?;
        writeln!(f, "  Highest Score:  {:.1}", snapshot.stats.highest_score as f64)?;
        writeln!(f, "  Cycles:         {}", snapshot.stats.cycles)?;
        writeln!(f)?;

        if snapshot.window.is_empty() {
            return writeln!(f, "  No tokens cleared the score floor.");
        }

        writeln!(
            f,
            "  {:>3}  {:<8} {:<24} {:>5}  {:<6} {:<7} {:>12}",
            "#", "SYMBOL", "NAME", "SCORE", "ACTION", "RISK", "MCAP (USD)"
        )?;
        for (rank, token) in snapshot.window.iter().enumerate() {
            let name: String = token.name.chars().take(24).collect();
            writeln!(
                f,
                "  {:>3}  {:<8} {:<24} {:>5.1}  {:<6} {:<7} {:>12.0}",
                rank + 1,
                token.symbol,
                name,
                token.score as f64,
                token.action.to_string(),
                token.risk_tier.to_string(),
                token.market_cap_usd
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Action, RiskTier, ScoredToken, SessionStats};

    #[test]
    fn test_cli_app_parse_hunt_defaults() {
        let args = vec!["meme-sniper", "hunt"];
        let app = CliApp::try_parse_from(args).unwrap();

        match app.command {
            Command::Hunt(cmd) => {
                assert!(cmd.config.is_none());
                assert!(!cmd.synthetic);
                assert!(cmd.interval.is_none());
                assert_eq!(cmd.format, OutputFormat::Text);
            }
            _ => panic!("Expected Hunt command"),
        }
    }

    #[test]
    fn test_cli_app_parse_hunt_with_overrides() {
        let args = vec![
            "meme-sniper", "hunt",
            "--config", "config/sniper.toml",
            "--synthetic",
            "--interval", "5",
            "--lifetime", "120",
            "--cap", "10",
            "--format", "json",
        ];
        let app = CliApp::try_parse_from(args).unwrap();

        match app.command {
            Command::Hunt(cmd) => {
                assert_eq!(cmd.config, Some(PathBuf::from("config/sniper.toml")));
                assert!(cmd.synthetic);
                assert_eq!(cmd.interval, Some(5));
                assert_eq!(cmd.lifetime, Some(120));
                assert_eq!(cmd.cap, Some(10));
                assert_eq!(cmd.format, OutputFormat::Json);
            }
            _ => panic!("Expected Hunt command"),
        }
    }

    #[test]
    fn test_cli_app_parse_check() {
        let args = vec!["meme-sniper", "check", "-c", "sniper.toml"];
        let app = CliApp::try_parse_from(args).unwrap();

        match app.command {
            Command::Check(cmd) => assert_eq!(cmd.config, Some(PathBuf::from("sniper.toml"))),
            _ => panic!("Expected Check command"),
        }
    }

    #[test]
    fn test_global_flags() {
        let args = vec!["meme-sniper", "-v", "--debug", "check"];
        let app = CliApp::try_parse_from(args).unwrap();

        assert!(app.verbose);
        assert!(app.debug);
    }

    #[test]
    fn test_bad_format_rejected() {
        let args = vec!["meme-sniper", "hunt", "--format", "xml"];
        assert!(CliApp::try_parse_from(args).is_err());
    }

    #[test]
    fn test_apply_overrides() {
        let app = CliApp::try_parse_from(vec![
            "meme-sniper", "hunt", "--synthetic", "--interval", "5", "--cap", "10",
        ])
        .unwrap();
        let Command::Hunt(cmd) = app.command else {
            panic!("Expected Hunt command");
        };

        let mut config = Config::default();
        apply_overrides(&mut config, &cmd).unwrap();

        assert_eq!(config.feed.kind, FeedKind::Synthetic);
        assert_eq!(config.session.poll_interval_secs, 5);
        assert_eq!(config.session.window_cap, 10);
        assert_eq!(config.session.lifetime_secs, 60);
    }

    #[test]
    fn test_zero_override_rejected() {
        let app = CliApp::try_parse_from(vec!["meme-sniper", "hunt", "--lifetime", "0"]).unwrap();
        let Command::Hunt(cmd) = app.command else {
            panic!("Expected Hunt command");
        };

        let mut config = Config::default();
        assert!(apply_overrides(&mut config, &cmd).is_err());
    }

    #[test]
    fn test_oversized_overrides_rejected() {
        for flag in ["--interval", "--lifetime"] {
            let app = CliApp::try_parse_from(vec!["meme-sniper", "hunt", flag, "9223372036854775807"])
                .unwrap();
            let Command::Hunt(cmd) = app.command else {
                panic!("Expected Hunt command");
            };

            let mut config = Config::default();
            assert!(apply_overrides(&mut config, &cmd).is_err(), "{} accepted", flag);
        }

        let app = CliApp::try_parse_from(vec!["meme-sniper", "hunt", "--cap", "9223372036854775807"])
            .unwrap();
        let Command::Hunt(cmd) = app.command else {
            panic!("Expected Hunt command");
        };
        let mut config = Config::default();
        assert!(apply_overrides(&mut config, &cmd).is_err());
    }

    #[test]
    fn test_render_text() {
        let snapshot = SessionSnapshot {
            state: SessionState::Idle,
            window: vec![ScoredToken {
                mint: "mint1".to_string(),
                name: "Turbo Pepe".to_string(),
                symbol: "TPEPE".to_string(),
                score: 91,
                action: Action::Buy,
                risk_tier: RiskTier::Low,
                market_cap_usd: 64_000.0,
                reply_count: 120.0,
            }],
            stats: SessionStats {
                scanned_count: 40,
                highest_score: 91,
                cycles: 2,
            },
        };

        let text = render_text(&snapshot);
        assert!(text.contains("Tokens Scanned: 40"));
        assert!(text.contains("Highest Score:  91.0"));
        assert!(text.contains("TPEPE"));
        assert!(text.contains("BUY"));
        assert!(text.contains("Low"));
    }

    #[test]
    fn test_render_text_empty_window() {
        let snapshot = SessionSnapshot {
            state: SessionState::Scanning,
            window: Vec::new(),
            stats: SessionStats::default(),
        };

        let text = render_text(&snapshot);
        assert!(text.contains("scanning"));
        assert!(text.contains("No tokens cleared the score floor"));
    }
}
