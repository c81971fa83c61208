use anyhow::{Context, Result};
use chrono::{TimeDelta, Utc};
use clap::Parser;
use std::{env, str::FromStr};

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub session_ttl_hours: i64,
    session_ttl: TimeDelta,
}

/// One-shot administrative modes selected on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Serve,
    Migrate,
    IssueSession(String),
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "Species record registry")]
pub struct Args {
    /// Host to bind to (overrides SPECIES_REGISTRY_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides SPECIES_REGISTRY_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Database URL (overrides SPECIES_REGISTRY_DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Lifetime of issued sessions in hours (overrides SPECIES_REGISTRY_SESSION_TTL_HOURS)
    #[arg(long)]
    pub session_ttl_hours: Option<i64>,

    /// Run migrations and exit
    #[arg(long, conflicts_with = "issue_session")]
    pub migrate: bool,

    /// Issue a session for USER_ID, print the sign-in link and exit
    #[arg(long, value_name = "USER_ID")]
    pub issue_session: Option<String>,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig and run mode.
    pub fn from_env_and_args() -> Result<(Self, Mode)> {
        Self::from_args(Args::parse())
    }

    pub fn from_args(args: Args) -> Result<(Self, Mode)> {
        // --- Environment fallback ---
        let env_host = env::var("SPECIES_REGISTRY_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let env_port = env_or("SPECIES_REGISTRY_PORT", 3000u16)?;
        let env_db = env::var("SPECIES_REGISTRY_DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://./data/species.db".into());
        let env_ttl = env_or("SPECIES_REGISTRY_SESSION_TTL_HOURS", 168i64)?;

        // --- Merge ---
        let session_ttl_hours = args.session_ttl_hours.unwrap_or(env_ttl);
        let session_ttl = checked_session_ttl(session_ttl_hours)?;
        let cfg = Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            database_url: args.database_url.unwrap_or(env_db),
            session_ttl_hours,
            session_ttl,
        };

        let mode = match (args.migrate, args.issue_session) {
            (true, _) => Mode::Migrate,
            (false, Some(user_id)) => Mode::IssueSession(user_id),
            (false, None) => Mode::Serve,
        };

        Ok((cfg, mode))
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn session_ttl(&self) -> TimeDelta {
        self.session_ttl
    }
}

/// A positive TTL whose expiry, counted from now, is still a representable
/// timestamp.
fn checked_session_ttl(hours: i64) -> Result<TimeDelta> {
    if hours <= 0 {
        anyhow::bail!(
            "session TTL must be a positive number of hours, got {}",
            hours
        );
    }
    TimeDelta::try_hours(hours)
        .filter(|ttl| Utc::now().checked_add_signed(*ttl).is_some())
        .with_context(|| format!("session TTL of {} hours is out of range", hours))
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(value) => value
            .parse::<T>()
            .with_context(|| format!("parsing {} value `{}`", key, value)),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(err) => Err(err).with_context(|| format!("reading {}", key)),
    }
}
