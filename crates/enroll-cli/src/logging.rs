// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::config::Config;
use anyhow::{Context, Result, anyhow};
use std::env;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const LOG_FILTER_ENV: &str = "ENROLL_LOG";

/// Installs the global subscriber, appending to the configured log file.
/// The terminal belongs to the TUI, so nothing is written to stderr.
pub fn init(config: &Config) -> Result<PathBuf> {
    let path = config.log_file()?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open log file {}", path.display()))?;

    let filter = resolve_filter(env::var(LOG_FILTER_ENV).ok(), config.log_level())?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|error| anyhow!("install log subscriber: {error}"))?;

    Ok(path)
}

fn resolve_filter(env_directive: Option<String>, configured: &str) -> Result<EnvFilter> {
    match env_directive {
        Some(directive) if !directive.trim().is_empty() => EnvFilter::try_new(&directive)
            .with_context(|| format!("invalid {LOG_FILTER_ENV} filter {directive:?}")),
        _ => EnvFilter::try_new(configured)
            .with_context(|| format!("invalid [log].level filter {configured:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::resolve_filter;
    use anyhow::Result;

    #[test]
    fn env_directive_wins_over_config() -> Result<()> {
        let filter = resolve_filter(Some("enroll_feed=trace".to_owned()), "warn")?;
        assert_eq!(filter.to_string(), "enroll_feed=trace");
        Ok(())
    }

    #[test]
    fn blank_env_directive_falls_back_to_config() -> Result<()> {
        let filter = resolve_filter(Some("  ".to_owned()), "warn")?;
        assert_eq!(filter.to_string(), "warn");

        let filter = resolve_filter(None, "debug")?;
        assert_eq!(filter.to_string(), "debug");
        Ok(())
    }

    #[test]
    fn invalid_env_directive_names_the_variable() {
        let error = resolve_filter(Some("enroll=loud".to_owned()), "info")
            .expect_err("bad directive should fail");
        assert!(error.to_string().contains("ENROLL_LOG"));
    }
}
