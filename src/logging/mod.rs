//! Structured logging.
//!
//! `tracing` events filtered per module through an `EnvFilter`; `RUST_LOG`
//! overrides the configured filter. Initialisation is idempotent, the first
//! call wins.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Once;
use tracing_subscriber::EnvFilter;

/// Installs the subscriber from a [`TracingConfig`] when added to an app
#[derive(Default)]
pub struct LoggingPlugin {
    pub config: TracingConfig,
}

impl Plugin for LoggingPlugin {
    fn build(&self, _app: &mut App) {
        init_tracing(&self.config);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TracingConfig {
    pub default_level: LogLevel,
    pub module_filters: Vec<(String, LogLevel)>,
    pub show_targets: bool,
    pub show_thread_ids: bool,
    pub show_file_line: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_level: LogLevel::Info,
            module_filters: vec![
                ("raid_core::generation".to_string(), LogLevel::Info),
                ("raid_core::sim".to_string(), LogLevel::Info),
                ("raid_core::engine".to_string(), LogLevel::Info),
                // bevy's render stack is chatty at info
                ("wgpu".to_string(), LogLevel::Warn),
                ("naga".to_string(), LogLevel::Warn),
            ],
            show_targets: true,
            show_thread_ids: false,
            show_file_line: false,
        }
    }
}

impl TracingConfig {
    pub fn to_env_filter_string(&self) -> String {
        let mut parts = vec![self.default_level.as_str().to_string()];
        for (module, level) in &self.module_filters {
            parts.push(format!("{}={}", module, level.as_str()));
        }
        parts.join(",")
    }

    pub fn with_filter(mut self, module: &str, level: LogLevel) -> Self {
        self.module_filters.retain(|(m, _)| m != module);
        self.module_filters.push((module.to_string(), level));
        self
    }
}

static TRACING_INIT: Once = Once::new();

pub fn init_tracing_default() {
    init_tracing(&TracingConfig::default());
}

/// Initialize tracing (first call wins)
pub fn init_tracing(config: &TracingConfig) {
    let filter_str = config.to_env_filter_string();
    let (targets, thread_ids, file_line) = (
        config.show_targets,
        config.show_thread_ids,
        config.show_file_line,
    );
    TRACING_INIT.call_once(move || {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(targets)
            .with_thread_ids(thread_ids)
            .with_file(file_line)
            .with_line_number(file_line)
            .compact();

        // Another global subscriber may already be installed
        let _ = subscriber.try_init();
    });
}
