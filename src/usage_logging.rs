//! # Usage logging
//!
//! A usage logger receives one event per public API call made through a
//! [`crate::Session`]: success with its duration, failure with the error, or a
//! call to functionality that is not available in this build.
//!
//! Loggers are looked up by name in a [`UsageLoggerRegistry`] when a session
//! starts. The built-in `"log"` logger forwards events to the `log` facade.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{Error, Result};

/// Receiver for API usage events
pub trait UsageLogger: Send + Sync + Debug {
    /// A call finished successfully
    fn log_success(&self, class_name: &str, name: &str, duration: Duration);

    /// A call failed with `error`
    fn log_failure(&self, class_name: &str, name: &str, error: &Error, duration: Duration);

    /// A call hit functionality that is not available
    fn log_missing(&self, class_name: &str, name: &str) {
        let _ = (class_name, name);
    }
}

/// Writes usage events through the `log` crate at `info`/`warn` level
#[derive(Debug, Default)]
pub struct LogUsageLogger;

impl UsageLogger for LogUsageLogger {
    fn log_success(&self, class_name: &str, name: &str, duration: Duration) {
        log::info!(
            target: "distframe::usage",
            "{}.{} succeeded in {:.3} ms",
            class_name,
            name,
            duration.as_secs_f64() * 1000.0
        );
    }

    fn log_failure(&self, class_name: &str, name: &str, error: &Error, duration: Duration) {
        log::warn!(
            target: "distframe::usage",
            "{}.{} failed after {:.3} ms: {}",
            class_name,
            name,
            duration.as_secs_f64() * 1000.0,
            error
        );
    }

    fn log_missing(&self, class_name: &str, name: &str) {
        log::warn!(target: "distframe::usage", "{}.{} is not available", class_name, name);
    }
}

type LoggerFactory = Arc<dyn Fn() -> Result<Arc<dyn UsageLogger>> + Send + Sync>;

/// Named usage-logger factories
#[derive(Clone)]
pub struct UsageLoggerRegistry {
    factories: BTreeMap<String, LoggerFactory>,
}

impl UsageLoggerRegistry {
    /// Registry with no loggers
    pub fn empty() -> Self {
        UsageLoggerRegistry {
            factories: BTreeMap::new(),
        }
    }

    /// Registers a factory under `name`, replacing any previous one
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Result<Arc<dyn UsageLogger>> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
    }

    /// Builder-style [`register`](Self::register)
    pub fn with<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn UsageLogger>> + Send + Sync + 'static,
    {
        self.register(name, factory);
        self
    }

    pub fn names(&self) -> Vec<String> {
        self.factories.keys().cloned().collect()
    }

    /// Instantiates the logger registered under `name`
    pub fn create(&self, name: &str) -> Result<Arc<dyn UsageLogger>> {
        let factory = self.factories.get(name).ok_or_else(|| {
            Error::Config(format!(
                "No usage logger named '{}' (available: {})",
                name,
                self.names().join(", ")
            ))
        })?;
        factory()
    }
}

impl Default for UsageLoggerRegistry {
    fn default() -> Self {
        UsageLoggerRegistry::empty().with("log", || Ok(Arc::new(LogUsageLogger) as Arc<dyn UsageLogger>))
    }
}

impl Debug for UsageLoggerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsageLoggerRegistry")
            .field("names", &self.names())
            .finish()
    }
}
