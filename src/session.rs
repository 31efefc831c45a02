//! # Session
//!
//! A [`Session`] is the explicit context every frame is bound to. It owns the
//! execution engine, the option registry, the attached usage logger and the
//! flag that enables the [`ToDataFrame`](crate::ext::ToDataFrame) extension.
//!
//! Sessions are cheap to clone; clones share the same state.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::config::{OptionContext, OptionValue, Options};
use crate::core::Table;
use crate::dataframe::{DataFrame, LocalFrame};
use crate::engine::{EngineRef, LocalEngine};
use crate::error::Result;
use crate::plan::{ExecutionPlan, Source};
use crate::usage_logging::UsageLogger;

struct SessionState {
    engine: EngineRef,
    options: Options,
    usage_logger: Option<Arc<dyn UsageLogger>>,
    conversion_enabled: bool,
}

/// Shared handle to an engine, its options and its usage logger
#[derive(Clone)]
pub struct Session {
    state: Arc<SessionState>,
}

impl Session {
    /// Session on `engine` with default options, no usage logger and the
    /// conversion extension disabled.
    ///
    /// Use [`crate::bootstrap::init`] to start a session from a
    /// [`StartupConfig`](crate::bootstrap::StartupConfig).
    pub fn new(engine: EngineRef) -> Self {
        Self::from_parts(engine, Options::new(), None, false)
    }

    /// Session on a [`LocalEngine`]
    pub fn local() -> Self {
        Self::new(Arc::new(LocalEngine::new()))
    }

    pub(crate) fn from_parts(
        engine: EngineRef,
        options: Options,
        usage_logger: Option<Arc<dyn UsageLogger>>,
        conversion_enabled: bool,
    ) -> Self {
        Session {
            state: Arc::new(SessionState {
                engine,
                options,
                usage_logger,
                conversion_enabled,
            }),
        }
    }

    pub fn engine(&self) -> &EngineRef {
        &self.state.engine
    }

    pub fn options(&self) -> &Options {
        &self.state.options
    }

    pub fn usage_logger(&self) -> Option<&Arc<dyn UsageLogger>> {
        self.state.usage_logger.as_ref()
    }

    /// Whether `to_dataframe` conversions are enabled for this session
    pub fn conversion_enabled(&self) -> bool {
        self.state.conversion_enabled
    }

    pub fn get_option(&self, key: &str) -> Result<OptionValue> {
        self.options().get(key)
    }

    pub fn set_option(&self, key: &str, value: impl Into<OptionValue>) -> Result<()> {
        self.options().set(key, value)
    }

    pub fn reset_option(&self, key: &str) -> Result<()> {
        self.options().reset(key)
    }

    /// Overrides options until the returned guard is dropped
    pub fn option_context(&self, pairs: &[(&str, OptionValue)]) -> Result<OptionContext<'_>> {
        self.options().option_context(pairs)
    }

    /// Runs `f`, reporting its outcome and duration to the usage logger
    pub fn track<T, F>(&self, class_name: &str, name: &str, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let logger = match self.usage_logger() {
            Some(logger) => logger,
            None => return f(),
        };
        let start = Instant::now();
        let result = f();
        match &result {
            Ok(_) => logger.log_success(class_name, name, start.elapsed()),
            Err(err) => logger.log_failure(class_name, name, err, start.elapsed()),
        }
        result
    }

    /// Reports a call to functionality missing from this build
    pub fn log_missing(&self, class_name: &str, name: &str) {
        if let Some(logger) = self.usage_logger() {
            logger.log_missing(class_name, name);
        }
    }

    /// Lazy frame over an engine table
    pub fn from_table(&self, table: Table) -> DataFrame {
        DataFrame::new(self.clone(), ExecutionPlan::new(Source::Memory(Arc::new(table))))
    }

    /// Lazy frame over a local frame. The local index is not carried over;
    /// the result gets a default index.
    pub fn from_local(&self, frame: &LocalFrame) -> DataFrame {
        self.from_table(frame.to_table())
    }

    /// Frame with no columns and no rows
    pub fn empty_frame(&self) -> DataFrame {
        DataFrame::new(self.clone(), ExecutionPlan::empty())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::local()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("engine", &self.state.engine.name())
            .field("usage_logger", &self.state.usage_logger)
            .field("conversion_enabled", &self.state.conversion_enabled)
            .finish()
    }
}
