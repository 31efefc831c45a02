//! # Option registry
//!
//! Named settings with defaults and per-option validation. The registry is an
//! explicit context object: every [`crate::Session`] owns one [`Options`], and
//! nothing in the crate reads options from process-global state.
//!
//! ```rust
//! use distframe::config::Options;
//!
//! let options = Options::new();
//! options.set("display.max_rows", 50).unwrap();
//! assert_eq!(options.get("display.max_rows").unwrap().as_int(), Some(50));
//!
//! {
//!     let _ctx = options.option_context(&[("display.max_rows", 5.into())]).unwrap();
//!     assert_eq!(options.display_max_rows(), Some(5));
//! }
//! assert_eq!(options.display_max_rows(), Some(50));
//!
//! options.reset("display.max_rows").unwrap();
//! assert_eq!(options.display_max_rows(), Some(1000));
//! ```

mod value;

pub use value::OptionValue;

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::error::{Error, Result};
use crate::index::DefaultIndexType;

/// Validation rule attached to an option
#[derive(Debug, Clone, Copy)]
enum Check {
    NonNegativeIntOrNone,
    NonNegativeInt,
    Bool,
    OneOf(&'static [&'static str]),
}

impl Check {
    fn accepts(&self, value: &OptionValue) -> bool {
        match (self, value) {
            (Check::NonNegativeIntOrNone, OptionValue::None) => true,
            (Check::NonNegativeIntOrNone | Check::NonNegativeInt, OptionValue::Int(v)) => *v >= 0,
            (Check::Bool, OptionValue::Bool(_)) => true,
            (Check::OneOf(choices), OptionValue::Str(s)) => choices.contains(&s.as_str()),
            _ => false,
        }
    }

    fn expectation(&self) -> String {
        match self {
            Check::NonNegativeIntOrNone => "a non-negative integer or None".to_string(),
            Check::NonNegativeInt => "a non-negative integer".to_string(),
            Check::Bool => "a boolean".to_string(),
            Check::OneOf(choices) => format!("one of {}", choices.join(", ")),
        }
    }
}

/// Definition of a recognized option
#[derive(Debug, Clone)]
pub struct OptionSpec {
    pub key: &'static str,
    pub doc: &'static str,
    default: fn() -> OptionValue,
    check: Check,
}

impl OptionSpec {
    pub fn default_value(&self) -> OptionValue {
        (self.default)()
    }

    /// Checks `value` against this option's rule
    pub fn validate(&self, value: &OptionValue) -> Result<()> {
        if self.check.accepts(value) {
            Ok(())
        } else {
            Err(Error::InvalidOption(format!(
                "The value for option '{}' must be {}, got {} ({})",
                self.key,
                self.check.expectation(),
                value,
                value.type_name()
            )))
        }
    }
}

const INDEX_TYPES: &[&str] = &["sequence", "distributed-sequence", "distributed"];

/// The fixed set of recognized options
pub const OPTIONS: &[OptionSpec] = &[
    OptionSpec {
        key: "display.max_rows",
        doc: "Maximum number of rows shown when a DataFrame is rendered. None means unlimited.",
        default: || OptionValue::Int(1000),
        check: Check::NonNegativeIntOrNone,
    },
    OptionSpec {
        key: "compute.max_rows",
        doc: "Row limit under which a frame may be collected to a single machine as a shortcut. None means unlimited.",
        default: || OptionValue::Int(1000),
        check: Check::NonNegativeIntOrNone,
    },
    OptionSpec {
        key: "compute.shortcut_limit",
        doc: "Number of leading rows used to infer result types without running a full computation.",
        default: || OptionValue::Int(1000),
        check: Check::NonNegativeInt,
    },
    OptionSpec {
        key: "compute.ops_on_diff_frames",
        doc: "Whether operations combining two different frames are allowed.",
        default: || OptionValue::Bool(false),
        check: Check::Bool,
    },
    OptionSpec {
        key: "compute.default_index_type",
        doc: "Index attached to frames that have none: sequence, distributed-sequence or distributed.",
        default: || OptionValue::Str("sequence".to_string()),
        check: Check::OneOf(INDEX_TYPES),
    },
];

fn spec_for(key: &str) -> Result<&'static OptionSpec> {
    OPTIONS
        .iter()
        .find(|s| s.key == key)
        .ok_or_else(|| Error::InvalidOption(format!("No such option: '{}'.", key)))
}

/// Option registry context object
#[derive(Debug, Default)]
pub struct Options {
    /// Only explicitly set values; missing keys read as their default
    overrides: RwLock<BTreeMap<&'static str, OptionValue>>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of `key`
    pub fn get(&self, key: &str) -> Result<OptionValue> {
        let spec = spec_for(key)?;
        let overrides = self.overrides.read().unwrap_or_else(|e| e.into_inner());
        Ok(overrides
            .get(spec.key)
            .cloned()
            .unwrap_or_else(|| spec.default_value()))
    }

    /// Sets `key` after validating the value
    pub fn set(&self, key: &str, value: impl Into<OptionValue>) -> Result<()> {
        let spec = spec_for(key)?;
        let value = value.into();
        spec.validate(&value)?;
        log::debug!("Setting option {} = {}", spec.key, value);
        self.overrides
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(spec.key, value);
        Ok(())
    }

    /// Restores `key` to its default
    pub fn reset(&self, key: &str) -> Result<()> {
        let spec = spec_for(key)?;
        self.overrides
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(spec.key);
        Ok(())
    }

    /// Restores every option to its default
    pub fn reset_all(&self) {
        self.overrides
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }

    /// Applies overrides for the lifetime of the returned guard.
    ///
    /// All pairs are validated before any of them is applied.
    pub fn option_context(&self, pairs: &[(&str, OptionValue)]) -> Result<OptionContext<'_>> {
        let mut previous = Vec::with_capacity(pairs.len());
        for (key, value) in pairs {
            let spec = spec_for(key)?;
            spec.validate(value)?;
            previous.push((spec.key, self.current_override(spec.key)));
        }
        for (key, value) in pairs {
            self.set(key, value.clone())?;
        }
        Ok(OptionContext {
            options: self,
            previous,
        })
    }

    /// Applies a batch of key/value pairs, e.g. from a config file
    pub fn apply<'a, I>(&self, pairs: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a String, &'a OptionValue)>,
    {
        for (key, value) in pairs {
            self.set(key, value.clone())?;
        }
        Ok(())
    }

    /// Human-readable listing of all options with current values
    pub fn describe(&self) -> String {
        let mut out = String::new();
        for spec in OPTIONS {
            let current = self.get(spec.key).unwrap_or_else(|_| spec.default_value());
            out.push_str(&format!(
                "{} : {}\n    {}\n    [default: {}] [currently: {}]\n",
                spec.key,
                spec.check.expectation(),
                spec.doc,
                spec.default_value(),
                current
            ));
        }
        out
    }

    fn current_override(&self, key: &'static str) -> Option<OptionValue> {
        self.overrides
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    fn restore(&self, key: &'static str, value: Option<OptionValue>) {
        let mut overrides = self.overrides.write().unwrap_or_else(|e| e.into_inner());
        match value {
            Some(v) => overrides.insert(key, v),
            None => overrides.remove(key),
        };
    }

    // Typed accessors for options the crate itself consumes

    /// `display.max_rows`; `None` means unlimited
    pub fn display_max_rows(&self) -> Option<usize> {
        self.get("display.max_rows")
            .ok()
            .and_then(|v| v.as_int())
            .map(|v| v as usize)
    }

    /// `compute.max_rows`; `None` means unlimited
    pub fn compute_max_rows(&self) -> Option<usize> {
        self.get("compute.max_rows")
            .ok()
            .and_then(|v| v.as_int())
            .map(|v| v as usize)
    }

    pub fn shortcut_limit(&self) -> usize {
        self.get("compute.shortcut_limit")
            .ok()
            .and_then(|v| v.as_int())
            .unwrap_or(1000) as usize
    }

    pub fn ops_on_diff_frames(&self) -> bool {
        self.get("compute.ops_on_diff_frames")
            .ok()
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }

    pub fn default_index_type(&self) -> DefaultIndexType {
        self.get("compute.default_index_type")
            .ok()
            .and_then(|v| v.as_str().and_then(|s| s.parse().ok()))
            .unwrap_or_default()
    }
}

/// Guard returned by [`Options::option_context`]; restores previous values on drop
pub struct OptionContext<'a> {
    options: &'a Options,
    previous: Vec<(&'static str, Option<OptionValue>)>,
}

impl Drop for OptionContext<'_> {
    fn drop(&mut self) {
        for (key, value) in self.previous.drain(..).rev() {
            self.options.restore(key, value);
        }
    }
}
