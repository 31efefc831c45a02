//! # distframe
//!
//! A pandas-style DataFrame API whose frames are query plans executed by a
//! pluggable engine. Reading and writing CSV translates pandas arguments
//! (`header`, `names`, `usecols`, `comment`, `na_rep`, ...) into the engine's
//! native options, validating them before anything runs.
//!
//! ```no_run
//! use distframe::bootstrap::{init, StartupConfig};
//! use distframe::io::csv::{read_csv, ReadCsvArgs, ToCsvArgs};
//!
//! # fn main() -> distframe::Result<()> {
//! let session = init(&StartupConfig::from_env())?;
//! let df = read_csv(&session, "data.csv", &ReadCsvArgs::new().names(&["n", "a"]))?;
//! println!("{}", df.render()?);
//! df.to_csv(Some("out"), &ToCsvArgs::new().num_files(1))?;
//! # Ok(())
//! # }
//! ```

#![allow(clippy::needless_return)]
#![allow(clippy::too_many_arguments)]

pub mod bootstrap;
pub mod config;
pub mod core;
pub mod dataframe;
pub mod datetime;
pub mod engine;
pub mod error;
pub mod ext;
pub mod index;
pub mod io;
pub mod namespace;
pub mod plan;
pub mod series;
pub mod session;
pub mod usage_logging;

// Re-export commonly used types
pub use bootstrap::{init, init_with, StartupConfig};
pub use config::{OptionValue, Options};
pub use crate::core::{Column, DataType, DataValue, Schema, Table};
pub use dataframe::{DataFrame, LocalFrame};
pub use engine::{ExecutionEngine, LocalEngine, SaveMode};
pub use error::{Error, Result};
pub use ext::ToDataFrame;
pub use index::Index;
pub use io::csv::{ReadCsvArgs, ToCsvArgs};
pub use series::Series;
pub use session::Session;

// Export version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
