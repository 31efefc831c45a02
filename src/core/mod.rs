// Core data structures shared by the API layer and the engines
pub mod column;
pub mod data_value;
pub mod schema;
pub mod table;

// Re-exports for convenience
pub use column::Column;
pub use data_value::{format_float, DataValue, DEFAULT_TIMESTAMP_FORMAT};
pub use schema::{DataType, Field, Schema};
pub use table::Table;
