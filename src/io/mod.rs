pub mod csv;
pub mod parquet;

// Re-export commonly used functions
pub use self::csv::{read_csv, CsvHeader, Header, Names, ReadCsvArgs, ToCsvArgs, UseCols};
pub use self::parquet::read_parquet;
