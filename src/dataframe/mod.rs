// DataFrame implementations module
pub mod base;
pub mod local;

// Re-exports for convenience
pub use base::DataFrame;
pub use local::LocalFrame;
