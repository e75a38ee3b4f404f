pub mod classify;
pub mod spice;

// Re-export for convenience
pub use classify::{classify, LineKind};
pub use spice::{LoadReport, SpiceParser};
