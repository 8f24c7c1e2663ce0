//! Optional bus listeners.
//!
//! - [`LogWriter`]: forwards routing events to `tracing` (feature `logging`).

mod log;

pub use log::LogWriter;
