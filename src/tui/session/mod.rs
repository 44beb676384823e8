//! App construction, background tasks and event draining.

mod setup;
mod tasks;
mod update;

pub use setup::init_tracing;
