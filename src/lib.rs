#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod probe;
pub mod process;
pub mod tui;
pub mod update;
pub mod version;

#[cfg(test)]
mod testing;
