//! tabula - a small terminal text editor
//!
//! The library holds everything but the process entry point so the editing
//! core can be driven from tests without a terminal.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod run;
pub mod terminal;
pub mod user_config;
