//! failuresensectl library - exposes modules for integration tests

pub mod assessor;
pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;
pub mod interactive;
pub mod logging;
pub mod output;
pub mod service;
pub mod spinner;
