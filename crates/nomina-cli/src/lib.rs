//! nomina CLI library
//!
//! Command line front end over the pipeline and query crates: argument parsing,
//! configuration, terminal/JSON/CSV rendering and the `.xlsx` writer.

pub mod cli;
pub mod commands;
pub mod config;
pub mod formatting;
pub mod xlsx;
