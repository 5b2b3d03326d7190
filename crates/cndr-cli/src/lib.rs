//! Library side of the `cndr` command-line tool.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
