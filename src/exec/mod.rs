// src/exec/mod.rs

//! Reacting to changes from the command line.
//!
//! The library core only knows about [`Callback`](crate::watch::Callback)s;
//! this module provides the two callbacks the `pollwatch` binary uses:
//! running a shell command per changed file, or printing the changed path.

pub mod command;

pub use command::{command_callback, print_callback, run_change_command, PATH_ENV_VAR};
