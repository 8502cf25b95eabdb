//! CLI command implementations.
//!
//! This module contains the implementation of each CLI command.

pub mod hex_utils;
pub mod hooks;
pub mod patch;
pub mod translate;
pub mod verify;
