//! Fennec CMS Installer Library
//!
//! This library provides the download and extraction logic behind the `fennec` CLI.

pub mod commands;
pub mod core;
pub mod error;
pub mod utils;
