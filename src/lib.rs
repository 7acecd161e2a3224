//! The Nexus 3 CLI client library.
//!
//! This crate provides the core functionality of the `nexus3` command: the
//! REST client, resource collections, file transfers, configuration, and
//! command parsing and execution.
//!
//! # Modules
//!
//! - `actions`: Command handlers
//! - `api`: Repository, role, cleanup policy, script and asset collections
//! - `cli`: Abbreviation expansion and handler dispatch
//! - `client`: HTTP client and server version detection
//! - `commands`: CLI command definitions
//! - `configuration`: Settings resolution and persistence
//! - `dispatch`: Command name resolution tables
//! - `format`: Output formatting of listings
//! - `model`: Records exchanged with the Nexus REST API
//! - `transfer`: Upload and download of files and directory trees

pub mod actions;
pub mod api;
pub mod cli;
pub mod client;
pub mod commands;
pub mod configuration;
pub mod dispatch;
pub mod error;
pub mod error_utils;
pub mod exit_codes;
pub mod format;
pub mod model;
pub mod payload;
pub mod transfer;
