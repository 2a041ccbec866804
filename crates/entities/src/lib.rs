//! Core entity definitions for the tasks service.
//!
//! This crate defines the data types shared between the storage layer and
//! the HTTP server.

mod task;

pub use task::*;
