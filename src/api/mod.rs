//! API Module
//!
//! This module handles the JSON-RPC API for validating and submitting transactions.

mod server;
pub use server::{AppState, Server, router};
