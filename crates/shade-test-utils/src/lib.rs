//! Shared test utilities for the shade workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`handlers`] - descriptors with observable or slow handlers
//! - [`lab`] - [`TestLab`] temporary directory for configs and side-channel logs
//! - [`rpc`] - JSON-RPC request lines

pub mod handlers;
pub mod lab;
pub mod rpc;

pub use lab::TestLab;
