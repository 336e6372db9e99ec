//! Backstock Core - Shared types library.
//!
//! This crate provides common types used across all Backstock components:
//! - `inventory` - The stock/buffer ledger subsystem
//! - `integration-tests` - End-to-end tests against an in-process backend
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no HTTP
//! clients, no storage. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, SKUs, prices, movement
//!   kinds, and console roles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
