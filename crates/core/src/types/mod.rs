//! Core types for Backstock.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod kind;
pub mod price;
pub mod role;
pub mod sku;

pub use id::*;
pub use kind::MovementKind;
pub use price::{Price, PriceError};
pub use role::Role;
pub use sku::{Sku, SkuError};
