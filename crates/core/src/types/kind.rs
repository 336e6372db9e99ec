//! Movement kind enum.

use serde::{Deserialize, Serialize};

/// The three quantity-changing operations recorded in the movement ledger.
///
/// Serialized with the wire names used by the backend ledger
/// (`deliver`, `add-buffer`, `transfer`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MovementKind {
    /// Stock left inventory to a customer/order; reduces on-hand quantity.
    Deliver,
    /// Reserve stock was added; increases buffer quantity only.
    AddBuffer,
    /// Buffer stock was reclassified as sellable; buffer down, on-hand up.
    Transfer,
}

impl MovementKind {
    /// The wire/display name of the movement kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Deliver => "deliver",
            Self::AddBuffer => "add-buffer",
            Self::Transfer => "transfer",
        }
    }
}

impl core::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
