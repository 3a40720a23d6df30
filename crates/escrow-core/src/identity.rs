//! # Domain Identity Newtypes
//!
//! Newtype wrappers for the identifiers in the escrow system. These prevent
//! accidental confusion — you cannot pass a raw counter where an `EscrowId`
//! is expected, or an arbitrary string where a caller principal is required.

use serde::{Deserialize, Serialize};

/// Unique identifier for an escrow contract.
///
/// Assigned by the registry as a monotonically increasing counter starting
/// at 0. Unlike random identifiers, allocation order is observable: the
/// first escrow created is always `escrow:0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EscrowId(pub u64);

impl EscrowId {
    /// Access the inner counter value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for EscrowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "escrow:{}", self.0)
    }
}

/// An opaque caller identity supplied by the external identity layer.
///
/// The registry trusts principals as given — authentication is an external
/// collaborator's concern. Equality is exact string equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal(pub String);

impl Principal {
    /// Wrap a caller identity.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Access the inner identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Principal {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escrow_id_display() {
        assert_eq!(EscrowId(0).to_string(), "escrow:0");
        assert_eq!(EscrowId(42).to_string(), "escrow:42");
    }

    #[test]
    fn test_escrow_id_ordering_follows_allocation() {
        assert!(EscrowId(0) < EscrowId(1));
    }

    #[test]
    fn test_principal_equality_is_exact() {
        assert_eq!(Principal::new("client1"), Principal::from("client1"));
        assert_ne!(Principal::new("client1"), Principal::new("Client1"));
    }

    #[test]
    fn test_principal_display() {
        assert_eq!(Principal::new("freelancer1").to_string(), "freelancer1");
    }

    #[test]
    fn test_escrow_id_serde_roundtrip() {
        let id = EscrowId(7);
        let json = serde_json::to_string(&id).unwrap();
        let parsed: EscrowId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }
}
