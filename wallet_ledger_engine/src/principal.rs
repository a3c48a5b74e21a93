//! The caller's identity, as resolved by the identity layer in front of the engine.
//!
//! User sessions carry every permission. Service principals (API keys) carry a scoped subset.
use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{db_types::ConversionError, traits::LedgerError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Deposit,
    Transfer,
    Read,
}

impl Permission {
    pub fn all() -> Vec<Permission> {
        vec![Permission::Deposit, Permission::Transfer, Permission::Read]
    }
}

impl Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Permission::Deposit => write!(f, "deposit"),
            Permission::Transfer => write!(f, "transfer"),
            Permission::Read => write!(f, "read"),
        }
    }
}

impl FromStr for Permission {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "deposit" => Ok(Self::Deposit),
            "transfer" => Ok(Self::Transfer),
            "read" => Ok(Self::Read),
            other => Err(ConversionError::new(format!("Unknown permission: {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// The owner identity. Each owner has at most one wallet.
    pub owner_id: String,
    /// Used as the payer's address when initializing deposits with the payment provider
    pub email: String,
    pub permissions: Vec<Permission>,
}

impl Principal {
    /// A user session. Users may do anything with their own wallet.
    pub fn user<S: Into<String>>(owner_id: S, email: S) -> Self {
        Self { owner_id: owner_id.into(), email: email.into(), permissions: Permission::all() }
    }

    /// A service principal with a scoped set of permissions.
    pub fn service<S: Into<String>>(owner_id: S, email: S, permissions: &[Permission]) -> Self {
        let mut permissions = permissions.to_vec();
        permissions.sort();
        permissions.dedup();
        Self { owner_id: owner_id.into(), email: email.into(), permissions }
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    pub fn require(&self, permission: Permission) -> Result<(), LedgerError> {
        if self.has_permission(permission) {
            Ok(())
        } else {
            Err(LedgerError::PermissionDenied(permission))
        }
    }

    /// Parses a comma-separated permission list, e.g. `"deposit, read"`. Empty items are ignored.
    pub fn parse_permissions(list: &str) -> Result<Vec<Permission>, ConversionError> {
        list.split(',').map(str::trim).filter(|s| !s.is_empty()).map(Permission::from_str).collect()
    }
}
