//! Account roles carried in bearer credentials.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Roles that can authenticate against the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Vendor,
    Customer,
    Delivery,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vendor => "vendor",
            Self::Customer => "customer",
            Self::Delivery => "delivery",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::Vendor).unwrap(), "\"vendor\"");
        let role: Role = serde_json::from_str("\"delivery\"").unwrap();
        assert_eq!(role, Role::Delivery);
    }
}
