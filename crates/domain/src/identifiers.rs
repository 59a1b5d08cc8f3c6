//! Strongly-typed identifier types for the FoodHub domain.
//!
//! Every stored document is keyed by a BSON `ObjectId`. Wrapping it per entity
//! prevents passing a `FoodId` where a `VendorId` is expected.

use bson::{oid::ObjectId, Bson};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

use crate::errors::DomainError;

macro_rules! define_id {
    ($name:ident, $kind:literal, $doc:expr) => {
        #[doc = $doc]
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(ObjectId);

        impl $name {
            /// Create a fresh identifier
            #[inline]
            pub fn new() -> Self {
                Self(ObjectId::new())
            }

            /// Wrap an existing object id
            #[inline]
            pub fn from_object_id(oid: ObjectId) -> Self {
                Self(oid)
            }

            /// Get a reference to the underlying object id
            #[inline]
            pub fn as_object_id(&self) -> &ObjectId {
                &self.0
            }

            /// Convert to the underlying object id
            #[inline]
            pub fn into_object_id(self) -> ObjectId {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0.to_hex())
            }
        }

        impl From<ObjectId> for $name {
            fn from(oid: ObjectId) -> Self {
                Self(oid)
            }
        }

        impl From<$name> for ObjectId {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl From<$name> for Bson {
            fn from(id: $name) -> Self {
                Bson::ObjectId(id.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                ObjectId::parse_str(s)
                    .map(Self)
                    .map_err(|_| DomainError::InvalidId {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

define_id!(VendorId, "vendor", "Unique identifier for vendors");

define_id!(FoodId, "food", "Unique identifier for food items");

define_id!(OrderId, "order", "Unique identifier for orders");

define_id!(OfferId, "offer", "Unique identifier for offers");

define_id!(CustomerId, "customer", "Unique identifier for customers");

define_id!(
    DeliveryPersonId,
    "delivery person",
    "Unique identifier for delivery personnel"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation() {
        let id = VendorId::new();
        assert_eq!(id.to_string().len(), 24);
    }

    #[test]
    fn test_id_from_string() {
        let id1 = FoodId::new();
        let s = id1.to_string();
        let id2: FoodId = s.parse().unwrap();
        assert_eq!(id1, id2);
    }

    #[test]
    fn test_invalid_id_is_rejected() {
        let err = "not-an-id".parse::<OrderId>().unwrap_err();
        assert!(matches!(err, DomainError::InvalidId { kind: "order", .. }));
    }

    #[test]
    fn test_id_into_bson() {
        let id = OfferId::new();
        let bson: Bson = id.into();
        assert_eq!(bson, Bson::ObjectId(id.into_object_id()));
    }

    #[test]
    fn test_different_id_types_share_object_id() {
        let oid = ObjectId::new();
        let vendor = VendorId::from_object_id(oid);
        let customer = CustomerId::from_object_id(oid);
        assert_eq!(vendor.as_object_id(), customer.as_object_id());
    }
}
