//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `ChurchId` where a `ScheduleId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(ScheduleId, "Unique identifier for a monthly preaching schedule.");
typed_id!(DistrictId, "Unique identifier for a district.");
typed_id!(ChurchId, "Unique identifier for a church.");
typed_id!(PreacherId, "Unique identifier for a preacher.");
typed_id!(ThemeId, "Unique identifier for a sermon theme.");
typed_id!(AssignmentId, "Unique identifier for a single preaching assignment.");

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_typed_id_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = ScheduleId::from_uuid(uuid);
        assert_eq!(id.into_inner(), uuid);
    }

    #[test]
    fn test_typed_id_display() {
        let uuid = Uuid::new_v4();
        let id = ChurchId::from_uuid(uuid);
        assert_eq!(format!("{id}"), uuid.to_string());
    }

    #[test]
    fn test_typed_id_from_str() {
        let uuid = Uuid::new_v4();
        let id = ScheduleId::from_str(&uuid.to_string()).unwrap();
        assert_eq!(id.into_inner(), uuid);
    }

    #[test]
    fn test_typed_id_from_str_error() {
        assert!(ScheduleId::from_str("invalid").is_err());
    }

    #[test]
    fn test_typed_id_serde_transparent() {
        let uuid = Uuid::new_v4();
        let json = serde_json::to_string(&PreacherId::from_uuid(uuid)).unwrap();
        assert_eq!(json, format!("\"{uuid}\""));

        let back: PreacherId = serde_json::from_str(&json).unwrap();
        assert_eq!(back.into_inner(), uuid);
    }
}
