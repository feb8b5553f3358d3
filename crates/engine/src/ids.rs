//! Identity newtypes for schedule entities.
//!
//! All identifiers are assigned by the remote store and treated as opaque
//! here. They are stable for the lifetime of the entity and never reused.

use serde::{Deserialize, Serialize};

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            #[inline]
            pub fn from_raw(raw: i64) -> Self {
                Self(raw)
            }

            #[inline]
            pub fn raw(&self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type! {
    /// Unique identifier for a schedule.
    ScheduleId
}

id_type! {
    /// Unique identifier for a compensation row within a schedule.
    RowId
}

id_type! {
    /// Unique identifier for a staff position in the directory.
    PositionId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_round_trip() {
        let id = RowId::from_raw(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(format!("{}", id), "42");
    }

    #[test]
    fn test_ids_are_distinct_types() {
        // Serde sees only the raw integer.
        let json = serde_json::to_string(&ScheduleId::from_raw(7)).unwrap();
        assert_eq!(json, "7");
        let back: ScheduleId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ScheduleId::from_raw(7));
    }
}
