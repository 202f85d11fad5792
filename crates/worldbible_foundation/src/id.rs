//! Opaque identifiers for world records.
//!
//! Every identifier wraps a random v4 UUID and serializes as its
//! hyphenated string form, so ids double as JSON object keys.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Allocates a fresh random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wraps an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim())
                    .map(Self)
                    .map_err(|e| Error::invalid_argument(format!("malformed {} id '{s}': {e}", $label)))
            }
        }
    };
}

define_id!(
    /// Identifier of a world element (character, location, event, ...).
    ElementId,
    "Element"
);
define_id!(
    /// Identifier of a conflict record owned by its reporting element.
    ConflictId,
    "Conflict"
);
define_id!(
    /// Identifier of a chapter.
    ChapterId,
    "Chapter"
);
define_id!(
    /// Identifier of a captured snapshot.
    SnapshotId,
    "Snapshot"
);
define_id!(
    /// Identifier of a user-authored world rule.
    RuleId,
    "Rule"
);
define_id!(
    /// Identifier of a brief template.
    TemplateId,
    "Template"
);
define_id!(
    /// Identifier of a world document.
    WorldId,
    "World"
);
