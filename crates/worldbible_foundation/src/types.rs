//! Closed enumerations shared by every layer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The kind of a world element. Fixed at creation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementKind {
    /// A person or sentient being.
    Character,
    /// An invention, device or technique.
    Technology,
    /// A place.
    Location,
    /// Something that happened.
    Event,
    /// An idea, philosophy or field of knowledge.
    Concept,
    /// A social structure: faction, institution, hierarchy.
    #[serde(alias = "social-structure")]
    Social,
    /// An in-world law of nature or society.
    Rule,
}

impl ElementKind {
    /// All kinds in declaration order.
    pub const ALL: [ElementKind; 7] = [
        Self::Character,
        Self::Technology,
        Self::Location,
        Self::Event,
        Self::Concept,
        Self::Social,
        Self::Rule,
    ];

    /// Returns the canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Character => "character",
            Self::Technology => "technology",
            Self::Location => "location",
            Self::Event => "event",
            Self::Concept => "concept",
            Self::Social => "social",
            Self::Rule => "rule",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "character" => Ok(Self::Character),
            "technology" => Ok(Self::Technology),
            "location" => Ok(Self::Location),
            "event" => Ok(Self::Event),
            "concept" => Ok(Self::Concept),
            "social" | "social-structure" => Ok(Self::Social),
            "rule" => Ok(Self::Rule),
            other => Err(Error::invalid_argument(format!("unknown element kind: {other}"))),
        }
    }
}

/// How authoritative an element's facts are. Ordered from most to least canonical.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum CanonTier {
    /// Established canon.
    Primary,
    /// Supporting canon.
    #[default]
    Secondary,
    /// Under consideration.
    Speculative,
    /// Explicitly outside canon.
    NonCanon,
}

impl CanonTier {
    /// Returns the canonical name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Speculative => "speculative",
            Self::NonCanon => "non-canon",
        }
    }
}

impl fmt::Display for CanonTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a conflict record.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictStatus {
    /// Awaiting a decision.
    #[default]
    Unresolved,
    /// Settled by the author, optionally with a resolution narrative.
    Resolved,
    /// Dismissed by the author.
    Ignored,
}

impl ConflictStatus {
    /// Returns the canonical name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unresolved => "unresolved",
            Self::Resolved => "resolved",
            Self::Ignored => "ignored",
        }
    }

    /// Returns true once a human has acted on the conflict.
    #[must_use]
    pub const fn is_settled(self) -> bool {
        !matches!(self, Self::Unresolved)
    }
}

impl fmt::Display for ConflictStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of a detected contradiction.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Possibly inconsistent.
    #[default]
    Warning,
    /// Definitely inconsistent.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// How eagerly the structural checks flag candidates.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    /// Flag more aggressively.
    Strict,
    /// Default balance.
    #[default]
    Moderate,
    /// Flag only obvious cases.
    Lenient,
}

impl Strictness {
    /// Name similarity above which two elements are reported as near-duplicates.
    #[must_use]
    pub const fn name_similarity_threshold(self) -> f64 {
        match self {
            Self::Strict => 0.7,
            Self::Moderate => 0.8,
            Self::Lenient => 0.9,
        }
    }

    /// Returns the canonical name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Moderate => "moderate",
            Self::Lenient => "lenient",
        }
    }
}

impl fmt::Display for Strictness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
