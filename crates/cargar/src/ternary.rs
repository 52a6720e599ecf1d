//! Three-valued logic for optional assertions.
//!
//! Readiness criteria use [`Ternary`] to express "expect true", "expect
//! false" or "don't care". The don't-care state, [`Ternary::Unknown`],
//! propagates through every operator so a skipped assertion never forces a
//! verdict either way.
//!
//! Truth table for the binary operators:
//!
//! ```text
//! +---------------------------------------------+
//! | A | B || and | xor | or | nor | xnor | nand |
//! |=============================================|
//! | F | F ||  F  |  F  |  F |  T  |  T   |  T   |
//! | F | ? ||  F  |  ?  |  ? |  ?  |  ?   |  T   |
//! | F | T ||  F  |  T  |  T |  F  |  F   |  T   |
//! | ? | F ||  F  |  ?  |  ? |  ?  |  ?   |  T   |
//! | ? | ? ||  ?  |  ?  |  ? |  ?  |  ?   |  ?   |
//! | ? | T ||  ?  |  ?  |  T |  F  |  ?   |  ?   |
//! | T | F ||  F  |  T  |  T |  F  |  F   |  T   |
//! | T | ? ||  ?  |  ?  |  T |  F  |  ?   |  ?   |
//! | T | T ||  T  |  F  |  T |  F  |  T   |  F   |
//! +---------------------------------------------+
//! ```

use serde::{Deserialize, Serialize};

/// A three-valued logic type: true, false, or unknown.
///
/// Every binary operator accepts `impl Into<Ternary>`, so plain `bool`
/// operands coerce: `Ternary::True.xnor(locator.exists()?)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ternary {
    /// Definitely true
    True,
    /// Definitely false
    False,
    /// Indeterminate ("don't care" in criteria)
    Unknown,
}

impl Ternary {
    /// Squash into a plain boolean, mapping everything but `True` to `false`
    #[must_use]
    pub const fn squash(self) -> bool {
        matches!(self, Self::True)
    }

    /// Convert to an optional boolean (`Unknown` becomes `None`)
    #[must_use]
    pub const fn to_bool(self) -> Option<bool> {
        match self {
            Self::True => Some(true),
            Self::False => Some(false),
            Self::Unknown => None,
        }
    }

    /// True when this value is determinate (not `Unknown`)
    #[must_use]
    pub const fn is_known(self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Logical NOT; `Unknown` stays `Unknown`
    #[must_use]
    pub const fn not(self) -> Self {
        match self {
            Self::True => Self::False,
            Self::False => Self::True,
            Self::Unknown => Self::Unknown,
        }
    }

    /// Logical AND: false dominates, then unknown
    #[must_use]
    pub fn and(self, other: impl Into<Self>) -> Self {
        match (self, other.into()) {
            (Self::False, _) | (_, Self::False) => Self::False,
            (Self::Unknown, _) | (_, Self::Unknown) => Self::Unknown,
            _ => Self::True,
        }
    }

    /// Logical OR: true dominates, then unknown
    #[must_use]
    pub fn or(self, other: impl Into<Self>) -> Self {
        match (self, other.into()) {
            (Self::True, _) | (_, Self::True) => Self::True,
            (Self::Unknown, _) | (_, Self::Unknown) => Self::Unknown,
            _ => Self::False,
        }
    }

    /// Logical XOR: unknown if either operand is unknown, else true iff unequal
    #[must_use]
    pub fn xor(self, other: impl Into<Self>) -> Self {
        match (self, other.into()) {
            (Self::Unknown, _) | (_, Self::Unknown) => Self::Unknown,
            (a, b) if a == b => Self::False,
            _ => Self::True,
        }
    }

    /// Logical XNOR: unknown if either operand is unknown, else true iff equal.
    ///
    /// This is the tri-state equality used to compare an expected criterion
    /// value against an observed boolean.
    #[must_use]
    pub fn xnor(self, other: impl Into<Self>) -> Self {
        match (self, other.into()) {
            (Self::Unknown, _) | (_, Self::Unknown) => Self::Unknown,
            (a, b) if a == b => Self::True,
            _ => Self::False,
        }
    }

    /// Logical NOR
    #[must_use]
    pub fn nor(self, other: impl Into<Self>) -> Self {
        self.or(other).not()
    }

    /// Logical NAND
    #[must_use]
    pub fn nand(self, other: impl Into<Self>) -> Self {
        self.and(other).not()
    }
}

impl Default for Ternary {
    fn default() -> Self {
        Self::Unknown
    }
}

impl From<bool> for Ternary {
    fn from(value: bool) -> Self {
        if value {
            Self::True
        } else {
            Self::False
        }
    }
}

impl From<Option<bool>> for Ternary {
    fn from(value: Option<bool>) -> Self {
        value.map_or(Self::Unknown, Self::from)
    }
}

impl std::fmt::Display for Ternary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::True => "true",
            Self::False => "false",
            Self::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}
