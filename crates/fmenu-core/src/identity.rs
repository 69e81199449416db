#![forbid(unsafe_code)]

//! Stable identity values for panels and rows.
//!
//! Identity drives everything incremental in the menu: row diffing matches
//! old rows to new rows by identifier, and an in-place stack update is only
//! legal when the incoming panel carries the same identifier as the one on
//! screen. Identifiers are opaque; equality is the only operation the engine
//! performs on them.

use std::borrow::Cow;
use std::fmt;

/// Opaque identity for a panel or row.
///
/// Hosts typically use small integers for generated rows and names for
/// hand-authored ones; the two never compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identifier {
    Int(i64),
    Name(Cow<'static, str>),
}

impl Identifier {
    /// Named identifier from an owned or borrowed string.
    #[must_use]
    pub fn name(name: impl Into<Cow<'static, str>>) -> Self {
        Self::Name(name.into())
    }
}

impl From<i64> for Identifier {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&'static str> for Identifier {
    fn from(value: &'static str) -> Self {
        Self::Name(Cow::Borrowed(value))
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Self::Name(Cow::Owned(value))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "#{value}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}
