//! Selector values for locating elements.
//!
//! A [`Selector`] pairs a lookup strategy ([`SelectorKind`]) with a pattern
//! string. Selectors are plain values: resolving them against a live page is
//! the driver's job, and deferring resolution is the
//! [`Locator`](crate::locator::Locator)'s job.
//!
//! [`SelectorTemplate`] holds a pattern with `{}` placeholders for building
//! families of selectors that differ only in a runtime value (a row index, a
//! username in an XPath, etc.).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lookup strategy for a [`Selector`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectorKind {
    /// CSS selector (e.g. `"button.primary"`)
    Css,
    /// XPath expression
    XPath,
    /// Exact `id` attribute match
    Id,
    /// Anchor with exact link text
    LinkText,
    /// Anchor whose link text contains the pattern
    PartialLinkText,
    /// Exact `name` attribute match
    Name,
    /// Tag name match
    TagName,
    /// Single class-name match
    ClassName,
}

impl SelectorKind {
    /// Short lowercase name of the strategy
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Css => "css",
            Self::XPath => "xpath",
            Self::Id => "id",
            Self::LinkText => "link_text",
            Self::PartialLinkText => "partial_link_text",
            Self::Name => "name",
            Self::TagName => "tag_name",
            Self::ClassName => "class_name",
        }
    }
}

impl fmt::Display for SelectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A lookup strategy plus the pattern to match.
///
/// Cheap to clone and hashable so test doubles can key scripted DOM content
/// by selector.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selector {
    /// Lookup strategy
    pub kind: SelectorKind,
    /// Pattern interpreted under `kind`
    pub pattern: String,
}

impl Selector {
    /// Create a selector from a strategy and pattern
    #[must_use]
    pub fn new(kind: SelectorKind, pattern: impl Into<String>) -> Self {
        Self {
            kind,
            pattern: pattern.into(),
        }
    }

    /// CSS selector
    #[must_use]
    pub fn css(pattern: impl Into<String>) -> Self {
        Self::new(SelectorKind::Css, pattern)
    }

    /// XPath expression
    #[must_use]
    pub fn xpath(pattern: impl Into<String>) -> Self {
        Self::new(SelectorKind::XPath, pattern)
    }

    /// Exact `id` attribute
    #[must_use]
    pub fn id(pattern: impl Into<String>) -> Self {
        Self::new(SelectorKind::Id, pattern)
    }

    /// Exact link text
    #[must_use]
    pub fn link_text(pattern: impl Into<String>) -> Self {
        Self::new(SelectorKind::LinkText, pattern)
    }

    /// Partial link text
    #[must_use]
    pub fn partial_link_text(pattern: impl Into<String>) -> Self {
        Self::new(SelectorKind::PartialLinkText, pattern)
    }

    /// Exact `name` attribute
    #[must_use]
    pub fn name(pattern: impl Into<String>) -> Self {
        Self::new(SelectorKind::Name, pattern)
    }

    /// Tag name
    #[must_use]
    pub fn tag_name(pattern: impl Into<String>) -> Self {
        Self::new(SelectorKind::TagName, pattern)
    }

    /// Single class name
    #[must_use]
    pub fn class_name(pattern: impl Into<String>) -> Self {
        Self::new(SelectorKind::ClassName, pattern)
    }

    /// Narrow a CSS selector to descendants of this one.
    ///
    /// Both selectors must be CSS; the result is the combined
    /// `"<root> <child>"` descendant pattern. Returns `None` when either
    /// side uses a non-CSS strategy, since the strategies cannot be
    /// composed textually.
    #[must_use]
    pub fn descendant_css(&self, child: impl Into<String>) -> Option<Self> {
        if self.kind != SelectorKind::Css {
            return None;
        }
        Some(Self::css(format!("{} {}", self.pattern, child.into())))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.kind, self.pattern)
    }
}

/// An unformatted selector pattern with `{}` positional placeholders.
///
/// ```
/// use cargar::selector::{SelectorKind, SelectorTemplate};
///
/// let row = SelectorTemplate::new(SelectorKind::Css, "table#results tr:nth-child({})");
/// let third = row.format([3]);
/// assert_eq!(third.pattern, "table#results tr:nth-child(3)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorTemplate {
    kind: SelectorKind,
    pattern: String,
}

impl SelectorTemplate {
    /// Create a template from a strategy and placeholder pattern
    #[must_use]
    pub fn new(kind: SelectorKind, pattern: impl Into<String>) -> Self {
        Self {
            kind,
            pattern: pattern.into(),
        }
    }

    /// Lookup strategy the formatted selectors will use
    #[must_use]
    pub const fn kind(&self) -> SelectorKind {
        self.kind
    }

    /// Placeholder pattern as written
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Substitute values into the `{}` placeholders, left to right.
    ///
    /// Surplus values are ignored; unfilled placeholders are left verbatim.
    #[must_use]
    pub fn format<I>(&self, values: I) -> Selector
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        let mut values = values.into_iter();
        let mut out = String::with_capacity(self.pattern.len());
        let mut rest = self.pattern.as_str();
        while let Some(at) = rest.find("{}") {
            out.push_str(&rest[..at]);
            match values.next() {
                Some(v) => {
                    use fmt::Write as _;
                    // Display into a String cannot fail
                    let _ = write!(out, "{v}");
                }
                None => out.push_str("{}"),
            }
            rest = &rest[at + 2..];
        }
        out.push_str(rest);
        Selector::new(self.kind, out)
    }
}
