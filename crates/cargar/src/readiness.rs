//! Declarative page-readiness evaluation.
//!
//! A page declares what "loaded" means as a list of named criteria, each
//! binding a [`Locator`] to expectations about the element(s) it resolves:
//! presence, visibility, text, classes, id and match counts
//! ([`ElementExpectations`]), or the finished state of a transient loading
//! indicator ([`LoaderExpectations`]). A [`ReadinessSpec`] aggregates the
//! criteria and renders a single boolean verdict.
//!
//! Loader criteria are checked before everything else: there is no point
//! asserting content while a spinner still covers the page. Presence and
//! visibility expectations are three-valued ([`Ternary::Unknown`] skips the
//! check); comparisons against observed state use ternary XNOR.
//!
//! A criterion that *mismatches* yields a `false` verdict, never an error.
//! Driver failures, including dereferencing a missing element in a
//! criterion that did not assert presence first, propagate as errors.

use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::locator::{Locator, DEFAULT_POLL_INTERVAL_MS};
use crate::result::CargarResult;
use crate::ternary::Ternary;

/// Bounds on how many elements a selector should match.
///
/// When `exactly` is set the bounds are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountExpectation {
    /// Exact required match count; suppresses the bounds when set
    pub exactly: Option<usize>,
    /// Inclusive lower bound on the match count
    pub at_least: Option<usize>,
    /// Inclusive upper bound on the match count
    pub at_most: Option<usize>,
}

impl CountExpectation {
    fn is_trivial(self) -> bool {
        self.exactly.is_none() && self.at_least.is_none() && self.at_most.is_none()
    }

    fn admits(self, count: usize) -> bool {
        if let Some(exact) = self.exactly {
            return count == exact;
        }
        if let Some(min) = self.at_least {
            if count < min {
                return false;
            }
        }
        if let Some(max) = self.at_most {
            if count > max {
                return false;
            }
        }
        true
    }
}

/// Expectations about an ordinary element criterion.
///
/// Defaults assert presence and nothing else; each builder method opts a
/// further check in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementExpectations {
    /// Expected presence; defaults to [`Ternary::True`]
    pub presence: Ternary,
    /// Expected visibility; defaults to [`Ternary::Unknown`] (skipped)
    pub visibility: Ternary,
    /// Substring the element's text must contain
    pub contains_text: Option<String>,
    /// CSS classes the element's `class` attribute must include
    pub css_classes: Vec<String>,
    /// Exact required `id` attribute
    pub id: Option<String>,
    /// Bounds on the number of matching elements
    pub count: CountExpectation,
}

impl Default for ElementExpectations {
    fn default() -> Self {
        Self {
            presence: Ternary::True,
            visibility: Ternary::Unknown,
            contains_text: None,
            css_classes: Vec::new(),
            id: None,
            count: CountExpectation::default(),
        }
    }
}

impl ElementExpectations {
    /// Expectations asserting presence only
    #[must_use]
    pub fn present() -> Self {
        Self::default()
    }

    /// Set the presence expectation
    #[must_use]
    pub fn presence(mut self, expected: impl Into<Ternary>) -> Self {
        self.presence = expected.into();
        self
    }

    /// Set the visibility expectation
    #[must_use]
    pub fn visibility(mut self, expected: impl Into<Ternary>) -> Self {
        self.visibility = expected.into();
        self
    }

    /// Require the element's text to contain a substring
    #[must_use]
    pub fn contains_text(mut self, text: impl Into<String>) -> Self {
        self.contains_text = Some(text.into());
        self
    }

    /// Require a CSS class on the element (may be called repeatedly)
    #[must_use]
    pub fn css_class(mut self, class: impl Into<String>) -> Self {
        self.css_classes.push(class.into());
        self
    }

    /// Require an exact `id` attribute
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Require an exact number of matching elements
    #[must_use]
    pub fn find_exactly(mut self, count: usize) -> Self {
        self.count.exactly = Some(count);
        self
    }

    /// Require at least this many matching elements
    #[must_use]
    pub fn find_at_least(mut self, count: usize) -> Self {
        self.count.at_least = Some(count);
        self
    }

    /// Require at most this many matching elements
    #[must_use]
    pub fn find_at_most(mut self, count: usize) -> Self {
        self.count.at_most = Some(count);
        self
    }

    fn evaluate(&self, locator: &Locator) -> CargarResult<bool> {
        if self.presence.is_known() {
            let observed = locator.exists()?;
            if !self.presence.xnor(observed).squash() {
                return Ok(false);
            }
        }
        if self.visibility.is_known() {
            let observed = locator.is_visible()?;
            if !self.visibility.xnor(observed).squash() {
                return Ok(false);
            }
        }
        if let Some(expected) = &self.contains_text {
            // a vanished element is a plain mismatch here, not an error
            match locator.text() {
                Ok(text) => {
                    if !text.contains(expected.as_str()) {
                        return Ok(false);
                    }
                }
                Err(e) if e.is_element_not_found() => return Ok(false),
                Err(e) => return Err(e),
            }
        }
        if !self.css_classes.is_empty() {
            let attr = locator.attribute("class")?.unwrap_or_default();
            let observed: Vec<&str> = attr.split_whitespace().collect();
            if !self
                .css_classes
                .iter()
                .all(|wanted| observed.contains(&wanted.as_str()))
            {
                return Ok(false);
            }
        }
        if let Some(expected) = &self.id {
            if locator.attribute("id")?.as_deref() != Some(expected.as_str()) {
                return Ok(false);
            }
        }
        if !self.count.is_trivial() {
            let count = locator.resolve_all()?.len();
            if !self.count.admits(count) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Expectations about a loading indicator once loading has finished.
///
/// Both fields default to [`Ternary::Unknown`] (skipped); a typical spinner
/// declares `present_on_finish: False` or `visible_on_finish: False`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderExpectations {
    /// Whether the indicator should still be in the DOM when loading ends
    pub present_on_finish: Ternary,
    /// Whether the indicator should still be visible when loading ends
    pub visible_on_finish: Ternary,
}

impl LoaderExpectations {
    /// Indicator that must be gone from the DOM when loading ends
    #[must_use]
    pub fn gone() -> Self {
        Self {
            present_on_finish: Ternary::False,
            visible_on_finish: Ternary::Unknown,
        }
    }

    /// Indicator that may stay in the DOM but must be invisible
    #[must_use]
    pub fn invisible() -> Self {
        Self {
            present_on_finish: Ternary::Unknown,
            visible_on_finish: Ternary::False,
        }
    }

    /// Set the finished-state presence expectation
    #[must_use]
    pub fn present_on_finish(mut self, expected: impl Into<Ternary>) -> Self {
        self.present_on_finish = expected.into();
        self
    }

    /// Set the finished-state visibility expectation
    #[must_use]
    pub fn visible_on_finish(mut self, expected: impl Into<Ternary>) -> Self {
        self.visible_on_finish = expected.into();
        self
    }

    fn evaluate(&self, locator: &Locator) -> CargarResult<bool> {
        if self.present_on_finish.is_known() {
            let observed = locator.exists()?;
            if !self.present_on_finish.xnor(observed).squash() {
                return Ok(false);
            }
        }
        if self.visible_on_finish.is_known() {
            let observed = locator.is_visible()?;
            if !self.visible_on_finish.xnor(observed).squash() {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// One named readiness criterion
#[derive(Debug, Clone)]
pub enum Criterion {
    /// Ordinary element expectations
    Element(ElementExpectations),
    /// Loading-indicator expectations, checked before everything else
    Loader(LoaderExpectations),
}

/// A locator bound to a criterion, with a name for diagnostics
#[derive(Debug, Clone)]
pub struct CriterionEntry {
    /// Diagnostic name, reported when the criterion fails
    pub name: String,
    /// Locator the criterion is evaluated against
    pub locator: Locator,
    /// The expectations to check
    pub criterion: Criterion,
}

/// Ordered collection of readiness criteria for one page.
///
/// Built with [`Self::element`] / [`Self::loader`]; a page hierarchy shares
/// criteria by composition: build the base spec, then [`Self::extend`] it
/// into the derived page's spec.
#[derive(Debug, Clone, Default)]
pub struct ReadinessSpec {
    entries: Vec<CriterionEntry>,
}

impl ReadinessSpec {
    /// Empty spec (trivially ready)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an ordinary element criterion
    #[must_use]
    pub fn element(
        mut self,
        name: impl Into<String>,
        locator: Locator,
        expectations: ElementExpectations,
    ) -> Self {
        self.entries.push(CriterionEntry {
            name: name.into(),
            locator,
            criterion: Criterion::Element(expectations),
        });
        self
    }

    /// Add a loading-indicator criterion
    #[must_use]
    pub fn loader(
        mut self,
        name: impl Into<String>,
        locator: Locator,
        expectations: LoaderExpectations,
    ) -> Self {
        self.entries.push(CriterionEntry {
            name: name.into(),
            locator,
            criterion: Criterion::Loader(expectations),
        });
        self
    }

    /// Append all of a base spec's entries (explicit inheritance)
    #[must_use]
    pub fn extend(mut self, base: Self) -> Self {
        self.entries.extend(base.entries);
        self
    }

    /// The criteria in declaration order
    #[must_use]
    pub fn entries(&self) -> &[CriterionEntry] {
        &self.entries
    }

    /// Number of criteria
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the spec has no criteria
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Evaluate every criterion against the current page state.
    ///
    /// Loader criteria run first, then the ordinary ones, each in
    /// declaration order. The first mismatch yields `Ok(false)`; driver
    /// failures propagate.
    pub fn is_ready(&self) -> CargarResult<bool> {
        for entry in self.loaders_then_elements() {
            let passed = match &entry.criterion {
                Criterion::Loader(exp) => exp.evaluate(&entry.locator)?,
                Criterion::Element(exp) => exp.evaluate(&entry.locator)?,
            };
            if passed {
                trace!(criterion = %entry.name, "criterion satisfied");
            } else {
                debug!(criterion = %entry.name, selector = %entry.locator.selector(), "criterion failed");
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Poll [`Self::is_ready`] until it holds or `timeout` elapses.
    ///
    /// Returns `Ok(false)` on deadline; evaluation errors propagate. Polls
    /// every 200ms.
    pub fn wait_until_ready(&self, timeout: Duration) -> CargarResult<bool> {
        self.wait_until_ready_with(timeout, Duration::from_millis(DEFAULT_POLL_INTERVAL_MS))
    }

    /// [`Self::wait_until_ready`] with an explicit poll interval
    pub fn wait_until_ready_with(
        &self,
        timeout: Duration,
        poll_interval: Duration,
    ) -> CargarResult<bool> {
        let start = Instant::now();
        loop {
            if self.is_ready()? {
                return Ok(true);
            }
            if start.elapsed() >= timeout {
                debug!(timeout_ms = timeout.as_millis() as u64, "readiness wait timed out");
                return Ok(false);
            }
            thread::sleep(poll_interval);
        }
    }

    fn loaders_then_elements(&self) -> impl Iterator<Item = &CriterionEntry> {
        let loaders = self
            .entries
            .iter()
            .filter(|e| matches!(e.criterion, Criterion::Loader(_)));
        let elements = self
            .entries
            .iter()
            .filter(|e| matches!(e.criterion, Criterion::Element(_)));
        loaders.chain(elements)
    }
}
