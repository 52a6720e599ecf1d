//! Lazy, re-resolving element locators with wait/poll semantics.
//!
//! A [`Locator`] is a deferred query: it stores a [`Selector`] plus wait
//! settings and resolves against the live page on every operation. Nothing
//! is cached, so a locator built during page construction stays valid across
//! navigations and DOM rewrites.
//!
//! Waiting is blocking and single-threaded: an [`Instant`] deadline with
//! `thread::sleep` between polls. [`Locator::wait_until`] retains the last
//! "not found" error seen while polling and chains it as the cause of the
//! eventual [`CargarError::WaitTimeout`], which is usually the only clue to
//! *why* a wait timed out.

use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::driver::Element;
use crate::result::{CargarError, CargarResult};
use crate::selector::{Selector, SelectorTemplate};
use crate::session::Session;

/// Default wait timeout (10 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Default polling interval (200ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 200;

/// A deferred, re-resolving element query.
///
/// Every accessor and action re-resolves the selector against the current
/// page state; action methods return `&Self` so interactions chain:
///
/// ```no_run
/// # use cargar::driver::FakeDriver;
/// # use cargar::session::Session;
/// # fn main() -> cargar::result::CargarResult<()> {
/// let session = Session::new(FakeDriver::new());
/// session.css("input[name=q]").clear()?.send_keys("rust")?.submit()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Locator {
    session: Session,
    selector: Selector,
    timeout: Duration,
    poll_interval: Duration,
}

impl Locator {
    /// Create a locator with the default wait settings
    #[must_use]
    pub fn new(session: Session, selector: Selector) -> Self {
        Self {
            session,
            selector,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }

    /// The selector this locator resolves
    #[must_use]
    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// The session this locator resolves through
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Wait timeout currently in effect
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Poll interval currently in effect
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Builder-style timeout override
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder-style poll interval override
    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Change the timeout in place
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Change the poll interval in place
    pub fn set_poll_interval(&mut self, poll_interval: Duration) {
        self.poll_interval = poll_interval;
    }

    /// Locator for CSS descendants of this locator's CSS selector.
    ///
    /// `None` when this locator does not use a CSS selector. Wait settings
    /// carry over.
    #[must_use]
    pub fn descendant_css(&self, child: impl Into<String>) -> Option<Self> {
        let selector = self.selector.descendant_css(child)?;
        Some(Self {
            session: self.session.clone(),
            selector,
            timeout: self.timeout,
            poll_interval: self.poll_interval,
        })
    }

    /// Resolve the first matching element, now
    pub fn resolve_one(&self) -> CargarResult<Box<dyn Element>> {
        self.session.driver().find_one(&self.selector)
    }

    /// Resolve all matching elements, now (possibly none)
    pub fn resolve_all(&self) -> CargarResult<Vec<Box<dyn Element>>> {
        self.session.driver().find_all(&self.selector)
    }

    /// Resolve the first matching element that also satisfies `pred`.
    ///
    /// Fails with [`CargarError::ElementNotFound`] when no current match
    /// satisfies it.
    pub fn resolve_one_where<F>(&self, pred: F) -> CargarResult<Box<dyn Element>>
    where
        F: Fn(&dyn Element) -> bool,
    {
        self.resolve_all()?
            .into_iter()
            .find(|el| pred(el.as_ref()))
            .ok_or_else(|| CargarError::ElementNotFound {
                selector: self.selector.to_string(),
            })
    }

    /// Resolve all matching elements that also satisfy `pred`
    pub fn resolve_all_where<F>(&self, pred: F) -> CargarResult<Vec<Box<dyn Element>>>
    where
        F: Fn(&dyn Element) -> bool,
    {
        Ok(self
            .resolve_all()?
            .into_iter()
            .filter(|el| pred(el.as_ref()))
            .collect())
    }

    /// Whether at least one element currently matches.
    ///
    /// "Nothing matched" is `Ok(false)`; any other driver failure
    /// propagates.
    pub fn exists(&self) -> CargarResult<bool> {
        match self.resolve_one() {
            Ok(_) => Ok(true),
            Err(e) if e.is_element_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Whether the first matching element is visible.
    ///
    /// Fails with [`CargarError::ElementNotFound`] when nothing matches.
    pub fn is_visible(&self) -> CargarResult<bool> {
        Ok(self.resolve_one()?.is_visible())
    }

    /// Text content of the first matching element
    pub fn text(&self) -> CargarResult<String> {
        Ok(self.resolve_one()?.text())
    }

    /// Tag name of the first matching element
    pub fn tag_name(&self) -> CargarResult<String> {
        Ok(self.resolve_one()?.tag_name())
    }

    /// Attribute of the first matching element (`None` when absent)
    pub fn attribute(&self, name: &str) -> CargarResult<Option<String>> {
        Ok(self.resolve_one()?.attribute(name))
    }

    /// Click the first matching element
    pub fn click(&self) -> CargarResult<&Self> {
        self.resolve_one()?.click()?;
        Ok(self)
    }

    /// Submit via the first matching element
    pub fn submit(&self) -> CargarResult<&Self> {
        self.resolve_one()?.submit()?;
        Ok(self)
    }

    /// Clear the first matching element's input value
    pub fn clear(&self) -> CargarResult<&Self> {
        self.resolve_one()?.clear()?;
        Ok(self)
    }

    /// Type into the first matching element
    pub fn send_keys(&self, text: &str) -> CargarResult<&Self> {
        self.resolve_one()?.send_keys(text)?;
        Ok(self)
    }

    /// Poll until the first matching element satisfies `pred`.
    ///
    /// Re-resolves on every attempt. A missing element is retried (and the
    /// last such error retained); any other driver failure propagates
    /// immediately. On deadline this fails with
    /// [`CargarError::WaitTimeout`], chaining the retained "not found" as
    /// its source when the element was never resolved.
    pub fn wait_until<F>(&self, pred: F) -> CargarResult<&Self>
    where
        F: Fn(&dyn Element) -> bool,
    {
        let start = Instant::now();
        let mut last_not_found: Option<CargarError> = None;
        loop {
            match self.resolve_one() {
                Ok(el) => {
                    if pred(el.as_ref()) {
                        trace!(selector = %self.selector, elapsed_ms = start.elapsed().as_millis() as u64, "wait_until satisfied");
                        return Ok(self);
                    }
                }
                Err(e) if e.is_element_not_found() => last_not_found = Some(e),
                Err(e) => return Err(e),
            }
            if start.elapsed() >= self.timeout {
                break;
            }
            thread::sleep(self.poll_interval);
        }
        debug!(selector = %self.selector, timeout_ms = self.timeout.as_millis() as u64, "wait_until timed out");
        Err(CargarError::WaitTimeout {
            ms: self.timeout.as_millis() as u64,
            cause: last_not_found.map(Box::new),
        })
    }

    /// Poll until some matching element satisfies `pred`, returning it.
    ///
    /// Unlike [`Self::wait_until`] this scans every current match and
    /// retries through resolution errors of any kind. On deadline it fails
    /// with an uncaused [`CargarError::WaitTimeout`].
    pub fn wait_for_first_matching<F>(&self, pred: F) -> CargarResult<Box<dyn Element>>
    where
        F: Fn(&dyn Element) -> bool,
    {
        let start = Instant::now();
        loop {
            if let Ok(elements) = self.resolve_all() {
                if let Some(found) = elements.into_iter().find(|el| pred(el.as_ref())) {
                    return Ok(found);
                }
            }
            if start.elapsed() >= self.timeout {
                break;
            }
            thread::sleep(self.poll_interval);
        }
        debug!(selector = %self.selector, timeout_ms = self.timeout.as_millis() as u64, "wait_for_first_matching timed out");
        Err(CargarError::WaitTimeout {
            ms: self.timeout.as_millis() as u64,
            cause: None,
        })
    }
}

/// A locator factory over a [`SelectorTemplate`].
///
/// Holds the session and placeholder pattern; [`Self::format`] produces a
/// ready [`Locator`] per set of values.
#[derive(Debug, Clone)]
pub struct LocatorTemplate {
    session: Session,
    template: SelectorTemplate,
}

impl LocatorTemplate {
    /// Create a locator template
    #[must_use]
    pub fn new(session: Session, template: SelectorTemplate) -> Self {
        Self { session, template }
    }

    /// The underlying selector template
    #[must_use]
    pub fn template(&self) -> &SelectorTemplate {
        &self.template
    }

    /// Substitute values into the placeholders and build a locator
    #[must_use]
    pub fn format<I>(&self, values: I) -> Locator
    where
        I: IntoIterator,
        I::Item: std::fmt::Display,
    {
        Locator::new(self.session.clone(), self.template.format(values))
    }
}
