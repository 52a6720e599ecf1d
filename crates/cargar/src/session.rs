//! Session: the shared handle tests pass around.
//!
//! A [`Session`] bundles the driver connection with a [`Store`] for
//! cross-step data, and is the factory for [`Locator`]s. Cloning is cheap;
//! clones share the driver and the store.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use crate::driver::Driver;
use crate::locator::{Locator, LocatorTemplate};
use crate::selector::{Selector, SelectorKind, SelectorTemplate};
use crate::store::Store;

/// Shared driver handle plus scratch store.
///
/// The driver is not assumed thread-safe, so the handle is `Rc`, not `Arc`;
/// the whole framework is single-threaded and blocking.
#[derive(Clone)]
pub struct Session {
    driver: Rc<dyn Driver>,
    store: Rc<RefCell<Store>>,
}

impl Session {
    /// Create a session over a driver
    pub fn new(driver: impl Driver + 'static) -> Self {
        Self {
            driver: Rc::new(driver),
            store: Rc::new(RefCell::new(Store::new())),
        }
    }

    /// The underlying driver
    #[must_use]
    pub fn driver(&self) -> &dyn Driver {
        self.driver.as_ref()
    }

    /// Read access to the shared store
    #[must_use]
    pub fn store(&self) -> Ref<'_, Store> {
        self.store.borrow()
    }

    /// Write access to the shared store
    #[must_use]
    pub fn store_mut(&self) -> RefMut<'_, Store> {
        self.store.borrow_mut()
    }

    /// Locator for an already-built selector
    #[must_use]
    pub fn locator(&self, selector: Selector) -> Locator {
        Locator::new(self.clone(), selector)
    }

    /// Locator for a CSS selector
    #[must_use]
    pub fn css(&self, pattern: impl Into<String>) -> Locator {
        self.locator(Selector::css(pattern))
    }

    /// Locator for any strategy
    #[must_use]
    pub fn by(&self, kind: SelectorKind, pattern: impl Into<String>) -> Locator {
        self.locator(Selector::new(kind, pattern))
    }

    /// Locator template with `{}` placeholders, formatted per use
    #[must_use]
    pub fn template(&self, kind: SelectorKind, pattern: impl Into<String>) -> LocatorTemplate {
        LocatorTemplate::new(self.clone(), SelectorTemplate::new(kind, pattern))
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("store_entries", &self.store.borrow().len())
            .finish_non_exhaustive()
    }
}
