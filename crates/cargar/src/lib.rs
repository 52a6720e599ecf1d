//! Cargar: page-object core for browser automation.
//!
//! Cargar (Spanish: "to load") provides the load-state machinery a page
//! object framework is built on:
//!
//! - [`Locator`] — a lazy query that re-resolves its [`Selector`] against
//!   the live page on every use, with blocking wait/poll semantics
//! - [`ReadinessSpec`] — declarative per-element criteria aggregated into a
//!   single "is this page loaded?" verdict
//! - [`Ternary`] — three-valued logic so a criterion can assert true,
//!   false, or not care
//! - [`Session`] — the shared driver handle and cross-step [`Store`]
//!
//! The browser itself sits behind the [`Driver`]/[`Element`] traits; the
//! in-crate [`FakeDriver`] scripts a page for tests.
//!
//! # Example
//!
//! ```
//! use cargar::prelude::*;
//!
//! let driver = FakeDriver::new();
//! driver.place(
//!     Selector::css(".redditname"),
//!     vec![FakeElement::new("a").with_text("rust"), FakeElement::new("a").with_text("programming")],
//! );
//! let session = Session::new(driver);
//!
//! let spec = ReadinessSpec::new().element(
//!     "subreddit links",
//!     session.css(".redditname"),
//!     ElementExpectations::present().visibility(Ternary::True).find_exactly(2),
//! );
//! assert!(spec.is_ready().unwrap());
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

pub mod driver;
pub mod locator;
pub mod page;
pub mod readiness;
pub mod result;
pub mod selector;
pub mod session;
pub mod store;
pub mod ternary;

pub use driver::{Driver, Element, FakeDriver, FakeElement};
pub use locator::{Locator, LocatorTemplate, DEFAULT_POLL_INTERVAL_MS, DEFAULT_TIMEOUT_MS};
pub use page::{Page, PageInfo, DEFAULT_LOAD_TIMEOUT_MS};
pub use readiness::{
    CountExpectation, Criterion, CriterionEntry, ElementExpectations, LoaderExpectations,
    ReadinessSpec,
};
pub use result::{CargarError, CargarResult};
pub use selector::{Selector, SelectorKind, SelectorTemplate};
pub use session::Session;
pub use store::{Store, StoreError};
pub use ternary::Ternary;

/// Convenience re-exports for test code
pub mod prelude {
    pub use crate::driver::{Driver, Element, FakeDriver, FakeElement};
    pub use crate::locator::{Locator, LocatorTemplate};
    pub use crate::page::{Page, PageInfo};
    pub use crate::readiness::{ElementExpectations, LoaderExpectations, ReadinessSpec};
    pub use crate::result::{CargarError, CargarResult};
    pub use crate::selector::{Selector, SelectorKind, SelectorTemplate};
    pub use crate::session::Session;
    pub use crate::store::Store;
    pub use crate::ternary::Ternary;
}
