//! Page objects: metadata plus a readiness contract.
//!
//! A page object implements [`Page`]: it exposes its [`Session`], describes
//! where it lives ([`PageInfo`]) and what "loaded" means for it
//! ([`ReadinessSpec`]). The trait's default methods derive everything else,
//! so a typical implementation is the two required methods and a handful of
//! locator fields.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::readiness::ReadinessSpec;
use crate::result::{CargarError, CargarResult};
use crate::session::Session;

/// Default ceiling on a full page load (30 seconds)
pub const DEFAULT_LOAD_TIMEOUT_MS: u64 = 30_000;

/// Where a page lives: host, port and path.
///
/// `host` is optional so section pages can declare only their path and
/// [`inherit`](Self::inherit) the rest from a site-root page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    /// Hostname, e.g. `"old.reddit.com"`; `None` until declared or inherited
    pub host: Option<String>,
    /// TCP port; `None` means the default port 80
    pub port: Option<u16>,
    /// Path relative to the host root, e.g. `"/r/rust"`
    pub relative_path: String,
}

impl PageInfo {
    /// Metadata with only a relative path
    #[must_use]
    pub fn at(relative_path: impl Into<String>) -> Self {
        Self {
            host: None,
            port: None,
            relative_path: relative_path.into(),
        }
    }

    /// Set the host
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the port
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the relative path
    #[must_use]
    pub fn relative_path(mut self, relative_path: impl Into<String>) -> Self {
        self.relative_path = relative_path.into();
        self
    }

    /// Fill host and port from a base page's metadata when absent here.
    ///
    /// The relative path is never inherited.
    #[must_use]
    pub fn inherit(mut self, base: &Self) -> Self {
        if self.host.is_none() {
            self.host.clone_from(&base.host);
            if self.port.is_none() {
                self.port = base.port;
            }
        }
        self
    }

    /// Assemble the absolute URL.
    ///
    /// The port is omitted when it is the default 80. Fails with
    /// [`CargarError::PageMetadata`] when no host was ever declared.
    pub fn url(&self) -> CargarResult<String> {
        let host = self.host.as_deref().ok_or_else(|| CargarError::PageMetadata {
            message: format!("no host declared for path {:?}", self.relative_path),
        })?;
        let url = match self.port {
            None | Some(80) => format!("http://{host}{}", self.relative_path),
            Some(port) => format!("http://{host}:{port}{}", self.relative_path),
        };
        Ok(url)
    }
}

/// A page object: session access, location metadata and a load contract.
pub trait Page {
    /// The session this page resolves elements through
    fn session(&self) -> &Session;

    /// The criteria that define this page as loaded.
    ///
    /// Rebuilt per call so locators capture current wait settings.
    fn readiness(&self) -> ReadinessSpec;

    /// Location metadata; defaults to no host and an empty path
    fn info(&self) -> PageInfo {
        PageInfo::default()
    }

    /// Name used in diagnostics; defaults to the implementing type's name
    fn page_name(&self) -> &'static str
    where
        Self: Sized,
    {
        std::any::type_name::<Self>()
    }

    /// Ceiling for [`Self::wait_until_loaded`]
    fn load_timeout(&self) -> Duration {
        Duration::from_millis(DEFAULT_LOAD_TIMEOUT_MS)
    }

    /// Whether the page is loaded right now
    fn is_loaded(&self) -> CargarResult<bool> {
        self.readiness().is_ready()
    }

    /// Poll until the page is loaded or [`Self::load_timeout`] elapses.
    ///
    /// Returns `Ok(false)` on deadline.
    fn wait_until_loaded(&self) -> CargarResult<bool> {
        self.readiness().wait_until_ready(self.load_timeout())
    }

    /// Absolute URL of the page
    fn url(&self) -> CargarResult<String> {
        self.info().url()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::driver::{FakeDriver, FakeElement};
    use crate::readiness::ElementExpectations;
    use crate::selector::Selector;

    mod info_tests {
        use super::*;

        #[test]
        fn test_url_default_port_omitted() {
            let info = PageInfo::at("/r/rust").host("old.reddit.com");
            assert_eq!(info.url().unwrap(), "http://old.reddit.com/r/rust");
        }

        #[test]
        fn test_url_explicit_port_80_omitted() {
            let info = PageInfo::at("/").host("example.org").port(80);
            assert_eq!(info.url().unwrap(), "http://example.org/");
        }

        #[test]
        fn test_url_non_default_port_included() {
            let info = PageInfo::at("/admin").host("localhost").port(8080);
            assert_eq!(info.url().unwrap(), "http://localhost:8080/admin");
        }

        #[test]
        fn test_url_without_host_fails() {
            let err = PageInfo::at("/lost").url().unwrap_err();
            assert!(matches!(err, CargarError::PageMetadata { .. }));
        }

        #[test]
        fn test_inherit_fills_host_and_port() {
            let base = PageInfo::at("/").host("staging.example.org").port(8443);
            let section = PageInfo::at("/settings").inherit(&base);
            assert_eq!(
                section.url().unwrap(),
                "http://staging.example.org:8443/settings"
            );
        }

        #[test]
        fn test_inherit_keeps_own_host() {
            let base = PageInfo::at("/").host("example.org").port(9000);
            let own = PageInfo::at("/x").host("other.example.org").inherit(&base);
            // own host wins, and the base's port does not leak in
            assert_eq!(own.url().unwrap(), "http://other.example.org/x");
        }
    }

    mod page_trait_tests {
        use super::*;

        struct SubredditPage {
            session: Session,
        }

        impl Page for SubredditPage {
            fn session(&self) -> &Session {
                &self.session
            }

            fn readiness(&self) -> ReadinessSpec {
                ReadinessSpec::new().element(
                    "subreddit title",
                    self.session.css("h1.redditname"),
                    ElementExpectations::present(),
                )
            }

            fn info(&self) -> PageInfo {
                PageInfo::at("/r/rust").host("old.reddit.com")
            }
        }

        #[test]
        fn test_default_is_loaded_uses_readiness() {
            let driver = FakeDriver::new();
            let page = SubredditPage {
                session: Session::new(driver.clone()),
            };
            assert!(!page.is_loaded().unwrap());

            driver.place(
                Selector::css("h1.redditname"),
                vec![FakeElement::new("h1").with_text("rust")],
            );
            assert!(page.is_loaded().unwrap());
        }

        #[test]
        fn test_default_url_comes_from_info() {
            let page = SubredditPage {
                session: Session::new(FakeDriver::new()),
            };
            assert_eq!(page.url().unwrap(), "http://old.reddit.com/r/rust");
        }

        #[test]
        fn test_default_name_and_timeout() {
            let page = SubredditPage {
                session: Session::new(FakeDriver::new()),
            };
            assert!(page.page_name().contains("SubredditPage"));
            assert_eq!(
                page.load_timeout(),
                Duration::from_millis(DEFAULT_LOAD_TIMEOUT_MS)
            );
        }
    }
}
