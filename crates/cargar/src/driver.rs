//! Driver abstraction over the browser environment.
//!
//! The core never talks to a browser directly: everything flows through the
//! [`Driver`] trait (selector resolution) and the [`Element`] trait (per-node
//! state and actions). Swapping a real WebDriver-backed implementation for
//! the in-crate [`FakeDriver`] is how the whole crate stays unit-testable.
//!
//! Drivers are consumed through `Rc<dyn Driver>` handles owned by a
//! [`Session`](crate::session::Session); the model is single-threaded and
//! blocking throughout.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::trace;

use crate::result::{CargarError, CargarResult};
use crate::selector::Selector;

/// A resolved DOM node: state queries plus the actions a test can perform.
///
/// Handles are a snapshot of one resolution; they are never cached by the
/// locator layer, so staleness is an implementation concern of the driver.
///
/// `Debug` is a supertrait so results holding boxed elements stay
/// inspectable in assertions.
pub trait Element: std::fmt::Debug {
    /// Lowercased tag name of the node
    fn tag_name(&self) -> String;

    /// Visible text content
    fn text(&self) -> String;

    /// Attribute value, `None` when the attribute is absent
    fn attribute(&self, name: &str) -> Option<String>;

    /// Whether the node is rendered and visible
    fn is_visible(&self) -> bool;

    /// Click the node
    fn click(&self) -> CargarResult<()>;

    /// Submit the form the node belongs to
    fn submit(&self) -> CargarResult<()>;

    /// Clear the node's input value
    fn clear(&self) -> CargarResult<()>;

    /// Type the given text into the node
    fn send_keys(&self, text: &str) -> CargarResult<()>;
}

/// Browser environment capability: resolve selectors to elements.
pub trait Driver {
    /// All elements currently matching `selector`, in document order.
    ///
    /// An empty page match is `Ok(vec![])`, not an error; transport or
    /// protocol failures surface as [`CargarError::Driver`].
    fn find_all(&self, selector: &Selector) -> CargarResult<Vec<Box<dyn Element>>>;

    /// First element matching `selector`.
    ///
    /// Fails with [`CargarError::ElementNotFound`] when nothing matches.
    fn find_one(&self, selector: &Selector) -> CargarResult<Box<dyn Element>> {
        self.find_all(selector)?
            .into_iter()
            .next()
            .ok_or_else(|| CargarError::ElementNotFound {
                selector: selector.to_string(),
            })
    }
}

/// Scripted element state for [`FakeDriver`] pages.
#[derive(Debug, Clone)]
pub struct FakeElement {
    tag: String,
    text: String,
    visible: bool,
    attributes: HashMap<String, String>,
    actions: Rc<RefCell<Vec<String>>>,
}

impl FakeElement {
    /// Create a visible element with the given tag and no text
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            text: String::new(),
            visible: true,
            attributes: HashMap::new(),
            actions: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Set the text content
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Mark the element as hidden
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Set an attribute
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }
}

impl Element for FakeElement {
    fn tag_name(&self) -> String {
        self.tag.clone()
    }

    fn text(&self) -> String {
        self.text.clone()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.get(name).cloned()
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn click(&self) -> CargarResult<()> {
        self.actions.borrow_mut().push(format!("click {}", self.tag));
        Ok(())
    }

    fn submit(&self) -> CargarResult<()> {
        self.actions
            .borrow_mut()
            .push(format!("submit {}", self.tag));
        Ok(())
    }

    fn clear(&self) -> CargarResult<()> {
        self.actions.borrow_mut().push(format!("clear {}", self.tag));
        Ok(())
    }

    fn send_keys(&self, text: &str) -> CargarResult<()> {
        self.actions
            .borrow_mut()
            .push(format!("send_keys {} {:?}", self.tag, text));
        Ok(())
    }
}

#[derive(Debug, Default)]
struct FakeDom {
    elements: HashMap<Selector, Vec<FakeElement>>,
    find_one_calls: usize,
    find_all_calls: usize,
}

/// Scripted in-memory driver for tests.
///
/// Pages are keyed by exact [`Selector`] value. Interior mutability lets a
/// test mutate the page between polls of a waiting locator, and clones share
/// the same DOM:
///
/// ```
/// use cargar::driver::{Driver, FakeDriver, FakeElement};
/// use cargar::selector::Selector;
///
/// let driver = FakeDriver::new();
/// driver.place(Selector::css(".title"), vec![FakeElement::new("h1").with_text("Hello")]);
/// let found = driver.find_one(&Selector::css(".title")).unwrap();
/// assert_eq!(found.text(), "Hello");
/// ```
#[derive(Debug, Clone, Default)]
pub struct FakeDriver {
    dom: Rc<RefCell<FakeDom>>,
    actions: Rc<RefCell<Vec<String>>>,
}

impl FakeDriver {
    /// Create an empty scripted page
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the elements a selector resolves to, replacing any previous set
    pub fn place(&self, selector: Selector, elements: Vec<FakeElement>) {
        let elements: Vec<FakeElement> = elements
            .into_iter()
            .map(|mut e| {
                e.actions = Rc::clone(&self.actions);
                e
            })
            .collect();
        self.dom.borrow_mut().elements.insert(selector, elements);
    }

    /// Remove a selector's elements, as if they left the DOM
    pub fn remove(&self, selector: &Selector) {
        self.dom.borrow_mut().elements.remove(selector);
    }

    /// How many times `find_one` has been called
    #[must_use]
    pub fn find_one_calls(&self) -> usize {
        self.dom.borrow().find_one_calls
    }

    /// How many times `find_all` has been called
    #[must_use]
    pub fn find_all_calls(&self) -> usize {
        self.dom.borrow().find_all_calls
    }

    /// Log of actions performed on elements, oldest first
    #[must_use]
    pub fn actions(&self) -> Vec<String> {
        self.actions.borrow().clone()
    }
}

impl Driver for FakeDriver {
    fn find_all(&self, selector: &Selector) -> CargarResult<Vec<Box<dyn Element>>> {
        let mut dom = self.dom.borrow_mut();
        dom.find_all_calls += 1;
        let matched = dom.elements.get(selector).cloned().unwrap_or_default();
        trace!(selector = %selector, count = matched.len(), "fake find_all");
        Ok(matched
            .into_iter()
            .map(|e| Box::new(e) as Box<dyn Element>)
            .collect())
    }

    fn find_one(&self, selector: &Selector) -> CargarResult<Box<dyn Element>> {
        {
            let mut dom = self.dom.borrow_mut();
            dom.find_one_calls += 1;
        }
        let first = self
            .dom
            .borrow()
            .elements
            .get(selector)
            .and_then(|els| els.first().cloned());
        trace!(selector = %selector, found = first.is_some(), "fake find_one");
        first
            .map(|e| Box::new(e) as Box<dyn Element>)
            .ok_or_else(|| CargarError::ElementNotFound {
                selector: selector.to_string(),
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod element_tests {
        use super::*;

        #[test]
        fn test_builder_sets_state() {
            let el = FakeElement::new("div")
                .with_text("hello")
                .hidden()
                .with_attribute("class", "card wide");
            assert_eq!(el.tag_name(), "div");
            assert_eq!(el.text(), "hello");
            assert!(!el.is_visible());
            assert_eq!(el.attribute("class").as_deref(), Some("card wide"));
            assert_eq!(el.attribute("id"), None);
        }

        #[test]
        fn test_new_element_is_visible() {
            assert!(FakeElement::new("span").is_visible());
        }
    }

    mod driver_tests {
        use super::*;

        #[test]
        fn test_find_all_empty_page_is_ok() {
            let driver = FakeDriver::new();
            let found = driver.find_all(&Selector::css(".none")).unwrap();
            assert!(found.is_empty());
        }

        #[test]
        fn test_find_one_missing_is_not_found() {
            let driver = FakeDriver::new();
            let err = driver.find_one(&Selector::css(".none")).unwrap_err();
            assert!(err.is_element_not_found());
        }

        #[test]
        fn test_find_one_returns_first_in_order() {
            let driver = FakeDriver::new();
            driver.place(
                Selector::css("li"),
                vec![
                    FakeElement::new("li").with_text("first"),
                    FakeElement::new("li").with_text("second"),
                ],
            );
            let found = driver.find_one(&Selector::css("li")).unwrap();
            assert_eq!(found.text(), "first");
        }

        #[test]
        fn test_place_replaces_and_remove_clears() {
            let driver = FakeDriver::new();
            let sel = Selector::id("status");
            driver.place(sel.clone(), vec![FakeElement::new("p").with_text("loading")]);
            driver.place(sel.clone(), vec![FakeElement::new("p").with_text("done")]);
            assert_eq!(driver.find_one(&sel).unwrap().text(), "done");

            driver.remove(&sel);
            assert!(driver.find_one(&sel).is_err());
        }

        #[test]
        fn test_clones_share_the_dom() {
            let driver = FakeDriver::new();
            let view = driver.clone();
            driver.place(Selector::css("a"), vec![FakeElement::new("a")]);
            assert_eq!(view.find_all(&Selector::css("a")).unwrap().len(), 1);
        }

        #[test]
        fn test_call_counters() {
            let driver = FakeDriver::new();
            driver.place(Selector::css("a"), vec![FakeElement::new("a")]);
            let _ = driver.find_one(&Selector::css("a"));
            let _ = driver.find_one(&Selector::css("a"));
            let _ = driver.find_all(&Selector::css("a"));
            assert_eq!(driver.find_one_calls(), 2);
            assert_eq!(driver.find_all_calls(), 1);
        }

        #[test]
        fn test_actions_are_recorded() {
            let driver = FakeDriver::new();
            driver.place(Selector::name("q"), vec![FakeElement::new("input")]);
            let el = driver.find_one(&Selector::name("q")).unwrap();
            el.clear().unwrap();
            el.send_keys("rust").unwrap();
            el.submit().unwrap();
            assert_eq!(
                driver.actions(),
                vec![
                    "clear input".to_string(),
                    "send_keys input \"rust\"".to_string(),
                    "submit input".to_string(),
                ]
            );
        }
    }
}
