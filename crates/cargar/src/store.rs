//! Key-path value store with `${path}` string interpolation.
//!
//! A [`Store`] holds loosely-typed values (JSON) under string paths so test
//! steps can pass data to each other without threading it through every
//! function signature. [`Store::interpolate`] expands `${path}` references
//! inside arbitrary strings, repeatedly, so stored values may themselves
//! contain references.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use thiserror::Error;

/// Interpolation passes allowed before giving up on a self-referencing value
const MAX_INTERPOLATION_PASSES: usize = 32;

/// Errors from store lookups and interpolation
#[derive(Debug, Error)]
pub enum StoreError {
    /// A `${path}` reference named a path with no stored value
    #[error("No value stored under path {path:?}")]
    UnknownPath {
        /// The missing path
        path: String,
    },

    /// A path held a non-string value where text was required
    #[error("Value under path {path:?} is not text")]
    NotText {
        /// The offending path
        path: String,
    },

    /// Interpolation never settled (values reference each other cyclically)
    #[error("Interpolation did not settle after {MAX_INTERPOLATION_PASSES} passes")]
    Unsettled,
}

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // pattern is a literal, compilation cannot fail
    RE.get_or_init(|| Regex::new(r"\$\{([^{}]+)\}").expect("valid placeholder pattern"))
}

/// String-keyed store of JSON values.
#[derive(Debug, Clone, Default)]
pub struct Store {
    items: HashMap<String, Value>,
}

impl Store {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value under a path, replacing any previous value
    pub fn update(&mut self, path: impl Into<String>, value: impl Into<Value>) {
        self.items.insert(path.into(), value.into());
    }

    /// Value stored under a path, if any
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Value> {
        self.items.get(path)
    }

    /// Text stored under a path.
    ///
    /// Fails with [`StoreError::UnknownPath`] when nothing is stored and
    /// [`StoreError::NotText`] when the value is not a JSON string.
    pub fn get_str(&self, path: &str) -> Result<&str, StoreError> {
        match self.items.get(path) {
            None => Err(StoreError::UnknownPath {
                path: path.to_string(),
            }),
            Some(Value::String(s)) => Ok(s),
            Some(_) => Err(StoreError::NotText {
                path: path.to_string(),
            }),
        }
    }

    /// Whether any value is stored under a path
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.items.contains_key(path)
    }

    /// Number of stored values
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Expand every `${path}` reference in `input` with the stored value.
    ///
    /// Expansion repeats until no placeholder remains, so stored values may
    /// themselves contain references. String values substitute verbatim;
    /// other JSON values substitute as their compact JSON rendering.
    ///
    /// ```
    /// use cargar::store::Store;
    ///
    /// let mut store = Store::new();
    /// store.update("user.name", "kate");
    /// store.update("greeting", "hi ${user.name}");
    /// assert_eq!(store.interpolate("${greeting}!").unwrap(), "hi kate!");
    /// ```
    pub fn interpolate(&self, input: &str) -> Result<String, StoreError> {
        let re = placeholder_regex();
        let mut current = input.to_string();
        for _ in 0..MAX_INTERPOLATION_PASSES {
            if !re.is_match(&current) {
                return Ok(current);
            }
            let mut missing = None;
            let next = re
                .replace_all(&current, |caps: &regex::Captures<'_>| {
                    let path = &caps[1];
                    match self.items.get(path) {
                        Some(Value::String(s)) => s.clone(),
                        Some(other) => other.to_string(),
                        None => {
                            if missing.is_none() {
                                missing = Some(path.to_string());
                            }
                            caps[0].to_string()
                        }
                    }
                })
                .into_owned();
            if let Some(path) = missing {
                return Err(StoreError::UnknownPath { path });
            }
            current = next;
        }
        Err(StoreError::Unsettled)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    mod access_tests {
        use super::*;

        #[test]
        fn test_update_get_round_trip() {
            let mut store = Store::new();
            store.update("run.id", 42);
            assert_eq!(store.get("run.id"), Some(&json!(42)));
            assert!(store.contains("run.id"));
            assert!(!store.contains("run.missing"));
        }

        #[test]
        fn test_update_replaces() {
            let mut store = Store::new();
            store.update("k", "old");
            store.update("k", "new");
            assert_eq!(store.get_str("k").unwrap(), "new");
            assert_eq!(store.len(), 1);
        }

        #[test]
        fn test_get_str_errors() {
            let mut store = Store::new();
            store.update("n", 7);
            assert!(matches!(
                store.get_str("n"),
                Err(StoreError::NotText { .. })
            ));
            assert!(matches!(
                store.get_str("absent"),
                Err(StoreError::UnknownPath { .. })
            ));
        }

        #[test]
        fn test_empty() {
            let store = Store::new();
            assert!(store.is_empty());
            assert_eq!(store.len(), 0);
        }
    }

    mod interpolation_tests {
        use super::*;

        #[test]
        fn test_plain_string_passes_through() {
            let store = Store::new();
            assert_eq!(store.interpolate("no refs here").unwrap(), "no refs here");
        }

        #[test]
        fn test_single_placeholder() {
            let mut store = Store::new();
            store.update("user.name", "kate");
            assert_eq!(store.interpolate("hello ${user.name}").unwrap(), "hello kate");
        }

        #[test]
        fn test_multiple_and_repeated_placeholders() {
            let mut store = Store::new();
            store.update("a", "1");
            store.update("b", "2");
            assert_eq!(store.interpolate("${a}-${b}-${a}").unwrap(), "1-2-1");
        }

        #[test]
        fn test_nested_references_settle() {
            let mut store = Store::new();
            store.update("host", "example.org");
            store.update("base", "https://${host}");
            store.update("login", "${base}/login");
            assert_eq!(
                store.interpolate("go to ${login}").unwrap(),
                "go to https://example.org/login"
            );
        }

        #[test]
        fn test_unknown_path_fails() {
            let store = Store::new();
            let err = store.interpolate("${nope}").unwrap_err();
            assert!(matches!(err, StoreError::UnknownPath { path } if path == "nope"));
        }

        #[test]
        fn test_non_string_value_renders_as_json() {
            let mut store = Store::new();
            store.update("count", 3);
            store.update("flag", true);
            assert_eq!(store.interpolate("${count}/${flag}").unwrap(), "3/true");
        }

        #[test]
        fn test_cyclic_references_do_not_hang() {
            let mut store = Store::new();
            store.update("a", "${b}");
            store.update("b", "${a}");
            assert!(matches!(
                store.interpolate("${a}").unwrap_err(),
                StoreError::Unsettled
            ));
        }
    }
}
