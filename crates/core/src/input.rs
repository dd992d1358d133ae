//! Trusted and untrusted attribute input
//!
//! A form accepts attributes at two trust levels:
//!
//! - [`Input::Trusted`]: a map built in-process. Every declared field is
//!   routed to its owner regardless of the writable flag.
//! - [`Input::Untrusted`]: externally supplied parameters. Before reaching a
//!   foreign owner the map is restricted to that owner's writable fields via
//!   [`UntrustedParams::permit`].

use crate::value::{Attributes, Value};
use serde::{Deserialize, Serialize};

/// Externally supplied parameters that must be allow-listed before use
///
/// Filtering never mutates in place: [`permit`](Self::permit) and
/// [`slice`](Self::slice) return a new instance of the same kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UntrustedParams {
    values: Attributes,
}

impl UntrustedParams {
    /// Wrap a raw map as untrusted
    pub fn new(values: Attributes) -> Self {
        Self { values }
    }

    /// Keep only the allow-listed keys
    pub fn permit<S: AsRef<str>>(&self, allowed: &[S]) -> UntrustedParams {
        self.slice(allowed)
    }

    /// Keep only the given keys (no trust decision implied)
    pub fn slice<S: AsRef<str>>(&self, keys: &[S]) -> UntrustedParams {
        let values = keys
            .iter()
            .filter_map(|k| {
                self.values
                    .get_key_value(k.as_ref())
                    .map(|(k, v)| (k.clone(), v.clone()))
            })
            .collect();
        UntrustedParams { values }
    }

    /// Borrow the underlying map
    pub fn as_map(&self) -> &Attributes {
        &self.values
    }

    /// Unwrap into the underlying map
    pub fn into_map(self) -> Attributes {
        self.values
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if no parameters were supplied
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for UntrustedParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        UntrustedParams::new(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Attribute input at one of two trust levels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Input {
    /// In-process map, passed through unfiltered
    Trusted(Attributes),
    /// External parameters, filtered per owner by writable flag
    Untrusted(UntrustedParams),
}

impl Default for Input {
    fn default() -> Self {
        Input::Trusted(Attributes::new())
    }
}

impl Input {
    /// Build a trusted input from key/value pairs
    pub fn trusted<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Input::Trusted(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    /// Build an untrusted input from key/value pairs
    pub fn untrusted<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Input::Untrusted(pairs.into_iter().collect())
    }

    /// True if this input must be allow-listed before reaching an owner
    pub fn is_filterable(&self) -> bool {
        matches!(self, Input::Untrusted(_))
    }

    /// The raw map, regardless of trust level
    pub fn as_map(&self) -> &Attributes {
        match self {
            Input::Trusted(map) => map,
            Input::Untrusted(params) => params.as_map(),
        }
    }

    /// Restrict to the given keys, keeping the trust level
    pub fn slice<S: AsRef<str>>(&self, keys: &[S]) -> Input {
        match self {
            Input::Trusted(map) => Input::Trusted(
                keys.iter()
                    .filter_map(|k| {
                        map.get_key_value(k.as_ref())
                            .map(|(k, v)| (k.clone(), v.clone()))
                    })
                    .collect(),
            ),
            Input::Untrusted(params) => Input::Untrusted(params.slice(keys)),
        }
    }

    /// True if no attributes are present
    pub fn is_empty(&self) -> bool {
        self.as_map().is_empty()
    }
}

impl From<Attributes> for Input {
    fn from(map: Attributes) -> Self {
        Input::Trusted(map)
    }
}

impl From<UntrustedParams> for Input {
    fn from(params: UntrustedParams) -> Self {
        Input::Untrusted(params)
    }
}
