//! Deterministic cache key derivation.
//!
//! Keys are built from an operation tag plus every semantically relevant
//! request field, normalized: locations render canonically regardless of
//! representation, unset optionals render as a fixed sentinel, booleans as
//! "1"/"0", and list fields join with ";" in their given order. Fields
//! join with "|". Equivalent requests always produce identical keys; any
//! differing optional field changes the key.

use crate::api::types::{Location, TravelMode};

const FIELD_SEPARATOR: &str = "|";
const LIST_SEPARATOR: &str = ";";
const UNSET: &str = "-";

/// Accumulates normalized fields into a cache key.
pub struct KeyBuilder {
    parts: Vec<String>,
}

impl KeyBuilder {
    pub fn new(tag: &str) -> Self {
        Self {
            parts: vec![tag.to_string()],
        }
    }

    pub fn locations(mut self, locations: &[Location]) -> Self {
        let joined = locations
            .iter()
            .map(Location::canonical)
            .collect::<Vec<_>>()
            .join(LIST_SEPARATOR);
        self.parts.push(joined);
        self
    }

    pub fn mode(mut self, mode: Option<TravelMode>) -> Self {
        self.parts
            .push(mode.map_or_else(|| UNSET.to_string(), |m| m.as_str().to_string()));
        self
    }

    pub fn flag(mut self, value: Option<bool>) -> Self {
        let token = match value {
            None => UNSET,
            Some(true) => "1",
            Some(false) => "0",
        };
        self.parts.push(token.to_string());
        self
    }

    pub fn list(mut self, values: &[String]) -> Self {
        if values.is_empty() {
            self.parts.push(UNSET.to_string());
        } else {
            self.parts.push(values.join(LIST_SEPARATOR));
        }
        self
    }

    pub fn build(self) -> String {
        self.parts.join(FIELD_SEPARATOR)
    }
}
