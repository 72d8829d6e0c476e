//! Recovers relative IRIs from a parse that ran without a base IRI.
//!
//! The engine resolves every relative reference against [`RELATIVE_IRI_PLACEHOLDER`].
//! [`relativize`] undoes that resolution structurally, re-creating leading `..` segments
//! from the placeholder segments the reference climbed out of. Resolution also drops
//! spellings such as `./x`, so [`RelativeIris`] remembers the references a document
//! actually wrote and hands those back when they are unambiguous.

use crate::consts::{RELATIVE_IRI_DEPTH, RELATIVE_IRI_PLACEHOLDER, RELATIVE_IRI_SCHEME};
use log::debug;
use serde_json::Value;
use std::collections::HashMap;
use url::Url;

/// Turns an IRI resolved against the placeholder back into a relative reference.
/// Returns `None` for IRIs that did not come from the placeholder.
pub fn relativize(iri: &str) -> Option<String> {
    let rest = iri.strip_prefix(RELATIVE_IRI_SCHEME)?;
    let Some(mut tail) = rest.strip_prefix('/') else {
        return Some(rest.to_string());
    };
    let mut depth = 0;
    while depth < RELATIVE_IRI_DEPTH {
        match tail.strip_prefix(format!("~{}/", depth).as_str()) {
            Some(next) => {
                tail = next;
                depth += 1;
            }
            None => break,
        }
    }
    if depth == 0 {
        // absolute-path reference, or one that climbed above the placeholder root
        return Some(rest.to_string());
    }
    Some(format!("{}{}", "../".repeat(RELATIVE_IRI_DEPTH - depth), tail))
}

/// The relative references written in one document, keyed by their resolved form.
#[derive(Debug, Clone, Default)]
pub struct RelativeIris {
    // `None` marks a resolved form reached from more than one spelling
    originals: HashMap<String, Option<String>>,
}

impl RelativeIris {
    /// Records every relative `@id` and `@type` reference of `document`.
    pub fn collect(document: &Value) -> Self {
        let mut relative = Self::default();
        let Ok(base) = Url::parse(RELATIVE_IRI_PLACEHOLDER) else {
            return relative;
        };
        relative.visit(document, &base);
        debug!(
            "Recorded {} relative references",
            relative.originals.len()
        );
        relative
    }

    fn visit(&mut self, value: &Value, base: &Url) {
        match value {
            Value::Object(map) => {
                for (key, value) in map {
                    match key.as_str() {
                        "@id" | "@type" => self.record_all(value, base),
                        "@value" => {}
                        _ => self.visit(value, base),
                    }
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.visit(item, base);
                }
            }
            _ => {}
        }
    }

    fn record_all(&mut self, value: &Value, base: &Url) {
        match value {
            Value::String(reference) => self.record(reference, base),
            Value::Array(items) => {
                for item in items {
                    self.record_all(item, base);
                }
            }
            _ => {}
        }
    }

    fn record(&mut self, reference: &str, base: &Url) {
        if reference.starts_with('@') || reference.starts_with("_:") {
            return;
        }
        if Url::parse(reference).is_ok() {
            return;
        }
        let Some(resolved) = base
            .join(reference)
            .ok()
            .and_then(|resolved| relativize(resolved.as_str()))
        else {
            return;
        };
        self.originals
            .entry(resolved)
            .and_modify(|original| {
                if original.as_deref() != Some(reference) {
                    *original = None;
                }
            })
            .or_insert_with(|| Some(reference.to_string()));
    }

    /// The relative reference `iri` was resolved from, or `None` when `iri` did not come
    /// from the placeholder.
    pub fn restore(&self, iri: &str) -> Option<String> {
        let resolved = relativize(iri)?;
        match self.originals.get(&resolved) {
            Some(Some(original)) => Some(original.clone()),
            _ => Some(resolved),
        }
    }
}
