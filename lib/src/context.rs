//! Context preprocessing performed before a document reaches the JSON-LD engine.
//!
//! Three things happen here:
//! - prefix bindings are read off a top-level `@context` mapping,
//! - a caller supplied context is layered underneath the embedded one,
//! - remote context references are dereferenced through the configured
//!   [`DocumentLoader`] and inlined, so the engine only ever sees local contexts.

use crate::errors::ConversionError;
use crate::loader::DocumentLoader;
use futures::future::BoxFuture;
use log::{debug, warn};
use serde_json::{json, Map, Value};
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use url::Url;

const CONTEXT: &str = "@context";
const IMPORT: &str = "@import";
const VALUE: &str = "@value";
const TYPE: &str = "@type";
const JSON: &str = "@json";

/// Returns the `(prefix, namespace)` pairs declared by the top-level `@context`, in
/// document order. Only a plain mapping yields bindings; keyword keys are skipped.
pub fn extract_prefixes(document: &Value) -> Vec<(String, String)> {
    let Some(Value::Object(context)) = document.get(CONTEXT) else {
        return Vec::new();
    };
    let mut prefixes = Vec::with_capacity(context.len());
    for (prefix, definition) in context {
        if prefix.starts_with('@') {
            continue;
        }
        let namespace = match definition {
            Value::String(iri) => Some(iri.as_str()),
            Value::Object(term) => term.get("@id").and_then(Value::as_str),
            _ => None,
        };
        match namespace {
            Some(namespace) => prefixes.push((prefix.clone(), namespace.to_string())),
            None => warn!("Context entry '{}' does not bind a namespace", prefix),
        }
    }
    prefixes
}

fn context_items(context: Value) -> Vec<Value> {
    match context {
        Value::Array(items) => items,
        other => vec![other],
    }
}

/// Applies `context` as the initial context of `document`, underneath whatever context
/// the document embeds. A value shaped `{"@context": ...}` is unwrapped first.
pub fn apply_expand_context(document: Value, context: &Value) -> Value {
    let context = match context {
        Value::Object(map) if map.contains_key(CONTEXT) => map[CONTEXT].clone(),
        other => other.clone(),
    };
    match document {
        Value::Object(map) => {
            let mut embedded = None;
            let mut rest = Map::new();
            for (key, value) in map {
                if key == CONTEXT {
                    embedded = Some(value);
                } else {
                    rest.insert(key, value);
                }
            }
            let merged = match embedded {
                None => context,
                Some(embedded) => {
                    let mut items = context_items(context);
                    items.extend(context_items(embedded));
                    Value::Array(items)
                }
            };
            // keep @context first for engines that require it
            let mut out = Map::new();
            out.insert(CONTEXT.to_string(), merged);
            out.extend(rest);
            Value::Object(out)
        }
        Value::Array(items) => json!({ CONTEXT: context, "@graph": items }),
        other => other,
    }
}

/// Resolves `reference` against `base`. Absolute references are returned verbatim so they
/// match loader tables exactly.
fn resolve_reference(base: Option<&str>, reference: &str) -> String {
    if Url::parse(reference).is_ok() {
        return reference.to_string();
    }
    base.and_then(|base| Url::parse(base).ok())
        .and_then(|base| base.join(reference).ok())
        .map(String::from)
        .unwrap_or_else(|| reference.to_string())
}

fn remote_context(url: &str, document: Value) -> Result<Value, ConversionError> {
    match document {
        Value::Object(mut map) => map
            .remove(CONTEXT)
            .ok_or_else(|| ConversionError::InvalidRemoteContext(url.to_string())),
        _ => Err(ConversionError::InvalidRemoteContext(url.to_string())),
    }
}

/// Tracks which terms of the active context hold JSON literals after `context` is applied.
fn update_json_terms(terms: &mut HashSet<String>, context: &Value) {
    match context {
        Value::Null => terms.clear(),
        Value::Array(items) => {
            for item in items {
                update_json_terms(terms, item);
            }
        }
        Value::Object(definitions) => {
            for (term, definition) in definitions {
                if term.starts_with('@') {
                    continue;
                }
                if definition.get(TYPE).and_then(Value::as_str) == Some(JSON) {
                    terms.insert(term.clone());
                } else {
                    terms.remove(term);
                }
            }
        }
        _ => {}
    }
}

struct ContextResolver<'l> {
    loader: Option<&'l dyn DocumentLoader>,
    loaded: HashMap<String, Value>,
}

impl<'l> ContextResolver<'l> {
    async fn load(&mut self, url: &str) -> Result<Value, ConversionError> {
        if let Some(context) = self.loaded.get(url) {
            return Ok(context.clone());
        }
        let loader = self
            .loader
            .ok_or_else(|| ConversionError::NoDocumentLoader(url.to_string()))?;
        debug!("Loading remote context <{}>", url);
        let remote = loader
            .load(url)
            .await
            .map_err(|source| ConversionError::ContextLoad {
                url: url.to_string(),
                source,
            })?;
        let context = remote_context(url, remote)?;
        self.loaded.insert(url.to_string(), context.clone());
        Ok(context)
    }

    // Walks node objects. Value objects and values of JSON-typed terms are literal data,
    // so any `@context` key inside them is left alone.
    fn resolve_node<'a>(
        &'a mut self,
        value: &'a mut Value,
        base: Option<&'a str>,
        json_terms: &'a HashSet<String>,
    ) -> BoxFuture<'a, Result<(), ConversionError>> {
        Box::pin(async move {
            match value {
                Value::Object(map) => {
                    if map.contains_key(VALUE) {
                        return Ok(());
                    }
                    let mut terms = Cow::Borrowed(json_terms);
                    if let Some(context) = map.get_mut(CONTEXT) {
                        let local = std::mem::take(context);
                        *context = self.resolve_context(local, base, &mut Vec::new()).await?;
                        update_json_terms(terms.to_mut(), context);
                    }
                    for (key, value) in map.iter_mut() {
                        if key == CONTEXT || terms.contains(key) {
                            continue;
                        }
                        self.resolve_node(value, base, &terms).await?;
                    }
                }
                Value::Array(items) => {
                    for item in items.iter_mut() {
                        self.resolve_node(item, base, json_terms).await?;
                    }
                }
                _ => {}
            }
            Ok(())
        })
    }

    fn resolve_context<'a>(
        &'a mut self,
        context: Value,
        base: Option<&'a str>,
        chain: &'a mut Vec<String>,
    ) -> BoxFuture<'a, Result<Value, ConversionError>> {
        Box::pin(async move {
            match context {
                Value::Null => Ok(Value::Null),
                Value::String(reference) => self.resolve_remote(&reference, base, chain).await,
                Value::Array(items) => {
                    let mut out = Vec::with_capacity(items.len());
                    for item in items {
                        let resolved = self.resolve_context(item, base, chain).await?;
                        out.extend(context_items(resolved));
                    }
                    Ok(Value::Array(out))
                }
                Value::Object(map) => {
                    let mut import = None;
                    let mut definitions = Map::new();
                    for (key, mut value) in map {
                        if key == IMPORT {
                            match value {
                                Value::String(reference) => import = Some(reference),
                                other => {
                                    return Err(ConversionError::InvalidContext(format!(
                                        "@import must be a string, found {}",
                                        other
                                    )))
                                }
                            }
                            continue;
                        }
                        // scoped contexts live inside term definitions
                        if let Some(scoped) = value.get_mut(CONTEXT) {
                            let local = std::mem::take(scoped);
                            *scoped = self.resolve_context(local, base, chain).await?;
                        }
                        definitions.insert(key, value);
                    }
                    let Some(reference) = import else {
                        return Ok(Value::Object(definitions));
                    };
                    match self.resolve_remote(&reference, base, chain).await? {
                        Value::Object(mut imported) => {
                            // local definitions override imported ones
                            imported.extend(definitions);
                            Ok(Value::Object(imported))
                        }
                        _ => Err(ConversionError::InvalidContext(format!(
                            "@import <{}> must reference a single context object",
                            reference
                        ))),
                    }
                }
                other => Err(ConversionError::InvalidContext(format!(
                    "expected null, a string, an array or an object, found {}",
                    other
                ))),
            }
        })
    }

    async fn resolve_remote(
        &mut self,
        reference: &str,
        base: Option<&str>,
        chain: &mut Vec<String>,
    ) -> Result<Value, ConversionError> {
        let url = resolve_reference(base, reference);
        if chain.contains(&url) {
            return Err(ConversionError::RecursiveContext(url));
        }
        let context = self.load(&url).await?;
        chain.push(url.clone());
        let resolved = self.resolve_context(context, Some(&url), chain).await;
        chain.pop();
        resolved
    }
}

/// Dereferences every remote context `document` references, transitively, and returns the
/// document with those references replaced by the loaded contexts.
///
/// Top-level references resolve against `base`; references inside a loaded context
/// resolve against that context's URL. Each URL is loaded at most once per call.
pub async fn resolve_remote_contexts(
    mut document: Value,
    base: Option<&str>,
    loader: Option<&dyn DocumentLoader>,
) -> Result<Value, ConversionError> {
    let mut resolver = ContextResolver {
        loader,
        loaded: HashMap::new(),
    };
    resolver
        .resolve_node(&mut document, base, &HashSet::new())
        .await?;
    Ok(document)
}
