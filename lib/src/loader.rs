//! Document loaders dereference remote `@context` URLs.
//!
//! The parser never performs network I/O itself. Callers plug in a [`DocumentLoader`];
//! this module ships two table-driven ones, an in-memory [`StaticDocumentLoader`] and the
//! file-backed [`FsDocumentLoader`].

use crate::errors::LoadError;
use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Resolves a context URL to its JSON document.
///
/// A loader may be shared by several parses running at the same time, hence `Send + Sync`;
/// any interior state must carry its own synchronization.
#[async_trait]
pub trait DocumentLoader: Send + Sync {
    async fn load(&self, url: &str) -> Result<Value, LoadError>;
}

/// Serves documents from a fixed in-memory table.
#[derive(Debug, Clone, Default)]
pub struct StaticDocumentLoader {
    documents: HashMap<String, Value>,
}

impl StaticDocumentLoader {
    pub fn new<I, K>(documents: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self {
            documents: documents
                .into_iter()
                .map(|(url, document)| (url.into(), document))
                .collect(),
        }
    }

    pub fn insert(&mut self, url: impl Into<String>, document: Value) {
        self.documents.insert(url.into(), document);
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[async_trait]
impl DocumentLoader for StaticDocumentLoader {
    async fn load(&self, url: &str) -> Result<Value, LoadError> {
        self.documents
            .get(url)
            .cloned()
            .ok_or_else(|| LoadError::UnknownDocumentUrl(url.to_string()))
    }
}

/// Maps context URLs to local JSON files.
#[derive(Debug, Clone, Default)]
pub struct FsDocumentLoader {
    map: HashMap<String, PathBuf>,
}

impl FsDocumentLoader {
    /// Accepts anything that iterates `(url, path)` pairs: a `HashMap`, a `BTreeMap`, a
    /// `Vec` of tuples, and so on.
    pub fn new<I, K, P>(map: I) -> Self
    where
        I: IntoIterator<Item = (K, P)>,
        K: Into<String>,
        P: Into<PathBuf>,
    {
        Self {
            map: map
                .into_iter()
                .map(|(url, path)| (url.into(), path.into()))
                .collect(),
        }
    }

    pub fn get(&self, url: &str) -> Option<&Path> {
        self.map.get(url).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[async_trait]
impl DocumentLoader for FsDocumentLoader {
    async fn load(&self, url: &str) -> Result<Value, LoadError> {
        let path = self
            .get(url)
            .ok_or_else(|| LoadError::UnknownDocumentUrl(url.to_string()))?;
        debug!("Reading context {} from {}", url, path.display());
        let content = tokio::fs::read(path).await.map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_slice(&content).map_err(|source| LoadError::Json {
            url: url.to_string(),
            source,
        })
    }
}
