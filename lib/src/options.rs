//! Parser configuration.

use crate::loader::DocumentLoader;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::io::{BufReader, Write};
use std::path::Path;
use std::sync::Arc;

/// Selects how the JSON-LD engine reads the document.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParserProfile {
    /// Any valid JSON-LD document.
    #[default]
    Standard,
    /// Documents written in the JSON-LD streaming profile (`@context` first, `@type`
    /// before other properties). Lets the engine convert without holding the whole
    /// expanded document.
    Streaming,
}

impl ParserProfile {
    pub fn is_streaming(self) -> bool {
        matches!(self, ParserProfile::Streaming)
    }
}

impl From<bool> for ParserProfile {
    fn from(streaming: bool) -> Self {
        if streaming {
            ParserProfile::Streaming
        } else {
            ParserProfile::Standard
        }
    }
}

/// Options recognised by [`crate::JsonLdParser`].
///
/// ```
/// use rdf_parser_jsonld::options::ParserOptions;
/// use serde_json::json;
///
/// let options = ParserOptions::builder()
///     .base_iri("http://example.org/")
///     .context(json!({ "@vocab": "http://example.org/" }))
///     .build()
///     .unwrap();
/// assert_eq!(options.base_iri, "http://example.org/");
/// ```
#[derive(Clone, Default, Builder, Serialize, Deserialize)]
#[builder(pattern = "owned", default)]
#[serde(default)]
pub struct ParserOptions {
    /// Base for relative IRIs. Empty keeps relative IRIs relative.
    #[builder(setter(into))]
    pub base_iri: String,
    /// Context applied underneath any context embedded in the document.
    #[builder(setter(into, strip_option))]
    pub context: Option<Value>,
    /// Dereferences remote contexts. Without one, any remote context fails the parse.
    #[serde(skip)]
    #[builder(setter(custom))]
    pub document_loader: Option<Arc<dyn DocumentLoader>>,
    pub profile: ParserProfile,
}

impl ParserOptionsBuilder {
    pub fn document_loader<L: DocumentLoader + 'static>(self, loader: L) -> Self {
        self.shared_document_loader(Arc::new(loader))
    }

    /// Uses a loader that is shared with other parsers.
    pub fn shared_document_loader(mut self, loader: Arc<dyn DocumentLoader>) -> Self {
        self.document_loader = Some(Some(loader));
        self
    }
}

impl ParserOptions {
    pub fn builder() -> ParserOptionsBuilder {
        ParserOptionsBuilder::default()
    }

    pub fn has_base_iri(&self) -> bool {
        !self.base_iri.is_empty()
    }

    pub fn save_to_file(&self, file: &Path) -> std::io::Result<()> {
        let options_str = serde_json::to_string_pretty(&self)?;
        let mut file = std::fs::File::create(file)?;
        file.write_all(options_str.as_bytes())?;
        Ok(())
    }

    /// Reads options from a JSON file. Document loaders are never persisted.
    pub fn from_file(file: &Path) -> std::io::Result<Self> {
        let file = std::fs::File::open(file)?;
        let reader = BufReader::new(file);
        let options: ParserOptions = serde_json::from_reader(reader)?;
        Ok(options)
    }
}

impl fmt::Debug for ParserOptions {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ParserOptions")
            .field("base_iri", &self.base_iri)
            .field("context", &self.context)
            .field("document_loader", &self.document_loader.is_some())
            .field("profile", &self.profile)
            .finish()
    }
}
