// Errors surfaced on the output stream, raised while preprocessing contexts, or
// reported by document loaders.

use crate::model::TermType;
use oxigraph::io::RdfParseError;
use oxigraph::model::{BlankNodeIdParseError, IriParseError, LanguageTagParseError};
use std::path::PathBuf;
use thiserror::Error;

/// Terminal error of a parse. At most one is ever yielded per stream.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The input stream failed; the cause is forwarded unchanged.
    #[error(transparent)]
    UpstreamInput(#[from] std::io::Error),

    #[error("malformed JSON input: {0}")]
    MalformedInput(#[source] serde_json::Error),

    #[error("JSON-LD conversion failed: {0}")]
    ConversionFailed(#[from] ConversionError),

    /// The engine emitted a term outside the four known kinds.
    #[error("unknown term kind: {0}")]
    UnknownTermKind(String),
}

/// A JSON-LD semantic failure: bad contexts, unloadable remote contexts, or anything the
/// engine rejects.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("invalid base IRI <{iri}>: {source}")]
    InvalidBaseIri {
        iri: String,
        #[source]
        source: IriParseError,
    },

    #[error("invalid local context: {0}")]
    InvalidContext(String),

    #[error("no document loader configured to dereference remote context <{0}>")]
    NoDocumentLoader(String),

    #[error("loading remote context <{url}> failed: {source}")]
    ContextLoad {
        url: String,
        #[source]
        source: LoadError,
    },

    #[error("remote document <{0}> has no @context entry")]
    InvalidRemoteContext(String),

    #[error("recursive inclusion of remote context <{0}>")]
    RecursiveContext(String),

    #[error("failed to serialize the document for conversion: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error(transparent)]
    Engine(#[from] RdfParseError),
}

/// Failure of a [`crate::loader::DocumentLoader`].
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unknown context url: {0}")]
    UnknownDocumentUrl(String),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("document for {url} is not valid JSON: {source}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Raised when a canonical quad cannot be expressed as an oxigraph quad.
#[derive(Debug, Error)]
pub enum TermConversionError {
    #[error("invalid IRI <{iri}>: {source}")]
    Iri {
        iri: String,
        #[source]
        source: IriParseError,
    },

    #[error("invalid blank node label {id}: {source}")]
    BlankNode {
        id: String,
        #[source]
        source: BlankNodeIdParseError,
    },

    #[error("invalid language tag {language}: {source}")]
    Language {
        language: String,
        #[source]
        source: LanguageTagParseError,
    },

    #[error("a {term_type} cannot be used as {position}")]
    Position {
        position: &'static str,
        term_type: TermType,
    },
}
