//! Streams a JSON-LD document as RDF quads.
//!
//! The input is buffered to completion, converted once by the JSON-LD engine, and every
//! resulting quad is rebuilt through a [`DataFactory`] and handed out by a
//! [`ParserStream`]. Prefixes declared by the top-level `@context` are reported on the
//! same stream, ahead of the quads.
//!
//! ```no_run
//! use futures::StreamExt;
//! use rdf_parser_jsonld::{JsonLdParser, ParserEvent, ParserOptions};
//!
//! # async fn run() -> Result<(), rdf_parser_jsonld::ParseError> {
//! let options = ParserOptions::builder()
//!     .base_iri("http://example.org/")
//!     .build()
//!     .unwrap();
//! let input = std::io::Cursor::new(br#"{"@id": "s", "http://example.org/p": "o"}"#.to_vec());
//! let parsed = JsonLdParser::with_options(options)
//!     .import(input)
//!     .collect_quads()
//!     .await?;
//! assert_eq!(parsed.quads[0].subject.value(), "http://example.org/s");
//! # Ok(())
//! # }
//! ```

pub mod consts;
pub mod context;
pub mod engine;
pub mod errors;
pub mod loader;
pub mod model;
pub mod options;
pub mod parser;
pub mod relative;
pub mod stream;
pub mod terms;

pub use errors::{ConversionError, LoadError, ParseError, TermConversionError};
pub use loader::{DocumentLoader, FsDocumentLoader, StaticDocumentLoader};
pub use model::{
    BlankNode, DataFactory, DefaultFactory, LanguageOrDatatype, Literal, NamedNode, Quad, Term,
    TermType,
};
pub use options::{ParserOptions, ParserOptionsBuilder, ParserProfile};
pub use parser::JsonLdParser;
pub use stream::{Event, Input, ParseJob, ParseState, Parsed, ParserEvent, ParserStream};
