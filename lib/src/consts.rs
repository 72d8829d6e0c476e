//! Defines constant NamedNodeRefs for the RDF and XSD datatypes the parser assigns to
//! literals, and the placeholder base used when a document is parsed without a base IRI.

use oxigraph::model::NamedNodeRef;

// datatypes
pub const XSD_STRING: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2001/XMLSchema#string");
pub const RDF_LANG_STRING: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/1999/02/22-rdf-syntax-ns#langString");

/// Scheme of the placeholder base used when a document is parsed without a base IRI.
pub const RELATIVE_IRI_SCHEME: &str = "x-jsonld-relative-base:";

/// Number of path segments in [`RELATIVE_IRI_PLACEHOLDER`]. Up to this many leading `..`
/// segments of a relative reference survive resolution against the placeholder.
pub const RELATIVE_IRI_DEPTH: usize = 16;

/// Base IRI handed to the JSON-LD engine when the caller supplied none.
///
/// The engine only resolves relative references against an absolute base, so relative
/// IRIs come back resolved against this hierarchical placeholder and are turned back into
/// relative references before terms are built.
pub const RELATIVE_IRI_PLACEHOLDER: &str =
    "x-jsonld-relative-base:/~0/~1/~2/~3/~4/~5/~6/~7/~8/~9/~10/~11/~12/~13/~14/~15/";
