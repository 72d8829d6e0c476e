//! Adapter around oxigraph's JSON-LD to RDF conversion.
//!
//! The engine is consumed as a black box: it receives a fully preprocessed document (all
//! contexts local) and an absolute base IRI, and its quads are reported back as
//! [`PlainQuad`]s in emission order.

use crate::consts::RELATIVE_IRI_PLACEHOLDER;
use crate::errors::ConversionError;
use crate::options::ParserProfile;
use crate::terms::{PlainQuad, PlainTerm};
use log::debug;
use oxigraph::io::{JsonLdProfile, JsonLdProfileSet, RdfFormat, RdfParser};
use oxigraph::model::{GraphName, NamedOrBlankNode, Quad, Term};
use serde_json::Value;
use std::io::Cursor;

/// The base IRI actually handed to the engine.
pub fn effective_base(base_iri: &str) -> &str {
    if base_iri.is_empty() {
        RELATIVE_IRI_PLACEHOLDER
    } else {
        base_iri
    }
}

fn format(profile: ParserProfile) -> RdfFormat {
    let profile = match profile {
        ParserProfile::Standard => JsonLdProfileSet::default(),
        ParserProfile::Streaming => JsonLdProfileSet::from(JsonLdProfile::Streaming),
    };
    RdfFormat::JsonLd { profile }
}

/// Expands `document` and converts it to RDF.
pub fn to_rdf(
    document: &Value,
    base_iri: &str,
    profile: ParserProfile,
) -> Result<Vec<PlainQuad>, ConversionError> {
    let base = effective_base(base_iri);
    let bytes = serde_json::to_vec(document).map_err(ConversionError::Serialize)?;
    debug!(
        "Converting {} bytes of JSON-LD against base <{}>",
        bytes.len(),
        base
    );
    let parser = RdfParser::from_format(format(profile))
        .with_base_iri(base)
        .map_err(|source| ConversionError::InvalidBaseIri {
            iri: base.to_string(),
            source,
        })?;
    let mut quads = Vec::new();
    for quad in parser.for_reader(Cursor::new(bytes)) {
        quads.push(plain_quad(quad?));
    }
    Ok(quads)
}

fn plain_subject(subject: NamedOrBlankNode) -> PlainTerm {
    match subject {
        NamedOrBlankNode::NamedNode(n) => PlainTerm::NamedNode(n.into_string()),
        NamedOrBlankNode::BlankNode(b) => PlainTerm::BlankNode(b.into_string()),
    }
}

#[allow(unreachable_patterns)]
fn plain_object(object: Term) -> PlainTerm {
    match object {
        Term::NamedNode(n) => PlainTerm::NamedNode(n.into_string()),
        Term::BlankNode(b) => PlainTerm::BlankNode(b.into_string()),
        Term::Literal(l) => PlainTerm::Literal {
            value: l.value().to_string(),
            language: l.language().map(str::to_string),
            datatype: Some(l.datatype().as_str().to_string()),
        },
        // quoted triples when oxigraph is built with RDF 1.2 support
        other => PlainTerm::Unsupported(format!("quoted triple {}", other)),
    }
}

fn plain_graph(graph: GraphName) -> PlainTerm {
    match graph {
        GraphName::NamedNode(n) => PlainTerm::NamedNode(n.into_string()),
        GraphName::BlankNode(b) => PlainTerm::BlankNode(b.into_string()),
        GraphName::DefaultGraph => PlainTerm::DefaultGraph,
    }
}

fn plain_quad(quad: Quad) -> PlainQuad {
    PlainQuad {
        subject: plain_subject(quad.subject),
        predicate: PlainTerm::NamedNode(quad.predicate.into_string()),
        object: plain_object(quad.object),
        graph: plain_graph(quad.graph_name),
    }
}
