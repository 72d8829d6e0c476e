//! Translation of the JSON-LD engine's plain terms into factory-built terms.
//!
//! A [`TermTranslator`] lives for exactly one parse. It owns the blank-node identity map,
//! so the same engine label always maps to the same factory blank node within that parse
//! while labels from other parses can never collide with it.

use crate::errors::ParseError;
use crate::model::{DataFactory, LanguageOrDatatype};
use crate::relative::RelativeIris;
use std::collections::HashMap;
use std::sync::Arc;

/// A term as reported by the JSON-LD engine, before translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlainTerm {
    NamedNode(String),
    /// Engine-internal blank node label.
    BlankNode(String),
    Literal {
        value: String,
        language: Option<String>,
        datatype: Option<String>,
    },
    DefaultGraph,
    /// Any other kind of term, named by its kind.
    Unsupported(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainQuad {
    pub subject: PlainTerm,
    pub predicate: PlainTerm,
    pub object: PlainTerm,
    pub graph: PlainTerm,
}

pub struct TermTranslator<F: DataFactory> {
    factory: Arc<F>,
    blank_nodes: HashMap<String, F::Term>,
    relative: Option<RelativeIris>,
}

impl<F: DataFactory> TermTranslator<F> {
    /// `relative` must be given when the parse ran against
    /// [`RELATIVE_IRI_PLACEHOLDER`](crate::consts::RELATIVE_IRI_PLACEHOLDER) instead of a
    /// caller supplied base IRI.
    pub fn new(factory: Arc<F>, relative: Option<RelativeIris>) -> Self {
        Self {
            factory,
            blank_nodes: HashMap::new(),
            relative,
        }
    }

    /// Number of distinct blank nodes seen so far.
    pub fn blank_node_count(&self) -> usize {
        self.blank_nodes.len()
    }

    fn iri(&self, iri: String) -> String {
        match &self.relative {
            Some(relative) => relative.restore(&iri).unwrap_or(iri),
            None => iri,
        }
    }

    pub fn translate(&mut self, term: PlainTerm) -> Result<F::Term, ParseError> {
        match term {
            PlainTerm::NamedNode(iri) => Ok(self.factory.named_node(&self.iri(iri))),
            PlainTerm::BlankNode(label) => {
                let factory = &self.factory;
                Ok(self
                    .blank_nodes
                    .entry(label)
                    .or_insert_with(|| factory.blank_node())
                    .clone())
            }
            PlainTerm::Literal {
                value,
                language,
                datatype,
            } => {
                let annotation = match (language, datatype) {
                    (Some(language), _) if !language.is_empty() => {
                        Some(LanguageOrDatatype::Language(language))
                    }
                    (_, Some(datatype)) => Some(LanguageOrDatatype::Datatype(
                        self.factory.named_node(&self.iri(datatype)),
                    )),
                    _ => None,
                };
                Ok(self.factory.literal(&value, annotation))
            }
            PlainTerm::DefaultGraph => Ok(self.factory.default_graph()),
            PlainTerm::Unsupported(kind) => Err(ParseError::UnknownTermKind(kind)),
        }
    }

    pub fn translate_quad(&mut self, quad: PlainQuad) -> Result<F::Quad, ParseError> {
        let subject = self.translate(quad.subject)?;
        let predicate = self.translate(quad.predicate)?;
        let object = self.translate(quad.object)?;
        let graph = self.translate(quad.graph)?;
        Ok(self.factory.quad(subject, predicate, object, graph))
    }
}
