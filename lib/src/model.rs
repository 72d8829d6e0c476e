//! Canonical RDF term and quad model emitted by the parser, together with the
//! [`DataFactory`] capability through which every emitted term is built.
//!
//! Consumers that want their own term representation implement [`DataFactory`] and hand
//! it to [`crate::JsonLdParser::with_factory`]; everything else uses [`DefaultFactory`].

use crate::consts::{RDF_LANG_STRING, XSD_STRING};
use crate::errors::TermConversionError;
use oxigraph::model::{
    BlankNode as OxBlankNode, GraphName, Literal as OxLiteral, NamedNode as OxNamedNode,
    NamedOrBlankNode, Quad as OxQuad, Term as OxTerm,
};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_BLANK_NODE: AtomicU64 = AtomicU64::new(0);

/// The four kinds of term a quad position can hold.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TermType {
    NamedNode,
    BlankNode,
    Literal,
    DefaultGraph,
}

impl fmt::Display for TermType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            TermType::NamedNode => "NamedNode",
            TermType::BlankNode => "BlankNode",
            TermType::Literal => "Literal",
            TermType::DefaultGraph => "DefaultGraph",
        };
        write!(f, "{}", name)
    }
}

/// An IRI. The value may be relative when the document was parsed without a base IRI.
#[derive(Debug, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NamedNode {
    iri: String,
}

impl NamedNode {
    pub fn new(iri: impl Into<String>) -> Self {
        Self { iri: iri.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.iri
    }

    pub fn into_string(self) -> String {
        self.iri
    }
}

impl fmt::Display for NamedNode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<{}>", self.iri)
    }
}

/// An anonymous node. Two blank nodes are the same node iff their labels are equal.
#[derive(Debug, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct BlankNode {
    id: String,
}

impl BlankNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// Mints a blank node whose label has never been handed out by this process.
    pub fn fresh() -> Self {
        let n = NEXT_BLANK_NODE.fetch_add(1, Ordering::Relaxed);
        Self { id: format!("b{}", n) }
    }

    pub fn as_str(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for BlankNode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "_:{}", self.id)
    }
}

/// A literal. Language-tagged literals always carry `rdf:langString` as datatype and
/// literals without language or explicit datatype carry `xsd:string`.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Literal {
    value: String,
    language: Option<String>,
    datatype: NamedNode,
}

impl Literal {
    pub fn new_simple(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            language: None,
            datatype: NamedNode::new(XSD_STRING.as_str()),
        }
    }

    pub fn new_language_tagged(value: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            language: Some(language.into()),
            datatype: NamedNode::new(RDF_LANG_STRING.as_str()),
        }
    }

    pub fn new_typed(value: impl Into<String>, datatype: NamedNode) -> Self {
        Self {
            value: value.into(),
            language: None,
            datatype,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn datatype(&self) -> &NamedNode {
        &self.datatype
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self.value)?;
        match &self.language {
            Some(language) => write!(f, "@{}", language),
            None if self.datatype.as_str() == XSD_STRING.as_str() => Ok(()),
            None => write!(f, "^^{}", self.datatype),
        }
    }
}

/// A term in any quad position.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Term {
    NamedNode(NamedNode),
    BlankNode(BlankNode),
    Literal(Literal),
    DefaultGraph,
}

impl Term {
    pub fn term_type(&self) -> TermType {
        match self {
            Term::NamedNode(_) => TermType::NamedNode,
            Term::BlankNode(_) => TermType::BlankNode,
            Term::Literal(_) => TermType::Literal,
            Term::DefaultGraph => TermType::DefaultGraph,
        }
    }

    /// The lexical value: IRI, blank node label or literal value. Empty for the default graph.
    pub fn value(&self) -> &str {
        match self {
            Term::NamedNode(n) => n.as_str(),
            Term::BlankNode(b) => b.as_str(),
            Term::Literal(l) => l.value(),
            Term::DefaultGraph => "",
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(l) => Some(l),
            _ => None,
        }
    }

    pub fn is_blank_node(&self) -> bool {
        matches!(self, Term::BlankNode(_))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Term::NamedNode(n) => n.fmt(f),
            Term::BlankNode(b) => b.fmt(f),
            Term::Literal(l) => l.fmt(f),
            Term::DefaultGraph => Ok(()),
        }
    }
}

impl From<NamedNode> for Term {
    fn from(node: NamedNode) -> Self {
        Term::NamedNode(node)
    }
}

impl From<BlankNode> for Term {
    fn from(node: BlankNode) -> Self {
        Term::BlankNode(node)
    }
}

impl From<Literal> for Term {
    fn from(literal: Literal) -> Self {
        Term::Literal(literal)
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Quad {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
    pub graph: Term,
}

impl fmt::Display for Quad {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} {}", self.subject, self.predicate, self.object)?;
        if self.graph != Term::DefaultGraph {
            write!(f, " {}", self.graph)?;
        }
        write!(f, " .")
    }
}

/// Second argument of [`DataFactory::literal`].
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum LanguageOrDatatype<T> {
    Language(String),
    Datatype(T),
}

/// Term and quad construction capability.
///
/// The parser never builds a term on its own: every subject, predicate, object, graph and
/// prefix namespace passes through one of these methods.
pub trait DataFactory: Send + Sync + 'static {
    type Term: Clone + fmt::Debug + Send + Unpin + 'static;
    type Quad: fmt::Debug + Send + Unpin + 'static;

    fn named_node(&self, iri: &str) -> Self::Term;

    /// Returns a blank node distinct from every blank node returned before.
    fn blank_node(&self) -> Self::Term;

    /// Builds a literal; `None` means a plain `xsd:string` literal.
    fn literal(&self, value: &str, annotation: Option<LanguageOrDatatype<Self::Term>>)
        -> Self::Term;

    fn default_graph(&self) -> Self::Term;

    fn quad(
        &self,
        subject: Self::Term,
        predicate: Self::Term,
        object: Self::Term,
        graph: Self::Term,
    ) -> Self::Quad;
}

/// Builds the canonical [`Term`] and [`Quad`] model.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultFactory;

impl DataFactory for DefaultFactory {
    type Term = Term;
    type Quad = Quad;

    fn named_node(&self, iri: &str) -> Term {
        Term::NamedNode(NamedNode::new(iri))
    }

    fn blank_node(&self) -> Term {
        Term::BlankNode(BlankNode::fresh())
    }

    fn literal(&self, value: &str, annotation: Option<LanguageOrDatatype<Term>>) -> Term {
        let literal = match annotation {
            Some(LanguageOrDatatype::Language(language)) => {
                Literal::new_language_tagged(value, language)
            }
            Some(LanguageOrDatatype::Datatype(Term::NamedNode(datatype))) => {
                Literal::new_typed(value, datatype)
            }
            // datatypes are always IRIs; anything else degrades to a simple literal
            Some(LanguageOrDatatype::Datatype(_)) | None => Literal::new_simple(value),
        };
        Term::Literal(literal)
    }

    fn default_graph(&self) -> Term {
        Term::DefaultGraph
    }

    fn quad(&self, subject: Term, predicate: Term, object: Term, graph: Term) -> Quad {
        Quad {
            subject,
            predicate,
            object,
            graph,
        }
    }
}

fn ox_named_node(node: &NamedNode) -> Result<OxNamedNode, TermConversionError> {
    OxNamedNode::new(node.as_str()).map_err(|source| TermConversionError::Iri {
        iri: node.as_str().to_string(),
        source,
    })
}

fn ox_blank_node(node: &BlankNode) -> Result<OxBlankNode, TermConversionError> {
    OxBlankNode::new(node.as_str()).map_err(|source| TermConversionError::BlankNode {
        id: node.as_str().to_string(),
        source,
    })
}

fn position_error(position: &'static str, term: &Term) -> TermConversionError {
    TermConversionError::Position {
        position,
        term_type: term.term_type(),
    }
}

impl TryFrom<&Quad> for OxQuad {
    type Error = TermConversionError;

    fn try_from(quad: &Quad) -> Result<Self, Self::Error> {
        let subject: NamedOrBlankNode = match &quad.subject {
            Term::NamedNode(n) => ox_named_node(n)?.into(),
            Term::BlankNode(b) => ox_blank_node(b)?.into(),
            other => return Err(position_error("subject", other)),
        };
        let predicate = match &quad.predicate {
            Term::NamedNode(n) => ox_named_node(n)?,
            other => return Err(position_error("predicate", other)),
        };
        let object: OxTerm = match &quad.object {
            Term::NamedNode(n) => ox_named_node(n)?.into(),
            Term::BlankNode(b) => ox_blank_node(b)?.into(),
            Term::Literal(l) => match l.language() {
                Some(language) => OxLiteral::new_language_tagged_literal(l.value(), language)
                    .map_err(|source| TermConversionError::Language {
                        language: language.to_string(),
                        source,
                    })?
                    .into(),
                None => OxLiteral::new_typed_literal(l.value(), ox_named_node(l.datatype())?)
                    .into(),
            },
            other => return Err(position_error("object", other)),
        };
        let graph_name = match &quad.graph {
            Term::NamedNode(n) => GraphName::NamedNode(ox_named_node(n)?),
            Term::BlankNode(b) => GraphName::BlankNode(ox_blank_node(b)?),
            Term::DefaultGraph => GraphName::DefaultGraph,
            other => return Err(position_error("graph", other)),
        };
        Ok(OxQuad::new(subject, predicate, object, graph_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_blank_nodes_are_distinct() {
        let a = BlankNode::fresh();
        let b = BlankNode::fresh();
        assert_ne!(a, b);
    }

    #[test]
    fn test_default_factory_literals() {
        let factory = DefaultFactory;
        let plain = factory.literal("object", None);
        let plain = plain.as_literal().unwrap();
        assert_eq!(plain.language(), None);
        assert_eq!(plain.datatype().as_str(), XSD_STRING.as_str());

        let tagged = factory.literal("object", Some(LanguageOrDatatype::Language("en".into())));
        let tagged = tagged.as_literal().unwrap();
        assert_eq!(tagged.language(), Some("en"));
        assert_eq!(tagged.datatype().as_str(), RDF_LANG_STRING.as_str());

        let datatype = factory.named_node("http://example.org/datatype");
        let typed = factory.literal("object", Some(LanguageOrDatatype::Datatype(datatype)));
        let typed = typed.as_literal().unwrap();
        assert_eq!(typed.language(), None);
        assert_eq!(typed.datatype().as_str(), "http://example.org/datatype");
    }

    #[test]
    fn test_quad_display() {
        let factory = DefaultFactory;
        let quad = factory.quad(
            factory.named_node("http://example.org/s"),
            factory.named_node("http://example.org/p"),
            factory.literal("o", Some(LanguageOrDatatype::Language("en".into()))),
            factory.named_node("http://example.org/g"),
        );
        assert_eq!(
            quad.to_string(),
            "<http://example.org/s> <http://example.org/p> \"o\"@en <http://example.org/g> ."
        );
    }

    #[test]
    fn test_to_oxigraph_quad() {
        let factory = DefaultFactory;
        let quad = factory.quad(
            factory.named_node("http://example.org/s"),
            factory.named_node("http://example.org/p"),
            factory.literal("o", None),
            factory.default_graph(),
        );
        let converted = OxQuad::try_from(&quad).unwrap();
        assert_eq!(converted.subject.to_string(), "<http://example.org/s>");
        assert!(converted.graph_name.is_default_graph());

        // relative IRIs are not valid oxigraph terms
        let relative = factory.quad(
            factory.named_node("subject"),
            factory.named_node("http://example.org/p"),
            factory.literal("o", None),
            factory.default_graph(),
        );
        assert!(OxQuad::try_from(&relative).is_err());

        let literal_subject = factory.quad(
            factory.literal("s", None),
            factory.named_node("http://example.org/p"),
            factory.literal("o", None),
            factory.default_graph(),
        );
        assert!(matches!(
            OxQuad::try_from(&literal_subject),
            Err(TermConversionError::Position {
                position: "subject",
                ..
            })
        ));
    }
}
