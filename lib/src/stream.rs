//! The parse pipeline: buffer the input, convert it once, and hand the quads out one at a
//! time as a [`futures::Stream`].
//!
//! A [`ParseJob`] only captures its input and configuration. Calling [`ParseJob::start`]
//! yields a [`ParserStream`], which does nothing until it is polled. The stream walks
//! through the stages of a parse in a fixed order:
//!
//! ```text
//! Created -> Buffering -> Prefixes -> Converting -> Emitting -> Finished
//!                     \-> (any stage) ----------------------------> Errored
//! ```
//!
//! Quads are translated one per poll, so nothing is produced ahead of the consumer.
//! Dropping the stream abandons the parse.

use crate::context::{apply_expand_context, extract_prefixes, resolve_remote_contexts};
use crate::engine;
use crate::errors::{ConversionError, ParseError};
use crate::model::DataFactory;
use crate::options::ParserOptions;
use crate::relative::RelativeIris;
use crate::terms::{PlainQuad, TermTranslator};
use futures::future::{BoxFuture, FutureExt};
use futures::stream::{FusedStream, Stream, StreamExt};
use log::{debug, info};
use serde_json::Value;
use std::collections::{BTreeMap, VecDeque};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncReadExt};

/// What a parse reads from.
pub enum Input {
    /// A byte stream holding JSON text. It is read to its end before conversion starts.
    Reader(Box<dyn AsyncRead + Send + Unpin>),
    /// An already parsed JSON document.
    Document(Value),
}

impl Input {
    pub fn reader<R: AsyncRead + Send + Unpin + 'static>(reader: R) -> Self {
        Input::Reader(Box::new(reader))
    }
}

impl From<Value> for Input {
    fn from(document: Value) -> Self {
        Input::Document(document)
    }
}

/// An item of a [`ParserStream`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParserEvent<T, Q> {
    /// A prefix declared by the top-level `@context`. All prefixes precede the first quad.
    Prefix { prefix: String, namespace: T },
    Quad(Q),
}

/// The event type produced for factory `F`.
pub type Event<F> = ParserEvent<<F as DataFactory>::Term, <F as DataFactory>::Quad>;

/// Everything a finished parse produced.
#[derive(Debug, Clone)]
pub struct Parsed<T, Q> {
    pub prefixes: BTreeMap<String, T>,
    pub quads: Vec<Q>,
}

/// The stage a [`ParserStream`] is in.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ParseState {
    Created,
    Buffering,
    Prefixes,
    Converting,
    Emitting,
    Finished,
    Errored,
}

/// One parse of one input, not yet started.
pub struct ParseJob<F: DataFactory> {
    input: Input,
    options: ParserOptions,
    factory: Arc<F>,
}

impl<F: DataFactory> ParseJob<F> {
    pub fn new(input: impl Into<Input>, options: ParserOptions, factory: Arc<F>) -> Self {
        Self {
            input: input.into(),
            options,
            factory,
        }
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    pub fn start(self) -> ParserStream<F> {
        ParserStream {
            stage: Stage::Created {
                input: self.input,
                options: self.options,
            },
            factory: self.factory,
        }
    }
}

type Buffering = BoxFuture<'static, Result<Option<Value>, ParseError>>;
type Converting = BoxFuture<'static, Result<Vec<PlainQuad>, ConversionError>>;

enum Stage<F: DataFactory> {
    Created {
        input: Input,
        options: ParserOptions,
    },
    Buffering {
        read: Buffering,
        options: ParserOptions,
    },
    Prefixes {
        pending: VecDeque<(String, String)>,
        document: Value,
        options: ParserOptions,
    },
    Converting {
        convert: Converting,
        relative: Option<RelativeIris>,
    },
    Emitting {
        quads: std::vec::IntoIter<PlainQuad>,
        translator: TermTranslator<F>,
        emitted: usize,
    },
    Finished,
    Errored,
}

// Returns `None` for an empty input.
async fn buffer(input: Input) -> Result<Option<Value>, ParseError> {
    match input {
        Input::Document(document) => Ok(Some(document)),
        Input::Reader(mut reader) => {
            let mut data = Vec::new();
            reader.read_to_end(&mut data).await?;
            debug!("Buffered {} bytes of input", data.len());
            if data.is_empty() {
                return Ok(None);
            }
            serde_json::from_slice(&data)
                .map(Some)
                .map_err(ParseError::MalformedInput)
        }
    }
}

async fn convert(
    document: Value,
    options: ParserOptions,
) -> Result<Vec<PlainQuad>, ConversionError> {
    let document = match &options.context {
        Some(context) => apply_expand_context(document, context),
        None => document,
    };
    let base = options.has_base_iri().then_some(options.base_iri.as_str());
    let document =
        resolve_remote_contexts(document, base, options.document_loader.as_deref()).await?;
    engine::to_rdf(&document, &options.base_iri, options.profile)
}

/// Quads (and prefixes) of one parse. Yields at most one error, after which it ends.
pub struct ParserStream<F: DataFactory> {
    stage: Stage<F>,
    factory: Arc<F>,
}

impl<F: DataFactory> ParserStream<F> {
    pub fn state(&self) -> ParseState {
        match self.stage {
            Stage::Created { .. } => ParseState::Created,
            Stage::Buffering { .. } => ParseState::Buffering,
            Stage::Prefixes { .. } => ParseState::Prefixes,
            Stage::Converting { .. } => ParseState::Converting,
            Stage::Emitting { .. } => ParseState::Emitting,
            Stage::Finished => ParseState::Finished,
            Stage::Errored => ParseState::Errored,
        }
    }

    /// Drains the stream, returning the first error if the parse failed.
    pub async fn collect_quads(mut self) -> Result<Parsed<F::Term, F::Quad>, ParseError> {
        let mut parsed = Parsed {
            prefixes: BTreeMap::new(),
            quads: Vec::new(),
        };
        while let Some(event) = self.next().await {
            match event? {
                ParserEvent::Prefix { prefix, namespace } => {
                    parsed.prefixes.insert(prefix, namespace);
                }
                ParserEvent::Quad(quad) => parsed.quads.push(quad),
            }
        }
        Ok(parsed)
    }

    fn fail(&mut self, error: ParseError) -> Poll<Option<Result<Event<F>, ParseError>>> {
        debug!("Parse failed: {}", error);
        self.stage = Stage::Errored;
        Poll::Ready(Some(Err(error)))
    }
}

impl<F: DataFactory> Stream for ParserStream<F> {
    type Item = Result<Event<F>, ParseError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            match std::mem::replace(&mut this.stage, Stage::Finished) {
                Stage::Created { input, options } => {
                    debug!("Buffering JSON-LD input");
                    this.stage = Stage::Buffering {
                        read: Box::pin(buffer(input)),
                        options,
                    };
                }
                Stage::Buffering { mut read, options } => match read.poll_unpin(cx) {
                    Poll::Pending => {
                        this.stage = Stage::Buffering { read, options };
                        return Poll::Pending;
                    }
                    Poll::Ready(Ok(None)) => {
                        debug!("Input is empty, nothing to parse");
                        return Poll::Ready(None);
                    }
                    Poll::Ready(Ok(Some(document))) => {
                        this.stage = Stage::Prefixes {
                            pending: extract_prefixes(&document).into(),
                            document,
                            options,
                        };
                    }
                    Poll::Ready(Err(error)) => return this.fail(error),
                },
                Stage::Prefixes {
                    mut pending,
                    document,
                    options,
                } => match pending.pop_front() {
                    Some((prefix, namespace)) => {
                        debug!("Found prefix {}: <{}>", prefix, namespace);
                        let namespace = this.factory.named_node(&namespace);
                        this.stage = Stage::Prefixes {
                            pending,
                            document,
                            options,
                        };
                        return Poll::Ready(Some(Ok(ParserEvent::Prefix { prefix, namespace })));
                    }
                    None => {
                        let relative = (!options.has_base_iri())
                            .then(|| RelativeIris::collect(&document));
                        this.stage = Stage::Converting {
                            convert: Box::pin(convert(document, options)),
                            relative,
                        };
                    }
                },
                Stage::Converting {
                    mut convert,
                    relative,
                } => match convert.poll_unpin(cx) {
                    Poll::Pending => {
                        this.stage = Stage::Converting { convert, relative };
                        return Poll::Pending;
                    }
                    Poll::Ready(Ok(quads)) => {
                        debug!("Conversion produced {} quads", quads.len());
                        this.stage = Stage::Emitting {
                            quads: quads.into_iter(),
                            translator: TermTranslator::new(this.factory.clone(), relative),
                            emitted: 0,
                        };
                    }
                    Poll::Ready(Err(error)) => return this.fail(error.into()),
                },
                Stage::Emitting {
                    mut quads,
                    mut translator,
                    emitted,
                } => match quads.next() {
                    Some(quad) => match translator.translate_quad(quad) {
                        Ok(quad) => {
                            this.stage = Stage::Emitting {
                                quads,
                                translator,
                                emitted: emitted + 1,
                            };
                            return Poll::Ready(Some(Ok(ParserEvent::Quad(quad))));
                        }
                        Err(error) => return this.fail(error),
                    },
                    None => {
                        info!(
                            "Parsed {} quads with {} blank nodes",
                            emitted,
                            translator.blank_node_count()
                        );
                        return Poll::Ready(None);
                    }
                },
                Stage::Finished => return Poll::Ready(None),
                Stage::Errored => {
                    this.stage = Stage::Errored;
                    return Poll::Ready(None);
                }
            }
        }
    }
}

impl<F: DataFactory> FusedStream for ParserStream<F> {
    fn is_terminated(&self) -> bool {
        matches!(self.stage, Stage::Finished | Stage::Errored)
    }
}
