//! Sink-style entry point: a parser holds options and a factory and turns each input it
//! is given into its own [`ParserStream`].

use crate::model::{DataFactory, DefaultFactory};
use crate::options::ParserOptions;
use crate::stream::{Input, ParseJob, ParserStream};
use serde_json::Value;
use std::sync::Arc;
use tokio::io::AsyncRead;

/// ```no_run
/// use futures::StreamExt;
/// use rdf_parser_jsonld::{JsonLdParser, ParserEvent};
///
/// # async fn run() -> Result<(), rdf_parser_jsonld::ParseError> {
/// let file = tokio::fs::File::open("data.jsonld").await?;
/// let mut stream = JsonLdParser::new().import(file);
/// while let Some(event) = stream.next().await {
///     if let ParserEvent::Quad(quad) = event? {
///         println!("{}", quad);
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct JsonLdParser<F: DataFactory = DefaultFactory> {
    options: ParserOptions,
    factory: Arc<F>,
}

impl JsonLdParser<DefaultFactory> {
    pub fn new() -> Self {
        Self::with_options(ParserOptions::default())
    }

    pub fn with_options(options: ParserOptions) -> Self {
        Self::with_factory(options, DefaultFactory)
    }

    /// One-off parse of `input` without keeping a parser around.
    pub fn parse<R>(input: R, options: ParserOptions) -> ParserStream<DefaultFactory>
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        Self::with_options(options).import(input)
    }
}

impl Default for JsonLdParser<DefaultFactory> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: DataFactory> JsonLdParser<F> {
    pub fn with_factory(options: ParserOptions, factory: F) -> Self {
        Self {
            options,
            factory: Arc::new(factory),
        }
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Captures a parse of `input` without starting it.
    pub fn job(&self, input: impl Into<Input>) -> ParseJob<F> {
        ParseJob::new(input, self.options.clone(), self.factory.clone())
    }

    pub fn import<R>(&self, input: R) -> ParserStream<F>
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        self.job(Input::reader(input)).start()
    }

    /// Parses a document that is already JSON.
    pub fn import_document(&self, document: Value) -> ParserStream<F> {
        self.job(document).start()
    }
}
