use anyhow::{anyhow, Context, Error, Result};
use clap::Parser;
use futures::StreamExt;
use log::{debug, info};
use oxigraph::io::{RdfFormat, RdfSerializer};
use rdf_parser_jsonld::{
    DefaultFactory, FsDocumentLoader, JsonLdParser, ParserEvent, ParserOptions, ParserProfile,
    ParserStream,
};
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use url::Url;

#[derive(Debug, Parser)]
#[command(name = "jsonld2quads")]
#[command(about = "Convert a JSON-LD document to N-Quads")]
#[command(arg_required_else_help = true)]
struct Cli {
    /// The JSON-LD document to convert, '-' reads from stdin
    input: String,
    /// Base IRI for relative IRIs, defaults to the file:// URL of the input file
    #[clap(long, short)]
    base: Option<String>,
    /// JSON file holding a context applied underneath the document's own context
    #[clap(long, short)]
    context: Option<PathBuf>,
    /// Serve a remote context from a local file, given as URL=PATH. Can be repeated.
    #[clap(long = "context-map", short = 'm', value_parser = parse_context_mapping)]
    context_map: Vec<(String, PathBuf)>,
    /// JSON file with parser options; command line flags take precedence
    #[clap(long)]
    config: Option<PathBuf>,
    /// Parse with the JSON-LD streaming profile
    #[clap(long, action, default_value = "false")]
    streaming: bool,
    /// Print the prefixes declared by the document to stderr
    #[clap(long, short, action, default_value = "false")]
    prefixes: bool,
    /// The file to write the quads to, defaults to stdout
    #[clap(long, short)]
    output: Option<PathBuf>,
    /// Verbose mode - sets the RUST_LOG level to info, defaults to warning level
    #[clap(long, short, action, default_value = "false", global = true)]
    verbose: bool,
    /// Debug mode - sets the RUST_LOG level to debug, defaults to warning level
    #[clap(long, action, default_value = "false", global = true)]
    debug: bool,
}

fn parse_context_mapping(value: &str) -> Result<(String, PathBuf), String> {
    match value.split_once('=') {
        Some((url, path)) if !url.is_empty() && !path.is_empty() => {
            Ok((url.to_string(), PathBuf::from(path)))
        }
        _ => Err(format!("expected URL=PATH, found '{}'", value)),
    }
}

fn file_base_iri(path: &Path) -> Result<String> {
    let path = path
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", path.display()))?;
    Url::from_file_path(&path)
        .map(String::from)
        .map_err(|_| anyhow!("Cannot turn {} into a file URL", path.display()))
}

fn build_options(cmd: &Cli) -> Result<ParserOptions> {
    let mut options = match &cmd.config {
        Some(path) => ParserOptions::from_file(path)
            .with_context(|| format!("Failed to read parser options from {}", path.display()))?,
        None => ParserOptions::default(),
    };
    if let Some(base) = &cmd.base {
        options.base_iri = base.clone();
    } else if !options.has_base_iri() && cmd.input != "-" {
        options.base_iri = file_base_iri(Path::new(&cmd.input))?;
    }
    if let Some(path) = &cmd.context {
        let content = std::fs::read(path)
            .with_context(|| format!("Failed to read context {}", path.display()))?;
        let context = serde_json::from_slice(&content)
            .with_context(|| format!("Context {} is not valid JSON", path.display()))?;
        options.context = Some(context);
    }
    if cmd.streaming {
        options.profile = ParserProfile::Streaming;
    }
    if !cmd.context_map.is_empty() {
        let loader = FsDocumentLoader::new(cmd.context_map.iter().cloned());
        debug!("Serving {} remote contexts from local files", loader.len());
        options.document_loader = Some(std::sync::Arc::new(loader));
    }
    debug!("Parser options: {:?}", options);
    Ok(options)
}

async fn write_quads<W: Write>(
    mut stream: ParserStream<DefaultFactory>,
    writer: W,
    prefixes: bool,
) -> Result<usize> {
    let mut serializer = RdfSerializer::from_format(RdfFormat::NQuads).for_writer(writer);
    let mut count = 0;
    while let Some(event) = stream.next().await {
        match event? {
            ParserEvent::Prefix { prefix, namespace } => {
                if prefixes {
                    eprintln!("@prefix {}: {} .", prefix, namespace);
                }
            }
            ParserEvent::Quad(quad) => {
                let quad = oxigraph::model::Quad::try_from(&quad)
                    .with_context(|| format!("Cannot serialize {}", quad))?;
                serializer.serialize_quad(&quad)?;
                count += 1;
            }
        }
    }
    serializer.finish()?;
    Ok(count)
}

pub fn run() -> Result<()> {
    let cmd = Cli::parse();
    execute(cmd)
}

pub fn run_from_args<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cmd = Cli::try_parse_from(args).map_err(Error::from)?;
    execute(cmd)
}

fn execute(cmd: Cli) -> Result<()> {
    // CLI flags for verbosity take precedence over RUST_LOG; default to "warn"
    if cmd.debug {
        std::env::set_var("RUST_LOG", "debug");
    } else if cmd.verbose {
        std::env::set_var("RUST_LOG", "info");
    } else if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "warn");
    }
    let _ = env_logger::try_init();

    let options = build_options(&cmd)?;
    let runtime = tokio::runtime::Runtime::new()?;
    let count = runtime.block_on(async {
        let parser = JsonLdParser::with_options(options);
        let stream = if cmd.input == "-" {
            parser.import(tokio::io::stdin())
        } else {
            let file = tokio::fs::File::open(&cmd.input)
                .await
                .with_context(|| format!("Failed to open {}", cmd.input))?;
            parser.import(file)
        };
        match &cmd.output {
            Some(path) => {
                let file = std::fs::File::create(path)
                    .with_context(|| format!("Failed to create {}", path.display()))?;
                let mut writer = std::io::BufWriter::new(file);
                let count = write_quads(stream, &mut writer, cmd.prefixes).await?;
                writer.flush()?;
                Ok::<_, Error>(count)
            }
            None => {
                let stdout = std::io::stdout();
                let handle = stdout.lock();
                write_quads(stream, handle, cmd.prefixes).await
            }
        }
    })?;
    info!("Wrote {} quads", count);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_context_mapping() {
        assert_eq!(
            parse_context_mapping("http://example.org/context=ctx.jsonld").unwrap(),
            (
                "http://example.org/context".to_string(),
                PathBuf::from("ctx.jsonld")
            )
        );
        assert!(parse_context_mapping("no-separator").is_err());
        assert!(parse_context_mapping("=ctx.jsonld").is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("options.json");
        std::fs::write(
            &config,
            r#"{ "base_iri": "http://example.org/config/", "profile": "standard" }"#,
        )
        .unwrap();
        let cmd = Cli::try_parse_from([
            "jsonld2quads",
            "-",
            "--config",
            config.to_str().unwrap(),
            "--streaming",
        ])
        .unwrap();
        let options = build_options(&cmd).unwrap();
        assert_eq!(options.base_iri, "http://example.org/config/");
        assert_eq!(options.profile, ParserProfile::Streaming);

        let cmd = Cli::try_parse_from([
            "jsonld2quads",
            "-",
            "--config",
            config.to_str().unwrap(),
            "--base",
            "http://example.org/flag/",
        ])
        .unwrap();
        assert_eq!(build_options(&cmd).unwrap().base_iri, "http://example.org/flag/");
    }

    #[test]
    fn test_file_input_defaults_base_to_file_url() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("doc.jsonld");
        std::fs::write(&input, "{}").unwrap();
        let cmd = Cli::try_parse_from(["jsonld2quads", input.to_str().unwrap()]).unwrap();
        let options = build_options(&cmd).unwrap();
        assert!(options.base_iri.starts_with("file://"));
        assert!(options.base_iri.ends_with("/doc.jsonld"));
    }
}
