//! Command-line interface for the ExtTLA to TLA+ converter.

use clap::Parser;
use exttla_core::ModuleBuilder;
use miette::{Diagnostic, NamedSource, SourceSpan};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// CLI error with source context for pretty printing.
#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("failed to read {path}: {message}")]
    ReadError { path: String, message: String },

    #[error("failed to write {path}: {message}")]
    WriteError { path: String, message: String },

    #[error("parse error: {message}")]
    #[diagnostic(code(exttla::parse_error))]
    ParseError {
        message: String,
        #[source_code]
        src: NamedSource<Arc<String>>,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("conversion error: {message}")]
    #[diagnostic(code(exttla::convert_error))]
    ConvertError { message: String },
}

impl CliError {
    fn from_parse_error(e: exttla_syntax::ParseError, source: Arc<String>, filename: &str) -> Self {
        let span = e.span();
        CliError::ParseError {
            message: e.to_string(),
            src: NamedSource::new(filename, source),
            span: (span.start, span.len()).into(),
        }
    }
}

impl From<exttla_core::Error> for CliError {
    fn from(e: exttla_core::Error) -> Self {
        CliError::ConvertError {
            message: e.to_string(),
        }
    }
}

type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "exttla", version)]
#[command(about = "ExtTLA to TLA+ converter", long_about = None)]
struct Cli {
    /// Input ExtTLA files
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Output directory for the generated .tla files
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    output: PathBuf,
}

fn main() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .without_time()
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("{:?}", miette::Report::new(e));
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> CliResult<()> {
    // Merge every input file into one registry before resolving
    // anything: child modules may extend across file boundaries.
    let mut builder = ModuleBuilder::new();
    for file in &cli.files {
        let filename = file.display().to_string();
        let source = Arc::new(fs::read_to_string(file).map_err(|e| CliError::ReadError {
            path: filename.clone(),
            message: e.to_string(),
        })?);
        let events = exttla_syntax::parse(&source)
            .map_err(|e| CliError::from_parse_error(e, source.clone(), &filename))?;
        builder.handle_all(events)?;
        info!(file = %filename, "parsed");
    }
    let mut registry = builder.finish()?;
    info!(modules = registry.len(), "registry built");

    fs::create_dir_all(&cli.output).map_err(|e| CliError::WriteError {
        path: cli.output.display().to_string(),
        message: e.to_string(),
    })?;

    for name in registry.names() {
        let module = registry.resolve(&name)?;
        let text = exttla_core::emit(&module);
        let path = cli.output.join(format!("{}.tla", name));
        fs::write(&path, text).map_err(|e| CliError::WriteError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        println!("Create TLA+ Spec: {}", name);
    }

    Ok(())
}
