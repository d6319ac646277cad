//! mediafetch command-line interface.
//!
//! Resolves local files (plain paths or `file://` URIs) the same way a gallery
//! provider resolves content references, and prints the result.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use mediafetch::core::mime::mime_from_path;
use mediafetch::{
    ContentFetcher, FetchConfig, FieldMap, FileContentProvider, InferSniffer, MimeResolver, ResourceRef,
    TempFilePreviewMaterializer,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const LOG_ENV_VAR: &str = "MEDIAFETCH_LOG";

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Parser)]
#[command(name = "mediafetch", version)]
#[command(about = "Resolve content references into validated media descriptors", long_about = None)]
struct Cli {
    /// Log pipeline decisions to stderr (overridden by MEDIAFETCH_LOG / RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a file into a validated media descriptor
    Resolve {
        /// File path or file:// URI
        target: String,

        /// Declared MIME type (guessed from the extension when omitted)
        #[arg(short, long)]
        mime: Option<String>,

        /// Do not guess a declared MIME type from the extension
        #[arg(long)]
        no_guess: bool,

        /// Configuration file (TOML, YAML or JSON); discovered when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,
    },

    /// Print the resolved MIME type and where it came from
    Detect {
        /// File path or file:// URI
        target: String,

        /// Declared MIME type
        #[arg(short, long)]
        mime: Option<String>,

        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the effective configuration as JSON
    Config {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Resolve {
            target,
            mime,
            no_guess,
            config,
            format,
        } => {
            let config = load_config(config)?;
            let resource = resource_for(&target)?;
            let declared = match mime {
                Some(mime) => Some(mime),
                None if no_guess => None,
                None => FileContentProvider::path_of(&resource).ok().and_then(mime_from_path),
            };

            let fetcher = ContentFetcher::from_provider(Arc::new(FileContentProvider::new())).with_config(config);
            let fields = fetcher
                .fetch_single_async(resource.clone(), declared)
                .await
                .with_context(|| format!("Failed to resolve {}", resource))?;

            print_fields(&fields, format)?;
            Ok(())
        }

        Commands::Detect { target, mime, config } => {
            let config = load_config(config)?;
            let resource = resource_for(&target)?;
            let sniffer = InferSniffer::default();
            let resolved = MimeResolver::new(&FileContentProvider, &TempFilePreviewMaterializer, &sniffer, &config)
                .resolve(&resource, mime.as_deref())
                .with_context(|| format!("Failed to detect MIME type of {}", resource))?;

            println!("{}", serde_json::to_string_pretty(&resolved)?);
            Ok(())
        }

        Commands::Config { config } => {
            let config = load_config(config)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "mediafetch=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<PathBuf>) -> Result<FetchConfig> {
    match path {
        Some(path) => {
            FetchConfig::from_file(&path).with_context(|| format!("Failed to load config from {}", path.display()))
        }
        None => Ok(FetchConfig::discover()
            .context("Failed to discover configuration")?
            .unwrap_or_default()),
    }
}

fn resource_for(target: &str) -> Result<ResourceRef> {
    if let Ok(resource) = ResourceRef::parse(target) {
        if resource.scheme().eq_ignore_ascii_case("file") {
            return Ok(resource);
        }
        if target.contains("://") {
            bail!("Only file:// references are supported, got {}", resource.scheme());
        }
    }
    FileContentProvider::resource_for(target).with_context(|| format!("Invalid path: {}", target))
}

fn print_fields(fields: &FieldMap, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(fields)?),
        OutputFormat::Text => {
            for (key, value) in fields {
                println!("{}: {}", key, serde_json::to_string(value)?);
            }
        }
    }
    Ok(())
}
