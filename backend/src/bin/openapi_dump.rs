//! Print the OpenAPI document as JSON.

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use foodgram_backend::ApiDoc;
use utoipa::OpenApi;

/// Dump the OpenAPI document for external tooling.
#[derive(Debug, Parser)]
#[command(name = "openapi-dump")]
struct Args {
    /// Write to this file instead of standard output.
    #[arg(long, short)]
    output: Option<PathBuf>,
    /// Emit indented JSON.
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let doc = ApiDoc::openapi();
    let json = if args.pretty {
        doc.to_pretty_json()?
    } else {
        doc.to_json()?
    };

    match args.output {
        Some(path) => std::fs::write(path, json)?,
        None => writeln!(std::io::stdout().lock(), "{json}")?,
    }
    Ok(())
}
