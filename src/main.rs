//! postpress CLI.
//!
//! - `export`: render a record stored as JSON to a PDF file
//! - `store`: render posts from a directory of `<id>.json` records

use clap::{Args, Parser, Subcommand};
use postpress::{ContentRecord, ExportError, Exporter, JsonDirectoryStore};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "postpress", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a single record file.
    Export {
        /// Path to the record JSON.
        record: PathBuf,
        #[command(flatten)]
        options: ExportOptions,
    },
    /// Export posts by id from a record directory.
    Store {
        /// Directory holding `<id>.json` records.
        dir: PathBuf,
        /// Post ids to export.
        #[arg(required = true)]
        ids: Vec<u64>,
        #[command(flatten)]
        options: ExportOptions,
    },
}

#[derive(Args)]
struct ExportOptions {
    /// Directory that local image paths are resolved against.
    #[arg(short, long)]
    docroot: Option<PathBuf>,

    /// Path to a JSON configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where to write the PDF files.
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Log progress at info level.
    #[arg(short, long)]
    verbose: bool,
}

impl ExportOptions {
    fn exporter(&self) -> Result<Exporter, ExportError> {
        let mut builder = Exporter::builder();
        if let Some(config) = &self.config {
            builder = builder.with_config_file(config)?;
        }
        if let Some(root) = &self.docroot {
            builder = builder.with_document_root(root);
        }
        builder.build()
    }
}

fn main() {
    let cli = Cli::parse();

    let verbose = match &cli.command {
        Commands::Export { options, .. } | Commands::Store { options, .. } => options.verbose,
    };
    let default_level = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let result = match cli.command {
        Commands::Export { record, options } => export_file(&record, &options),
        Commands::Store { dir, ids, options } => export_ids(&dir, &ids, &options),
    };

    if let Err(err) = result {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn export_file(path: &Path, options: &ExportOptions) -> Result<(), ExportError> {
    let exporter = options.exporter()?;
    let json = fs::read_to_string(path)?;
    let record = ContentRecord::from_json(&json)?;
    let document = exporter.export(&record)?;
    let written = document.write_to_dir(&options.out_dir)?;
    println!("{}", written.display());
    Ok(())
}

fn export_ids(dir: &Path, ids: &[u64], options: &ExportOptions) -> Result<(), ExportError> {
    let exporter = options.exporter()?;
    let store = JsonDirectoryStore::new(dir);
    for &id in ids {
        let document = exporter.export_from_store(&store, id)?;
        let written = document.write_to_dir(&options.out_dir)?;
        println!("{}", written.display());
    }
    Ok(())
}
