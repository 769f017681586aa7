use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use raml2jsonschema_core::{
    document_file_name, load_type_graph, normalize, CyclePolicy, NormalizeOptions, SchemaNode,
};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(name = "raml2jsonschema")]
#[command(about = "Convert RAML type declarations into JSON Schema (draft-04) files")]
#[command(version)]
struct Cli {
    /// RAML input file (or a .json file holding an expanded type graph)
    #[arg(short, long)]
    file: PathBuf,

    /// Output directory, one <Type>.json per top-level type
    #[arg(short, long, default_value = "out")]
    output: PathBuf,

    /// Normalization options file (kebab-case JSON); flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// How to handle types that reference themselves
    #[arg(long, value_enum)]
    on_cycle: Option<CycleArg>,

    /// Max node nesting before a type is rejected
    #[arg(long)]
    max_depth: Option<usize>,

    /// Value of `$schema` on every output document
    #[arg(long)]
    schema_uri: Option<String>,

    /// Enable verbose logging (sets log level to debug)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum CycleArg {
    Reference,
    Error,
}

impl From<CycleArg> for CyclePolicy {
    fn from(val: CycleArg) -> Self {
        match val {
            CycleArg::Reference => CyclePolicy::Reference,
            CycleArg::Error => CyclePolicy::Error,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout only lists written files
    let log_level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    let options = load_options(&cli)?;

    let graph = load_type_graph(&cli.file)
        .with_context(|| format!("Failed to load types from: {}", cli.file.display()))?;
    tracing::debug!(types = graph.len(), "loaded type graph");

    let result = normalize(&graph, &options);

    fs::create_dir_all(&cli.output).with_context(|| {
        format!("Failed to create output directory: {}", cli.output.display())
    })?;

    for (name, document) in &result.documents {
        let path = cli.output.join(document_file_name(name));
        write_document(document, &path)?;
        println!("Saved {}", path.display());
    }

    if !result.failures.is_empty() {
        for failure in &result.failures {
            eprintln!("Error: type `{}` skipped: {}", failure.name, failure.error);
        }
        bail!(
            "{} of {} types could not be converted",
            result.failures.len(),
            graph.len()
        );
    }

    Ok(())
}

/// Defaults, then the config file, then explicit flags.
fn load_options(cli: &Cli) -> Result<NormalizeOptions> {
    let mut options = match &cli.config {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("Failed to parse config from: {}", path.display()))?
        }
        None => NormalizeOptions::default(),
    };

    if let Some(on_cycle) = cli.on_cycle {
        options.on_cycle = on_cycle.into();
    }
    if let Some(max_depth) = cli.max_depth {
        options.max_depth = max_depth;
    }
    if let Some(schema_uri) = &cli.schema_uri {
        options.schema_uri = schema_uri.clone();
    }

    Ok(options)
}

/// Write a document atomically: a temp file in the target directory is
/// renamed over `path` only once fully written.
fn write_document(document: &SchemaNode, path: &Path) -> Result<()> {
    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in: {}", dir.display()))?;

    {
        let mut writer = BufWriter::new(tmp.as_file());
        serde_json::to_writer_pretty(&mut writer, document).context("Failed to write JSON")?;
        // Ensure trailing newline
        writeln!(writer).context("Failed to write trailing newline")?;
        writer.flush().context("Failed to flush JSON")?;
    }

    tmp.persist(path)
        .with_context(|| format!("Failed to save output file: {}", path.display()))?;
    Ok(())
}
