//! burrow - a small file manager.
//!
//! Usage:
//!   burrow ls [PATH]                 List a directory (directories first)
//!   burrow crumbs [PATH]             Show the path from the root
//!   burrow cp SOURCE... DEST         Copy into a directory
//!   burrow mv SOURCE... DEST         Move into a directory
//!   burrow rm PATH...                Delete recursively
//!   burrow zip DIR / unzip ARCHIVE   Compress or extract next to the source
//!   burrow --help                    Show help

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result, bail, eyre};
use tracing_subscriber::EnvFilter;

use burrow_core::{ExplorerConfig, FileCatalogEntry, PickerFilter};
use burrow_ops::{
    ArchiveComplete, ClipboardStore, OperationComplete, TextDocument, copy_all, delete_all,
    move_all, start_compress, start_extract, try_create_file, try_create_folder, try_rename,
};
use burrow_session::{ExplorerSession, breadcrumbs};

#[derive(Parser)]
#[command(
    name = "burrow",
    version,
    about = "Browse, copy, move, delete and zip files",
    long_about = "burrow is a small file manager.\n\n\
                  Name collisions never overwrite: copies and moves get a \
                  `name(1).ext` style name instead."
)]
struct Cli {
    /// Config file (defaults to <config dir>/burrow/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List a directory
    Ls {
        /// Directory to list
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Only show files matching a MIME pattern (e.g. "image/*")
        #[arg(short, long)]
        mime: Option<String>,

        /// Hide dot-files
        #[arg(long)]
        no_hidden: bool,

        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the breadcrumb chain of a directory
    Crumbs {
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Copy files or directories into a directory
    Cp {
        #[arg(required = true, num_args = 1..)]
        sources: Vec<PathBuf>,
        destination: PathBuf,
    },

    /// Move files or directories into a directory
    Mv {
        #[arg(required = true, num_args = 1..)]
        sources: Vec<PathBuf>,
        destination: PathBuf,
    },

    /// Delete files or directories recursively
    Rm {
        #[arg(required = true, num_args = 1..)]
        paths: Vec<PathBuf>,
    },

    /// Rename an entry within its directory
    Rename { path: PathBuf, name: String },

    /// Create a directory
    Mkdir { path: PathBuf },

    /// Create an empty file
    Touch { path: PathBuf },

    /// Compress a directory to a sibling zip archive
    Zip { path: PathBuf },

    /// Extract a zip archive to a sibling directory
    Unzip { path: PathBuf },

    /// Print a text file
    Cat { path: PathBuf },

    /// Replace a text file's contents with stdin
    Write { path: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Ls {
            path,
            mime,
            no_hidden,
            json,
        } => run_ls(config, &path, mime, no_hidden, json)?,
        Command::Crumbs { path } => {
            let path = path.canonicalize().context("Invalid path")?;
            for crumb in breadcrumbs(&path) {
                println!("{}\t{}", crumb.name, crumb.path.display());
            }
        }
        Command::Cp {
            sources,
            destination,
        } => report(copy_all(&sources, &destination))?,
        Command::Mv {
            sources,
            destination,
        } => report(move_all(&sources, &destination))?,
        Command::Rm { paths } => report(delete_all(&paths))?,
        Command::Rename { path, name } => {
            let renamed = try_rename(&path, &name)?;
            println!("{}", renamed.display());
        }
        Command::Mkdir { path } => {
            let (dir, name) = split_target(&path)?;
            println!("{}", try_create_folder(&dir, &name)?.display());
        }
        Command::Touch { path } => {
            let (dir, name) = split_target(&path)?;
            println!("{}", try_create_file(&dir, &name)?.display());
        }
        Command::Zip { path } => finish(start_compress(path).wait().await)?,
        Command::Unzip { path } => finish(start_extract(path).wait().await)?,
        Command::Cat { path } => {
            let doc = TextDocument::open(path)?;
            print!("{}", doc.content());
        }
        Command::Write { path } => {
            let mut doc = TextDocument::open(&path)?;
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .context("Failed to read stdin")?;
            doc.set_content(content);
            if doc.is_modified() {
                doc.save()?;
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Read the config file. A missing default file means defaults; a missing explicit one is an error.
fn load_config(explicit: Option<&Path>) -> Result<ExplorerConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match dirs::config_dir() {
            Some(dir) => dir.join("burrow").join("config.toml"),
            None => return Ok(ExplorerConfig::default()),
        },
    };

    if explicit.is_none() && !path.exists() {
        return Ok(ExplorerConfig::default());
    }

    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: ExplorerConfig = toml::from_str(&text)
        .with_context(|| format!("Invalid config {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

fn run_ls(
    mut config: ExplorerConfig,
    path: &Path,
    mime: Option<String>,
    no_hidden: bool,
    json: bool,
) -> Result<()> {
    if let Some(mime) = mime {
        config.picker_filter = Some(PickerFilter::new(mime));
    }
    if no_hidden {
        config.show_hidden = false;
    }

    let mut session = ExplorerSession::new(ClipboardStore::new(), config);
    if !session.navigate(path) {
        let message = session
            .state()
            .error_message
            .clone()
            .unwrap_or_else(|| format!("Cannot open {}", path.display()));
        bail!(message);
    }

    let state = session.state();
    if json {
        println!("{}", serde_json::to_string_pretty(&state.files)?);
        return Ok(());
    }

    if let Some(dir) = &state.current_directory {
        println!("{}", dir.display());
    }
    for entry in &state.files {
        println!("{}", format_entry(entry));
    }

    session.update_storage_info();
    let storage = &session.state().storage_info;
    if !storage.is_empty() {
        println!();
        println!("{storage}");
    }
    Ok(())
}

fn format_entry(entry: &FileCatalogEntry) -> String {
    let marker = if entry.is_dir() { "/" } else { "" };
    format!(
        "{:>10}  {}  {}{}",
        entry.display_size(),
        entry.display_date(),
        entry.name,
        marker
    )
}

fn split_target(path: &Path) -> Result<(PathBuf, String)> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| eyre!("Invalid name: {}", path.display()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((dir, name.to_string()))
}

fn report(complete: OperationComplete) -> Result<()> {
    for output in &complete.outputs {
        println!("{}", output.display());
    }
    for error in &complete.errors {
        eprintln!("{error}");
    }
    if complete.is_success() {
        eprintln!("{}", complete.summary());
        Ok(())
    } else {
        Err(eyre!(complete.summary()))
    }
}

fn finish(outcome: ArchiveComplete) -> Result<()> {
    match (&outcome.output, &outcome.error) {
        (Some(output), None) => {
            println!("{}", output.display());
            Ok(())
        }
        (_, Some(error)) => Err(eyre!("{} failed: {error}", outcome.operation_type)),
        (None, None) => Err(eyre!("{} produced no output", outcome.operation_type)),
    }
}
