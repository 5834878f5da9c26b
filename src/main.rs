use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use reslens::config::SourceConfig;
use reslens::host::HostServer;
use reslens::reslens::ResLens;
use reslens::tree::render_forest;
use reslens::types::Position;

/// Inline path annotations for numeric resource references.
#[derive(Parser)]
#[command(
    name = "reslens",
    about = "Resolve getRes(<id>) references to resource paths"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a reslens project
    Init {
        /// Project path (default: current directory)
        path: Option<String>,
        /// JSON file holding the resource records
        #[arg(short, long, conflicts_with = "sqlite")]
        source: Option<String>,
        /// SQLite database holding the resource records
        #[arg(long)]
        sqlite: Option<String>,
        /// Table to read when using --sqlite
        #[arg(long, default_value = "resources")]
        table: String,
    },
    /// Load the resources and show snapshot statistics
    Status {
        /// Project path
        #[arg(short, long)]
        path: Option<String>,
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
    /// Print the resource forest
    Tree {
        /// Project path
        #[arg(short, long)]
        path: Option<String>,
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
    /// Print the resolved path of a resource
    Path {
        /// Resource id
        id: String,
        /// Project path
        #[arg(short, long)]
        path: Option<String>,
    },
    /// Scan a source file for references and print their annotations
    Scan {
        /// File to scan
        file: String,
        /// Project path
        #[arg(short, long)]
        path: Option<String>,
        /// Cursor line (0-based)
        #[arg(long, requires = "character")]
        line: Option<u32>,
        /// Cursor character (0-based)
        #[arg(long, requires = "line")]
        character: Option<u32>,
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
    /// Serve the host protocol (JSON-RPC over stdio)
    Serve {
        /// Project path
        #[arg(short, long)]
        path: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> reslens::errors::Result<()> {
    match cli.command {
        Commands::Init {
            path,
            source,
            sqlite,
            table,
        } => {
            let project_path = resolve_path(path);
            let source_config = match (source, sqlite) {
                (_, Some(db)) => Some(SourceConfig::Sqlite { path: db, table }),
                (Some(file), None) => Some(SourceConfig::JsonFile { path: file }),
                (None, None) => None,
            };
            let lens = ResLens::init(&project_path, source_config)?;
            println!("Initialized reslens at {}", project_path.display());
            println!("  Source: {}", lens.source_description());
        }
        Commands::Status { path, json } => {
            let lens = open_and_refresh(path).await?;
            let snapshot = lens.snapshot();
            let forest = lens.forest();
            if json {
                let status = serde_json::json!({
                    "project": lens.project_root().display().to_string(),
                    "source": lens.source_description(),
                    "records": snapshot.len(),
                    "roots": forest.roots.len(),
                    "generation": snapshot.generation(),
                    "fingerprint": snapshot.fingerprint(),
                });
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                println!("reslens Status");
                println!("  Project:     {}", lens.project_root().display());
                println!("  Source:      {}", lens.source_description());
                println!("  Records:     {}", snapshot.len());
                println!("  Roots:       {}", forest.roots.len());
                println!("  Fingerprint: {}", snapshot.fingerprint());
            }
        }
        Commands::Tree { path, json } => {
            let lens = open_and_refresh(path).await?;
            let forest = lens.forest();
            if json {
                println!("{}", serde_json::to_string_pretty(&forest)?);
            } else {
                print!("{}", render_forest(&forest));
            }
        }
        Commands::Path { id, path } => {
            let lens = open_and_refresh(path).await?;
            match lens.resolve_joined(&id) {
                Some(p) => println!("{}", p),
                None => println!("No resource with id '{}'", id),
            }
        }
        Commands::Scan {
            file,
            path,
            line,
            character,
            json,
        } => {
            let lens = open_and_refresh(path).await?;
            let text = tokio::fs::read_to_string(&file).await?;
            let cursor = match (line, character) {
                (Some(l), Some(c)) => Some(Position::new(l, c)),
                _ => None,
            };
            let result = lens.scan(&text, cursor);
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                if result.annotations.is_empty() && result.status.is_none() {
                    println!("No resolved references in '{}'", file);
                }
                for a in &result.annotations {
                    println!("{}:{}:{}  {}", file, a.position.line + 1, a.position.character, a.text);
                }
                if let Some(status) = &result.status {
                    println!("status: {}", status.text);
                }
            }
        }
        Commands::Serve { path } => {
            let project_path = resolve_path(path);
            let lens = ResLens::open(&project_path)?;
            // A failed initial load leaves an empty snapshot; the host can
            // send `refresh` once the source is available.
            if let Err(e) = lens.refresh().await {
                tracing::warn!(error = %e, "initial refresh failed");
            }
            Arc::new(HostServer::new(lens)).run().await?;
        }
    }
    Ok(())
}

/// Opens the project and loads its resources.
async fn open_and_refresh(path: Option<String>) -> reslens::errors::Result<ResLens> {
    let project_path = resolve_path(path);
    let lens = ResLens::open(&project_path)?;
    lens.refresh().await?;
    Ok(lens)
}

/// Resolves an optional path argument to a `PathBuf`.
///
/// Defaults to the current working directory if no path is provided.
fn resolve_path(path: Option<String>) -> PathBuf {
    match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}
