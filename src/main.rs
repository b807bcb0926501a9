use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};
use wsindex::config::IndexConfig;
use wsindex::index::stats::show_stats;
use wsindex::output::{print_json, print_results};
use wsindex::session::Workspace;
use wsindex::utils::wait_for_index;

#[derive(Parser)]
#[command(name = "wsindex")]
#[command(about = "Incremental in-memory workspace search")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Search query (when no subcommand is given)
    #[arg(trailing_var_arg = true)]
    query: Vec<String>,

    /// Project root to index
    #[arg(short, long, default_value = ".")]
    path: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Index a project and print matches for a query
    Search {
        /// Query text (words are joined with spaces)
        #[arg(required = true)]
        query: Vec<String>,

        /// Project root to index
        #[arg(short, long, default_value = ".")]
        path: PathBuf,

        /// Maximum number of results
        #[arg(short, long)]
        max_results: Option<usize>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
    /// Index a project and show statistics
    Stats {
        /// Project root to index
        #[arg(default_value = ".")]
        path: PathBuf,
    },
    /// Query line by line from stdin while indexing runs
    Interactive {
        /// Project root to index
        #[arg(short, long, default_value = ".")]
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("RUST_LOG", "warn")).init();

    let cli = Cli::parse();
    let config = IndexConfig::load();

    match cli.command {
        Some(Commands::Search {
            query,
            path,
            max_results,
            json,
            no_color,
        }) => run_search(&config, path, &query.join(" "), max_results, json, !no_color),
        Some(Commands::Stats { path }) => run_stats(&config, path),
        Some(Commands::Interactive { path }) => run_interactive(&config, path),
        None => {
            if cli.query.is_empty() {
                run_interactive(&config, cli.path)
            } else {
                run_search(&config, cli.path, &cli.query.join(" "), None, false, true)
            }
        }
    }
}

fn open_workspace(config: &IndexConfig, path: &Path) -> Result<Workspace> {
    let mut workspace = Workspace::new(config).context("Invalid index configuration")?;
    workspace
        .open(path)
        .with_context(|| format!("Failed to start indexing {}", path.display()))?;
    Ok(workspace)
}

fn run_search(
    config: &IndexConfig,
    path: PathBuf,
    query: &str,
    max_results: Option<usize>,
    json: bool,
    color: bool,
) -> Result<()> {
    let mut workspace = open_workspace(config, &path)?;
    wait_for_index(workspace.store(), json || !io::stderr().is_terminal());
    workspace.wait();

    let results = match max_results {
        Some(max) => workspace.search_limit(query, max),
        None => workspace.search(query),
    };

    if json {
        print_json(&results)?;
    } else {
        print_results(&results, query, color, true)?;
        if results.is_empty() {
            eprintln!("No matches for \"{}\"", query.trim());
        }
    }

    Ok(())
}

fn run_stats(config: &IndexConfig, path: PathBuf) -> Result<()> {
    let mut workspace = open_workspace(config, &path)?;
    wait_for_index(workspace.store(), !io::stderr().is_terminal());
    workspace.wait();

    let root = workspace.root().map(PathBuf::from).unwrap_or(path);
    show_stats(&root, &workspace.stats());
    Ok(())
}

fn run_interactive(config: &IndexConfig, path: PathBuf) -> Result<()> {
    let mut workspace = open_workspace(config, &path)?;
    let stdin = io::stdin();
    let interactive = stdin.is_terminal();

    eprintln!("Indexing {} in the background.", path.display());
    eprintln!("Type a query, :open <path> to switch project, :stats, or :quit.");

    loop {
        if interactive {
            eprint!("> ");
            io::stderr().flush()?;
        }

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim_end_matches(['\n', '\r']);

        match line.trim() {
            ":quit" | ":q" => break,
            ":stats" => {
                let root = workspace.root().map(PathBuf::from).unwrap_or_default();
                show_stats(&root, &workspace.stats());
            }
            cmd if cmd.starts_with(":open ") => {
                let target = PathBuf::from(cmd.trim_start_matches(":open ").trim());
                workspace.open(&target)?;
                eprintln!("Switched to {}", target.display());
            }
            "" => {}
            _ => {
                let results = workspace.search(line);
                print_results(&results, line, interactive, true)?;
                let status = if workspace.is_indexing() {
                    " (still indexing)"
                } else {
                    ""
                };
                eprintln!(
                    "{} matches in {} files{}",
                    results.len(),
                    workspace.snapshot().len(),
                    status
                );
            }
        }
    }

    Ok(())
}
