use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use itertools::Itertools;
use std::{env, num::NonZeroUsize, path::PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use wsglob::{
    convert_glob_pattern, find_files,
    finder::FindOutput,
    resolve_scope, split_glob_pattern,
    workspace::detect_workspace_file,
    FinderOptions, ScopeResolution, SearchParams, SearchScope, WorkspaceFolders, WsglobConfig,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file layered on top of the global and local ones
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print machine readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Default)]
struct FolderArgs {
    /// Absolute workspace folder (can be specified multiple times)
    #[arg(short = 'f', long = "folder")]
    folders: Vec<String>,

    /// Read workspace folders from a .code-workspace file
    #[arg(short = 'w', long = "workspace")]
    workspace_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a comma separated pattern list into individual patterns
    Split {
        /// Raw pattern string, e.g. "src/**/*.{js,ts}, test"
        pattern: String,
    },

    /// Rewrite a pattern list into one glob over all workspace folders
    Convert {
        /// Raw pattern string
        pattern: String,

        #[command(flatten)]
        folders: FolderArgs,
    },

    /// Show the include/exclude globs a search would run with
    Scope {
        /// Find expression; the search is skipped when it is blank
        #[arg(long)]
        find: Option<String>,

        /// Files to include
        #[arg(short, long)]
        include: Option<String>,

        /// Files to exclude
        #[arg(short, long)]
        exclude: Option<String>,

        #[command(flatten)]
        folders: FolderArgs,
    },

    /// List the files selected by include/exclude patterns
    Files {
        /// Files to include
        #[arg(short, long)]
        include: Option<String>,

        /// Files to exclude
        #[arg(short, long)]
        exclude: Option<String>,

        /// Also walk hidden files and directories
        #[arg(long)]
        hidden: bool,

        /// Do not honor .gitignore and .ignore files
        #[arg(long)]
        no_ignore: bool,

        /// Number of threads to use
        #[arg(short = 'j', long)]
        threads: Option<NonZeroUsize>,

        /// Show only the number of selected files
        #[arg(short, long)]
        stats: bool,

        #[command(flatten)]
        folders: FolderArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let file_config = WsglobConfig::load_from(cli.config.as_deref())
        .context("Failed to load configuration")?;

    let log_level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| file_config.log_level());
    init_logging(&log_level);

    run(cli, file_config)
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: Cli, file_config: WsglobConfig) -> Result<()> {
    match cli.command {
        Commands::Split { pattern } => {
            let tokens: Vec<&str> = split_glob_pattern(&pattern).collect();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&tokens)?);
            } else {
                for token in tokens {
                    println!("{}", token);
                }
            }
            Ok(())
        }
        Commands::Convert { pattern, folders } => {
            let config = file_config.merge_with_cli(cli_config(&folders));
            let folders = resolve_folders(&config)?;
            let converted = convert_glob_pattern(&pattern, folders.as_slice());
            if cli.json {
                let value = serde_json::json!({
                    "folders": folders,
                    "pattern": pattern,
                    "converted": converted,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("{}", converted);
            }
            Ok(())
        }
        Commands::Scope {
            find,
            include,
            exclude,
            folders,
        } => {
            let config = file_config.merge_with_cli(WsglobConfig {
                include,
                exclude,
                ..cli_config(&folders)
            });
            let folders = resolve_folders(&config)?;
            let params = SearchParams {
                find,
                replace: None,
                include: config.include.clone(),
                exclude: config.exclude.clone(),
            };
            let resolution = resolve_scope(&params, &folders);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&resolution)?);
            } else {
                print_resolution(&resolution, &folders);
            }
            Ok(())
        }
        Commands::Files {
            include,
            exclude,
            hidden,
            no_ignore,
            threads,
            stats,
            folders,
        } => {
            let config = file_config.merge_with_cli(WsglobConfig {
                include,
                exclude,
                hidden,
                git_ignore: !no_ignore,
                thread_count: threads,
                ..cli_config(&folders)
            });
            let folders = resolve_folders(&config)?;
            let scope = SearchScope::for_folders(
                config.include.as_deref(),
                config.exclude.as_deref(),
                &folders,
            );
            let options = FinderOptions {
                hidden: config.hidden,
                git_ignore: config.git_ignore,
                threads: config.threads(),
            };

            let output = find_files(&folders, &scope, &options)
                .with_context(|| format!("Failed to search {}", scope.include))?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                print_find_output(&output, stats);
            }
            Ok(())
        }
    }
}

fn cli_config(folders: &FolderArgs) -> WsglobConfig {
    WsglobConfig {
        folders: folders.folders.clone(),
        workspace_file: folders.workspace_file.clone(),
        ..WsglobConfig::default()
    }
}

/// Picks workspace folders from, in order: explicit folders, a workspace
/// file, a detected `.code-workspace` file, the current directory.
fn resolve_folders(config: &WsglobConfig) -> Result<WorkspaceFolders> {
    if !config.folders.is_empty() {
        return WorkspaceFolders::new(&config.folders).context("Invalid workspace folder");
    }

    let workspace_file = match &config.workspace_file {
        Some(file) => Some(file.clone()),
        None => detect_workspace_file(&env::current_dir()?)?,
    };
    if let Some(file) = workspace_file {
        debug!("Using workspace file {}", file.display());
        return WorkspaceFolders::from_workspace_file(&file)
            .with_context(|| format!("Failed to read workspace file {}", file.display()));
    }

    let cwd = env::current_dir()?.canonicalize()?;
    debug!("Using current directory {} as the only folder", cwd.display());
    Ok(WorkspaceFolders::from_paths(&[cwd])?)
}

fn print_resolution(resolution: &ScopeResolution, folders: &WorkspaceFolders) {
    match resolution {
        ScopeResolution::NoWorkspaceFolders => {
            println!("{}", "No workspace folders found; nothing to search".yellow());
        }
        ScopeResolution::EmptyFind => {
            println!("{}", "Find expression is empty; nothing to search".yellow());
        }
        ScopeResolution::Ready(scope) => {
            println!("{} {}", "folders:".blue(), folders.iter().join(", "));
            println!("{} {}", "include:".blue(), scope.include);
            match &scope.exclude {
                Some(exclude) => println!("{} {}", "exclude:".blue(), exclude),
                None => println!("{} {}", "exclude:".blue(), "(none)".dimmed()),
            }
        }
    }
}

fn print_find_output(output: &FindOutput, stats_only: bool) {
    if !stats_only {
        for group in &output.folders {
            if group.files.is_empty() {
                continue;
            }
            println!("\n{}", group.folder.blue());
            for file in &group.files {
                let shown = file
                    .strip_prefix(&group.folder)
                    .unwrap_or(file.as_path())
                    .display()
                    .to_string();
                println!("  {}", shown.green());
            }
        }
    }

    println!(
        "\nSelected {} of {} files in {} folders",
        output.total_files,
        output.files_scanned,
        output.folders.len()
    );
}
