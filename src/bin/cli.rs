use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use serde::Serialize;

use dirlint::config::Config;
use dirlint::error::{DirlintError, Result};
use dirlint::model::{ScanOptions, Scope};
use dirlint::output::OutputFormat;
use dirlint::policy::{self, MaxViolationsPolicy, NoEmptyDirsPolicy, Policy, Severity};
use dirlint::rules::RuleSet;
use dirlint::{concat, ScanService};

#[derive(Parser)]
#[command(
    name = "dirlint",
    about = "Directory tree linter: naming rules, empty-directory detection, pass/fail policies",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan directory trees for structure and naming violations
    Scan {
        /// Root directories to scan
        #[arg(default_value = ".")]
        roots: Vec<PathBuf>,

        /// Config file path (defaults to .dirlint.toml in the first root)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Traversal scope (docc, all)
        #[arg(long)]
        scope: Option<String>,

        /// Output format (console, json)
        #[arg(long, short = 'f', default_value = "console")]
        format: String,

        /// Follow symbolic links
        #[arg(long)]
        follow_symlinks: bool,

        /// Write output to file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Scan, then evaluate the configured policies against the result
    Check {
        /// Root directories to check
        #[arg(default_value = ".")]
        roots: Vec<PathBuf>,

        /// Config file path (defaults to .dirlint.toml in the first root)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Traversal scope (docc, all)
        #[arg(long)]
        scope: Option<String>,

        /// Output format (console, json)
        #[arg(long, short = 'f', default_value = "console")]
        format: String,
    },

    /// Concatenate source files into a single file with path headers
    Concat {
        /// Root directories to read from
        roots: Vec<PathBuf>,

        /// Path of the merged output file
        #[arg(long, short = 'o')]
        output: PathBuf,

        /// Only include files whose names start with the given prefixes
        #[arg(long = "prefix", short = 'p')]
        prefixes: Vec<String>,

        /// Ignore files whose names end with the given suffixes
        #[arg(long = "ignore-suffix", short = 'x')]
        ignored_suffixes: Vec<String>,

        /// Only include files whose names end with the given suffixes
        #[arg(long = "allow-suffix", short = 'a')]
        allowed_suffixes: Vec<String>,

        /// Emit a from-scratch git patch instead of a flat merge
        #[arg(long)]
        patch: bool,
    },

    /// List the active rules
    ListRules {
        /// Output format (table, json)
        #[arg(long, short = 'f', default_value = "table")]
        format: String,
    },

    /// Generate a starter .dirlint.toml config file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Name suffixes the concat command drops by default.
const DEFAULT_CONCAT_IGNORED_SUFFIXES: &[&str] = &[".h", ".m", "README", "Package.swift", "Tests"];

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Scan {
            roots,
            config,
            scope,
            format,
            follow_symlinks,
            output,
        } => cmd_scan(roots, config, scope, format, follow_symlinks, output),
        Commands::Check {
            roots,
            config,
            scope,
            format,
        } => cmd_check(roots, config, scope, format),
        Commands::Concat {
            roots,
            output,
            prefixes,
            ignored_suffixes,
            allowed_suffixes,
            patch,
        } => cmd_concat(roots, output, prefixes, ignored_suffixes, allowed_suffixes, patch),
        Commands::ListRules { format } => cmd_list_rules(format),
        Commands::Init { force } => cmd_init(force),
    };

    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    }
}

fn parse_format(format_str: &str) -> OutputFormat {
    OutputFormat::from_str_lenient(format_str).unwrap_or_else(|| {
        eprintln!("Warning: unknown format '{}', using console", format_str);
        OutputFormat::Console
    })
}

fn load_effective_config(
    roots: &[PathBuf],
    config_path: Option<PathBuf>,
    scope_str: Option<String>,
) -> Result<(Config, ScanOptions)> {
    let config_path = config_path.unwrap_or_else(|| {
        roots
            .first()
            .map(|r| r.join(".dirlint.toml"))
            .unwrap_or_else(|| PathBuf::from(".dirlint.toml"))
    });
    let config = Config::load(&config_path)?;
    let mut options = config.scan_options(roots.to_vec());

    if let Some(scope_str) = scope_str {
        match Scope::from_str_lenient(&scope_str) {
            Some(scope) => options.scope = scope,
            None => eprintln!(
                "Warning: unknown scope '{}', using config default",
                scope_str
            ),
        }
    }
    Ok((config, options))
}

fn cmd_scan(
    roots: Vec<PathBuf>,
    config: Option<PathBuf>,
    scope: Option<String>,
    format_str: String,
    follow_symlinks: bool,
    output_path: Option<PathBuf>,
) -> Result<i32> {
    let format = parse_format(&format_str);
    let (_config, mut options) = load_effective_config(&roots, config, scope)?;
    if follow_symlinks {
        options.follow_symlinks = true;
    }

    let result = ScanService::new(options).run()?;
    let rendered = dirlint::output::render(&result, &[], format)?;

    match output_path {
        Some(out) => std::fs::write(&out, &rendered)?,
        None => print!("{}", rendered),
    }

    let clean = result.violations.is_empty() && result.empty_directories.is_empty();
    Ok(if clean { 0 } else { 1 })
}

fn cmd_check(
    roots: Vec<PathBuf>,
    config: Option<PathBuf>,
    scope: Option<String>,
    format_str: String,
) -> Result<i32> {
    let format = parse_format(&format_str);
    let (config, options) = load_effective_config(&roots, config, scope)?;

    let result = ScanService::new(options).run()?;
    let policies: Vec<Box<dyn Policy>> = vec![
        Box::new(MaxViolationsPolicy::new(config.check.max_violations)),
        Box::new(NoEmptyDirsPolicy::new(
            config.empty_dir_mode(),
            roots.clone(),
        )),
    ];
    let findings = policy::evaluate(&result, &policies);
    let rendered = dirlint::output::render(&result, &findings, format)?;
    print!("{}", rendered);

    let failed = findings.iter().any(|f| f.severity == Severity::Fail);
    Ok(if failed { 1 } else { 0 })
}

fn cmd_concat(
    roots: Vec<PathBuf>,
    output: PathBuf,
    prefixes: Vec<String>,
    ignored_suffixes: Vec<String>,
    allowed_suffixes: Vec<String>,
    patch: bool,
) -> Result<i32> {
    if roots.is_empty() {
        return Err(DirlintError::Config("concat needs at least one root".into()));
    }

    let mut combined_ignored: Vec<String> = DEFAULT_CONCAT_IGNORED_SUFFIXES
        .iter()
        .map(|s| s.to_string())
        .collect();
    combined_ignored.extend(ignored_suffixes);

    let mut sources: Vec<PathBuf> = Vec::new();
    for root in &roots {
        sources.extend(concat::relevant_source_files(
            root,
            &combined_ignored,
            &allowed_suffixes,
        )?);
    }
    if !prefixes.is_empty() {
        sources.retain(|path| {
            path.file_name()
                .map(|n| {
                    let name = n.to_string_lossy();
                    prefixes.iter().any(|p| name.starts_with(p.as_str()))
                })
                .unwrap_or(false)
        });
    }

    if patch {
        concat::write_git_patch(&sources, &output)?;
    } else {
        concat::write_single_file(&sources, &output)?;
    }
    println!("Single file generated at: {}", output.display());

    Ok(0)
}

#[derive(Serialize)]
struct RuleInfo {
    id: String,
    description: String,
}

fn cmd_list_rules(format_str: String) -> Result<i32> {
    let rules = RuleSet::default();
    let infos: Vec<RuleInfo> = rules
        .rules()
        .iter()
        .map(|r| RuleInfo {
            id: r.id().to_string(),
            description: r.description().to_string(),
        })
        .collect();

    match format_str.as_str() {
        "json" => {
            let json = serde_json::to_string_pretty(&infos)?;
            println!("{}", json);
        }
        _ => {
            println!("{:<14} DESCRIPTION", "ID");
            println!("{}", "-".repeat(60));
            for info in &infos {
                println!("{:<14} {}", info.id, info.description);
            }
        }
    }

    Ok(0)
}

fn cmd_init(force: bool) -> Result<i32> {
    let path = PathBuf::from(".dirlint.toml");

    if path.exists() && !force {
        eprintln!(".dirlint.toml already exists. Use --force to overwrite.");
        return Ok(1);
    }

    std::fs::write(&path, Config::starter_toml())?;
    println!("Created .dirlint.toml");

    Ok(0)
}
