// SPDX-License-Identifier: PMPL-1.0-or-later

//! locsync: keep NDJSON translation catalogs and `.locres` dictionaries in step
//!
//! `import` pulls the published dictionary text into every catalog without
//! clobbering translations; `build` compiles a catalog back into a dictionary.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use locsync::config::Settings;
use locsync::locres::LocresVersion;
use locsync::pipeline::{self, CatalogTarget};
use locsync::report::{self, Report, ReportOutputFormat};
use locsync::diagnostics;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "locsync")]
#[command(version)]
#[command(about = "Hash-checked sync between translation catalogs and .locres dictionaries")]
#[command(long_about = None)]
struct Cli {
    /// Settings file (default: locsync.yaml / locsync.yml / locsync.json if present)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Show progress logs (honours RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Silence all logs
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Report format
    #[arg(long, global = true, value_enum, default_value = "text")]
    format: ReportOutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a .locres dictionary into translation catalogs
    Import {
        /// Dictionary to import
        #[arg(value_name = "LOCRES")]
        locres: PathBuf,

        /// Restrict to these languages
        #[arg(short, long = "language", value_name = "LANG")]
        languages: Vec<String>,

        /// Import into these catalog files instead of language catalogs
        #[arg(short, long = "catalog", value_name = "FILE")]
        catalogs: Vec<PathBuf>,
    },

    /// Compile a catalog into a .locres dictionary
    Build {
        /// Catalog to compile
        #[arg(value_name = "CATALOG")]
        catalog: PathBuf,

        /// Output .locres path
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Locres format version to write (0-2; default from settings)
        #[arg(long, value_name = "N")]
        format_version: Option<u8>,
    },

    /// Show translation progress per catalog
    Status {
        #[arg(short, long = "language", value_name = "LANG")]
        languages: Vec<String>,

        #[arg(short, long = "catalog", value_name = "FILE")]
        catalogs: Vec<PathBuf>,
    },

    /// Clear translations that skip rules exclude from builds
    Sanitize {
        #[arg(short, long = "language", value_name = "LANG")]
        languages: Vec<String>,

        #[arg(short, long = "catalog", value_name = "FILE")]
        catalogs: Vec<PathBuf>,

        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// List the contents of a .locres dictionary
    Inspect {
        #[arg(value_name = "LOCRES")]
        locres: PathBuf,

        /// Only this namespace
        #[arg(short, long)]
        namespace: Option<String>,

        /// Dump entries as NDJSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Compare a catalog with an earlier copy of it
    Diff {
        /// Earlier catalog (missing = empty)
        #[arg(value_name = "BASELINE")]
        baseline: PathBuf,

        /// Catalog to compare
        #[arg(value_name = "CATALOG")]
        catalog: PathBuf,

        /// Records to print per section (0 = all)
        #[arg(long, value_name = "N", default_value_t = 10)]
        max_display: usize,
    },

    /// Check settings, catalogs and rule files
    Doctor,
}

fn init_tracing(cli: &Cli) {
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("off")
    } else if cli.verbose {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "info".into())
    } else {
        tracing_subscriber::EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if std::env::var_os("NO_COLOR").is_some() || cli.format != ReportOutputFormat::Text {
        colored::control::set_override(false);
    }
    init_tracing(&cli);

    let settings = Settings::resolve(cli.config.as_deref())?;

    match cli.command {
        Commands::Import {
            locres,
            languages,
            catalogs,
        } => {
            let targets = pipeline::resolve_targets(&settings, &languages, &catalogs)?;
            let hasher = settings.hasher()?;
            let result = pipeline::run_import(&locres, &targets, &hasher)?;
            report::emit(&Report::Import(result), cli.format)?;
        }

        Commands::Build {
            catalog,
            output,
            format_version,
        } => {
            let version = match format_version {
                Some(raw) => LocresVersion::from_u8(raw)
                    .ok_or_else(|| anyhow!("unknown locres format version {}", raw))?,
                None => settings.locres_version()?,
            };
            let rules = settings.skip_rules()?;
            let hasher = settings.hasher()?;
            let result = pipeline::run_build(&catalog, &output, version, &rules, &hasher)?;
            report::emit(&Report::Build(result), cli.format)?;
        }

        Commands::Status {
            languages,
            catalogs,
        } => {
            let targets = pipeline::resolve_targets(&settings, &languages, &catalogs)?;
            let rules = settings.skip_rules()?;
            let statuses = pipeline::run_status(&targets, &rules)?;
            report::emit(&Report::Status(statuses), cli.format)?;
        }

        Commands::Sanitize {
            languages,
            catalogs,
            dry_run,
        } => {
            let targets: Vec<CatalogTarget> =
                pipeline::resolve_targets(&settings, &languages, &catalogs)?;
            let rules = settings.skip_rules()?;
            let results = pipeline::run_sanitize(&targets, &rules, dry_run)?;
            report::emit(&Report::Sanitize(results), cli.format)?;
        }

        Commands::Inspect {
            locres,
            namespace,
            json,
        } => {
            let file = pipeline::load_dictionary(&locres)?;
            let wanted = |name: &str| namespace.as_deref().map_or(true, |ns| ns == name);

            if json {
                for entry in file.dictionary_entries() {
                    if wanted(entry.namespace.as_str()) {
                        println!("{}", serde_json::to_string(&entry)?);
                    }
                }
            } else {
                println!("Dictionary: {}", locres.display());
                println!("  Namespaces: {}", file.namespaces().len());
                println!("  Entries: {}", file.entry_count());
                for ns in file.namespaces().iter().filter(|ns| wanted(ns.name())) {
                    let label = if ns.name().is_empty() {
                        "(empty)"
                    } else {
                        ns.name()
                    };
                    println!("    {:<40} {:>8}", label, ns.len());
                }
            }
        }

        Commands::Diff {
            baseline,
            catalog,
            max_display,
        } => {
            let limit = (max_display > 0).then_some(max_display);
            let result = pipeline::run_diff(&baseline, &catalog, limit)?;
            report::emit(&Report::Diff(result), cli.format)?;
        }

        Commands::Doctor => {
            diagnostics::run_self_diagnostics(&settings)?;
        }
    }

    Ok(())
}
