//! Command-line interface for regen
//!
//! Usage:
//!   regen model `<files>...` [--format json|yaml]           - Extract the property model
//!   regen sync `<fresh>` `<existing>` [--mode `<mode>`] [--write] - Merge a generated file
//!   regen section `<file>` --name `<name>` --content `<file>` [--write] - Refresh one section
//!   regen macros                                           - List known macro keywords
//!
//! Every subcommand accepts `--config <file>` and `-v` (repeatable).

use clap::{Arg, ArgAction, ArgMatches, Command};
use regen_core::regen::config::{Loader, RegenConfig};
use regen_core::regen::error::{ConfigError, ParserError};
use regen_core::regen::logging::{self, LogLevel};
use regen_core::regen::model::EnumClassDescriptor;
use regen_core::regen::tags::SyncMode;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, error, info};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParserError,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to serialize model: {0}")]
    Serialize(String),
    #[error("{failed} of {total} modules failed to parse")]
    Batch { failed: usize, total: usize },
}

/// One extracted source module
#[derive(Debug, Serialize)]
struct ModuleModel {
    path: String,
    classes: Vec<EnumClassDescriptor>,
}

fn main() -> ExitCode {
    let matches = cli().get_matches();

    let level = LogLevel::from_verbosity(matches.get_count("verbose"));
    if let Err(e) = logging::init(level) {
        eprintln!("Warning: {}", e);
    }

    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cli() -> Command {
    let delimiter = Arg::new("delimiter")
        .long("delimiter")
        .short('d')
        .help("Comment delimiter that introduces directive tags (default from config)");
    let write = Arg::new("write")
        .long("write")
        .short('w')
        .action(ArgAction::SetTrue)
        .help("Write the result back instead of printing it");

    Command::new("regen")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Extract property models and merge generated files")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::Count)
                .global(true)
                .help("Increase log output (-v info, -vv debug, -vvv trace)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("Configuration file layered over the built-in defaults"),
        )
        .subcommand(
            Command::new("model")
                .about("Extract the property model of annotated sources")
                .arg(
                    Arg::new("files")
                        .help("Source modules to parse")
                        .required(true)
                        .num_args(1..)
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format")
                        .value_parser(["json", "yaml"])
                        .default_value("json"),
                ),
        )
        .subcommand(
            Command::new("sync")
                .about("Merge a freshly generated file into an existing one")
                .arg(
                    Arg::new("fresh")
                        .help("Freshly generated file")
                        .required(true)
                        .index(1)
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("existing")
                        .help("File to merge into; created from the fresh file when missing")
                        .required(true)
                        .index(2)
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("mode")
                        .long("mode")
                        .short('m')
                        .help("Default sync mode: Full, Demand, Skip or Force (default from config)")
                        .value_parser(|value: &str| value.parse::<SyncMode>()),
                )
                .arg(delimiter.clone())
                .arg(write.clone()),
        )
        .subcommand(
            Command::new("section")
                .about("Regenerate one named section of a file")
                .arg(
                    Arg::new("file")
                        .help("File holding the section")
                        .required(true)
                        .index(1)
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("name")
                        .long("name")
                        .short('n')
                        .required(true)
                        .help("Section tag name"),
                )
                .arg(
                    Arg::new("content")
                        .long("content")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .help("File with the new section content"),
                )
                .arg(delimiter)
                .arg(write),
        )
        .subcommand(Command::new("macros").about("List known macro keywords and their categories"))
}

fn run(matches: &ArgMatches) -> Result<(), CliError> {
    match matches.subcommand() {
        Some(("model", sub)) => handle_model_command(sub),
        Some(("sync", sub)) => handle_sync_command(sub),
        Some(("section", sub)) => handle_section_command(sub),
        Some(("macros", sub)) => handle_macros_command(sub),
        _ => Ok(()),
    }
}

/// Defaults, then `--config`, then `--delimiter`.
fn load_config(matches: &ArgMatches) -> Result<RegenConfig, CliError> {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<PathBuf>("config") {
        loader = loader.with_file(path);
    }
    if let Ok(Some(delimiter)) = matches.try_get_one::<String>("delimiter") {
        loader = loader.set_override("tags.comment_delimiter", delimiter.as_str())?;
    }
    Ok(loader.build()?)
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write(path: &Path, contents: &str) -> Result<(), CliError> {
    fs::write(path, contents).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Write to `path` when `--write` is given, print otherwise.
fn emit(matches: &ArgMatches, path: &Path, contents: &str) -> Result<(), CliError> {
    if matches.get_flag("write") {
        write(path, contents)?;
        info!(path = %path.display(), "wrote file");
    } else {
        print!("{}", contents);
    }
    Ok(())
}

fn handle_model_command(matches: &ArgMatches) -> Result<(), CliError> {
    let config = load_config(matches)?;
    let extractor = config.extractor()?;
    let files: Vec<&PathBuf> = matches
        .get_many::<PathBuf>("files")
        .map(|files| files.collect())
        .unwrap_or_default();

    let mut modules = Vec::new();
    let mut failed = 0;
    for path in &files {
        let parsed = read(path).and_then(|source| {
            extractor.parse(&source).map_err(|source| CliError::Parse {
                path: path.to_path_buf(),
                source,
            })
        });
        match parsed {
            Ok(classes) => {
                debug!(path = %path.display(), classes = classes.len(), "parsed module");
                modules.push(ModuleModel {
                    path: path.display().to_string(),
                    classes,
                });
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "skipping module");
                failed += 1;
            }
        }
    }

    let rendered = match matches.get_one::<String>("format").map(String::as_str) {
        Some("yaml") => serde_yaml::to_string(&modules).map_err(|e| CliError::Serialize(e.to_string()))?,
        _ => {
            let mut json = serde_json::to_string_pretty(&modules)
                .map_err(|e| CliError::Serialize(e.to_string()))?;
            json.push('\n');
            json
        }
    };
    print!("{}", rendered);

    if failed > 0 {
        return Err(CliError::Batch {
            failed,
            total: files.len(),
        });
    }
    Ok(())
}

fn handle_sync_command(matches: &ArgMatches) -> Result<(), CliError> {
    let config = load_config(matches)?;
    let (Some(fresh_path), Some(existing_path)) = (
        matches.get_one::<PathBuf>("fresh"),
        matches.get_one::<PathBuf>("existing"),
    ) else {
        return Ok(());
    };
    let mode = matches
        .get_one::<SyncMode>("mode")
        .copied()
        .unwrap_or(config.merge.default_sync_mode);

    let fresh = read(fresh_path)?;
    let merged = if existing_path.exists() {
        let existing = read(existing_path)?;
        config
            .sync_engine()
            .sync(&fresh, &existing, mode)
            .map_err(|source| CliError::Parse {
                path: existing_path.clone(),
                source,
            })?
    } else {
        info!(path = %existing_path.display(), "existing file missing, using fresh file");
        fresh
    };

    emit(matches, existing_path, &merged)
}

fn handle_section_command(matches: &ArgMatches) -> Result<(), CliError> {
    let config = load_config(matches)?;
    let (Some(path), Some(name), Some(content_path)) = (
        matches.get_one::<PathBuf>("file"),
        matches.get_one::<String>("name"),
        matches.get_one::<PathBuf>("content"),
    ) else {
        return Ok(());
    };

    let existing = read(path)?;
    let content = read(content_path)?;
    let updated = config
        .section_regenerator()
        .regenerate(&existing, name, &content)
        .map_err(|source| CliError::Parse {
            path: path.clone(),
            source,
        })?;

    emit(matches, path, &updated)
}

fn handle_macros_command(matches: &ArgMatches) -> Result<(), CliError> {
    let config = load_config(matches)?;
    let registry = config.macro_registry()?;
    for (keyword, macro_type) in registry.iter() {
        println!("{:<24} {:?}", keyword, macro_type);
    }
    Ok(())
}
