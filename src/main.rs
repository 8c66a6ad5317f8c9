//! jsondoc CLI.
//!
//! Validates, re-serializes and queries JSON files.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use jsondoc::{DuplicateKeys, Error, JsonResult, ParseOptions, Value};
use log::info;

#[derive(Parser)]
#[command(name = "jsondoc")]
#[command(about = "Strict JSON validator and pretty-printer", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    parse_args: ParseArgs,

    /// Log parse timings (same as RUST_LOG=info)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ParseArgs {
    /// Maximum nesting depth of arrays and objects
    #[arg(long, global = true, value_name = "N", value_parser = parse_depth)]
    max_depth: Option<usize>,

    /// Keep the last value of a repeated key instead of failing
    #[arg(long, global = true)]
    allow_duplicate_keys: bool,
}

fn parse_depth(arg: &str) -> Result<usize, String> {
    let depth: usize = arg.parse().map_err(|e| format!("{e}"))?;
    if depth > ParseOptions::MAX_NESTING_DEPTH {
        return Err(format!(
            "at most {} is supported",
            ParseOptions::MAX_NESTING_DEPTH
        ));
    }
    Ok(depth)
}

impl ParseArgs {
    fn options(&self) -> ParseOptions {
        let mut options = ParseOptions::strict();
        if let Some(depth) = self.max_depth {
            options = options.with_max_nesting_depth(depth);
        }
        if self.allow_duplicate_keys {
            options = options.with_duplicate_keys(DuplicateKeys::LastWins);
        }
        options
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Check that a file is valid JSON
    Check {
        /// File to check
        file: PathBuf,
    },

    /// Parse a file and print it back as JSON
    Dump {
        /// File to print
        file: PathBuf,

        /// Indent nested values, one member per line
        #[arg(short, long)]
        pretty: bool,

        /// Spaces per nesting level with --pretty
        #[arg(long, default_value_t = 2)]
        indent: usize,
    },

    /// Print the value found by following object keys and array indices
    Get {
        /// File to read
        file: PathBuf,

        /// Object keys or array indices, outermost first
        path: Vec<String>,
    },
}

fn load(file: &Path, options: &ParseOptions) -> JsonResult<Value> {
    let start = Instant::now();
    let value = jsondoc::parse_with_options(file, options)?;
    info!(
        "parse of {} took {}us",
        file.display(),
        start.elapsed().as_micros()
    );
    Ok(value)
}

/// Follow `path` from `root`. `Ok(None)` means a key or index was absent.
fn select<'v>(root: &'v Value, path: &[String]) -> JsonResult<Option<&'v Value>> {
    let mut current = root;
    for segment in path {
        let next = match current {
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            other => other.get_map()?.get(segment.as_str()),
        };
        match next {
            Some(value) => current = value,
            None => return Ok(None),
        }
    }
    Ok(Some(current))
}

fn run(cli: &Cli) -> Result<bool, Error> {
    let options = cli.parse_args.options();

    match &cli.command {
        Commands::Check { file } => {
            load(file, &options)?;
            println!("ok");
            Ok(true)
        }
        Commands::Dump {
            file,
            pretty,
            indent,
        } => {
            let value = load(file, &options)?;
            if *pretty {
                println!("{}", value.dump_pretty(*indent));
            } else {
                println!("{value}");
            }
            Ok(true)
        }
        Commands::Get { file, path } => {
            let value = load(file, &options)?;
            match select(&value, path)? {
                Some(found) => {
                    println!("{found}");
                    Ok(true)
                }
                None => {
                    eprintln!("no value at {}", path.join("."));
                    Ok(false)
                }
            }
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(segments: &[&str]) -> Vec<String> {
        segments.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_select_walks_objects_and_arrays() {
        let root = jsondoc::parse_str(r#"{"outer": [{"inner": "deep"}]}"#).unwrap();
        let found = select(&root, &path(&["outer", "0", "inner"])).unwrap();
        assert_eq!(found, Some(&Value::String("deep".into())));
        assert_eq!(select(&root, &[]).unwrap(), Some(&root));
    }

    #[test]
    fn test_select_missing_segments() {
        let root = jsondoc::parse_str(r#"{"list": [1, 2]}"#).unwrap();
        assert_eq!(select(&root, &path(&["nope"])).unwrap(), None);
        assert_eq!(select(&root, &path(&["list", "5"])).unwrap(), None);
        assert_eq!(select(&root, &path(&["list", "x"])).unwrap(), None);
    }

    #[test]
    fn test_select_into_scalar_is_type_mismatch() {
        let root = jsondoc::parse_str(r#"{"n": 42}"#).unwrap();
        let err = select(&root, &path(&["n", "x"])).unwrap_err();
        assert!(err.is_type_mismatch());
    }

    #[test]
    fn test_cli_options() {
        let cli = Cli::parse_from([
            "jsondoc",
            "--max-depth",
            "7",
            "--allow-duplicate-keys",
            "check",
            "a.json",
        ]);
        let options = cli.parse_args.options();
        assert_eq!(options.max_nesting_depth, 7);
        assert_eq!(options.duplicate_keys, DuplicateKeys::LastWins);
    }

    #[test]
    fn test_cli_max_depth_ceiling() {
        let ceiling = ParseOptions::MAX_NESTING_DEPTH.to_string();
        let cli =
            Cli::try_parse_from(["jsondoc", "--max-depth", ceiling.as_str(), "check", "a.json"])
                .unwrap();
        assert_eq!(
            cli.parse_args.options().max_nesting_depth,
            ParseOptions::MAX_NESTING_DEPTH
        );

        let above = (ParseOptions::MAX_NESTING_DEPTH + 1).to_string();
        for arg in [above.as_str(), "deep"] {
            let result = Cli::try_parse_from(["jsondoc", "--max-depth", arg, "check", "a.json"]);
            assert!(result.is_err(), "accepted --max-depth {arg}");
        }
    }
}
