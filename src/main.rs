//! cfgdict CLI
//!
//! Debug entry point: loads configuration files into a store and prints the
//! merged tree, a value, the re-serialized text, or the file provenance.

use cfgdict::{ConfigDict, ConfigNode, Entry};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cfgdict")]
#[command(about = "Inspect hierarchical configuration files", version)]
struct Cli {
    /// Log debug events to stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the merged tree
    Show {
        /// Files to read, later files override earlier ones
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Only import these sections (full header text, repeatable)
        #[arg(long, short = 's')]
        section: Vec<String>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Re-serialize the merged tree in the file format
    Dump {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Only import these sections (full header text, repeatable)
        #[arg(long, short = 's')]
        section: Vec<String>,

        /// Write to this file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Print one entry by dotted path (escape literal dots as `_|_`)
    Get {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Dotted path, e.g. `detector.gain`
        #[arg(long, short = 'k')]
        key: String,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// List the files merged into the store
    Sources {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Show {
            files,
            section,
            json,
        } => run_show(&files, &section, json),
        Commands::Dump {
            files,
            section,
            output,
        } => run_dump(&files, &section, output),
        Commands::Get { files, key, json } => run_get(&files, &key, json),
        Commands::Sources { files, json } => run_sources(&files, json),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load(files: &[PathBuf], sections: &[String]) -> ConfigDict {
    let filter: Vec<&str> = sections.iter().map(String::as_str).collect();
    let filter = if filter.is_empty() {
        None
    } else {
        Some(filter.as_slice())
    };

    let mut config = ConfigDict::new(ConfigNode::new());
    if let Err(e) = config.read(files, filter) {
        eprintln!("Error loading configuration: {}", e);
        process::exit(1);
    }
    config
}

fn run_show(files: &[PathBuf], sections: &[String], json: bool) {
    let config = load(files, sections);

    if json {
        match config.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    } else {
        print_tree(&config, 0);
    }
}

/// `+ section` and `- key = value` lines, one tab per nesting level
fn print_tree(node: &ConfigNode, level: usize) {
    let indent = "\t".repeat(level);
    for (key, entry) in node {
        match entry {
            Entry::Section(child) => {
                println!("{}+ {}", indent, key);
                print_tree(child, level + 1);
            }
            Entry::Value(value) => {
                let text = cfgdict::codec::format_value(value).replace('\n', " | ");
                println!("{}- {} = {}", indent, key, text.replace('\t', ""));
            }
        }
    }
}

fn run_dump(files: &[PathBuf], sections: &[String], output: Option<PathBuf>) {
    let config = load(files, sections);

    match output {
        Some(path) => {
            if let Err(e) = config.write(&path, None) {
                eprintln!("Error writing configuration: {}", e);
                process::exit(1);
            }
            eprintln!("Wrote {}", path.display());
        }
        None => print!("{}", config.to_text(None)),
    }
}

fn run_get(files: &[PathBuf], key: &str, json: bool) {
    let config = load(files, &[]);

    let entry = match config.get_path(key) {
        Some(entry) => entry,
        None => {
            eprintln!("Key '{}' not found", key);
            process::exit(1);
        }
    };

    if json {
        match serde_json::to_string_pretty(entry) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    match entry {
        Entry::Value(value) => println!("{}", cfgdict::codec::format_value(value)),
        Entry::Section(section) => print_tree(section, 0),
    }
}

fn run_sources(files: &[PathBuf], json: bool) {
    let config = load(files, &[]);

    if json {
        match serde_json::to_string_pretty(config.files()) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    } else {
        println!("Merged files ({} total):\n", config.files().len());
        for record in config.files() {
            println!("  {}", record.to_human());
        }
    }
}
