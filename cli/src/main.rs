use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};

use reducer::mappack::{self, MapEntry};
use reducer::{DEFAULT_SEED_SYMBOLS, ReduceError, ReduceEvent, Stage, SymbolEnvironment};
use rms::parser::ParseError;

#[derive(Parser)]
#[command(name = "rmspack", version, about = "Reducer and packer for random map scripts")]
struct Cli {
    /// Map script files to reduce
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Pack all inputs into a single mappack with this file name
    #[arg(short = 'm', long, value_name = "NAME")]
    mappack: Option<String>,

    /// Directory reduced files are written to
    #[arg(short, long, default_value = "edited")]
    out_dir: PathBuf,

    /// Treat SYMBOL as defined, in addition to the built-in seed set
    #[arg(long, value_name = "SYMBOL")]
    define: Vec<String>,

    /// Parse and reduce only, write nothing
    #[arg(long)]
    check: bool,

    /// Print pruning events as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Suppress per-event output
    #[arg(short, long)]
    quiet: bool,

    /// Disable colored error output
    #[arg(long)]
    no_color: bool,
}

fn main() {
    let cli = Cli::parse();

    let color_choice = if cli.no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };
    let writer = StandardStream::stderr(color_choice);
    let config = term::Config::default();
    let mut files = SimpleFiles::new();

    if !cli.check {
        if let Err(e) = std::fs::create_dir_all(&cli.out_dir) {
            eprintln!("error: cannot create '{}': {}", cli.out_dir.display(), e);
            process::exit(1);
        }
    }

    let mut entries = Vec::new();
    let mut failed = false;
    for path in &cli.files {
        match process_file(path, &cli, &mut files, &writer, &config) {
            Some(text) => entries.push(MapEntry {
                filename: output_name(path),
                content: text,
            }),
            None => failed = true,
        }
    }

    if let Some(name) = &cli.mappack {
        if failed {
            // A pack missing some of its maps would silently shift the
            // odds of the rest; refuse instead.
            eprintln!(
                "error: not writing mappack '{}': some maps failed to reduce",
                name
            );
        } else {
            match mappack::synthesize(&entries, mappack::sha256_fingerprint) {
                Ok(document) => {
                    let text = document.to_string();
                    if !cli.check {
                        let out_path = cli.out_dir.join(name);
                        match std::fs::write(&out_path, text.trim()) {
                            Ok(()) => {
                                if !cli.quiet {
                                    println!("wrote {}", out_path.display());
                                }
                            }
                            Err(e) => {
                                eprintln!(
                                    "error: cannot write '{}': {}",
                                    out_path.display(),
                                    e
                                );
                                failed = true;
                            }
                        }
                    }
                }
                Err(e) => {
                    eprintln!("error: {}", e);
                    failed = true;
                }
            }
        }
    }

    if failed {
        process::exit(1);
    }
}

/// Reduce one file and write its output. Returns the reduced text, or
/// None if the document failed (the run continues with the other files).
fn process_file(
    path: &Path,
    cli: &Cli,
    files: &mut SimpleFiles<String, String>,
    writer: &StandardStream,
    config: &term::Config,
) -> Option<String> {
    let source = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", path.display(), e);
            return None;
        }
    };

    let name = path.display().to_string();
    let mut env = SymbolEnvironment::with_seeds(
        DEFAULT_SEED_SYMBOLS
            .iter()
            .map(|s| s.to_string())
            .chain(cli.define.iter().cloned()),
    );

    // Each pass parses a different intermediate text; register both so
    // diagnostic spans resolve against the text they refer to.
    let result = reducer::reduce_source(&source, &mut env, |stage, text| {
        let label = match stage {
            Stage::Normalized => name.clone(),
            Stage::RandomReduced => format!("{} (after random pass)", name),
        };
        files.add(label, text.to_string())
    });

    match result {
        Ok(reduction) => {
            emit_diagnostics(writer, config, files, &reduction.warnings);
            if cli.json {
                let report = serde_json::json!({ "file": name, "events": reduction.events });
                println!("{}", report);
            } else if !cli.quiet {
                println!("{}", name);
                for event in &reduction.events {
                    println!("  {}", render_event(event));
                }
            }
            if !cli.check {
                let out_path = cli.out_dir.join(output_name(path));
                if let Err(e) = std::fs::write(&out_path, &reduction.text) {
                    eprintln!("error: cannot write '{}': {}", out_path.display(), e);
                    return None;
                }
            }
            Some(reduction.text)
        }
        Err(ReduceError::Parse(errors)) => {
            emit_diagnostics(writer, config, files, &errors);
            None
        }
        Err(other) => {
            eprintln!("error: {}: {}", name, other);
            None
        }
    }
}

fn emit_diagnostics(
    writer: &StandardStream,
    config: &term::Config,
    files: &SimpleFiles<String, String>,
    diagnostics: &[ParseError],
) {
    for diagnostic in diagnostics {
        let diagnostic = diagnostic.to_diagnostic();
        let _ = term::emit_to_write_style(&mut writer.lock(), config, files, &diagnostic);
    }
}

fn render_event(event: &ReduceEvent) -> String {
    match event {
        ReduceEvent::UnreachablePercentChance { weight } => {
            format!("removed unreachable percent_chance {}", weight)
        }
        ReduceEvent::CollapsedRandomBlock => {
            "collapsed random block with a single 100% branch".to_string()
        }
        ReduceEvent::UnreachableCondition {
            symbol: Some(symbol),
        } => {
            format!("emptied unreachable condition for {}", symbol)
        }
        ReduceEvent::UnreachableCondition { symbol: None } => {
            "emptied unreachable condition".to_string()
        }
    }
}

/// The bare file name a reduced script is written under (inputs may live
/// in other directories; output always lands in the out dir).
fn output_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
