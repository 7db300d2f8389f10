//! loan-allocator CLI
//!
//! Allocate loans to facilities from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Allocate the tables in ./large, writing assignments.csv and yields.csv
//! loan-allocator allocate --data large
//!
//! # Print the full report as JSON
//! loan-allocator allocate --data large --format json
//!
//! # Generate a random dataset for testing
//! loan-allocator generate --loans 1000 --output sample
//! ```

use loan_allocator::allocation::observer::LogObserver;
use loan_allocator::allocation::policy::Allocator;
use loan_allocator::config::{OutputFormat, RunConfig};
use loan_allocator::io::reader::load_dataset;
use loan_allocator::io::writer::{report_to_json, write_report_files, write_tables};
use loan_allocator::reporting::report::AllocationReport;
use loan_allocator::simulation::generator::{generate_tables, GeneratorConfig};
use std::path::PathBuf;
use std::process;

fn print_usage() {
    eprintln!(
        r#"loan-allocator — covenant-aware loan to facility allocation

USAGE:
    loan-allocator <COMMAND> [OPTIONS]

COMMANDS:
    allocate    Assign loans to facilities and write result tables
    generate    Generate a random dataset (for testing)
    help        Show this message

OPTIONS (allocate):
    --data <DIR>            Directory with banks.csv, covenants.csv, facilities.csv, loans.csv
    --assignments <FILE>    Assignment table output (default: assignments.csv)
    --yields <FILE>         Yield table output (default: yields.csv)
    --delimiter <CHAR>      Field delimiter (default: ,)
    --format <FORMAT>       Console output: text (default) or json
    --verbose               Log every validation step

OPTIONS (generate):
    --banks <N>             Number of banks (default: 3)
    --facilities <N>        Number of facilities (default: 10)
    --covenants <N>         Number of covenants (default: 12)
    --loans <N>             Number of loans (default: 200)
    --output <DIR>          Directory to write the four tables into

Logging follows RUST_LOG when set.

EXAMPLES:
    loan-allocator allocate --data large
    loan-allocator allocate --data large --format json --yields out/yields.csv
    loan-allocator generate --banks 5 --facilities 20 --loans 5000 --output sample"#
    );
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn value<'a>(args: &'a [String], i: usize, flag: &str, expects: &str) -> &'a str {
    args.get(i).map(String::as_str).unwrap_or_else(|| {
        eprintln!("{} requires {}", flag, expects);
        process::exit(1);
    })
}

fn number(args: &[String], i: usize, flag: &str) -> usize {
    value(args, i, flag, "a number").parse().unwrap_or_else(|_| {
        eprintln!("{} requires a number", flag);
        process::exit(1);
    })
}

fn cmd_allocate(args: &[String]) {
    let mut config = RunConfig::default();
    let mut data_dir = None;
    let mut verbose = false;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--data" => {
                i += 1;
                data_dir = Some(PathBuf::from(value(args, i, "--data", "a directory")));
            }
            "--assignments" => {
                i += 1;
                config.assignments_path = PathBuf::from(value(args, i, "--assignments", "a file path"));
            }
            "--yields" => {
                i += 1;
                config.yields_path = PathBuf::from(value(args, i, "--yields", "a file path"));
            }
            "--delimiter" => {
                i += 1;
                let raw = value(args, i, "--delimiter", "a single character");
                config.delimiter = match raw.as_bytes() {
                    [byte] => *byte,
                    _ => {
                        eprintln!("--delimiter requires a single character");
                        process::exit(1);
                    }
                };
            }
            "--format" => {
                i += 1;
                config.format = value(args, i, "--format", "'text' or 'json'")
                    .parse()
                    .unwrap_or_else(|e| {
                        eprintln!("{}", e);
                        process::exit(1);
                    });
            }
            "--verbose" | "-v" => verbose = true,
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let Some(dir) = data_dir else {
        eprintln!("Error: --data <DIR> is required");
        process::exit(1);
    };
    let config = config.with_data_dir(dir);
    init_logging(verbose);

    let mut dataset = load_dataset(&config).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });

    let stats = Allocator::allocate(&mut dataset, &mut LogObserver);
    log::info!(
        "allocated {} of {} loans ({} unassigned)",
        stats.assigned,
        stats.total(),
        stats.unassigned
    );

    let report = AllocationReport::from_dataset(&dataset);
    if let Err(e) = write_report_files(&report, &config) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    for line in report.status_lines() {
        log::info!("{}", line);
    }

    match config.format {
        OutputFormat::Json => match report_to_json(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        OutputFormat::Text => println!("{}", report),
    }
}

fn cmd_generate(args: &[String]) {
    let mut config = GeneratorConfig::default();
    let mut output_dir: Option<PathBuf> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--banks" => {
                i += 1;
                config.bank_count = number(args, i, "--banks");
            }
            "--facilities" => {
                i += 1;
                config.facility_count = number(args, i, "--facilities");
            }
            "--covenants" => {
                i += 1;
                config.covenant_count = number(args, i, "--covenants");
            }
            "--loans" => {
                i += 1;
                config.loan_count = number(args, i, "--loans");
            }
            "--output" => {
                i += 1;
                output_dir = Some(PathBuf::from(value(args, i, "--output", "a directory")));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let Some(dir) = output_dir else {
        eprintln!("Error: --output <DIR> is required");
        process::exit(1);
    };
    init_logging(false);

    let tables = generate_tables(&config);
    if let Err(e) = write_tables(&tables, &dir, &RunConfig::default()) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
    eprintln!(
        "Generated {} banks, {} facilities, {} covenants, {} loans → {}",
        tables.banks.len(),
        tables.facilities.len(),
        tables.covenants.len(),
        tables.loans.len(),
        dir.display()
    );
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "allocate" => cmd_allocate(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
