//! Command-line interface for keyspan
//! Turns a solved-puzzle report into cleaned records and a summary, and
//! projects theoretical keys inside a range.
//!
//! Usage:
//!   keyspan report [`<input>`] [--records-out `<path>`] [--summary-out `<path>`] [--top `<n>`]
//!   keyspan locate --start `<hex>` --end `<hex>` --position `<pct>` [--window `<pct>`] [--known-key `<hex>`]

use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};

use _keyspan_core::config::{
    ReportConfig, DEFAULT_INPUT_PATH, DEFAULT_RECORDS_PATH, DEFAULT_SUMMARY_PATH,
};
use _keyspan_core::errors::KeyspanResult;
use _keyspan_core::logging::init_tracing;
use _keyspan_core::pipeline::{run_report, ReportPaths};
use _keyspan_core::projection::{project_key, verify_known_key};
use _keyspan_core::render::{render_projection, render_summary, render_verification};

fn main() {
    let matches = Command::new("keyspan")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Extract, analyze and project solved key-range puzzles")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log skipped entries and other debug detail")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("report")
                .about("Clean a puzzle report and write records and summary JSON")
                .arg(
                    Arg::new("input")
                        .help("Path to the raw report text")
                        .default_value(DEFAULT_INPUT_PATH)
                        .index(1),
                )
                .arg(
                    Arg::new("records-out")
                        .long("records-out")
                        .help("Where to write the cleaned records")
                        .default_value(DEFAULT_RECORDS_PATH),
                )
                .arg(
                    Arg::new("summary-out")
                        .long("summary-out")
                        .help("Where to write the summary")
                        .default_value(DEFAULT_SUMMARY_PATH),
                )
                .arg(
                    Arg::new("top")
                        .long("top")
                        .help("Leaderboard size (overrides KEYSPAN_TOP_N)")
                        .value_parser(value_parser!(usize)),
                )
                .arg(
                    Arg::new("quiet")
                        .long("quiet")
                        .short('q')
                        .help("Do not print the console summary")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("locate")
                .about("Project the theoretical key at a position inside a range")
                .arg(Arg::new("start").long("start").help("Range start (hex)").required(true))
                .arg(Arg::new("end").long("end").help("Range end (hex)").required(true))
                .arg(
                    Arg::new("position")
                        .long("position")
                        .help("Position percentage in [0, 100], e.g. 49.28")
                        .required(true)
                        .value_parser(value_parser!(f64)),
                )
                .arg(
                    Arg::new("window")
                        .long("window")
                        .help("Search window half-width in percent (overrides KEYSPAN_WINDOW_PERCENT)")
                        .value_parser(value_parser!(f64)),
                )
                .arg(
                    Arg::new("known-key")
                        .long("known-key")
                        .help("A known key (hex) to check against the projection"),
                ),
        )
        .get_matches();

    init_tracing(matches.get_flag("verbose"));
    let config = ReportConfig::from_env();

    let result = match matches.subcommand() {
        Some(("report", report_matches)) => handle_report_command(report_matches, config),
        Some(("locate", locate_matches)) => handle_locate_command(locate_matches, config),
        _ => unreachable!(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Handle the report command
fn handle_report_command(matches: &ArgMatches, mut config: ReportConfig) -> KeyspanResult<()> {
    if let Some(&top) = matches.get_one::<usize>("top") {
        config.top_n = top.max(1);
    }
    let path = |name: &str| PathBuf::from(matches.get_one::<String>(name).unwrap());
    let paths = ReportPaths {
        input: path("input"),
        records_out: path("records-out"),
        summary_out: path("summary-out"),
    };

    let outcome = run_report(&paths, &config)?;
    println!(
        "Cleaned puzzle data saved to {}",
        paths.records_out.display()
    );
    println!("Analysis results saved to {}", paths.summary_out.display());
    if outcome.skipped > 0 {
        println!("Skipped {} unrecognised entries", outcome.skipped);
    }
    if !matches.get_flag("quiet") {
        println!();
        print!(
            "{}",
            render_summary(&outcome.analysis.summary, config.preview_count)
        );
    }
    Ok(())
}

/// Handle the locate command
fn handle_locate_command(matches: &ArgMatches, mut config: ReportConfig) -> KeyspanResult<()> {
    if let Some(&window) = matches.get_one::<f64>("window") {
        config.window_percent = window;
    }
    let start = matches.get_one::<String>("start").unwrap();
    let end = matches.get_one::<String>("end").unwrap();
    let position = *matches.get_one::<f64>("position").unwrap();

    println!("Analyzing range {start}:{end} at position {position}%\n");
    let projection = project_key(start, end, position, config.window_percent, config.key_width)?;
    print!("{}", render_projection(&projection, config.window_percent));

    if let Some(known_key) = matches.get_one::<String>("known-key") {
        let verification = verify_known_key(&projection, known_key)?;
        println!();
        print!("{}", render_verification(known_key, &verification));
    }
    Ok(())
}
