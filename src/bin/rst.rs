//! Command-line interface for rst
//! This binary parses markup documents and renders them to different formats.
//!
//! Usage:
//!   rst render `<path>` [--format `<format>`]   - Render a document to HTML or LaTeX
//!   rst inspect `<path>` [--pretty]           - Dump the parsed tree as JSON
//!   rst check `<path>`                        - Parse and report diagnostics only

use clap::{Arg, ArgAction, Command};
use std::path::Path;

use rst::{Configuration, OutputFormat, Parser};

fn main() {
    let matches = Command::new("rst")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A compiler for a reStructuredText-style markup format")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("render")
                .about("Render a document")
                .arg(
                    Arg::new("path")
                        .help("Path to the document")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format ('html' or 'latex')")
                        .default_value("html"),
                )
                .arg(
                    Arg::new("initial-level")
                        .long("initial-level")
                        .help("Heading level assigned to the first underline letter")
                        .default_value("1"),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Dump the parsed document tree as JSON")
                .arg(
                    Arg::new("path")
                        .help("Path to the document")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("pretty")
                        .long("pretty")
                        .help("Pretty-print the JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Parse a document and report diagnostics")
                .arg(
                    Arg::new("path")
                        .help("Path to the document")
                        .required(true)
                        .index(1),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("render", render_matches)) => {
            let path = render_matches.get_one::<String>("path").unwrap();
            let format = render_matches.get_one::<String>("format").unwrap();
            let level = render_matches.get_one::<String>("initial-level").unwrap();
            handle_render_command(path, format, level);
        }
        Some(("inspect", inspect_matches)) => {
            let path = inspect_matches.get_one::<String>("path").unwrap();
            let pretty = inspect_matches.get_flag("pretty");
            handle_inspect_command(path, pretty);
        }
        Some(("check", check_matches)) => {
            let path = check_matches.get_one::<String>("path").unwrap();
            handle_check_command(path);
        }
        _ => unreachable!(),
    }
}

/// Handle the render command
fn handle_render_command(path: &str, format: &str, level: &str) {
    let format = OutputFormat::from_name(format).unwrap_or_else(|| {
        eprintln!("Unknown format '{}', expected 'html' or 'latex'", format);
        std::process::exit(2);
    });

    let initial_header_level = level.parse::<usize>().unwrap_or_else(|_| {
        eprintln!("Invalid initial level '{}'", level);
        std::process::exit(2);
    });

    let mut parser = Parser::with_configuration(Configuration {
        initial_header_level,
        file_name: None,
    });

    let document = parse_file(&mut parser, path);
    let output = parser.render(&document, format);
    print!("{}", output);

    report_diagnostics(&parser);
}

/// Handle the inspect command
fn handle_inspect_command(path: &str, pretty: bool) {
    let mut parser = Parser::new();
    let document = parse_file(&mut parser, path);

    let json = document.to_json();
    let output = if pretty {
        serde_json::to_string_pretty(&json)
    } else {
        serde_json::to_string(&json)
    };

    match output {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Serialization error: {}", e);
            std::process::exit(1);
        }
    }

    report_diagnostics(&parser);
}

/// Handle the check command
fn handle_check_command(path: &str) {
    let mut parser = Parser::new();
    let _ = parse_file(&mut parser, path);

    if parser.diagnostics().is_empty() {
        println!("{}: no problems found", path);
        return;
    }

    report_diagnostics(&parser);
}

fn parse_file(parser: &mut Parser, path: &str) -> rst::nodes::Node {
    parser.parse_file(Path::new(path)).unwrap_or_else(|e| {
        eprintln!("Error reading file: {}", e);
        std::process::exit(1);
    })
}

/// Diagnostics go to stderr so the rendered output stays pipeable.
fn report_diagnostics(parser: &Parser) {
    for (severity, message) in parser.diagnostics() {
        eprintln!("{}: {}", severity, message);
    }

    if !parser.errors().is_empty() {
        std::process::exit(1);
    }
}
