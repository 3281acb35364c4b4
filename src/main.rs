//! shpipe: print the structure of shell pipeline lines.
//!
//! Lines come from the command line, one per argument, or from stdin one per
//! line. Each is printed as text or JSON; parse errors go to stderr with a
//! caret under the offending position.

use std::io::BufRead;
use std::process::ExitCode;

use shpipe::config::{Config, OutputConfig, OutputFormat};
use shpipe::{Pipeline, logging, parse};

const USAGE: &str = "\
usage: shpipe [--json | --text] [--pretty] [--dump-config] [LINE...]

Parses each LINE (or each line of stdin) as a shell pipeline and prints
its processes, commands and redirections.

  --json         print JSON
  --text         print the Proc(...) view (default)
  --pretty       pretty-print JSON
  --dump-config  print the merged configuration and exit
  -h, --help     show this help";

#[derive(Debug, Default, PartialEq)]
struct Options {
    format: Option<OutputFormat>,
    pretty: bool,
    dump_config: bool,
    help: bool,
    lines: Vec<String>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Options, String> {
    let mut options = Options::default();
    let mut only_lines = false;
    for arg in args {
        if only_lines {
            options.lines.push(arg);
            continue;
        }
        match arg.as_str() {
            "--json" => options.format = Some(OutputFormat::Json),
            "--text" => options.format = Some(OutputFormat::Text),
            "--pretty" => options.pretty = true,
            "--dump-config" => options.dump_config = true,
            "-h" | "--help" => options.help = true,
            "--" => only_lines = true,
            flag if flag.starts_with("--") => return Err(format!("unknown option: {flag}")),
            _ => options.lines.push(arg),
        }
    }
    Ok(options)
}

fn render_text(pipeline: &Pipeline) -> String {
    let mut out = String::new();
    for process in pipeline {
        out.push_str(&format!("{process}\n"));
        for redirection in process.redirections() {
            out.push_str(&format!("\t{redirection} is:{}\n", redirection.kind().label()));
        }
    }
    out
}

fn render(pipeline: &Pipeline, output: &OutputConfig) -> Result<String, serde_json::Error> {
    match output.format {
        OutputFormat::Text => Ok(render_text(pipeline)),
        OutputFormat::Json if output.pretty => {
            serde_json::to_string_pretty(pipeline).map(|s| s + "\n")
        }
        OutputFormat::Json => serde_json::to_string(pipeline).map(|s| s + "\n"),
    }
}

/// Parse and print one line. Returns `false` if it did not parse.
fn run_line(line: &str, output: &OutputConfig) -> bool {
    let result = parse(line);
    logging::record_parse(line, &result);
    match result {
        Ok(pipeline) => match render(&pipeline, output) {
            Ok(text) => {
                print!("{text}");
                true
            }
            Err(e) => {
                eprintln!("shpipe: cannot serialise pipeline: {e}");
                false
            }
        },
        Err(e) => {
            eprintln!("shpipe: {e}\n{}", e.pointer(line));
            false
        }
    }
}

/// A line read from stdin without its CRLF remainder, or `None` if blank.
fn stdin_line(line: &str) -> Option<&str> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    (!line.trim().is_empty()).then_some(line)
}

fn main() -> ExitCode {
    let options = match parse_args(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("shpipe: {e}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };
    if options.help {
        println!("{USAGE}");
        return ExitCode::SUCCESS;
    }

    let mut config = Config::load();
    if let Some(format) = options.format {
        config.output.format = format;
    }
    if options.pretty {
        config.output.pretty = true;
    }

    if options.dump_config {
        return match config.to_toml() {
            Ok(toml) => {
                print!("{toml}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("shpipe: cannot serialise config: {e}");
                ExitCode::FAILURE
            }
        };
    }

    logging::init(&config.logging);

    let mut all_ok = true;
    if options.lines.is_empty() {
        for line in std::io::stdin().lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    eprintln!("shpipe: failed to read stdin: {e}");
                    return ExitCode::FAILURE;
                }
            };
            if let Some(line) = stdin_line(&line) {
                all_ok &= run_line(line, &config.output);
            }
        }
    } else {
        for line in &options.lines {
            all_ok &= run_line(line, &config.output);
        }
    }

    if all_ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
