//! hornlog CLI - interactive Horn clause interpreter.

use std::fs;
use std::io;
use std::process::ExitCode;

use anyhow::Context;

use hornlog::{parse_rules, Repl, Rule};

fn print_usage() {
    eprintln!("hornlog - Horn clause resolution engine");
    eprintln!();
    eprintln!("Usage: hornlog [options] [file...]");
    eprintln!();
    eprintln!("Consults the given files, then reads queries interactively.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -h, --help    Show this help");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  hornlog family.pl      Load family.pl and start the REPL");
    eprintln!("  hornlog                Start the REPL with an empty knowledge base");
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let mut files = Vec::new();

    for arg in &args[1..] {
        match arg.as_str() {
            "-h" | "--help" => {
                print_usage();
                return ExitCode::SUCCESS;
            }
            arg if arg.starts_with('-') => {
                eprintln!("Unknown option: {arg}");
                print_usage();
                return ExitCode::from(1);
            }
            _ => files.push(arg.clone()),
        }
    }

    match run(&files) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {error:#}");
            ExitCode::from(1)
        }
    }
}

fn run(files: &[String]) -> anyhow::Result<()> {
    let mut rules: Vec<Rule> = Vec::new();
    for file in files {
        let source = fs::read_to_string(file).with_context(|| format!("reading {file}"))?;
        rules.extend(parse_rules(file, &source).with_context(|| format!("parsing {file}"))?);
    }

    let mut repl = Repl::new(rules, io::stdin().lock(), io::stdout().lock())
        .context("building the knowledge base")?;
    repl.run().context("running the REPL")?;
    Ok(())
}
