use std::fs;

use clap::Parser;
use mexpr::{Engine, Value};

/// mexpr is an embeddable math expression language: expressions, matrices,
/// objects, ranges and user-defined functions over a configurable function
/// table.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Tells mexpr to look at a file instead of an inline script.
    #[arg(short, long)]
    file: bool,

    contents: String,
}

fn main() {
    let args = Args::parse();

    let script = if args.file {
        fs::read_to_string(&args.contents).unwrap_or_else(|_| {
            eprintln!(
                "Failed to read the input file '{}'. Perhaps this file does not exist?",
                &args.contents
            );
            std::process::exit(1);
        })
    } else {
        args.contents
    };

    match Engine::new().evaluate(&script) {
        Ok(Value::Null) => {},
        Ok(value) => println!("{value}"),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        },
    }
}
