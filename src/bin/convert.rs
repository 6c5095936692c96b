use std::io::{self, Read, Write};
use std::process::ExitCode;

use xhtml_strict::{Converter, Options};

fn main() -> ExitCode {
    let mut options = Options::fix();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--strict" => options = options.with_strict_mode(true),
            "--check" => options = options.with_auto_fix(false),
            "--validate" => options = options.with_validate_only(true),
            other => {
                eprintln!("unknown argument: {other}");
                eprintln!("usage: convert [--strict] [--check] [--validate] < input.html");
                return ExitCode::from(2);
            }
        }
    }

    let mut html = Vec::new();
    io::stdin().read_to_end(&mut html).expect("read stdin");

    let converter = Converter::new();
    if options.validate_only {
        return match converter.validate(&html) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("{err}");
                ExitCode::FAILURE
            }
        };
    }

    match converter.convert(&html, &options) {
        Ok(result) => {
            for err in result.errors() {
                eprintln!("{err}");
            }
            if let Err(err) = io::stdout().write_all(result.output()) {
                eprintln!("write stdout: {err}");
                return ExitCode::FAILURE;
            }
            if result.success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
