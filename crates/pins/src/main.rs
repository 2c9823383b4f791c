use lex::Token;
use parse::{Parser, TraceWriter};

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, ValueEnum};
use tracing::debug;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(ClapParser, Debug)]
#[command(about = "Checks PINS programs for lexical and syntactic errors")]
struct Pins {
    source: PathBuf,
    /// Last phase to run.
    #[clap(long, value_enum, default_value_t = Phase::Syn)]
    exec: Phase,
    /// Phases whose output is printed to stdout.
    #[clap(long, value_enum)]
    dump: Vec<Phase>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Phase {
    Lex,
    Syn,
}

fn main() -> Result<ExitCode> {
    init_tracing();

    let pins = Pins::parse();
    let content = std::fs::read_to_string(&pins.source)
        .with_context(|| format!("failed to read {}", pins.source.display()))?;

    match run(&pins, &content) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => match err.downcast_ref::<parse::Error>() {
            Some(diagnostic) => {
                report(diagnostic);
                Ok(ExitCode::FAILURE)
            }
            None => Err(err),
        },
    }
}

fn run(pins: &Pins, source: &str) -> Result<()> {
    let tokens = lex::scan(source).map_err(parse::Error::from)?;

    if pins.dump.contains(&Phase::Lex) {
        dump_tokens(&tokens)?;
    }
    if pins.exec == Phase::Lex {
        return Ok(());
    }

    let result = if pins.dump.contains(&Phase::Syn) {
        let mut writer = TraceWriter::new(io::stdout().lock());
        let result = Parser::with_trace(&tokens, &mut writer).and_then(|parser| parser.parse());
        writer.finish().context("failed to write the production trace")?;
        result
    } else {
        Parser::new(&tokens).and_then(|parser| parser.parse())
    };

    debug!(success = result.is_ok(), "syntax analysis finished");
    result.map_err(parse::Error::from)?;
    Ok(())
}

fn report(err: &parse::Error) {
    let kind = match err {
        parse::Error::Lexical(_) => "lexical",
        parse::Error::Syntax(_) => "syntax",
    };
    eprintln!("{} error at {}: {}", kind, err.position(), err.message());
}

fn dump_tokens(tokens: &[Token]) -> Result<()> {
    let mut stdout = io::stdout().lock();
    for token in tokens {
        writeln!(stdout, "{}", token)?;
    }
    stdout.flush()?;
    Ok(())
}

// Logging stays off unless RUST_LOG is set, and goes to stderr so dumps on
// stdout are not interleaved with it.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::stderr).with_target(true).with_level(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}
