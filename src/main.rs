use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use log::info;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as ReplResult};

use cameleon::{parse, tokenize_string, Config, Diagnostic, Interpreter, ParserState, Token, Tokenizer};

/// Runs a cameleon script, or starts an interactive prompt when no script is given.
#[derive(Parser, Debug)]
#[command(name = "cameleon", version, about, long_about = None)]
struct Cli {
    /// Script to run. Use `-` to read the program from standard input.
    script: Option<PathBuf>,

    /// Print the parsed statements before running them.
    #[arg(long)]
    dump_ast: bool,

    /// Increase log verbosity (-v, -vv, -vvv). RUST_LOG overrides this.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config {
        dump_ast: cli.dump_ast,
        ..Config::default()
    }
    .with_verbosity(cli.verbose);

    env_logger::Builder::new()
        .filter_level(config.log_level)
        .parse_default_env()
        .init();

    match cli.script {
        Some(path) => run_script(&path, &config),
        None => Ok(run_repl(&config)?),
    }
}

fn run_script(path: &Path, config: &Config) -> Result<()> {
    let source = if path == Path::new("-") {
        let mut source = String::new();
        io::stdin()
            .read_to_string(&mut source)
            .context("Could not read the program from standard input.")?;
        source
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("{} not found. No such file or directory.", path.display()))?
    };
    info!("running {} bytes of source", source.len());

    let mut interpreter = Interpreter::stdout();
    match tokenize_string(&source) {
        Ok(tokens) => execute(&tokens, &mut interpreter, config),
        Err(e) => report(&Diagnostic::from(e)),
    }
    Ok(())
}

fn run_repl(config: &Config) -> ReplResult<()> {
    let mut rl = DefaultEditor::new()?;
    #[cfg(feature = "with-file-history")]
    if rl.load_history(&config.history_file).is_err() {
        println!("No previous history.");
    }

    let mut interpreter = Interpreter::stdout();
    let mut tokenizer = Tokenizer::new();
    let mut prompt = ">> ";
    loop {
        let readline = rl.readline(prompt);
        match readline {
            Ok(line) => {
                rl.add_history_entry(line.as_str())?;
                match tokenizer.tokenize(std::iter::once(line)) {
                    ParserState::ContinuationNeeded => {
                        prompt = ".. ";
                        continue;
                    }
                    ParserState::Ok => {
                        let tokens = std::mem::take(&mut tokenizer).finalize();
                        execute(&tokens, &mut interpreter, config);
                    }
                    ParserState::Error(e) => {
                        tokenizer = Tokenizer::new();
                        report(&Diagnostic::from(e));
                    }
                }
                prompt = ">> ";
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    #[cfg(feature = "with-file-history")]
    rl.save_history(&config.history_file)?;
    Ok(())
}

fn execute(tokens: &[Token], interpreter: &mut Interpreter, config: &Config) {
    let (statements, errors) = parse(tokens);
    if config.dump_ast {
        println!("Parsed result:");
        for statement in statements.iter() {
            println!("{statement}");
        }
    }
    for error in errors {
        report(&Diagnostic::from(error));
    }
    if let Err(e) = interpreter.interpret(&statements) {
        report(&Diagnostic::from(e));
    }
}

fn report(diagnostic: &Diagnostic) {
    eprintln!("{diagnostic}");
}
