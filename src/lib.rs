//! A tree-walking interpreter for a small numeric scripting language with
//! `let` bindings, block scoping, `if`/`while` and `print`.
//!
//! ```
//! let mut interpreter = cameleon::Interpreter::new(Vec::new());
//! let diagnostics = cameleon::run("let x = 5; print x;", &mut interpreter);
//! assert!(diagnostics.is_empty());
//! assert_eq!(interpreter.output(), b"5\n");
//! ```

use std::io::Write;

use log::{debug, error};
use thiserror::Error;

pub mod config;
mod interpreter;
mod parser;

pub use config::Config;
pub use interpreter::{Environment, Interpreter, RuntimeError};
pub use parser::{
    parse, tokenize_string, Error as SyntaxError, Expression, Locatable, Location, Name, Operator,
    ParserState, Span, Statement, Token, TokenType, Tokenizer,
};

/// Anything that went wrong while running a program.
#[derive(Debug, Error)]
pub enum Diagnostic {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error("Runtime error: {0}")]
    Runtime(#[from] RuntimeError),
}

/// Tokenizes, parses and executes `source`.
///
/// Statements that fail to parse are skipped; the rest still run. A runtime
/// error stops execution. Every failure is returned as a diagnostic.
pub fn run<W: Write>(source: &str, interpreter: &mut Interpreter<W>) -> Vec<Diagnostic> {
    let tokens = match tokenize_string(source) {
        Ok(tokens) => tokens,
        Err(e) => return vec![e.into()],
    };
    let (statements, errors) = parse(&tokens);
    let mut diagnostics: Vec<Diagnostic> = errors.into_iter().map(Diagnostic::from).collect();
    if let Err(e) = interpreter.interpret(&statements) {
        error!("{e}");
        diagnostics.push(e.into());
    }
    debug!("run finished with {} diagnostics", diagnostics.len());
    diagnostics
}
