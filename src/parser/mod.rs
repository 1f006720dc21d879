mod ast;
mod error;
mod grammar;
mod locations;
pub mod tokenizer;

pub use ast::*;
pub use error::Error;
pub use grammar::parse;
pub use locations::{Locatable, Location, Span};
pub use tokenizer::{tokenize_string, ParserState, Token, TokenType, Tokenizer};

#[cfg(test)]
mod test;
