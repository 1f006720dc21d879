use super::locations::Span;
use thiserror::Error as ThisError;

#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum Error {
    #[error("Lexical error at line {}: unexpected character '{}'", .0.start.line, .1)]
    Lexical(Span, char),
    #[error("Parser error at line {}: {}", .0.start.line, .1)]
    Syntax(Span, String),
}

impl Error {
    pub fn new(span: Span, msg: &str) -> Self {
        Self::Syntax(span, msg.to_string())
    }

    pub fn span(&self) -> Span {
        match self {
            Self::Lexical(span, _) | Self::Syntax(span, _) => *span,
        }
    }

    pub fn line(&self) -> usize {
        self.span().start.line
    }

    pub fn message(&self) -> String {
        match self {
            Self::Lexical(_, chr) => format!("unexpected character '{chr}'"),
            Self::Syntax(_, msg) => msg.clone(),
        }
    }
}
