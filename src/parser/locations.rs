use super::ast::*;
use super::tokenizer::Token;

#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

pub trait Locatable {
    fn span(&self) -> Span;

    /// Line on which the construct starts.
    fn line(&self) -> usize {
        self.span().start.line
    }
}

/// Source range of a token or syntax node. Lines are 1-based, columns are
/// 0-based byte offsets into the line.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct Span {
    pub start: Location,
    pub end: Location,
}

impl Span {
    pub(crate) fn new(start_line: usize, start_col: usize, end_line: usize, end_col: usize) -> Self {
        Self {
            start: Location {
                line: start_line,
                column: start_col,
            },
            end: Location {
                line: end_line,
                column: end_col,
            },
        }
    }

    pub(crate) fn till<R: Locatable>(&self, other: &R) -> Self {
        Self {
            start: self.start,
            end: other.span().end,
        }
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} till {}", self.start, self.end)
    }
}

impl Locatable for Span {
    fn span(&self) -> Span {
        *self
    }
}

impl Locatable for Token {
    fn span(&self) -> Span {
        self.span
    }
}

impl<R> Locatable for Box<R>
where
    R: Locatable,
{
    fn span(&self) -> Span {
        (**self).span()
    }
}

impl Locatable for Name {
    fn span(&self) -> Span {
        self.span
    }
}

impl Locatable for Expression {
    fn span(&self) -> Span {
        match self {
            Self::Literal(_, s) => *s,
            Self::Variable(name) => name.span,
            Self::Unary(_, _, s) => *s,
            Self::Binary(_, _, s) => *s,
            Self::Assignment(_, _, s) => *s,
        }
    }
}

impl Locatable for Statement {
    fn span(&self) -> Span {
        match self {
            Self::Expression(_, s) => *s,
            Self::VariableDeclaration(_, _, s) => *s,
            Self::Block(_, s) => *s,
            Self::If(_, _, _, s) => *s,
            Self::While(_, _, s) => *s,
            Self::Print(_, s) => *s,
        }
    }
}
