use super::locations::Span;
use super::tokenizer::{Token, TokenType as TT};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Expression(Expression, Span),
    VariableDeclaration(
        Name,
        Option<Expression>, // initializer
        Span,
    ),
    Block(Vec<Statement>, Span),
    If(
        Expression,
        Box<Statement>,         // then branch
        Option<Box<Statement>>, // else branch
        Span,
    ),
    While(Expression, Box<Statement>, Span),
    Print(Expression, Span),
}

/// Expression nodes. The span of `Unary` and `Binary` is the span of the
/// operator token, which is where runtime errors are reported.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(f64, Span),
    Variable(Name),
    Unary(Operator, Box<Expression>, Span),
    Binary(Operator, Box<(Expression, Expression)>, Span),
    Assignment(Name, Box<Expression>, Span),
}

#[derive(Clone, PartialEq)]
pub struct Name {
    pub name: String,
    pub span: Span,
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name(\"{}\")", self.name)
    }
}

impl From<Token> for Name {
    fn from(value: Token) -> Self {
        match value.typ {
            TT::NAME => Self {
                name: value.lexeme,
                span: value.span,
            },
            _ => unreachable!(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Not,
    Plus,
    Minus,
    Times,
    Divide,
    Equal,
    NotEqual,
    LessThanEqual,
    LessThan,
    GreaterThanEqual,
    GreaterThan,
}

impl From<&Token> for Operator {
    fn from(value: &Token) -> Self {
        match value.typ {
            TT::EXCLAMATION => Self::Not,
            TT::PLUS => Self::Plus,
            TT::MINUS => Self::Minus,
            TT::STAR => Self::Times,
            TT::SLASH => Self::Divide,
            TT::EQEQUAL => Self::Equal,
            TT::NOTEQUAL => Self::NotEqual,
            TT::LESSEQUAL => Self::LessThanEqual,
            TT::LESS => Self::LessThan,
            TT::GREATEREQUAL => Self::GreaterThanEqual,
            TT::GREATER => Self::GreaterThan,
            _ => unreachable!(),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Self::Not => "!",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Times => "*",
            Self::Divide => "/",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::LessThanEqual => "<=",
            Self::LessThan => "<",
            Self::GreaterThanEqual => ">=",
            Self::GreaterThan => ">",
        };
        f.write_str(symbol)
    }
}

// Lisp-style rendering, used by `--dump-ast`.
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value, _) => write!(f, "{value}"),
            Self::Variable(name) => write!(f, "{}", name.name),
            Self::Unary(op, operand, _) => write!(f, "({op} {operand})"),
            Self::Binary(op, operands, _) => write!(f, "({op} {} {})", operands.0, operands.1),
            Self::Assignment(name, value, _) => write!(f, "(= {} {value})", name.name),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expression(expr, _) => write!(f, "(expr {expr})"),
            Self::VariableDeclaration(name, Some(init), _) => write!(f, "(let {} {init})", name.name),
            Self::VariableDeclaration(name, None, _) => write!(f, "(let {})", name.name),
            Self::Block(statements, _) => {
                f.write_str("(block")?;
                for statement in statements {
                    write!(f, " {statement}")?;
                }
                f.write_str(")")
            }
            Self::If(cond, then, Some(els), _) => write!(f, "(if {cond} {then} {els})"),
            Self::If(cond, then, None, _) => write!(f, "(if {cond} {then})"),
            Self::While(cond, body, _) => write!(f, "(while {cond} {body})"),
            Self::Print(expr, _) => write!(f, "(print {expr})"),
        }
    }
}
