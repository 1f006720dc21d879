// # ========================= START OF THE GRAMMAR =========================
//
// Rules are listed from lowest to highest precedence. Every binary operator
// is left-associative, assignment is right-associative.
//
// * Strings with single quotes ('let') denote KEYWORDS
// * Upper case names (NAME, NUMBER) denote token types
// * e*  matches zero or more occurrences of e, e? optionally matches e
//
// The parser walks the token slice with a single cursor. The only lookbehind
// is the previously consumed token.

use log::{debug, trace, warn};

use super::ast::*;
use super::error::Error;
use super::locations::Span;
use super::tokenizer::{Token, TokenType as TT};

type ParseResult<T> = Result<T, Error>;

// tokens at which error recovery resumes parsing
const SYNC_KEYWORDS: [&str; 8] = ["and", "or", "let", "else", "if", "while", "print", "false"];

// deepest nesting of statements, parenthesized expressions and unary
// operators the parser descends into
const MAX_DEPTH: usize = 64;

/// Parses a token stream into statements. Never fails: malformed statements
/// are skipped and reported in the returned error list, in source order.
pub fn parse(input: &[Token]) -> (Vec<Statement>, Vec<Error>) {
    let mut parser = Parser::new(input);
    let statements = parser.file_();
    debug!(
        "parsed {} statements ({} errors)",
        statements.len(),
        parser.errors.len()
    );
    (statements, parser.errors)
}

struct Parser<'a> {
    tokens: &'a [Token],
    current: usize,
    errors: Vec<Error>,
    endmarker: Token,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        // a stream without ENDMARKER behaves as if it had one after its last token
        let endmarker = match tokens.last() {
            Some(t) if t.typ == TT::ENDMARKER => t.clone(),
            Some(t) => Token::new(TT::ENDMARKER, "", Span { start: t.span.end, end: t.span.end }),
            None => Token::new(TT::ENDMARKER, "", Span::new(1, 0, 1, 0)),
        };
        Self {
            tokens,
            current: 0,
            errors: vec![],
            endmarker,
            depth: 0,
        }
    }

    // # STARTING RULE
    // # =============

    // file: declaration* ENDMARKER
    fn file_(&mut self) -> Vec<Statement> {
        let mut statements = vec![];
        while !self.is_at_end() {
            if let Some(statement) = self.declaration() {
                statements.push(statement);
            }
        }
        statements
    }

    // # STATEMENTS
    // # ==========

    // declaration:
    //     | 'let' NAME ('=' expression)? ';'
    //     | print_stmt
    //     | statement
    fn declaration(&mut self) -> Option<Statement> {
        let result = if self.match_keyword("let") {
            self.var_declaration()
        } else if self.match_keyword("print") {
            self.print_stmt()
        } else {
            self.statement()
        };
        match result {
            Ok(statement) => Some(statement),
            Err(error) => {
                warn!("{error}");
                self.errors.push(error);
                self.synchronize();
                None
            }
        }
    }

    fn var_declaration(&mut self) -> ParseResult<Statement> {
        let keyword = self.previous().span;
        let name = self.consume(TT::NAME, "Expect variable name.")?;
        let initializer = if self.matches(&[TT::EQUAL]) {
            Some(self.expression()?)
        } else {
            None
        };
        let semi = self.consume(TT::SEMI, "Expect ';' after variable declaration.")?;
        Ok(Statement::VariableDeclaration(
            Name::from(name),
            initializer,
            keyword.till(&semi),
        ))
    }

    // statement:
    //     | if_stmt
    //     | while_stmt
    //     | block
    //     | expression_stmt
    fn statement(&mut self) -> ParseResult<Statement> {
        self.nested(|p| {
            if p.match_keyword("if") {
                return p.if_stmt();
            }
            if p.match_keyword("while") {
                return p.while_stmt();
            }
            if p.matches(&[TT::LBRACE]) {
                return p.block();
            }
            p.expression_stmt()
        })
    }

    // print_stmt: 'print' expression ';'
    fn print_stmt(&mut self) -> ParseResult<Statement> {
        let keyword = self.previous().span;
        let value = self.expression()?;
        let semi = self.consume(TT::SEMI, "Expect ';' after value.")?;
        Ok(Statement::Print(value, keyword.till(&semi)))
    }

    // if_stmt: 'if' '(' expression ')' statement ('else' statement)?
    fn if_stmt(&mut self) -> ParseResult<Statement> {
        let keyword = self.previous().span;
        self.consume(TT::LPAR, "Expect '(' after 'if'.")?;
        let condition = self.expression()?;
        self.consume(TT::RPAR, "Expect ')' after if condition.")?;

        let then_branch = Box::new(self.statement()?);
        let else_branch = if self.match_keyword("else") {
            Some(Box::new(self.statement()?))
        } else {
            None
        };
        let span = match &else_branch {
            Some(els) => keyword.till(els),
            None => keyword.till(&then_branch),
        };
        Ok(Statement::If(condition, then_branch, else_branch, span))
    }

    // while_stmt: 'while' '(' expression ')' statement
    fn while_stmt(&mut self) -> ParseResult<Statement> {
        let keyword = self.previous().span;
        self.consume(TT::LPAR, "Expect '(' after 'while'.")?;
        let condition = self.expression()?;
        self.consume(TT::RPAR, "Expect ')' after condition.")?;
        let body = Box::new(self.statement()?);
        let span = keyword.till(&body);
        Ok(Statement::While(condition, body, span))
    }

    // block: '{' declaration* '}'
    fn block(&mut self) -> ParseResult<Statement> {
        let open = self.previous().span;
        let mut statements = vec![];
        while !self.check(TT::RBRACE) && !self.is_at_end() {
            if let Some(statement) = self.declaration() {
                statements.push(statement);
            }
        }
        let close = self.consume(TT::RBRACE, "Expect '}' after block.")?;
        Ok(Statement::Block(statements, open.till(&close)))
    }

    // expression_stmt: expression ';'
    fn expression_stmt(&mut self) -> ParseResult<Statement> {
        let start = self.peek().span;
        let expr = self.expression()?;
        let semi = self.consume(TT::SEMI, "Expect ';' after expression.")?;
        Ok(Statement::Expression(expr, start.till(&semi)))
    }

    // # EXPRESSIONS
    // # ===========

    // expression: assignment
    fn expression(&mut self) -> ParseResult<Expression> {
        self.nested(Self::assignment)
    }

    // assignment:
    //     | NAME '=' assignment
    //     | equality
    fn assignment(&mut self) -> ParseResult<Expression> {
        let expr = self.equality()?;

        if self.matches(&[TT::EQUAL]) {
            let equals = self.previous().span;
            let value = self.assignment()?;

            return match expr {
                Expression::Variable(name) => {
                    Ok(Expression::Assignment(name, Box::new(value), equals))
                }
                _ => Err(Error::new(equals, "Invalid assignment target.")),
            };
        }

        Ok(expr)
    }

    // equality: comparison (('==' | '!=') comparison)*
    fn equality(&mut self) -> ParseResult<Expression> {
        self.binary(&[TT::NOTEQUAL, TT::EQEQUAL], Self::comparison)
    }

    // comparison: term (('>' | '>=' | '<' | '<=') term)*
    fn comparison(&mut self) -> ParseResult<Expression> {
        self.binary(
            &[TT::GREATER, TT::GREATEREQUAL, TT::LESS, TT::LESSEQUAL],
            Self::term,
        )
    }

    // term: factor (('+' | '-') factor)*
    fn term(&mut self) -> ParseResult<Expression> {
        self.binary(&[TT::MINUS, TT::PLUS], Self::factor)
    }

    // factor: unary (('*' | '/') unary)*
    fn factor(&mut self) -> ParseResult<Expression> {
        self.binary(&[TT::SLASH, TT::STAR], Self::unary)
    }

    fn binary(
        &mut self,
        operators: &[TT],
        operand: fn(&mut Self) -> ParseResult<Expression>,
    ) -> ParseResult<Expression> {
        let mut expr = operand(self)?;
        while self.matches(operators) {
            let op = self.previous().clone();
            let right = operand(self)?;
            expr = Expression::Binary(Operator::from(&op), Box::new((expr, right)), op.span);
        }
        Ok(expr)
    }

    // unary:
    //     | ('!' | '-') unary
    //     | primary
    fn unary(&mut self) -> ParseResult<Expression> {
        if self.matches(&[TT::EXCLAMATION, TT::MINUS]) {
            let op = self.previous().clone();
            let right = self.nested(Self::unary)?;
            return Ok(Expression::Unary(Operator::from(&op), Box::new(right), op.span));
        }
        self.primary()
    }

    // primary:
    //     | NUMBER
    //     | 'true' | 'false' | 'nil'
    //     | NAME
    //     | '(' expression ')'
    fn primary(&mut self) -> ParseResult<Expression> {
        if self.match_keyword("false") || self.match_keyword("nil") {
            return Ok(Expression::Literal(0.0, self.previous().span));
        }
        if self.match_keyword("true") {
            return Ok(Expression::Literal(1.0, self.previous().span));
        }
        if self.matches(&[TT::NUMBER]) {
            let token = self.previous();
            let value = token
                .lexeme
                .parse::<f64>()
                .map_err(|_| Error::new(token.span, "Invalid number literal."))?;
            return Ok(Expression::Literal(value, token.span));
        }
        if self.matches(&[TT::NAME]) {
            return Ok(Expression::Variable(Name::from(self.previous().clone())));
        }
        if self.matches(&[TT::LPAR]) {
            let expr = self.expression()?;
            self.consume(TT::RPAR, "Expect ')' after expression.")?;
            return Ok(expr);
        }

        Err(Error::new(self.peek().span, "Expect expression."))
    }

    fn nested<T>(&mut self, rule: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        if self.depth >= MAX_DEPTH {
            return Err(Error::new(self.peek().span, "Too much nesting."));
        }
        self.depth += 1;
        let result = rule(self);
        self.depth -= 1;
        result
    }

    // # ERROR RECOVERY
    // # ==============

    // Discards tokens until just after a ';' or just before a token that can
    // start a new statement.
    fn synchronize(&mut self) {
        let from = self.current;
        self.advance();

        while !self.is_at_end() {
            if self.previous().typ == TT::SEMI {
                break;
            }
            if SYNC_KEYWORDS.iter().any(|kw| self.peek().is_keyword(kw)) {
                break;
            }
            self.advance();
        }
        trace!(
            "synchronized after skipping {} tokens, resuming at {}",
            self.current - from,
            self.peek()
        );
    }

    // # TOKEN CURSOR
    // # ============

    fn is_at_end(&self) -> bool {
        self.peek().typ == TT::ENDMARKER
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.current).unwrap_or(&self.endmarker)
    }

    fn previous(&self) -> &Token {
        self.current
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .unwrap_or(&self.endmarker)
    }

    fn advance(&mut self) -> Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous().clone()
    }

    fn check(&self, typ: TT) -> bool {
        !self.is_at_end() && self.peek().typ == typ
    }

    fn matches(&mut self, types: &[TT]) -> bool {
        if types.iter().any(|&typ| self.check(typ)) {
            self.advance();
            return true;
        }
        false
    }

    fn match_keyword(&mut self, keyword: &str) -> bool {
        if !self.is_at_end() && self.peek().is_keyword(keyword) {
            self.advance();
            return true;
        }
        false
    }

    fn consume(&mut self, typ: TT, msg: &str) -> ParseResult<Token> {
        if self.check(typ) {
            return Ok(self.advance());
        }
        Err(Error::new(self.peek().span, msg))
    }
}
