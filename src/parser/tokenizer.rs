use super::error::Error;
use super::locations::Span;
use const_format::concatcp;
use derivative::Derivative;
use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Clone, Derivative)]
#[derivative(Debug, PartialEq)]
pub struct Token {
    pub(crate) typ: TokenType,
    pub(crate) lexeme: String,
    #[derivative(Debug = "ignore", PartialEq = "ignore")]
    pub(crate) span: Span,
}

impl Token {
    pub(crate) fn new(typ: TokenType, lexeme: &str, span: Span) -> Self {
        Self {
            typ,
            lexeme: lexeme.to_string(),
            span,
        }
    }

    pub fn typ(&self) -> TokenType {
        self.typ
    }

    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    pub(crate) fn is_keyword(&self, keyword: &str) -> bool {
        self.typ == TokenType::KEYWORD && self.lexeme == keyword
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}('{}')", self.typ, self.lexeme)
    }
}

#[allow(non_camel_case_types)]
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TokenType {
    ENDMARKER,
    NAME,
    NUMBER,
    KEYWORD,
    LPAR,
    RPAR,
    LBRACE,
    RBRACE,
    SEMI,
    PLUS,
    MINUS,
    STAR,
    SLASH,
    LESS,
    GREATER,
    EQUAL,
    EQEQUAL,
    NOTEQUAL,
    LESSEQUAL,
    GREATEREQUAL,
    EXCLAMATION,
}

// two-character operators must come first
const SIMPLE_TOKENS: [(&str, TokenType); 17] = [
    ("==", TokenType::EQEQUAL),
    ("!=", TokenType::NOTEQUAL),
    ("<=", TokenType::LESSEQUAL),
    (">=", TokenType::GREATEREQUAL),
    ("(", TokenType::LPAR),
    (")", TokenType::RPAR),
    ("{", TokenType::LBRACE),
    ("}", TokenType::RBRACE),
    (";", TokenType::SEMI),
    ("+", TokenType::PLUS),
    ("-", TokenType::MINUS),
    ("*", TokenType::STAR),
    ("/", TokenType::SLASH),
    ("<", TokenType::LESS),
    (">", TokenType::GREATER),
    ("=", TokenType::EQUAL),
    ("!", TokenType::EXCLAMATION),
];

macro_rules! alternative {
    ($t:expr) => {{
        $t
    }};
    ($t:expr, $($ts:expr),+) => {{
        concatcp!($t, "|", alternative!($($ts),+))
    }}
}

macro_rules! group {
    ($($ts:expr),+) => {{
        concatcp!(r"(", alternative!($($ts),+), ")")
    }}
}

macro_rules! maybe {
    ($($ts:expr),+) => {
        concatcp!(group!($($ts),+), r"?")
    }
}

const S_WHITESPACE: &str = r"^[ \f\t\r]+";
const S_COMMENT: &str = r"^//[^\r\n]*";
const S_NAME: &str = r"^[A-Za-z_][A-Za-z0-9_]*";
const S_DIGITS: &str = r"[0-9]+";
const S_FRACTION: &str = concatcp!(r"\.", S_DIGITS);
const S_NUMBER: &str = concatcp!(r"^", S_DIGITS, maybe!(S_FRACTION));
const S_KEYWORDS: &str = concatcp!(
    r"^",
    group!(
        r"\blet\b",
        r"\bprint\b",
        r"\bif\b",
        r"\belse\b",
        r"\bwhile\b",
        r"\btrue\b",
        r"\bfalse\b",
        r"\bnil\b",
        r"\band\b",
        r"\bor\b"
    )
);

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(S_WHITESPACE).expect("Error compiling regex."));
static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(S_COMMENT).expect("Error compiling regex."));
static NAME: Lazy<Regex> = Lazy::new(|| Regex::new(S_NAME).expect("Error compiling regex."));
static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(S_NUMBER).expect("Error compiling regex."));
static KEYWORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(S_KEYWORDS).expect("Error compiling regex."));

/// Line-oriented tokenizer. Feed it lines with [`Tokenizer::tokenize`] (possibly
/// several times, as the interactive prompt does) and close the stream with
/// [`Tokenizer::finalize`].
#[derive(Debug, Default)]
pub struct Tokenizer {
    tokens: Vec<Token>,
    start: usize,
    lineno: usize,
    paren_lvl: isize,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tokenize(&mut self, input: impl Iterator<Item = String>) -> ParserState {
        for line in input {
            self.lineno += 1;
            if let Err(e) = self.tokenize_line(line.as_str()) {
                return ParserState::Error(e);
            }
        }
        if self.paren_lvl > 0 {
            return ParserState::ContinuationNeeded;
        }
        ParserState::Ok
    }

    pub fn finalize(mut self) -> Vec<Token> {
        let column = self.tokens.last().map_or(0, |t| t.span.end.column);
        let line = self.lineno.max(1);
        self.tokens.push(Token::new(
            TokenType::ENDMARKER,
            "",
            Span::new(line, column, line, column),
        ));
        self.tokens
    }

    fn tokenize_line(&mut self, line: &str) -> Result<(), Error> {
        self.start = 0;

        'outer: while self.start < line.len() {
            let rest = &line[self.start..];
            if COMMENT.is_match(rest) {
                break;
            }
            if let Some(m) = WHITESPACE.find(rest) {
                self.start += m.end();
                continue;
            }

            if self.find_by_regex(&KEYWORDS, TokenType::KEYWORD, line) {
                continue;
            }
            if self.find_by_regex(&NUMBER, TokenType::NUMBER, line) {
                continue;
            }
            if self.find_by_regex(&NAME, TokenType::NAME, line) {
                continue;
            }

            for (lexeme, tok_type) in SIMPLE_TOKENS {
                if rest.starts_with(lexeme) {
                    self.push(tok_type, lexeme);
                    match tok_type {
                        TokenType::LPAR | TokenType::LBRACE => self.paren_lvl += 1,
                        TokenType::RPAR | TokenType::RBRACE => self.paren_lvl -= 1,
                        _ => {}
                    }
                    continue 'outer;
                }
            }

            // nothing matched, so `rest` is non-empty and starts with an unknown character
            let chr = rest.chars().next().unwrap_or_default();
            let span = Span::new(
                self.lineno,
                self.start,
                self.lineno,
                self.start + chr.len_utf8(),
            );
            return Err(Error::Lexical(span, chr));
        }
        Ok(())
    }

    fn push(&mut self, typ: TokenType, lexeme: &str) {
        let end = self.start + lexeme.len();
        let span = Span::new(self.lineno, self.start, self.lineno, end);
        self.tokens.push(Token::new(typ, lexeme, span));
        self.start = end;
    }

    fn find_by_regex(&mut self, regex: &Regex, token_type: TokenType, line: &str) -> bool {
        if let Some(m) = regex.find(&line[self.start..]) {
            self.push(token_type, m.as_str());
            return true;
        }
        false
    }
}

/// Tokenizes a complete program. The result always ends with an `ENDMARKER`.
pub fn tokenize_string(input: &str) -> Result<Vec<Token>, Error> {
    let mut tokenizer = Tokenizer::new();
    match tokenizer.tokenize(input.lines().map(String::from)) {
        ParserState::Error(e) => Err(e),
        ParserState::Ok | ParserState::ContinuationNeeded => Ok(tokenizer.finalize()),
    }
}

#[derive(Debug)]
pub enum ParserState {
    Ok,
    ContinuationNeeded,
    Error(Error),
}
