use super::{error::Error, parse, tokenize_string, ParserState, Statement, Token, TokenType as TT, Tokenizer};

fn parse_string(input: &str) -> Result<(Vec<Statement>, Vec<Error>), Error> {
    let tokens = tokenize_string(input)?;
    let (tree, errors) = parse(&tokens);
    Ok((tree, errors))
}

fn render(tree: &[Statement]) -> String {
    tree.iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn parse_tree_matches(input: &str, tree_repr: &str) {
    let result = parse_string(input);
    assert!(
        matches!(result, Ok((_, ref errors)) if errors.is_empty()),
        "\nFailed to parse \"{}\": {:?}\n",
        input,
        result
    );
    if let Ok((ref tree, _)) = result {
        let result_repr = render(tree);
        assert!(
            result_repr.contains(tree_repr),
            "\nFailed to parse \"{}\":\nexpected \"{}\" somewhere in \"{}\"\n",
            input,
            tree_repr,
            result_repr
        )
    } else {
        unreachable!()
    }
}

fn assert_raises_error(input: &str, msg: &str) {
    let result = parse_string(input);
    assert!(matches!(result, Ok((_, ref errors)) if !errors.is_empty()));
    match result {
        Ok((_, ref errors)) => {
            let err = errors.first().unwrap();
            assert_eq!(msg, err.message());
        }
        _ => unreachable!(),
    }
}

fn token_types(input: &str) -> Vec<TT> {
    tokenize_string(input)
        .unwrap()
        .iter()
        .map(|t| t.typ)
        .collect()
}

#[test]
fn test_tokenize_declaration() {
    assert_eq!(
        token_types("let x = 10.5; // the answer, roughly"),
        vec![TT::KEYWORD, TT::NAME, TT::EQUAL, TT::NUMBER, TT::SEMI, TT::ENDMARKER]
    );
    let tokens = tokenize_string("let x = 10.5;").unwrap();
    assert_eq!(tokens[3].lexeme, "10.5");
}

#[test]
fn test_tokenize_operators() {
    assert_eq!(
        token_types("a <= b != c == d >= e < f > g = !h"),
        vec![
            TT::NAME,
            TT::LESSEQUAL,
            TT::NAME,
            TT::NOTEQUAL,
            TT::NAME,
            TT::EQEQUAL,
            TT::NAME,
            TT::GREATEREQUAL,
            TT::NAME,
            TT::LESS,
            TT::NAME,
            TT::GREATER,
            TT::NAME,
            TT::EQUAL,
            TT::EXCLAMATION,
            TT::NAME,
            TT::ENDMARKER,
        ]
    );
    assert_eq!(
        token_types("{(-1 + 2) * 3 / 4;}"),
        vec![
            TT::LBRACE,
            TT::LPAR,
            TT::MINUS,
            TT::NUMBER,
            TT::PLUS,
            TT::NUMBER,
            TT::RPAR,
            TT::STAR,
            TT::NUMBER,
            TT::SLASH,
            TT::NUMBER,
            TT::SEMI,
            TT::RBRACE,
            TT::ENDMARKER,
        ]
    );
}

#[test]
fn test_keywords_need_word_boundary() {
    assert_eq!(token_types("letter"), vec![TT::NAME, TT::ENDMARKER]);
    assert_eq!(token_types("iffy while_"), vec![TT::NAME, TT::NAME, TT::ENDMARKER]);
    assert_eq!(token_types("nil"), vec![TT::KEYWORD, TT::ENDMARKER]);
}

#[test]
fn test_token_lines() {
    let tokens = tokenize_string("let a = 1;\n\nlet b = 2;").unwrap();
    let b = tokens.iter().find(|t| t.lexeme == "b").unwrap();
    assert_eq!(b.span.start.line, 3);
    assert_eq!(b.span.start.column, 4);
    assert_eq!(tokens.last().unwrap().typ, TT::ENDMARKER);
}

#[test]
fn test_token_equality_ignores_position() {
    let first = tokenize_string("a").unwrap();
    let second = tokenize_string("\n   a").unwrap();
    assert_eq!(first[0], second[0]);
    assert_ne!(first[0].span, second[0].span);
}

#[test]
fn test_lexical_error() {
    match tokenize_string("let a = 1;\nlet b = a @ 2;") {
        Err(Error::Lexical(span, chr)) => {
            assert_eq!(chr, '@');
            assert_eq!(span.start.line, 2);
            assert_eq!(span.start.column, 10);
        }
        other => panic!("expected a lexical error, got {other:?}"),
    }
}

#[test]
fn test_continuation_needed() {
    let mut tokenizer = Tokenizer::new();
    assert!(matches!(
        tokenizer.tokenize(std::iter::once("while (x < 3) {".to_string())),
        ParserState::ContinuationNeeded
    ));
    assert!(matches!(
        tokenizer.tokenize(std::iter::once("x = x + 1; }".to_string())),
        ParserState::Ok
    ));
    let tokens: Vec<Token> = tokenizer.finalize();
    assert_eq!(tokens.last().unwrap().typ, TT::ENDMARKER);
    assert_eq!(tokens.last().unwrap().span.start.line, 2);
}

#[test]
fn test_expressions() {
    parse_tree_matches("1 + 2 * 3;", "(expr (+ 1 (* 2 3)))");
    parse_tree_matches("(1 + 2) * 3;", "(expr (* (+ 1 2) 3))");
    parse_tree_matches("1 - 2 - 3;", "(expr (- (- 1 2) 3))");
    parse_tree_matches("8 / 4 / 2;", "(expr (/ (/ 8 4) 2))");
    parse_tree_matches("1 < 2 == 3 >= 4;", "(expr (== (< 1 2) (>= 3 4)))");
    parse_tree_matches("a != b;", "(expr (!= a b))");
    parse_tree_matches("-!x;", "(expr (- (! x)))");
    parse_tree_matches("--1.5;", "(expr (- (- 1.5)))");
}

#[test]
fn test_literals() {
    parse_tree_matches("true;", "(expr 1)");
    parse_tree_matches("false;", "(expr 0)");
    parse_tree_matches("nil;", "(expr 0)");
    parse_tree_matches("0.25;", "(expr 0.25)");
}

#[test]
fn test_simple_assignments() {
    parse_tree_matches("a = 1;", "(expr (= a 1))");
    parse_tree_matches("a = b = c = 2;", "(expr (= a (= b (= c 2))))");
    parse_tree_matches("a = b + 1;", "(expr (= a (+ b 1)))");
}

#[test]
fn test_declarations() {
    parse_tree_matches("let x = 5;", "(let x 5)");
    parse_tree_matches("let y;", "(let y)");
    parse_tree_matches("print x + 1;", "(print (+ x 1))");
}

#[test]
fn test_if_stmt() {
    parse_tree_matches(
        "if (x) { print x; } else y = 2;",
        "(if x (block (print x)) (expr (= y 2)))",
    );
    parse_tree_matches("if (x < 1) x = 1;", "(if (< x 1) (expr (= x 1)))");
    parse_tree_matches(
        "if (a) if (b) c; else d;",
        "(if a (if b (expr c) (expr d)))",
    );
}

#[test]
fn test_while_stmt() {
    parse_tree_matches(
        "while (x < 3) x = x + 1;",
        "(while (< x 3) (expr (= x (+ x 1))))",
    );
    parse_tree_matches("while (0) {}", "(while 0 (block))");
}

#[test]
fn test_nested_blocks() {
    parse_tree_matches(
        "{ let a = 1; { a = 2; } }",
        "(block (let a 1) (block (expr (= a 2))))",
    );
}

#[test]
fn test_empty_input() {
    let (tree, errors) = parse_string("").unwrap();
    assert!(tree.is_empty());
    assert!(errors.is_empty());

    let (tree, errors) = parse(&[]);
    assert!(tree.is_empty());
    assert!(errors.is_empty());
}

#[test]
fn test_missing_endmarker() {
    let mut tokens = tokenize_string("let x = 1; print x;").unwrap();
    tokens.pop();
    let (tree, errors) = parse(&tokens);
    assert!(errors.is_empty());
    assert_eq!(render(&tree), "(let x 1) (print x)");
}

#[test]
fn test_error_messages() {
    assert_raises_error("let = 5;", "Expect variable name.");
    assert_raises_error("let x = 5", "Expect ';' after variable declaration.");
    assert_raises_error("print 5", "Expect ';' after value.");
    assert_raises_error("if x) {}", "Expect '(' after 'if'.");
    assert_raises_error("if (x {}", "Expect ')' after if condition.");
    assert_raises_error("while x", "Expect '(' after 'while'.");
    assert_raises_error("while (x {}", "Expect ')' after condition.");
    assert_raises_error("{ print 1;", "Expect '}' after block.");
    assert_raises_error("1 + ;", "Expect expression.");
    assert_raises_error("(1 + 2;", "Expect ')' after expression.");
    assert_raises_error("x", "Expect ';' after expression.");
}

#[test]
fn test_invalid_assignment_target() {
    assert_raises_error("5 = 3;", "Invalid assignment target.");
    assert_raises_error("a + b = c;", "Invalid assignment target.");
    assert_raises_error("-a = 1;", "Invalid assignment target.");

    let (tree, errors) = parse_string("let a = 1;\n\n5 = 3;\nprint a;").unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line(), 3);
    assert_eq!(
        errors[0].to_string(),
        "Parser error at line 3: Invalid assignment target."
    );
    assert_eq!(render(&tree), "(let a 1) (print a)");
}

#[test]
fn test_recovery_at_semicolon() {
    let (tree, errors) = parse_string("let x = ;\nlet y = 2;").unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line(), 1);
    assert_eq!(render(&tree), "(let y 2)");
}

#[test]
fn test_recovery_at_keyword() {
    let (tree, errors) = parse_string("1 + ) let y = 2; print y;").unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(render(&tree), "(let y 2) (print y)");
}

#[test]
fn test_recovery_stops_at_statement_keywords() {
    // (source, statements left after recovery, number of errors)
    let cases = [
        ("1 + ) let y = 2;", "(let y 2)", 1),
        ("1 + ) print 2;", "(print 2)", 1),
        ("1 + ) if (1) {}", "(if 1 (block))", 1),
        ("1 + ) while (0) {}", "(while 0 (block))", 1),
        ("1 + ) false;", "(expr 0)", 1),
        // these cannot start a statement, so parsing fails once more on them
        ("1 + ) else print 2;", "(print 2)", 2),
        ("1 + ) and print 2;", "(print 2)", 2),
        ("1 + ) or print 2;", "(print 2)", 2),
        // a plain name is skipped
        ("1 + ) x print 2;", "(print 2)", 1),
    ];
    for (input, tree_repr, error_count) in cases {
        let (tree, errors) = parse_string(input).unwrap();
        assert_eq!(render(&tree), tree_repr, "\nwrong recovery for \"{input}\"");
        assert_eq!(errors.len(), error_count, "\nwrong errors for \"{input}\": {errors:?}");
        assert_eq!(errors[0].span().start.column, 4);
        if error_count == 2 {
            assert_eq!(errors[1].span().start.column, 6);
            assert_eq!(errors[1].message(), "Expect expression.");
        }
    }
}

#[test]
fn test_nesting_limit() {
    let deep = format!("print {}1{};\nprint 2;", "(".repeat(500), ")".repeat(500));
    let (tree, errors) = parse_string(&deep).unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message(), "Too much nesting.");
    assert_eq!(errors[0].line(), 1);
    assert_eq!(render(&tree), "(print 2)");

    let shallow = format!("print {}1{};", "(".repeat(32), ")".repeat(32));
    parse_tree_matches(&shallow, "(print 1)");

    let (_, errors) = parse_string(&format!("{}1;", "-".repeat(5000))).unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message(), "Too much nesting.");

    let blocks = format!("{}{}", "{".repeat(1000), "}".repeat(1000));
    let (_, errors) = parse_string(&blocks).unwrap();
    assert_eq!(errors[0].message(), "Too much nesting.");
}

#[test]
fn test_recovery_inside_block() {
    let (tree, errors) = parse_string("{\n  let = 1;\n  print 2;\n}").unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line(), 2);
    assert_eq!(render(&tree), "(block (print 2))");
}

#[test]
fn test_errors_in_source_order() {
    let (tree, errors) = parse_string("let = 1;\nprint 1;\n2 = 3;\nprint 2;").unwrap();
    let lines: Vec<usize> = errors.iter().map(|e| e.line()).collect();
    assert_eq!(lines, vec![1, 3]);
    assert_eq!(render(&tree), "(print 1) (print 2)");
}
