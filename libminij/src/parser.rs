use nom::branch::alt;
use nom::bytes::complete::{is_not, tag};
use nom::character::complete::{alpha1, alphanumeric1, char, digit1, multispace1, not_line_ending, one_of};
use nom::combinator::{map, map_res, recognize, value};
use nom::multi::{fold_many0, many0};
use nom::sequence::{delimited, pair, preceded};
use nom::IResult;
use super::ast::{Node, NodeKind};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Token {
    OpenParen,
    CloseParen,
    Kind(String),
    StringLiteral(String),
    IntLiteral(u32),
}

/// A token together with the source line it starts on.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Lexeme {
    pub token: Token,
    pub line: usize,
}

pub fn lex(source: &str) -> Result<Vec<Lexeme>, String> {
    let mut lexemes = Vec::new();
    let mut input = source;
    let mut line = 1;
    loop {
        if let Ok((rest, _)) = separator(input) {
            line += newlines_between(input, rest);
            input = rest;
        }
        if input.is_empty() {
            return Ok(lexemes);
        }
        match token(input) {
            Ok((rest, token)) => {
                lexemes.push(Lexeme { token: token, line: line });
                // String payloads may span lines.
                line += newlines_between(input, rest);
                input = rest;
            }
            Err(_) => {
                let found = input.chars().next().unwrap_or(' ');
                return Err(format!("Unexpected character '{}' at line {}", found, line));
            }
        }
    }
}

/// Newlines in the text consumed between `before` and its suffix `after`.
fn newlines_between(before: &str, after: &str) -> usize {
    before[..before.len() - after.len()].matches('\n').count()
}

fn separator(input: &str) -> IResult<&str, Vec<&str>> {
    many0(alt((
        multispace1,
        recognize(pair(char('#'), not_line_ending)),
    )))(input)
}

fn token(input: &str) -> IResult<&str, Token> {
    alt((
        value(Token::OpenParen, char('(')),
        value(Token::CloseParen, char(')')),
        map(string_literal, Token::StringLiteral),
        map(int_literal, Token::IntLiteral),
        map(kind, |k: &str| Token::Kind(k.to_string())),
    ))(input)
}

fn kind(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))(input)
}

fn int_literal(input: &str) -> IResult<&str, u32> {
    map_res(digit1, |digits: &str| digits.parse::<u32>())(input)
}

enum Fragment<'a> {
    Literal(&'a str),
    Escaped(char),
}

fn string_literal(input: &str) -> IResult<&str, String> {
    let fragment = alt((
        map(is_not("\"\\"), Fragment::Literal),
        map(preceded(char('\\'), one_of("\"\\n")), Fragment::Escaped),
    ));
    delimited(
        char('"'),
        fold_many0(fragment, String::new, |mut acc, fragment| {
            match fragment {
                Fragment::Literal(s) => acc.push_str(s),
                Fragment::Escaped('n') => acc.push('\n'),
                Fragment::Escaped(c) => acc.push(c),
            }
            acc
        }),
        char('"'),
    )(input)
}

struct TokenStream<'a> {
    lexemes: &'a [Lexeme],
    position: usize,
}

impl<'a> TokenStream<'a> {
    fn new(lexemes: &'a [Lexeme]) -> Self {
        Self {
            lexemes: lexemes,
            position: 0,
        }
    }

    fn peek(&self) -> Option<&'a Lexeme> {
        self.lexemes.get(self.position)
    }

    fn next(&mut self, expected: &str) -> Result<&'a Lexeme, String> {
        let lexeme = self.peek()
            .ok_or(format!("Unexpected end of input, expected {}", expected))?;
        self.position += 1;
        Ok(lexeme)
    }

    fn is_done(&self) -> bool {
        self.position >= self.lexemes.len()
    }

    fn at_open_paren(&self) -> bool {
        self.peek().map_or(false, |l| l.token == Token::OpenParen)
    }

    fn expect_open_paren(&mut self) -> Result<(), String> {
        match *self.next("'('")? {
            Lexeme { token: Token::OpenParen, .. } => Ok(()),
            ref other => Err(unexpected(other, "'('")),
        }
    }

    fn expect_close_paren(&mut self) -> Result<(), String> {
        match *self.next("')'")? {
            Lexeme { token: Token::CloseParen, .. } => Ok(()),
            ref other => Err(unexpected(other, "')' or a child node")),
        }
    }

    fn expect_kind(&mut self) -> Result<NodeKind, String> {
        match *self.next("a node kind")? {
            Lexeme { token: Token::Kind(ref tag), .. } => Ok(NodeKind::from_tag(tag)),
            ref other => Err(unexpected(other, "a node kind")),
        }
    }

    fn expect_string(&mut self) -> Result<String, String> {
        match *self.next("a quoted value")? {
            Lexeme { token: Token::StringLiteral(ref value), .. } => Ok(value.clone()),
            ref other => Err(unexpected(other, "a quoted value")),
        }
    }

    fn expect_line(&mut self) -> Result<u32, String> {
        match *self.next("a line number")? {
            Lexeme { token: Token::IntLiteral(line), .. } => Ok(line),
            ref other => Err(unexpected(other, "a line number")),
        }
    }

    fn parse_node(&mut self) -> Result<Node, String> {
        self.expect_open_paren()?;
        let kind = self.expect_kind()?;
        let value = self.expect_string()?;
        let lineno = self.expect_line()?;
        let mut node = Node::new(kind, value, lineno);
        while self.at_open_paren() {
            node.push_child(self.parse_node()?);
        }
        self.expect_close_paren()?;
        Ok(node)
    }
}

fn unexpected(lexeme: &Lexeme, expected: &str) -> String {
    format!(
        "Unexpected {:?} at line {}, expected {}",
        lexeme.token,
        lexeme.line,
        expected
    )
}

/// Parses every top-level node in the token stream.
pub fn parse(lexemes: &[Lexeme]) -> Result<Vec<Node>, String> {
    let mut stream = TokenStream::new(lexemes);
    let mut nodes = Vec::new();
    while !stream.is_done() {
        nodes.push(stream.parse_node()?);
    }
    Ok(nodes)
}

/// A compilation unit is exactly one root node.
pub fn build_tree(mut nodes: Vec<Node>) -> Result<Node, String> {
    match nodes.len() {
        0 => Err("No root node found".to_string()),
        1 => Ok(nodes.remove(0)),
        count => Err(format!("Expected a single root node, found {}", count)),
    }
}

#[test]
fn test_lex_tokens() {
    let lexemes = lex("(Int \"5\" 3)").unwrap();
    let tokens: Vec<Token> = lexemes.into_iter().map(|l| l.token).collect();
    assert_eq!(tokens, vec![
        Token::OpenParen,
        Token::Kind("Int".to_string()),
        Token::StringLiteral("5".to_string()),
        Token::IntLiteral(3),
        Token::CloseParen,
    ]);
}

#[test]
fn test_lex_tracks_lines_and_skips_comments() {
    let lexemes = lex("# header\n(Program \"\" 1\n  # inner\n  )").unwrap();
    assert_eq!(lexemes[0].line, 2);
    assert_eq!(lexemes[3].line, 2);
    assert_eq!(lexemes[4].line, 4);
}

#[test]
fn test_lex_counts_lines_inside_payloads() {
    let lexemes = lex("(Text \"two\nlines\" 1)\n(Int \"1\" 3)").unwrap();
    assert_eq!(lexemes[2].line, 1);
    assert_eq!(lexemes[3].line, 2);
    assert_eq!(lexemes[5].line, 3);
}

#[test]
fn test_lex_large_tree_keeps_line_numbers() {
    let count = 20000;
    let mut source = String::from("(Program \"\" 1");
    for i in 0..count {
        source.push_str(&format!("\n  (Int \"{}\" {})", i, i + 2));
    }
    source.push_str(")\n");
    let lexemes = lex(&source).unwrap();
    assert_eq!(lexemes.len(), 4 + count * 5 + 1);
    for (i, node) in lexemes[4..lexemes.len() - 1].chunks(5).enumerate() {
        assert_eq!(node[0].line, i + 2);
        assert_eq!(node[3].token, Token::IntLiteral(i as u32 + 2));
    }
    assert_eq!(lexemes.last().unwrap().line, count + 1);
}

#[test]
fn test_lex_empty_and_escaped_strings() {
    let lexemes = lex("\"\" \"a\\\"b\\\\c\"").unwrap();
    assert_eq!(lexemes[0].token, Token::StringLiteral(String::new()));
    assert_eq!(lexemes[1].token, Token::StringLiteral("a\"b\\c".to_string()));
}

#[test]
fn test_lex_rejects_unknown_characters() {
    let err = lex("(Int\n \"1\" 1 @)").unwrap_err();
    assert_eq!(err, "Unexpected character '@' at line 2");
}

#[test]
fn test_parse_nested_nodes() {
    let source = "(AddExpression \"\" 7 (Int \"1\" 7) (Identifier \"x\" 8))";
    let nodes = parse(&lex(source).unwrap()).unwrap();
    assert_eq!(nodes.len(), 1);
    let root = &nodes[0];
    assert!(root.is(&NodeKind::AddExpression));
    assert_eq!(root.get_children().len(), 2);
    assert_eq!(root.get_children()[1].get_value(), "x");
    assert_eq!(root.get_children()[1].get_lineno(), 8);
}

#[test]
fn test_parse_reports_missing_close() {
    let err = parse(&lex("(Int \"1\" 1").unwrap()).unwrap_err();
    assert_eq!(err, "Unexpected end of input, expected ')'");
}

#[test]
fn test_parse_reports_misplaced_token() {
    let err = parse(&lex("(Int 1 \"1\")").unwrap()).unwrap_err();
    assert!(err.starts_with("Unexpected IntLiteral(1) at line 1"));
}

#[test]
fn test_build_tree_requires_single_root() {
    assert!(build_tree(Vec::new()).is_err());
    let two = parse(&lex("(Int \"1\" 1) (Int \"2\" 1)").unwrap()).unwrap();
    assert_eq!(
        build_tree(two).unwrap_err(),
        "Expected a single root node, found 2"
    );
}

#[test]
fn test_display_round_trips() {
    let source = "(Program \"\" 1\n  (PrintStatement \"\" 2\n    (Int \"4\" 2)))";
    let root = build_tree(parse(&lex(source).unwrap()).unwrap()).unwrap();
    assert_eq!(root.to_string(), source);
}
