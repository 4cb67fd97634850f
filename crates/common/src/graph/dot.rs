//! A reader for the subset of the DOT language the network emits
//!
//! Produces plain node and edge records with string attributes; typing and
//! filtering happen in the parent module. Supported:
//!
//! - optional `strict`, `graph` / `digraph`, optional graph name
//! - node statements, edge chains (`a -> b -> c`, `--` accepted)
//! - `graph` / `node` / `edge` attribute statements (`node` and `edge`
//!   defaults apply to later statements in the same scope)
//! - `id = value` graph attributes (ignored)
//! - `subgraph name { … }` and bare `{ … }` blocks, flattened
//! - quoted strings with `\"` escapes and `+` concatenation, HTML strings
//! - `//`, `/* */` and `#` comments, `:port` suffixes (ignored)
//!
//! - numerals with an optional exponent (`1e-05`)
//!
//! Subgraphs as edge endpoints are not supported, and blocks nest at most
//! [`MAX_NESTING`] deep.

use std::collections::HashMap;

pub type Attributes = HashMap<String, String>;

/// Deepest `{ … }` nesting accepted, counting the graph body itself
pub const MAX_NESTING: usize = 64;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DotError {
    #[error("unexpected character {0:?} at offset {1}")]
    UnexpectedChar(char, usize),
    #[error("unterminated {0} starting at offset {1}")]
    Unterminated(&'static str, usize),
    #[error("expected {expected}, found {found}")]
    Unexpected {
        expected: &'static str,
        found: String,
    },
    #[error("unexpected end of input, expected {0}")]
    UnexpectedEof(&'static str),
    #[error("blocks nested deeper than {0}")]
    TooDeep(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DotNode {
    pub id: String,
    pub attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DotEdge {
    pub source: String,
    pub target: String,
    pub attributes: Attributes,
}

/// A parsed graph: nodes in first-appearance order, edges in source order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DotGraph {
    pub directed: bool,
    pub nodes: Vec<DotNode>,
    pub edges: Vec<DotEdge>,
}

impl DotGraph {
    fn node_index(
        &mut self,
        id: &str,
        defaults: &Attributes,
        index: &mut HashMap<String, usize>,
    ) -> usize {
        if let Some(position) = index.get(id) {
            return *position;
        }
        self.nodes.push(DotNode {
            id: id.to_string(),
            attributes: defaults.clone(),
        });
        let position = self.nodes.len() - 1;
        index.insert(id.to_string(), position);
        position
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Id(String),
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semi,
    Comma,
    Equals,
    Colon,
    Edge,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Id(id) => format!("identifier {:?}", id),
            Token::LBrace => "'{'".to_string(),
            Token::RBrace => "'}'".to_string(),
            Token::LBracket => "'['".to_string(),
            Token::RBracket => "']'".to_string(),
            Token::Semi => "';'".to_string(),
            Token::Comma => "','".to_string(),
            Token::Equals => "'='".to_string(),
            Token::Colon => "':'".to_string(),
            Token::Edge => "edge operator".to_string(),
        }
    }
}

fn is_id_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

fn is_id_continue(c: char) -> bool {
    is_id_start(c) || c.is_ascii_digit()
}

struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            chars: text.char_indices().peekable(),
            tokens: Vec::new(),
        }
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn skip_line(&mut self) {
        for (_, c) in self.chars.by_ref() {
            if c == '\n' {
                break;
            }
        }
    }

    fn skip_block_comment(&mut self, start: usize) -> Result<(), DotError> {
        let mut previous = '\0';
        for (_, c) in self.chars.by_ref() {
            if previous == '*' && c == '/' {
                return Ok(());
            }
            previous = c;
        }
        Err(DotError::Unterminated("comment", start))
    }

    fn quoted(&mut self, start: usize) -> Result<String, DotError> {
        let mut value = String::new();
        while let Some((_, c)) = self.chars.next() {
            match c {
                '"' => return Ok(value),
                '\\' => match self.chars.next() {
                    Some((_, '"')) => value.push('"'),
                    // line continuation
                    Some((_, '\n')) => {}
                    Some((_, other)) => {
                        value.push('\\');
                        value.push(other);
                    }
                    None => break,
                },
                other => value.push(other),
            }
        }
        Err(DotError::Unterminated("string", start))
    }

    fn html(&mut self, start: usize) -> Result<String, DotError> {
        let mut value = String::new();
        let mut depth = 1usize;
        for (_, c) in self.chars.by_ref() {
            match c {
                '<' => depth += 1,
                '>' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(value);
                    }
                }
                _ => {}
            }
            value.push(c);
        }
        Err(DotError::Unterminated("html string", start))
    }

    fn take_while(&mut self, first: char, accept: impl Fn(char) -> bool) -> String {
        let mut value = String::from(first);
        while let Some(c) = self.peek_char() {
            if !accept(c) {
                break;
            }
            value.push(c);
            self.chars.next();
        }
        value
    }

    fn numeral(&mut self, first: char) -> String {
        let mut value = self.take_while(first, |c| c.is_ascii_digit() || c == '.');
        if let Some(marker @ ('e' | 'E')) = self.peek_char() {
            self.chars.next();
            value.push(marker);
            if let Some(sign @ ('+' | '-')) = self.peek_char() {
                self.chars.next();
                value.push(sign);
            }
            while let Some(digit) = self.peek_char().filter(char::is_ascii_digit) {
                self.chars.next();
                value.push(digit);
            }
        }
        value
    }

    fn tokenize(mut self) -> Result<Vec<Token>, DotError> {
        let mut pending_concat = false;
        while let Some((offset, c)) = self.chars.next() {
            let token = match c {
                c if c.is_whitespace() => continue,
                '#' => {
                    self.skip_line();
                    continue;
                }
                '/' => match self.peek_char() {
                    Some('/') => {
                        self.skip_line();
                        continue;
                    }
                    Some('*') => {
                        self.chars.next();
                        self.skip_block_comment(offset)?;
                        continue;
                    }
                    _ => return Err(DotError::UnexpectedChar(c, offset)),
                },
                '{' => Token::LBrace,
                '}' => Token::RBrace,
                '[' => Token::LBracket,
                ']' => Token::RBracket,
                ';' => Token::Semi,
                ',' => Token::Comma,
                '=' => Token::Equals,
                ':' => Token::Colon,
                '+' => {
                    pending_concat = true;
                    continue;
                }
                '"' => {
                    let value = self.quoted(offset)?;
                    if pending_concat {
                        pending_concat = false;
                        if let Some(Token::Id(previous)) = self.tokens.last_mut() {
                            previous.push_str(&value);
                            continue;
                        }
                        return Err(DotError::UnexpectedChar('+', offset));
                    }
                    Token::Id(value)
                }
                '<' => Token::Id(self.html(offset)?),
                '-' => match self.peek_char() {
                    Some('>') | Some('-') => {
                        self.chars.next();
                        Token::Edge
                    }
                    Some(next) if next.is_ascii_digit() || next == '.' => {
                        Token::Id(self.numeral(c))
                    }
                    _ => return Err(DotError::UnexpectedChar(c, offset)),
                },
                c if c.is_ascii_digit() || c == '.' => Token::Id(self.numeral(c)),
                c if is_id_start(c) => Token::Id(self.take_while(c, is_id_continue)),
                other => return Err(DotError::UnexpectedChar(other, offset)),
            };
            if pending_concat {
                return Err(DotError::UnexpectedChar('+', offset));
            }
            self.tokens.push(token);
        }
        if pending_concat {
            return Err(DotError::UnexpectedEof("string after '+'"));
        }
        Ok(self.tokens)
    }
}

/// Defaults in effect for the current (sub)graph scope
#[derive(Debug, Clone, Default)]
struct Scope {
    node: Attributes,
    edge: Attributes,
}

struct Parser {
    tokens: std::iter::Peekable<std::vec::IntoIter<Token>>,
    graph: DotGraph,
    index: HashMap<String, usize>,
}

fn keyword(token: &Token, word: &str) -> bool {
    matches!(token, Token::Id(id) if id.eq_ignore_ascii_case(word))
}

impl Parser {
    fn peek(&mut self) -> Option<&Token> {
        self.tokens.peek()
    }

    fn next(&mut self, expected: &'static str) -> Result<Token, DotError> {
        self.tokens.next().ok_or(DotError::UnexpectedEof(expected))
    }

    fn expect(&mut self, want: Token, expected: &'static str) -> Result<(), DotError> {
        let token = self.next(expected)?;
        if token == want {
            Ok(())
        } else {
            Err(DotError::Unexpected {
                expected,
                found: token.describe(),
            })
        }
    }

    fn id(&mut self, expected: &'static str) -> Result<String, DotError> {
        match self.next(expected)? {
            Token::Id(id) => Ok(id),
            other => Err(DotError::Unexpected {
                expected,
                found: other.describe(),
            }),
        }
    }

    fn eat(&mut self, want: &Token) -> bool {
        if self.peek() == Some(want) {
            self.tokens.next();
            true
        } else {
            false
        }
    }

    fn graph(mut self) -> Result<DotGraph, DotError> {
        let mut header = self.id("'graph' or 'digraph'")?;
        if header.eq_ignore_ascii_case("strict") {
            header = self.id("'graph' or 'digraph'")?;
        }
        self.graph.directed = if header.eq_ignore_ascii_case("digraph") {
            true
        } else if header.eq_ignore_ascii_case("graph") {
            false
        } else {
            return Err(DotError::Unexpected {
                expected: "'graph' or 'digraph'",
                found: format!("identifier {:?}", header),
            });
        };

        if matches!(self.peek(), Some(Token::Id(_))) {
            self.tokens.next();
        }
        self.expect(Token::LBrace, "'{'")?;
        self.statements(Scope::default(), 1)?;

        if let Some(trailing) = self.tokens.next() {
            return Err(DotError::Unexpected {
                expected: "end of input",
                found: trailing.describe(),
            });
        }
        Ok(self.graph)
    }

    /// Statements up to and including the closing brace
    fn statements(&mut self, mut scope: Scope, depth: usize) -> Result<(), DotError> {
        if depth > MAX_NESTING {
            return Err(DotError::TooDeep(MAX_NESTING));
        }
        loop {
            let token = match self.peek() {
                Some(token) => token.clone(),
                None => return Err(DotError::UnexpectedEof("'}'")),
            };

            match token {
                Token::RBrace => {
                    self.tokens.next();
                    return Ok(());
                }
                Token::Semi | Token::Comma => {
                    self.tokens.next();
                }
                Token::LBrace => {
                    self.tokens.next();
                    self.statements(scope.clone(), depth + 1)?;
                }
                ref t if keyword(t, "subgraph") => {
                    self.tokens.next();
                    if matches!(self.peek(), Some(Token::Id(_))) {
                        self.tokens.next();
                    }
                    self.expect(Token::LBrace, "'{'")?;
                    self.statements(scope.clone(), depth + 1)?;
                }
                ref t if keyword(t, "graph") => {
                    self.tokens.next();
                    self.attribute_lists()?;
                }
                ref t if keyword(t, "node") => {
                    self.tokens.next();
                    scope.node.extend(self.attribute_lists()?);
                }
                ref t if keyword(t, "edge") => {
                    self.tokens.next();
                    scope.edge.extend(self.attribute_lists()?);
                }
                Token::Id(_) => self.node_or_edge(&scope)?,
                other => {
                    return Err(DotError::Unexpected {
                        expected: "statement",
                        found: other.describe(),
                    })
                }
            }
        }
    }

    fn node_id(&mut self) -> Result<String, DotError> {
        let id = self.id("node id")?;
        // ports are accepted and ignored
        for _ in 0..2 {
            if self.eat(&Token::Colon) {
                self.id("port")?;
            } else {
                break;
            }
        }
        Ok(id)
    }

    fn node_or_edge(&mut self, scope: &Scope) -> Result<(), DotError> {
        let first = self.node_id()?;

        if self.eat(&Token::Equals) {
            // graph attribute assignment
            self.id("attribute value")?;
            return Ok(());
        }

        let mut chain = vec![first];
        while self.eat(&Token::Edge) {
            let subgraph = match self.peek() {
                Some(Token::LBrace) => true,
                Some(token) => keyword(token, "subgraph"),
                None => false,
            };
            if subgraph {
                return Err(DotError::Unexpected {
                    expected: "node id",
                    found: "subgraph".to_string(),
                });
            }
            chain.push(self.node_id()?);
        }

        let attributes = self.attribute_lists()?;
        let positions: Vec<usize> = chain
            .iter()
            .map(|id| self.graph.node_index(id, &scope.node, &mut self.index))
            .collect();

        if chain.len() == 1 {
            self.graph.nodes[positions[0]].attributes.extend(attributes);
            return Ok(());
        }

        let mut edge_attributes = scope.edge.clone();
        edge_attributes.extend(attributes);
        for pair in chain.windows(2) {
            self.graph.edges.push(DotEdge {
                source: pair[0].clone(),
                target: pair[1].clone(),
                attributes: edge_attributes.clone(),
            });
        }
        Ok(())
    }

    /// Zero or more `[ … ]` lists, merged left to right
    fn attribute_lists(&mut self) -> Result<Attributes, DotError> {
        let mut attributes = Attributes::new();
        while self.eat(&Token::LBracket) {
            loop {
                match self.next("attribute or ']'")? {
                    Token::RBracket => break,
                    Token::Semi | Token::Comma => continue,
                    Token::Id(key) => {
                        self.expect(Token::Equals, "'='")?;
                        let value = self.id("attribute value")?;
                        attributes.insert(key, value);
                    }
                    other => {
                        return Err(DotError::Unexpected {
                            expected: "attribute or ']'",
                            found: other.describe(),
                        })
                    }
                }
            }
        }
        Ok(attributes)
    }
}

/// Parse DOT text into nodes and edges
pub fn parse(text: &str) -> Result<DotGraph, DotError> {
    let tokens = Lexer::new(text).tokenize()?;
    Parser {
        tokens: tokens.into_iter().peekable(),
        graph: DotGraph::default(),
        index: HashMap::new(),
    }
    .graph()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_nodes_and_edges() {
        let graph = parse(
            r#"digraph G {
                1 [pubkey="a", ranking=0.5];
                2 [pubkey="b", label="two"];
                1 -> 2 [weight=3];
            }"#,
        )
        .unwrap();

        assert!(graph.directed);
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.nodes[0].id, "1");
        assert_eq!(graph.nodes[0].attributes["ranking"], "0.5");
        assert_eq!(graph.nodes[1].attributes["label"], "two");
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].source, "1");
        assert_eq!(graph.edges[0].target, "2");
        assert_eq!(graph.edges[0].attributes["weight"], "3");
    }

    #[test]
    fn test_edge_chain_creates_implicit_nodes() {
        let graph = parse("digraph { 1 -> 2 -> 3 [weight=1] }").unwrap();
        let ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(graph.edges.len(), 2);
        assert_eq!(graph.edges[1].source, "2");
        assert_eq!(graph.edges[1].attributes["weight"], "1");
    }

    #[test]
    fn test_defaults_comments_and_subgraphs() {
        let graph = parse(
            r#"strict digraph {
                // line comment
                # hash comment
                /* block
                   comment */
                rankdir = LR;
                graph [splines=true];
                node [locale="en"];
                edge [height=7];
                subgraph cluster { 4 [label="in" + "ner"] }
                4:n -> 5:s:w;
            }"#,
        )
        .unwrap();

        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.nodes[0].attributes["label"], "inner");
        assert_eq!(graph.nodes[0].attributes["locale"], "en");
        assert_eq!(graph.nodes[1].attributes["locale"], "en");
        assert_eq!(graph.edges[0].attributes["height"], "7");
    }

    #[test]
    fn test_repeated_node_statements_merge() {
        let graph = parse(r#"digraph { 1 [label="a"]; 1 [ranking=0.2]; }"#).unwrap();
        assert_eq!(graph.nodes.len(), 1);
        assert_eq!(graph.nodes[0].attributes["label"], "a");
        assert_eq!(graph.nodes[0].attributes["ranking"], "0.2");
    }

    #[test]
    fn test_escaped_quotes_and_negative_numbers() {
        let graph = parse(r#"graph { -3 [label="say \"hi\""] }"#).unwrap();
        assert!(!graph.directed);
        assert_eq!(graph.nodes[0].id, "-3");
        assert_eq!(graph.nodes[0].attributes["label"], "say \"hi\"");
    }

    #[test]
    fn test_exponent_numerals() {
        let graph =
            parse("digraph { 1 [ranking=1e-05, imbalance=-2.5E+3]; 1 -> 2 [weight=.5e2] }").unwrap();
        assert_eq!(graph.nodes[0].attributes["ranking"], "1e-05");
        assert_eq!(graph.nodes[0].attributes["imbalance"], "-2.5E+3");
        assert_eq!(graph.edges[0].attributes["weight"], ".5e2");
    }

    #[test]
    fn test_nesting_limit() {
        let nested = |depth: usize| format!("digraph {} 1 {}", "{".repeat(depth), "}".repeat(depth));
        let graph = parse(&nested(MAX_NESTING)).unwrap();
        assert_eq!(graph.nodes.len(), 1);

        assert_eq!(
            parse(&nested(MAX_NESTING + 1)),
            Err(DotError::TooDeep(MAX_NESTING))
        );

        let hostile = format!("digraph {}{}", "{".repeat(20_000), "}".repeat(20_000));
        assert_eq!(parse(&hostile), Err(DotError::TooDeep(MAX_NESTING)));
    }

    #[test]
    fn test_malformed_input() {
        assert!(parse("").is_err());
        assert!(parse("digraph {").is_err());
        assert!(parse("digraph { 1 -> }").is_err());
        assert!(parse("digraph { 1 [label=] }").is_err());
        assert!(parse(r#"digraph { 1 [label="open }"#).is_err());
        assert!(parse("digraph { 1 -> { 2 3 } }").is_err());
        assert!(parse("digraph {} trailing").is_err());
        assert!(parse("network { }").is_err());
    }
}
