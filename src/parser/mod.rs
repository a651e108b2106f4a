//! Turtle parser
//!
//! Implements the subset of Turtle needed for repository-configuration
//! graphs and baseline vocabulary documents: prefix and base directives,
//! IRIs, prefixed names, the `a` keyword, literals (plain, language-tagged,
//! typed, bare integers and booleans), labeled blank nodes, anonymous
//! blank-node property lists `[ ... ]`, and `;`/`,` continuations.

use std::collections::HashMap;

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, take_until, take_while, take_while1},
    character::complete::{anychar, char, digit1, multispace1},
    combinator::{map, opt, recognize, value},
    multi::many0,
    sequence::{delimited, pair, preceded, tuple},
};

use indexmap::IndexMap;

use crate::term::{BlankNode, Statement, Term, Uri};
use crate::term::uri::ns;

/// Parser error type
#[derive(Debug, Clone, thiserror::Error)]
pub enum ParseError {
    #[error("syntax error at position {position}: {message}")]
    Syntax { position: usize, message: String },

    #[error("undefined prefix: {prefix}")]
    UndefinedPrefix { prefix: String },

    #[error("unexpected end of input")]
    UnexpectedEof,
}

/// Parser state holding prefix mappings and the base URI
#[derive(Debug, Clone, Default)]
pub struct ParserState {
    /// Prefix to namespace mappings
    prefixes: IndexMap<String, String>,
    /// Base URI for relative resolution
    base: Option<Uri>,
}

impl ParserState {
    pub fn new() -> Self {
        let mut state = Self::default();
        // Standard prefixes are always available
        state.add_prefix("rdf", ns::RDF);
        state.add_prefix("rdfs", ns::RDFS);
        state.add_prefix("xsd", ns::XSD);
        state.add_prefix("owl", ns::OWL);
        state
    }

    pub fn with_base(base: Uri) -> Self {
        let mut state = Self::new();
        state.base = Some(base);
        state
    }

    pub fn add_prefix(&mut self, prefix: &str, namespace: &str) {
        self.prefixes.insert(prefix.to_string(), namespace.to_string());
    }

    pub fn resolve_prefix(&self, prefix: &str, local: &str) -> Result<Uri, ParseError> {
        if let Some(namespace) = self.prefixes.get(prefix) {
            Ok(Uri::new(format!("{}{}", namespace, local)))
        } else {
            Err(ParseError::UndefinedPrefix { prefix: prefix.to_string() })
        }
    }

    pub fn resolve_relative(&self, reference: &str) -> Uri {
        if let Some(base) = &self.base {
            base.resolve(reference)
        } else {
            Uri::new(reference.to_string())
        }
    }

    pub fn prefixes(&self) -> &IndexMap<String, String> {
        &self.prefixes
    }
}

// ============================================================================
// Token-level parsers (nom)
// ============================================================================

/// Parse whitespace and comments
fn ws(input: &str) -> IResult<&str, ()> {
    value(
        (),
        many0(alt((
            value((), multispace1),
            value((), preceded(char('#'), take_while(|c| c != '\n'))),
        ))),
    )(input)
}

/// Parse an IRI reference <...>
fn iri_ref(input: &str) -> IResult<&str, &str> {
    delimited(
        char('<'),
        take_while(|c| c != '>' && c != ' ' && c != '\n' && c != '\r'),
        char('>'),
    )(input)
}

/// Parse a prefixed name (prefix:local)
fn prefixed_name(input: &str) -> IResult<&str, (&str, &str)> {
    let pn_chars = |c: char| c.is_alphanumeric() || c == '_' || c == '-' || c == '.';

    let (input, prefix) = take_while(|c: char| c.is_alphanumeric() || c == '_' || c == '-')(input)?;
    let (input, _) = char(':')(input)?;
    let (input, local) = take_while(pn_chars)(input)?;

    Ok((input, (prefix, local)))
}

/// Parse a blank node label _:name
fn blank_node_label(input: &str) -> IResult<&str, &str> {
    preceded(
        tag("_:"),
        take_while1(|c: char| c.is_alphanumeric() || c == '_' || c == '-'),
    )(input)
}

/// Parse a string literal with possible escape sequences
fn string_literal(input: &str) -> IResult<&str, String> {
    alt((
        map(
            delimited(tag("\"\"\""), take_until("\"\"\""), tag("\"\"\"")),
            unescape_string,
        ),
        map(
            delimited(tag("'''"), take_until("'''"), tag("'''")),
            unescape_string,
        ),
        map(
            delimited(
                char('"'),
                recognize(many0(alt((
                    take_while1(|c| c != '"' && c != '\\' && c != '\n'),
                    recognize(pair(char('\\'), anychar)),
                )))),
                char('"'),
            ),
            unescape_string,
        ),
        map(
            delimited(char('\''), take_while(|c| c != '\'' && c != '\n'), char('\'')),
            unescape_string,
        ),
    ))(input)
}

/// Unescape common escape sequences
fn unescape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => result.push('\n'),
                Some('r') => result.push('\r'),
                Some('t') => result.push('\t'),
                Some('\\') => result.push('\\'),
                Some('"') => result.push('"'),
                Some('\'') => result.push('\''),
                Some(other) => {
                    result.push('\\');
                    result.push(other);
                }
                None => result.push('\\'),
            }
        } else {
            result.push(c);
        }
    }
    result
}

/// Parse a numeric literal (integer or decimal)
fn numeric_literal(input: &str) -> IResult<&str, (&str, bool)> {
    let (rest, text) = recognize(tuple((
        opt(alt((char('+'), char('-')))),
        digit1,
        opt(pair(char('.'), digit1)),
    )))(input)?;
    Ok((rest, (text, text.contains('.'))))
}

/// Parse a language tag @lang
fn lang_tag(input: &str) -> IResult<&str, &str> {
    preceded(
        char('@'),
        take_while1(|c: char| c.is_ascii_alphanumeric() || c == '-'),
    )(input)
}

// ============================================================================
// Document parser
// ============================================================================

/// Parse a Turtle document into statements
pub fn parse(source: &str, base: Option<&str>) -> Result<Vec<Statement>, ParseError> {
    let state = match base {
        Some(b) => ParserState::with_base(Uri::new(b.to_string())),
        None => ParserState::new(),
    };
    let mut parser = Parser {
        source,
        rest: source,
        state,
        statements: Vec::new(),
        blank_labels: HashMap::new(),
    };
    parser.parse_document()?;
    Ok(parser.statements)
}

struct Parser<'a> {
    source: &'a str,
    rest: &'a str,
    state: ParserState,
    statements: Vec<Statement>,
    /// Labeled blank nodes, reused within one document
    blank_labels: HashMap<String, BlankNode>,
}

impl<'a> Parser<'a> {
    fn position(&self) -> usize {
        self.source.len() - self.rest.len()
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::Syntax {
            position: self.position(),
            message: message.into(),
        }
    }

    fn skip_ws(&mut self) {
        if let Ok((rest, ())) = ws(self.rest) {
            self.rest = rest;
        }
    }

    fn eat(&mut self, expected: char) -> Result<(), ParseError> {
        self.skip_ws();
        match char::<&str, nom::error::Error<&str>>(expected)(self.rest) {
            Ok((rest, _)) => {
                self.rest = rest;
                Ok(())
            }
            Err(_) => Err(self.error(format!("expected '{}'", expected))),
        }
    }

    fn peek(&mut self, expected: char) -> bool {
        self.skip_ws();
        self.rest.starts_with(expected)
    }

    fn parse_document(&mut self) -> Result<(), ParseError> {
        loop {
            self.skip_ws();
            if self.rest.is_empty() {
                return Ok(());
            }
            if self.rest.starts_with("@prefix") || self.rest.starts_with("@base") {
                self.parse_directive()?;
            } else {
                self.parse_triples()?;
            }
        }
    }

    fn parse_directive(&mut self) -> Result<(), ParseError> {
        if let Some(rest) = self.rest.strip_prefix("@prefix") {
            self.rest = rest;
            self.skip_ws();
            let (rest, (prefix, local)) = prefixed_name(self.rest)
                .map_err(|_| self.error("expected prefix declaration"))?;
            if !local.is_empty() {
                return Err(self.error("prefix declaration must end with ':'"));
            }
            let prefix = prefix.to_string();
            self.rest = rest;
            self.skip_ws();
            let (rest, iri) = iri_ref(self.rest).map_err(|_| self.error("expected IRI"))?;
            self.rest = rest;
            let namespace = self.state.resolve_relative(iri);
            self.state.add_prefix(&prefix, namespace.as_str());
            self.eat('.')?;
            Ok(())
        } else if let Some(rest) = self.rest.strip_prefix("@base") {
            self.rest = rest;
            self.skip_ws();
            let (rest, iri) = iri_ref(self.rest).map_err(|_| self.error("expected IRI"))?;
            self.rest = rest;
            self.state.base = Some(Uri::new(iri.to_string()));
            self.eat('.')?;
            Ok(())
        } else {
            Err(self.error("unknown directive"))
        }
    }

    fn parse_triples(&mut self) -> Result<(), ParseError> {
        let subject = if self.peek('[') {
            self.parse_blank_node_property_list()?
        } else {
            self.parse_term(false)?
        };
        // An anonymous subject may carry its whole description inside the
        // brackets, in which case the statement ends right after them.
        self.skip_ws();
        if self.rest.starts_with('.') {
            self.eat('.')?;
            return Ok(());
        }
        self.parse_predicate_object_list(&subject)?;
        self.eat('.')
    }

    fn parse_predicate_object_list(&mut self, subject: &Term) -> Result<(), ParseError> {
        loop {
            let predicate = self.parse_verb()?;
            loop {
                let object = if self.peek('[') {
                    self.parse_blank_node_property_list()?
                } else {
                    self.parse_term(true)?
                };
                self.statements
                    .push(Statement::new(subject.clone(), predicate.clone(), object));
                if self.peek(',') {
                    self.eat(',')?;
                } else {
                    break;
                }
            }
            if self.peek(';') {
                self.eat(';')?;
                // Trailing ';' before '.' or ']' is allowed
                self.skip_ws();
                if self.rest.starts_with('.') || self.rest.starts_with(']') {
                    return Ok(());
                }
            } else {
                return Ok(());
            }
        }
    }

    fn parse_verb(&mut self) -> Result<Term, ParseError> {
        self.skip_ws();
        // The 'a' keyword expands to rdf:type
        if let Some(rest) = self.rest.strip_prefix('a') {
            if rest
                .chars()
                .next()
                .map(|c| c.is_whitespace() || c == '<' || c == '[' || c == '"')
                .unwrap_or(false)
            {
                self.rest = rest;
                return Ok(Term::uri(ns::RDF_TYPE));
            }
        }
        self.parse_term(false)
    }

    /// Parse `[ predicateObjectList ]`, returning the fresh blank node
    fn parse_blank_node_property_list(&mut self) -> Result<Term, ParseError> {
        self.eat('[')?;
        let node = Term::fresh_blank();
        self.skip_ws();
        if !self.rest.starts_with(']') {
            self.parse_predicate_object_list(&node)?;
        }
        self.eat(']')?;
        Ok(node)
    }

    /// Parse a single term: IRI, prefixed name, blank node, or literal
    fn parse_term(&mut self, allow_literal: bool) -> Result<Term, ParseError> {
        self.skip_ws();
        if self.rest.is_empty() {
            return Err(ParseError::UnexpectedEof);
        }

        if self.rest.starts_with('<') {
            let (rest, iri) = iri_ref(self.rest).map_err(|_| self.error("malformed IRI"))?;
            self.rest = rest;
            return Ok(Term::Uri(std::sync::Arc::new(self.state.resolve_relative(iri))));
        }

        if self.rest.starts_with("_:") {
            let (rest, label) =
                blank_node_label(self.rest).map_err(|_| self.error("malformed blank node"))?;
            let node = self
                .blank_labels
                .entry(label.to_string())
                .or_insert_with(|| BlankNode::labeled(label.to_string()))
                .clone();
            self.rest = rest;
            return Ok(Term::BlankNode(node));
        }

        if allow_literal {
            if self.rest.starts_with('"') || self.rest.starts_with('\'') {
                return self.parse_literal();
            }
            if let Ok((rest, (text, is_decimal))) = numeric_literal(self.rest) {
                let datatype = if is_decimal { "decimal" } else { "integer" };
                let term = Term::typed_literal(text, format!("{}{}", ns::XSD, datatype));
                self.rest = rest;
                return Ok(term);
            }
            for keyword in ["true", "false"] {
                if let Some(rest) = self.rest.strip_prefix(keyword) {
                    let boundary = rest
                        .chars()
                        .next()
                        .map(|c| !c.is_alphanumeric() && c != ':')
                        .unwrap_or(true);
                    if boundary {
                        self.rest = rest;
                        return Ok(Term::typed_literal(keyword, format!("{}boolean", ns::XSD)));
                    }
                }
            }
        }

        // Prefixed name
        let (rest, (prefix, local)) =
            prefixed_name(self.rest).map_err(|_| self.error("expected term"))?;
        let uri = self.state.resolve_prefix(prefix, local)?;
        self.rest = rest;
        Ok(Term::Uri(std::sync::Arc::new(uri)))
    }

    fn parse_literal(&mut self) -> Result<Term, ParseError> {
        let (rest, text) =
            string_literal(self.rest).map_err(|_| self.error("malformed string literal"))?;
        self.rest = rest;

        if let Ok((rest, lang)) = lang_tag(self.rest) {
            self.rest = rest;
            return Ok(Term::lang_literal(text, lang));
        }
        if let Some(rest) = self.rest.strip_prefix("^^") {
            self.rest = rest;
            self.skip_ws();
            if self.rest.starts_with('<') {
                let (rest, iri) =
                    iri_ref(self.rest).map_err(|_| self.error("malformed datatype IRI"))?;
                self.rest = rest;
                let datatype = self.state.resolve_relative(iri);
                return Ok(Term::typed_literal(text, datatype.as_str()));
            }
            let (rest, (prefix, local)) =
                prefixed_name(self.rest).map_err(|_| self.error("expected datatype"))?;
            let datatype = self.state.resolve_prefix(prefix, local)?;
            self.rest = rest;
            return Ok(Term::typed_literal(text, datatype.as_str()));
        }
        Ok(Term::literal(text))
    }
}
