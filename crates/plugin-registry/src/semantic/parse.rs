//! Recursive-descent parser for type expression text.
//!
//! Grammar:
//!
//! ```text
//! union := term ('|' term)*
//! term  := ident ('[' union ']')?
//! ident := [A-Za-z_][A-Za-z0-9_]*
//! ```

use std::iter::Peekable;
use std::str::Chars;

use super::expr::TypeExpr;
use crate::error::RegistryError;

/// Deepest container nesting accepted in type expression text.
pub const MAX_NESTING: usize = 64;

pub(super) fn parse(input: &str) -> Result<TypeExpr, RegistryError> {
    let mut parser = Parser {
        input,
        chars: input.chars().peekable(),
        depth: 0,
    };
    let expr = parser.union()?;
    parser.skip_whitespace();
    if let Some(unexpected) = parser.chars.peek().copied() {
        return Err(parser.error(format!("unexpected character '{unexpected}'")));
    }
    Ok(expr)
}

/// Returns `true` when `name` is a valid type or format identifier.
pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

struct Parser<'a> {
    input: &'a str,
    chars: Peekable<Chars<'a>>,
    depth: usize,
}

impl Parser<'_> {
    fn union(&mut self) -> Result<TypeExpr, RegistryError> {
        let mut members = vec![self.term()?];
        loop {
            self.skip_whitespace();
            if !self.eat('|') {
                break;
            }
            members.push(self.term()?);
        }
        Ok(TypeExpr::union(members))
    }

    fn term(&mut self) -> Result<TypeExpr, RegistryError> {
        let name = self.ident()?;
        self.skip_whitespace();
        if !self.eat('[') {
            return Ok(TypeExpr::Leaf(name));
        }
        if self.depth >= MAX_NESTING {
            return Err(self.error(format!(
                "type expression nests deeper than {MAX_NESTING} levels"
            )));
        }
        self.depth += 1;
        let field = self.union()?;
        self.depth -= 1;
        self.skip_whitespace();
        if !self.eat(']') {
            return Err(self.error(format!("expected ']' to close '{name}['")));
        }
        Ok(TypeExpr::parameterized(name, field))
    }

    fn ident(&mut self) -> Result<String, RegistryError> {
        self.skip_whitespace();
        let mut name = String::new();
        while let Some(&c) = self.chars.peek() {
            let valid = if name.is_empty() {
                c.is_ascii_alphabetic() || c == '_'
            } else {
                c.is_ascii_alphanumeric() || c == '_'
            };
            if !valid {
                break;
            }
            name.push(c);
            self.chars.next();
        }
        if name.is_empty() {
            return Err(self.error("expected a type name"));
        }
        Ok(name)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.chars.peek() == Some(&expected) {
            self.chars.next();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while self.chars.peek().is_some_and(|c| c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn error(&self, message: impl Into<String>) -> RegistryError {
        RegistryError::TypeSyntax {
            input: self.input.to_owned(),
            message: message.into(),
        }
    }
}
