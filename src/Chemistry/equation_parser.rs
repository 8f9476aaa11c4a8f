//! # Chemical Equation Parser Module
//!
//! ## Aim
//! Turns a reaction equation typed by a user (e.g. `Ca(OH)2 + HCl = CaCl2 + H2O`) into an
//! `Equation` with reagents, products and the brutto formula of every molecule.
//!
//! ## Grammar
//! Recursive descent, rules are listed in call order:
//! ```text
//! equation := molecule , { '+' , molecule } , '=' , molecule , { '+' , molecule }
//! molecule := element , { element }
//! element  := atom | group | complex
//! group    := '(' , element , { element } , ')' , [ index ]
//! complex  := '[' , element , { element } , ']' , [ index ]
//! atom     := UPPER , { LOWER } , [ index ]
//! index    := NONZERO_DIGIT , { DIGIT }
//! ```
//!
//! ## Main Data Structures and Logic
//! - `Cursor`: position in the source with a sentinel "end" state. Every matched term also
//!   consumes the whitespace after it, so spaces inside a formula are ignored
//! - `EquationParser`: grammar rules. A rule returns `Ok(None)` when its alternative does not
//!   match (the caller tries the next one) and `Err(SyntaxError)` when the input is malformed
//! - Positions in errors are zero-based character offsets; errors at the end of input point at
//!   the last character

use log::debug;
use thiserror::Error;

use super::equation_model::{AtomGroup, Atom, Equation, MAX_COUNT, Molecule};

const WHITESPACE: [char; 4] = [' ', '\t', '\n', '\r'];

/// malformed equation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct SyntaxError {
    pub message: String,
    pub position: usize,
}

impl SyntaxError {
    pub fn new(message: String, position: usize) -> Self {
        Self { message, position }
    }
}

/// Position in the source string. `None` is the end of input: once the cursor runs past the
/// last character it never comes back into the valid range by moving forward.
#[derive(Debug, Clone)]
pub struct Cursor {
    chars: Vec<char>,
    pos: Option<usize>,
}

impl Cursor {
    pub fn new(source: &str) -> Self {
        let mut cursor = Self {
            chars: source.chars().collect(),
            pos: None,
        };
        cursor.set_pos(0);
        cursor
    }

    fn set_pos(&mut self, pos: usize) {
        self.pos = if pos >= self.chars.len() { None } else { Some(pos) };
    }

    /// saved position, restored with `restore`
    pub fn save(&self) -> Option<usize> {
        self.pos
    }

    pub fn restore(&mut self, saved: Option<usize>) {
        self.pos = saved;
    }

    pub fn current(&self) -> Option<char> {
        self.pos.map(|p| self.chars[p])
    }

    pub fn is_end(&self) -> bool {
        self.pos.is_none()
    }

    pub fn advance(&mut self) {
        if let Some(p) = self.pos {
            self.set_pos(p + 1);
        }
    }

    /// offset used in error messages; the end of input is reported as the last character
    pub fn position(&self) -> usize {
        self.pos.unwrap_or(self.chars.len().saturating_sub(1))
    }

    /// offset of the next unread character, the length of the source at the end
    pub fn offset(&self) -> usize {
        self.pos.unwrap_or(self.chars.len())
    }

    pub fn slice(&self, start: usize, end: usize) -> String {
        self.chars[start.min(end)..end].iter().collect()
    }

    pub fn skip_whitespace(&mut self) {
        while let Some(c) = self.current() {
            if !WHITESPACE.contains(&c) {
                break;
            }
            self.advance();
        }
    }

    /// Tries the terms one by one at the current position. The matched term and the whitespace
    /// after it are consumed; on mismatch the cursor is restored.
    pub fn match_any<'t>(&mut self, terms: &[&'t str]) -> Option<&'t str> {
        let saved = self.save();
        for &term in terms {
            let mut matched = true;
            for ch in term.chars() {
                if self.current() == Some(ch) {
                    self.advance();
                } else {
                    matched = false;
                    break;
                }
            }
            if matched {
                self.skip_whitespace();
                return Some(term);
            }
            self.restore(saved);
        }
        None
    }

    /// Consumes one character satisfying the predicate (and the whitespace after it)
    pub fn match_char(&mut self, predicate: impl Fn(char) -> bool) -> Option<char> {
        let c = self.current().filter(|&c| predicate(c))?;
        self.advance();
        self.skip_whitespace();
        Some(c)
    }

    /// checks whether one of the terms can be matched without moving the cursor
    pub fn is_match(&mut self, terms: &[&str]) -> bool {
        let saved = self.save();
        let result = self.match_any(terms).is_some();
        self.restore(saved);
        result
    }

    /// Same as `match_any`, but the absence of a match is a syntax error
    pub fn require_any<'t>(&mut self, terms: &[&'t str]) -> Result<&'t str, SyntaxError> {
        let position = self.position();
        self.match_any(terms).ok_or_else(|| {
            let expected = terms
                .iter()
                .map(|t| format!("\"{}\"", t))
                .collect::<Vec<_>>()
                .join(", ");
            SyntaxError::new(
                format!("Expected one of: {} at position {}", expected, position),
                position,
            )
        })
    }

    pub fn require<'t>(&mut self, term: &'t str) -> Result<&'t str, SyntaxError> {
        let position = self.position();
        self.match_any(&[term]).ok_or_else(|| {
            let kind = if term.chars().count() == 1 {
                "character"
            } else {
                "string"
            };
            SyntaxError::new(
                format!("Expected {} \"{}\" at position {}", kind, term, position),
                position,
            )
        })
    }
}

/// Recursive descent parser of chemical equations
#[derive(Debug, Clone)]
pub struct EquationParser {
    source: String,
    cursor: Cursor,
}

impl EquationParser {
    pub fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            cursor: Cursor::new(source),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Parses the whole source: the equation must be followed by the end of input
    pub fn run(&mut self) -> Result<Equation, SyntaxError> {
        self.cursor.skip_whitespace();
        let equation = self.equation()?;
        match self.cursor.current() {
            None => {
                debug!(
                    "parsed equation '{}': {} reagents, {} products",
                    self.source,
                    equation.reagents().len(),
                    equation.products().len()
                );
                Ok(equation)
            }
            Some(c) => {
                let position = self.cursor.position();
                Err(SyntaxError::new(
                    format!("Unexpected character \"{}\" at position {}", c, position),
                    position,
                ))
            }
        }
    }

    fn error(&self, what: &str) -> SyntaxError {
        let position = self.cursor.position();
        SyntaxError::new(format!("Expected {} at position {}", what, position), position)
    }

    fn count_error(position: usize) -> SyntaxError {
        SyntaxError::new(format!("Atom count is too large at position {}", position), position)
    }

    /// index := NONZERO_DIGIT , { DIGIT }
    /// The value is at most `MAX_COUNT`.
    fn index(&mut self) -> Result<Option<u64>, SyntaxError> {
        let position = self.cursor.position();
        let Some(first) = self.cursor.match_char(|c| matches!(c, '1'..='9')) else {
            return Ok(None);
        };
        let mut value = u64::from(first.to_digit(10).unwrap_or(0));
        while let Some(d) = self.cursor.match_char(|c| c.is_ascii_digit()) {
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(u64::from(d.to_digit(10).unwrap_or(0))))
                .filter(|&v| v <= MAX_COUNT)
                .ok_or_else(|| {
                    SyntaxError::new(format!("Index is too large at position {}", position), position)
                })?;
        }
        Ok(Some(value))
    }

    /// atom := UPPER , { LOWER } , [ index ]
    fn atom(&mut self) -> Result<Option<Atom>, SyntaxError> {
        let Some(first) = self.cursor.match_char(|c| c.is_ascii_uppercase()) else {
            return Ok(None);
        };
        let mut symbol = first.to_string();
        while let Some(c) = self.cursor.match_char(|c| c.is_ascii_lowercase()) {
            symbol.push(c);
        }
        let count = self.index()?.unwrap_or(1);
        Ok(Some(Atom::new(&symbol, count)))
    }

    /// group := '(' , element , { element } , ')' , [ index ]
    /// complex := '[' , element , { element } , ']' , [ index ]
    fn bracketed(&mut self, open: &str, close: &str) -> Result<Option<AtomGroup>, SyntaxError> {
        if self.cursor.match_any(&[open]).is_none() {
            return Ok(None);
        }
        let mut group = match self.element()? {
            Some(first) => first,
            None => return Err(self.error("atom, group of atoms or complex")),
        };
        loop {
            let position = self.cursor.position();
            let Some(inner) = self.element()? else {
                break;
            };
            if group.add_group(&inner).is_none() {
                return Err(Self::count_error(position));
            }
        }
        if !self.cursor.is_match(&[close]) {
            let what = format!("closing bracket \"{}\"", close);
            return Err(self.error(&what));
        }
        self.cursor.require(close)?;
        let position = self.cursor.position();
        if let Some(index) = self.index()? {
            if group.multiply(index).is_none() {
                return Err(SyntaxError::new(
                    format!("Group index is too large at position {}", position),
                    position,
                ));
            }
        }
        Ok(Some(group))
    }

    fn group(&mut self) -> Result<Option<AtomGroup>, SyntaxError> {
        self.bracketed("(", ")")
    }

    fn complex(&mut self) -> Result<Option<AtomGroup>, SyntaxError> {
        self.bracketed("[", "]")
    }

    /// element := atom | group | complex
    fn element(&mut self) -> Result<Option<AtomGroup>, SyntaxError> {
        let position = self.cursor.position();
        if let Some(atom) = self.atom()? {
            return AtomGroup::from_atoms(vec![atom])
                .map(Some)
                .ok_or_else(|| Self::count_error(position));
        }
        if let Some(group) = self.group()? {
            return Ok(Some(group));
        }
        self.complex()
    }

    /// molecule := element , { element }
    fn molecule(&mut self) -> Result<Option<Molecule>, SyntaxError> {
        let start = self.cursor.offset();
        let mut formula = AtomGroup::new();
        loop {
            let position = self.cursor.position();
            let Some(element) = self.element()? else {
                break;
            };
            if formula.add_group(&element).is_none() {
                return Err(Self::count_error(position));
            }
        }
        if formula.is_empty() {
            return Ok(None);
        }
        let text = self.cursor.slice(start, self.cursor.offset());
        Ok(Some(Molecule::new(formula, text.trim())))
    }

    /// equation := molecule , { '+' , molecule } , '=' , molecule , { '+' , molecule }
    fn equation(&mut self) -> Result<Equation, SyntaxError> {
        let mut equation = Equation::new(&self.source);

        let first = self
            .molecule()?
            .ok_or_else(|| self.error("reagent molecule"))?;
        equation.add_reagent(first);
        while self.cursor.match_any(&["+"]).is_some() {
            let reagent = self
                .molecule()?
                .ok_or_else(|| self.error("reagent molecule"))?;
            equation.add_reagent(reagent);
        }

        if self.cursor.is_end() || !self.cursor.is_match(&["="]) {
            return Err(self.error("character \"=\""));
        }
        self.cursor.require("=")?;

        let first = self
            .molecule()?
            .ok_or_else(|| self.error("product molecule"))?;
        equation.add_product(first);
        while self.cursor.match_any(&["+"]).is_some() {
            let product = self
                .molecule()?
                .ok_or_else(|| self.error("product molecule"))?;
            equation.add_product(product);
        }
        Ok(equation)
    }
}

/// Parses a chemical equation string
pub fn parse_equation(source: &str) -> Result<Equation, SyntaxError> {
    EquationParser::new(source).run()
}
