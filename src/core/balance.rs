//! Bracket balancing across nested interpolation contexts.
//!
//! A [`Balancer`] matches `()`, `[]` and `{}` within one lexical context. The
//! [`ContextStack`] keeps one balancer for top-level code plus one for every
//! open `${ ... }` substitution, so brackets inside a substitution balance
//! independently of the code around the template string.

use super::error::BalanceMismatch;
use super::token::{Location, Token, TokenType};

/// Marker shown in stack snapshots for an open interpolation context.
pub const INTERPOLATION_OPENER: &str = "${";

fn counterpart(closer: char) -> Option<char> {
    match closer {
        '}' => Some('{'),
        ']' => Some('['),
        ')' => Some('('),
        _ => None,
    }
}

fn closer_of(opener: char) -> char {
    match opener {
        '{' => '}',
        '[' => ']',
        _ => ')',
    }
}

fn single_char(lexeme: &str) -> Option<char> {
    let mut chars = lexeme.chars();
    let c = chars.next()?;
    chars.next().is_none().then_some(c)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Balancer {
    stack: Vec<char>,
}

impl Balancer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn open_brackets(&self) -> &[char] {
        &self.stack
    }

    /// Closer expected for the innermost open bracket.
    pub fn expected(&self) -> Option<char> {
        self.stack.last().copied().map(closer_of)
    }

    /// Push an opener or pop a matching closer.
    ///
    /// Returns the closer the balancer expected on mismatch (`None` when
    /// nothing was open). Other lexemes are ignored.
    pub fn feed(&mut self, lexeme: &str) -> Result<(), Option<char>> {
        let Some(c) = single_char(lexeme) else {
            return Ok(());
        };
        match c {
            '{' | '[' | '(' => {
                self.stack.push(c);
                Ok(())
            }
            '}' | ']' | ')' => {
                if self.stack.last().copied() == counterpart(c) {
                    self.stack.pop();
                    Ok(())
                } else {
                    Err(self.expected())
                }
            }
            _ => Ok(()),
        }
    }
}

/// One [`Balancer`] per lexical nesting level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextStack {
    root: Balancer,
    nested: Vec<Balancer>,
}

impl Default for ContextStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextStack {
    pub fn new() -> Self {
        Self {
            root: Balancer::new(),
            nested: Vec::new(),
        }
    }

    /// Number of open interpolation contexts.
    pub fn depth(&self) -> usize {
        self.nested.len()
    }

    pub fn top(&self) -> &Balancer {
        self.nested.last().unwrap_or(&self.root)
    }

    fn top_mut(&mut self) -> &mut Balancer {
        self.nested.last_mut().unwrap_or(&mut self.root)
    }

    /// Enter a new interpolation context.
    pub fn push(&mut self) {
        self.nested.push(Balancer::new());
    }

    /// Leave the innermost interpolation context.
    ///
    /// Fails if brackets opened inside the context are still open. Popping
    /// with no interpolation context open is a mismatch as well.
    pub fn pop(&mut self, loc: Location) -> Result<(), BalanceMismatch> {
        match self.nested.last() {
            Some(top) if top.is_empty() => {
                self.nested.pop();
                Ok(())
            }
            Some(top) => Err(self.mismatch(top.expected(), Some("}".to_string()), loc)),
            None => Err(self.mismatch(None, Some("}".to_string()), loc)),
        }
    }

    /// True if a `}` at this point terminates an interpolation context rather
    /// than closing a bracket.
    pub fn closes_interpolation(&self, token: &Token) -> bool {
        token.kind == TokenType::Punctuator
            && token.lexeme == "}"
            && self.depth() > 0
            && self.top().is_empty()
    }

    /// Feed a punctuator to the innermost balancer. Template text, strings
    /// and comments never count as brackets.
    pub fn observe(&mut self, token: &Token) -> Result<(), BalanceMismatch> {
        if token.kind != TokenType::Punctuator {
            return Ok(());
        }
        match self.top_mut().feed(&token.lexeme) {
            Ok(()) => Ok(()),
            Err(expected) => Err(self.mismatch(expected, Some(token.lexeme.clone()), token.loc)),
        }
    }

    /// Check that everything opened has been closed at end of input.
    pub fn finish(&self, eof: Location) -> Result<(), BalanceMismatch> {
        if self.depth() == 0 && self.root.is_empty() {
            return Ok(());
        }
        let expected = self.top().expected().or(Some('}'));
        Err(self.mismatch(expected, None, eof))
    }

    /// Open brackets from the outermost context inwards.
    pub fn snapshot(&self) -> Vec<String> {
        let mut out: Vec<String> = self.root.open_brackets().iter().map(char::to_string).collect();
        for balancer in &self.nested {
            out.push(INTERPOLATION_OPENER.to_string());
            out.extend(balancer.open_brackets().iter().map(char::to_string));
        }
        out
    }

    fn mismatch(&self, expected: Option<char>, found: Option<String>, loc: Location) -> BalanceMismatch {
        BalanceMismatch {
            expected: expected.map(String::from),
            found,
            stack: self.snapshot(),
            loc,
        }
    }
}
