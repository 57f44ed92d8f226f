//! Tokens and the token-source contract consumed by the extraction engine.

use std::fmt;

use serde::Serialize;

use super::error::LexError;

/// Position of a token in its file.
///
/// `line` and `column` are 1-based, `offset` is a 0-based byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Location {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Lexical category of a token.
///
/// The declaration order is the token table of the lexer: a token's numeric id
/// is the index of its type in [`TokenType::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenType {
    Whitespace,
    Comment,
    Keyword,
    Identifier,
    Punctuator,
    NumericLiteral,
    StringLiteral,
    RegexpLiteral,
    TemplateLiteral,
    Preprocessor,
}

impl TokenType {
    pub const ALL: [TokenType; 10] = [
        TokenType::Whitespace,
        TokenType::Comment,
        TokenType::Keyword,
        TokenType::Identifier,
        TokenType::Punctuator,
        TokenType::NumericLiteral,
        TokenType::StringLiteral,
        TokenType::RegexpLiteral,
        TokenType::TemplateLiteral,
        TokenType::Preprocessor,
    ];

    pub fn id(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        match self {
            TokenType::Whitespace => "whitespace",
            TokenType::Comment => "comment",
            TokenType::Keyword => "keyword",
            TokenType::Identifier => "identifier",
            TokenType::Punctuator => "punctuator",
            TokenType::NumericLiteral => "numericLiteral",
            TokenType::StringLiteral => "stringLiteral",
            TokenType::RegexpLiteral => "regexpLiteral",
            TokenType::TemplateLiteral => "templateLiteral",
            TokenType::Preprocessor => "preprocessor",
        }
    }

    /// Whitespace and comments carry no meaning for statement classification.
    pub fn is_trivia(self) -> bool {
        matches!(self, TokenType::Whitespace | TokenType::Comment)
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub lexeme: String,
    #[serde(rename = "type")]
    pub kind: TokenType,
    pub id: u32,
    pub loc: Location,
}

impl Token {
    pub fn new(kind: TokenType, lexeme: impl Into<String>, loc: Location) -> Self {
        Self {
            lexeme: lexeme.into(),
            kind,
            id: kind.id(),
            loc,
        }
    }

    pub fn byte_len(&self) -> usize {
        self.lexeme.len()
    }

    /// Byte offset one past the last byte of the token.
    pub fn end(&self) -> usize {
        self.loc.offset + self.lexeme.len()
    }

    pub fn is(&self, kind: TokenType, lexeme: &str) -> bool {
        self.kind == kind && self.lexeme == lexeme
    }

    pub fn is_keyword(&self, lexeme: &str) -> bool {
        self.is(TokenType::Keyword, lexeme)
    }

    pub fn is_punctuator(&self, lexeme: &str) -> bool {
        self.is(TokenType::Punctuator, lexeme)
    }

    pub fn is_identifier(&self) -> bool {
        self.kind == TokenType::Identifier
    }

    pub fn is_line_terminator(&self) -> bool {
        self.kind == TokenType::Whitespace
            && matches!(
                self.lexeme.as_str(),
                "\n" | "\r\n" | "\r" | "\u{2028}" | "\u{2029}"
            )
    }
}

/// Lexer mode names reported by a token source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexerMode {
    /// ECMAScript code, at top level or inside a `${ ... }` substitution.
    Js,
    /// Literal text of a template string.
    Template,
    /// C-family code.
    C,
}

impl LexerMode {
    pub fn name(self) -> &'static str {
        match self {
            LexerMode::Js => "JS",
            LexerMode::Template => "TEMPLATE",
            LexerMode::C => "C",
        }
    }

    pub fn is_code(self) -> bool {
        !matches!(self, LexerMode::Template)
    }
}

impl fmt::Display for LexerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Snapshot of a token source's state stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexerState {
    pub mode: LexerMode,
    /// Number of states pushed above the initial one.
    pub depth: usize,
}

/// A finite, single-pass producer of tokens with nested lexer states.
///
/// Entering a template string or a `${` substitution pushes a state; a closing
/// backtick pops one. Leaving a substitution is left to the consumer, which is
/// the only party able to tell a block `}` from a substitution `}`.
pub trait TokenSource {
    /// Produce the next token, or `None` once the input is exhausted.
    fn next_token(&mut self) -> Option<Result<Token, LexError>>;

    fn state(&self) -> LexerState;

    /// Leave the current nested state.
    fn pop_state(&mut self);

    /// Location just past the last consumed byte.
    fn location(&self) -> Location;
}
