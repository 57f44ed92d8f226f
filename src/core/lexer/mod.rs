//! Scanner implementing [`TokenSource`] for ECMAScript and C-family sources.
//!
//! The scanner is shallow: it knows enough to split source text
//! into tokens, keep template strings and their `${ ... }` substitutions on a
//! state stack, and tell a regular expression from a division. It does not
//! validate grammar.

use std::fmt;
use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::error::LexError;
use super::token::{LexerMode, LexerState, Location, Token, TokenSource, TokenType};


/// Source language, selecting the scanner variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// JavaScript and TypeScript.
    Ecma,
    /// C and C headers.
    C,
}

impl Language {
    /// Pick the scanner variant from a file extension. Unknown extensions are
    /// scanned as ECMAScript.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("c" | "h") => Language::C,
            _ => Language::Ecma,
        }
    }

    fn initial_mode(self) -> LexerMode {
        match self {
            Language::Ecma => LexerMode::Js,
            Language::C => LexerMode::C,
        }
    }

    fn is_keyword(self, word: &str) -> bool {
        match self {
            Language::Ecma => ECMA_KEYWORDS.contains(&word),
            Language::C => C_KEYWORDS.contains(&word),
        }
    }

    fn punctuators(self) -> &'static [&'static str] {
        match self {
            Language::Ecma => ECMA_PUNCTUATORS,
            Language::C => C_PUNCTUATORS,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Ecma => write!(f, "ecma"),
            Language::C => write!(f, "c"),
        }
    }
}

const ECMA_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for",
    "from", "function", "if", "implements", "import", "in", "instanceof", "interface", "let",
    "new", "null", "package", "private", "protected", "public", "return", "static", "super",
    "switch", "this", "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

const C_KEYWORDS: &[&str] = &[
    "_Bool", "auto", "break", "case", "char", "const", "continue", "default", "do", "double",
    "else", "enum", "extern", "float", "for", "goto", "if", "inline", "int", "long", "register",
    "restrict", "return", "short", "signed", "sizeof", "static", "struct", "switch", "typedef",
    "union", "unsigned", "void", "volatile", "while",
];

/// Keywords after which a `/` starts a regular expression.
const REGEX_PREFIX_KEYWORDS: &[&str] = &[
    "await", "case", "delete", "do", "else", "in", "instanceof", "new", "return", "throw",
    "typeof", "void", "yield",
];

// Longest first.
const ECMA_PUNCTUATORS: &[&str] = &[
    ">>>=", "...", "===", "!==", "**=", "<<=", ">>=", ">>>", "&&=", "||=", "??=", "=>", "==",
    "!=", "<=", ">=", "&&", "||", "??", "?.", "++", "--", "+=", "-=", "*=", "/=", "%=", "&=",
    "|=", "^=", "**", "<<", ">>", "{", "}", "(", ")", "[", "]", ";", ",", "<", ">", "+", "-",
    "*", "/", "%", "&", "|", "^", "!", "~", "?", ":", "=", ".", "@", "#",
];

const C_PUNCTUATORS: &[&str] = &[
    "<<=", ">>=", "...", "->", "++", "--", "<<", ">>", "<=", ">=", "==", "!=", "&&", "||", "+=",
    "-=", "*=", "/=", "%=", "&=", "|=", "^=", "##", "{", "}", "(", ")", "[", "]", ";", ",", "<",
    ">", "+", "-", "*", "/", "%", "&", "|", "^", "!", "~", "?", ":", "=", ".", "#",
];

pub(crate) fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

enum Transition {
    Stay,
    Push(LexerMode),
    Pop,
}

struct Scan {
    kind: TokenType,
    end: usize,
    transition: Transition,
}

impl Scan {
    fn stay(kind: TokenType, end: usize) -> Self {
        Self {
            kind,
            end,
            transition: Transition::Stay,
        }
    }
}

pub struct Lexer<'a> {
    src: &'a str,
    language: Language,
    pos: usize,
    line: usize,
    column: usize,
    states: Vec<LexerMode>,
    /// Type and lexeme of the last non-trivia token, for regex detection.
    prev: Option<(TokenType, &'a str)>,
    failed: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str, language: Language) -> Self {
        Self {
            src,
            language,
            pos: 0,
            line: 1,
            column: 1,
            states: vec![language.initial_mode()],
            prev: None,
            failed: false,
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    fn mode(&self) -> LexerMode {
        self.states
            .last()
            .copied()
            .unwrap_or(self.language.initial_mode())
    }

    fn rest(&self) -> &'a str {
        let src = self.src;
        &src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn scan(&self) -> Result<Scan, String> {
        match self.mode() {
            LexerMode::Template => Ok(self.scan_template()),
            _ => self.scan_code(),
        }
    }

    fn scan_template(&self) -> Scan {
        let rest = self.rest();
        if rest.starts_with('`') {
            return Scan {
                kind: TokenType::TemplateLiteral,
                end: self.pos + 1,
                transition: Transition::Pop,
            };
        }
        if rest.starts_with("${") {
            return Scan {
                kind: TokenType::TemplateLiteral,
                end: self.pos + 2,
                transition: Transition::Push(LexerMode::Js),
            };
        }
        let bytes = rest.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\\' => i += 2,
                b'`' => break,
                b'$' if bytes.get(i + 1) == Some(&b'{') => break,
                _ => i += 1,
            }
        }
        // An escape at the very end may step past the input.
        let end = (self.pos + i).min(self.src.len());
        Scan::stay(TokenType::TemplateLiteral, self.end_on_boundary(end))
    }

    fn end_on_boundary(&self, mut end: usize) -> usize {
        while !self.src.is_char_boundary(end) {
            end += 1;
        }
        end
    }

    fn scan_code(&self) -> Result<Scan, String> {
        let rest = self.rest();
        let Some(c) = self.peek() else {
            return Err("unexpected end of input".to_string());
        };
        let start = self.pos;

        if rest.starts_with("\r\n") {
            return Ok(Scan::stay(TokenType::Whitespace, start + 2));
        }
        if is_line_terminator(c) {
            return Ok(Scan::stay(TokenType::Whitespace, start + c.len_utf8()));
        }
        if c.is_whitespace() || c == '\u{feff}' {
            let len = self.take_while(|c| (c.is_whitespace() || c == '\u{feff}') && !is_line_terminator(c));
            return Ok(Scan::stay(TokenType::Whitespace, start + len));
        }
        if rest.starts_with("//") {
            let len = self.take_while(|c| !is_line_terminator(c));
            return Ok(Scan::stay(TokenType::Comment, start + len));
        }
        if rest.starts_with("/*") {
            return match rest[2..].find("*/") {
                Some(i) => Ok(Scan::stay(TokenType::Comment, start + 2 + i + 2)),
                None => Err("unterminated comment".to_string()),
            };
        }
        if c == '#' && self.language == Language::C {
            let len = self.take_while(|c| !is_line_terminator(c));
            return Ok(Scan::stay(TokenType::Preprocessor, start + len));
        }
        if is_ident_start(c) {
            let len = self.take_while(is_ident_part);
            let word = &rest[..len];
            let kind = if self.language.is_keyword(word) {
                TokenType::Keyword
            } else {
                TokenType::Identifier
            };
            return Ok(Scan::stay(kind, start + len));
        }
        if c.is_ascii_digit()
            || (c == '.' && rest[1..].starts_with(|d: char| d.is_ascii_digit()))
        {
            return Ok(Scan::stay(TokenType::NumericLiteral, start + self.number_len()));
        }
        if c == '"' || c == '\'' {
            return self
                .string_len(c)
                .map(|len| Scan::stay(TokenType::StringLiteral, start + len));
        }
        if self.language == Language::Ecma {
            if c == '`' {
                return Ok(Scan {
                    kind: TokenType::TemplateLiteral,
                    end: start + 1,
                    transition: Transition::Push(LexerMode::Template),
                });
            }
            if c == '/' && self.regex_allowed() {
                return self
                    .regex_len()
                    .map(|len| Scan::stay(TokenType::RegexpLiteral, start + len));
            }
        }
        if let Some(p) = self
            .language
            .punctuators()
            .iter()
            .find(|p| rest.starts_with(**p))
        {
            return Ok(Scan::stay(TokenType::Punctuator, start + p.len()));
        }
        Err(format!("unexpected character '{}'", c.escape_default()))
    }

    fn take_while(&self, pred: impl Fn(char) -> bool) -> usize {
        self.rest()
            .char_indices()
            .find(|(_, c)| !pred(*c))
            .map(|(i, _)| i)
            .unwrap_or(self.rest().len())
    }

    fn number_len(&self) -> usize {
        let rest = self.rest();
        let hex = rest.starts_with("0x") || rest.starts_with("0X");
        let mut prev = '\0';
        for (i, c) in rest.char_indices() {
            let exponent_sign = (c == '+' || c == '-') && matches!(prev, 'e' | 'E') && !hex;
            if !(c.is_ascii_alphanumeric() || c == '_' || c == '.' || exponent_sign) {
                return i;
            }
            prev = c;
        }
        rest.len()
    }

    fn string_len(&self, quote: char) -> Result<usize, String> {
        let mut chars = self.rest().char_indices().skip(1);
        while let Some((i, c)) = chars.next() {
            if c == quote {
                return Ok(i + 1);
            }
            if c == '\\' {
                // Escaped line terminators continue the literal.
                if let Some((_, '\r')) = chars.next() {
                    let mut ahead = chars.clone();
                    if let Some((_, '\n')) = ahead.next() {
                        chars = ahead;
                    }
                }
                continue;
            }
            if is_line_terminator(c) {
                break;
            }
        }
        Err("unterminated string literal".to_string())
    }

    fn regex_allowed(&self) -> bool {
        match self.prev {
            None => true,
            Some((TokenType::Punctuator, p)) => !matches!(p, ")" | "]" | "}"),
            Some((TokenType::Keyword, k)) => REGEX_PREFIX_KEYWORDS.contains(&k),
            Some((TokenType::TemplateLiteral, t)) => t == "${",
            Some(_) => false,
        }
    }

    fn regex_len(&self) -> Result<usize, String> {
        let mut in_class = false;
        let mut chars = self.rest().char_indices().skip(1);
        while let Some((i, c)) = chars.next() {
            match c {
                '\\' => {
                    if let Some((_, escaped)) = chars.next() {
                        if is_line_terminator(escaped) {
                            break;
                        }
                    }
                }
                '[' => in_class = true,
                ']' => in_class = false,
                '/' if !in_class => {
                    let body = i + 1;
                    let flags = self.rest()[body..]
                        .char_indices()
                        .find(|(_, c)| !is_ident_part(*c))
                        .map(|(j, _)| j)
                        .unwrap_or(self.rest().len() - body);
                    return Ok(body + flags);
                }
                c if is_line_terminator(c) => break,
                _ => {}
            }
        }
        Err("unterminated regular expression".to_string())
    }

    fn emit(&mut self, kind: TokenType, end: usize) -> Token {
        let src = self.src;
        let lexeme = &src[self.pos..end];
        let token = Token::new(kind, lexeme, self.location());

        let mut chars = lexeme.chars().peekable();
        while let Some(c) = chars.next() {
            let newline = match c {
                '\r' => chars.peek() != Some(&'\n'),
                c => is_line_terminator(c),
            };
            if newline {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.pos = end;
        if !kind.is_trivia() {
            self.prev = Some((kind, lexeme));
        }
        token
    }
}

impl TokenSource for Lexer<'_> {
    fn next_token(&mut self) -> Option<Result<Token, LexError>> {
        if self.failed || self.pos >= self.src.len() {
            return None;
        }
        match self.scan() {
            Ok(scan) => {
                let token = self.emit(scan.kind, scan.end);
                match scan.transition {
                    Transition::Stay => {}
                    Transition::Push(mode) => self.states.push(mode),
                    Transition::Pop => self.pop_state(),
                }
                Some(Ok(token))
            }
            Err(message) => {
                self.failed = true;
                Some(Err(LexError::new(message, self.location())))
            }
        }
    }

    fn state(&self) -> LexerState {
        LexerState {
            mode: self.mode(),
            depth: self.states.len() - 1,
        }
    }

    fn pop_state(&mut self) {
        if self.states.len() > 1 {
            self.states.pop();
        }
    }

    fn location(&self) -> Location {
        Location::new(self.line, self.column, self.pos)
    }
}
