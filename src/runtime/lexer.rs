//! Script lexer
//!
//! Turns snippet source into a flat token stream. Newlines are significant as
//! statement separators, except inside parentheses and brackets.

use std::iter::Peekable;
use std::str::Chars;

use super::error::{ScriptError, ScriptResult};

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Int(i64),
    Float(f64),
    Str(String),
    Ident(String),

    // Keywords
    KwDef,
    KwReturn,
    KwIf,
    KwElif,
    KwElse,
    KwWhile,
    KwFor,
    KwIn,
    KwBreak,
    KwContinue,
    KwPass,
    KwDel,
    KwAnd,
    KwOr,
    KwNot,
    KwTrue,
    KwFalse,
    KwNone,

    // Operators
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    SlashSlash,
    Percent,
    Assign,
    PlusAssign,
    MinusAssign,
    StarAssign,
    SlashAssign,
    EqEq,
    Neq,
    Lt,
    Le,
    Gt,
    Ge,

    // Delimiters
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Colon,
    Semicolon,
    Dot,

    Newline,
    Eof,
}

/// Reserved words
pub const KEYWORDS: &[&str] = &[
    "def", "return", "if", "elif", "else", "while", "for", "in", "break", "continue", "pass", "del", "and", "or",
    "not", "True", "False", "None",
];

impl TokenKind {
    fn keyword(word: &str) -> Option<TokenKind> {
        let kind = match word {
            "def" => TokenKind::KwDef,
            "return" => TokenKind::KwReturn,
            "if" => TokenKind::KwIf,
            "elif" => TokenKind::KwElif,
            "else" => TokenKind::KwElse,
            "while" => TokenKind::KwWhile,
            "for" => TokenKind::KwFor,
            "in" => TokenKind::KwIn,
            "break" => TokenKind::KwBreak,
            "continue" => TokenKind::KwContinue,
            "pass" => TokenKind::KwPass,
            "del" => TokenKind::KwDel,
            "and" => TokenKind::KwAnd,
            "or" => TokenKind::KwOr,
            "not" => TokenKind::KwNot,
            "True" => TokenKind::KwTrue,
            "False" => TokenKind::KwFalse,
            "None" => TokenKind::KwNone,
            _ => return None,
        };
        Some(kind)
    }
}

/// Token with the line it starts on
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
}

pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    /// Open `(` and `[` count; newlines are ignored while positive
    nesting: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().peekable(),
            line: 1,
            nesting: 0,
        }
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next();
        if c == Some('\n') {
            self.line += 1;
        }
        c
    }

    fn eat(
        &mut self,
        expected: char,
    ) -> bool {
        if self.chars.peek() == Some(&expected) {
            self.chars.next();
            true
        } else {
            false
        }
    }

    fn error(
        &self,
        message: impl Into<String>,
    ) -> ScriptError {
        ScriptError::syntax(message).at_line(self.line)
    }

    /// Skip blanks and comments, stopping at a significant newline
    fn skip_trivia(&mut self) {
        while let Some(&c) = self.chars.peek() {
            match c {
                ' ' | '\t' | '\r' => {
                    self.chars.next();
                }
                '\n' if self.nesting > 0 => {
                    self.advance();
                }
                '\\' => {
                    // line continuation
                    let mut lookahead = self.chars.clone();
                    lookahead.next();
                    if lookahead.peek() == Some(&'\n') {
                        self.chars.next();
                        self.advance();
                    } else {
                        break;
                    }
                }
                '#' => {
                    while let Some(&c) = self.chars.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.chars.next();
                    }
                }
                _ => break,
            }
        }
    }

    fn scan_number(
        &mut self,
        first: char,
    ) -> ScriptResult<TokenKind> {
        let mut text = String::from(first);
        let mut is_float = false;
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_digit() || c == '_' {
                if c != '_' {
                    text.push(c);
                }
                self.chars.next();
            } else if c == '.' && !is_float {
                // `1.foo` is not a float, but `1.5` and `1.` are
                let mut lookahead = self.chars.clone();
                lookahead.next();
                if matches!(lookahead.peek(), Some(c) if c.is_alphabetic() || *c == '_') {
                    break;
                }
                is_float = true;
                text.push('.');
                self.chars.next();
            } else {
                break;
            }
        }

        if is_float {
            text.parse::<f64>()
                .map(TokenKind::Float)
                .map_err(|_| self.error(format!("invalid float literal '{}'", text)))
        } else {
            text.parse::<i64>()
                .map(TokenKind::Int)
                .map_err(|_| self.error(format!("integer literal too large: {}", text)))
        }
    }

    fn scan_string(
        &mut self,
        quote: char,
    ) -> ScriptResult<TokenKind> {
        let start_line = self.line;
        let mut text = String::new();
        loop {
            match self.advance() {
                None | Some('\n') => {
                    return Err(ScriptError::syntax("unterminated string literal").at_line(start_line));
                }
                Some(c) if c == quote => break,
                Some('\\') => {
                    let escaped = match self.advance() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some('0') => '\0',
                        Some('\\') => '\\',
                        Some('\'') => '\'',
                        Some('"') => '"',
                        Some(other) => {
                            text.push('\\');
                            other
                        }
                        None => {
                            return Err(ScriptError::syntax("unterminated string literal").at_line(start_line));
                        }
                    };
                    text.push(escaped);
                }
                Some(c) => text.push(c),
            }
        }
        Ok(TokenKind::Str(text))
    }

    fn scan_word(
        &mut self,
        first: char,
    ) -> TokenKind {
        let mut word = String::from(first);
        while let Some(&c) = self.chars.peek() {
            if c.is_alphanumeric() || c == '_' {
                word.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        TokenKind::keyword(&word).unwrap_or(TokenKind::Ident(word))
    }

    /// Produce the next token; `Eof` once input is exhausted
    pub fn next_token(&mut self) -> ScriptResult<Token> {
        self.skip_trivia();
        let line = self.line;
        let c = match self.advance() {
            Some(c) => c,
            None => {
                return Ok(Token {
                    kind: TokenKind::Eof,
                    line,
                })
            }
        };

        let kind = match c {
            '\n' => TokenKind::Newline,
            '+' if self.eat('=') => TokenKind::PlusAssign,
            '+' => TokenKind::Plus,
            '-' if self.eat('=') => TokenKind::MinusAssign,
            '-' => TokenKind::Minus,
            '*' if self.eat('*') => TokenKind::StarStar,
            '*' if self.eat('=') => TokenKind::StarAssign,
            '*' => TokenKind::Star,
            '/' if self.eat('/') => TokenKind::SlashSlash,
            '/' if self.eat('=') => TokenKind::SlashAssign,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '=' if self.eat('=') => TokenKind::EqEq,
            '=' => TokenKind::Assign,
            '!' if self.eat('=') => TokenKind::Neq,
            '<' if self.eat('=') => TokenKind::Le,
            '<' => TokenKind::Lt,
            '>' if self.eat('=') => TokenKind::Ge,
            '>' => TokenKind::Gt,
            '(' => {
                self.nesting += 1;
                TokenKind::LParen
            }
            ')' => {
                self.nesting = self.nesting.saturating_sub(1);
                TokenKind::RParen
            }
            '[' => {
                self.nesting += 1;
                TokenKind::LBracket
            }
            ']' => {
                self.nesting = self.nesting.saturating_sub(1);
                TokenKind::RBracket
            }
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            ';' => TokenKind::Semicolon,
            '.' => TokenKind::Dot,
            '"' | '\'' => self.scan_string(c)?,
            c if c.is_ascii_digit() => self.scan_number(c)?,
            c if c.is_alphabetic() || c == '_' => self.scan_word(c),
            other => return Err(self.error(format!("invalid character '{}'", other))),
        };

        Ok(Token { kind, line })
    }
}

/// Tokenize a whole snippet, ending with `Eof`
pub fn lex(source: &str) -> ScriptResult<Vec<Token>> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            break;
        }
    }
    Ok(tokens)
}
