use ecow::EcoString;

use super::{LexError, LexErrorKind, Operator, Token, TokenKind};
use crate::parser::Span;

/// Tokenize `source` into a token stream terminated by an `Eof` token.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).tokenize()
}

#[derive(Debug, Clone, Copy)]
struct Mark {
    pos: usize,
    line: usize,
    column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Inside back-ticks, reading literal text.
    Template,
    /// Inside `${ ... }` of a template string.
    TemplateExpr,
}

pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    line: usize,
    column: usize,
    // Each open template or `${` section with the position that opened it.
    modes: Vec<(Mode, Mark)>,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            column: 1,
            modes: Vec::new(),
            tokens: Vec::new(),
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        loop {
            if let Some((Mode::Template, opener)) = self.modes.last().copied() {
                self.scan_template_text(opener)?;
                continue;
            }

            self.skip_whitespace();
            if self.is_at_end() {
                break;
            }
            self.scan_token()?;
        }

        if let Some((mode, opener)) = self.modes.last().copied() {
            let kind = match mode {
                Mode::Template => LexErrorKind::UnterminatedTemplate,
                Mode::TemplateExpr => LexErrorKind::UnterminatedTemplateExpr,
            };
            return Err(self.error_at(opener, kind));
        }

        let eof = self.mark();
        self.push(TokenKind::Eof, EcoString::new(), eof);
        Ok(self.tokens)
    }

    fn scan_token(&mut self) -> Result<(), LexError> {
        let start = self.mark();
        let Some(ch) = self.peek() else {
            return Ok(());
        };

        match ch {
            '`' => {
                self.advance();
                self.push_raw(TokenKind::TemplateStart, start);
                self.modes.push((Mode::Template, start));
            }
            '}' if matches!(self.modes.last(), Some((Mode::TemplateExpr, _))) => {
                self.advance();
                self.push_raw(TokenKind::TemplateExprEnd, start);
                self.modes.pop();
            }
            '"' | '\'' => self.scan_string(ch)?,
            c if c.is_ascii_digit() => self.scan_number()?,
            c if is_identifier_start(c) => self.scan_identifier(),
            _ => {
                if let Some(op) = self.match_operator() {
                    for _ in 0..op.as_str().len() {
                        self.advance();
                    }
                    self.push_raw(TokenKind::Operator(op), start);
                    return Ok(());
                }

                let kind = match ch {
                    '(' => TokenKind::LParen,
                    ')' => TokenKind::RParen,
                    ',' => TokenKind::Comma,
                    '.' => TokenKind::Dot,
                    '?' => TokenKind::Question,
                    ':' => TokenKind::Colon,
                    other => {
                        return Err(self.error_at(start, LexErrorKind::UnexpectedChar(other)));
                    }
                };
                self.advance();
                self.push_raw(kind, start);
            }
        }
        Ok(())
    }

    fn scan_template_text(&mut self, opener: Mark) -> Result<(), LexError> {
        let start = self.mark();
        let mut text = EcoString::new();

        loop {
            match self.peek() {
                None => return Err(self.error_at(opener, LexErrorKind::UnterminatedTemplate)),
                Some('`') => {
                    self.flush_template_text(&mut text, start);
                    let end = self.mark();
                    self.advance();
                    self.push_raw(TokenKind::TemplateEnd, end);
                    self.modes.pop();
                    return Ok(());
                }
                Some('$') if self.peek_next() == Some('{') => {
                    self.flush_template_text(&mut text, start);
                    let expr_start = self.mark();
                    self.advance();
                    self.advance();
                    self.push_raw(TokenKind::TemplateExprStart, expr_start);
                    self.modes.push((Mode::TemplateExpr, expr_start));
                    return Ok(());
                }
                Some('\\') => {
                    self.advance();
                    match self.advance() {
                        Some(escaped) => text.push(unescape(escaped)),
                        None => {
                            return Err(self.error_at(opener, LexErrorKind::UnterminatedTemplate));
                        }
                    }
                }
                Some(c) => {
                    self.advance();
                    text.push(c);
                }
            }
        }
    }

    fn flush_template_text(&mut self, text: &mut EcoString, start: Mark) {
        if !text.is_empty() {
            let value = core::mem::take(text);
            self.push(TokenKind::TemplateText, value, start);
        }
    }

    fn scan_string(&mut self, quote: char) -> Result<(), LexError> {
        let start = self.mark();
        self.advance();
        let mut value = EcoString::new();

        loop {
            match self.peek() {
                None => return Err(self.error_at(start, LexErrorKind::UnterminatedString)),
                Some(c) if c == quote => break,
                Some('\n') => {
                    let here = self.mark();
                    return Err(self.error_at(here, LexErrorKind::NewlineInString));
                }
                Some('\\') => {
                    self.advance();
                    match self.advance() {
                        Some(escaped) => value.push(unescape(escaped)),
                        None => return Err(self.error_at(start, LexErrorKind::UnterminatedString)),
                    }
                }
                Some(c) => {
                    self.advance();
                    value.push(c);
                }
            }
        }

        self.advance();
        self.push(TokenKind::String, value, start);
        Ok(())
    }

    fn scan_number(&mut self) -> Result<(), LexError> {
        let start = self.mark();
        self.eat_digits();

        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            self.eat_digits();
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            self.advance();
            if matches!(self.peek(), Some('+' | '-')) {
                self.advance();
            }
            if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
                let here = self.mark();
                return Err(self.error_at(here, LexErrorKind::InvalidExponent));
            }
            self.eat_digits();
        }

        self.push_raw(TokenKind::Number, start);
        Ok(())
    }

    fn eat_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    fn scan_identifier(&mut self) {
        let start = self.mark();
        while self.peek().is_some_and(is_identifier_part) {
            self.advance();
        }
        self.push_raw(TokenKind::Identifier, start);
    }

    fn match_operator(&self) -> Option<Operator> {
        let rest = &self.source[self.pos..];
        Operator::ALL
            .into_iter()
            .find(|op| rest.starts_with(op.as_str()))
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t' | '\r' | '\n')) {
            self.advance();
        }
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_next(&self) -> Option<char> {
        let mut chars = self.source[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn mark(&self) -> Mark {
        Mark {
            pos: self.pos,
            line: self.line,
            column: self.column,
        }
    }

    /// Push a token whose text is the source slice from `start` to here.
    fn push_raw(&mut self, kind: TokenKind, start: Mark) {
        let text = EcoString::from(&self.source[start.pos..self.pos]);
        self.push(kind, text, start);
    }

    fn push(&mut self, kind: TokenKind, text: EcoString, start: Mark) {
        self.tokens.push(Token {
            kind,
            text,
            span: Span::new(start.pos, self.pos),
            line: start.line,
            column: start.column,
        });
    }

    fn error_at(&self, at: Mark, kind: LexErrorKind) -> LexError {
        LexError {
            kind,
            span: Span::new(at.pos, self.pos.max(at.pos)),
            line: at.line,
            column: at.column,
        }
    }
}

fn unescape(ch: char) -> char {
    match ch {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        // `\\`, `\"`, `\'`, `` \` `` and `\$` map to themselves, as does any
        // unknown escape.
        other => other,
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_identifier_part(c: char) -> bool {
    is_identifier_start(c) || c.is_ascii_digit()
}
