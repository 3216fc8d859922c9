use core::fmt;

use ecow::EcoString;

use crate::parser::{BinaryOp, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    AndAnd,
    OrOr,
    LessEq,
    GreaterEq,
    EqEq,
    NotEq,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Less,
    Greater,
    Bang,
}

impl Operator {
    /// Operators in longest-first match order.
    pub const ALL: [Operator; 14] = [
        Operator::AndAnd,
        Operator::OrOr,
        Operator::LessEq,
        Operator::GreaterEq,
        Operator::EqEq,
        Operator::NotEq,
        Operator::Plus,
        Operator::Minus,
        Operator::Star,
        Operator::Slash,
        Operator::Percent,
        Operator::Less,
        Operator::Greater,
        Operator::Bang,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Operator::AndAnd => "&&",
            Operator::OrOr => "||",
            Operator::LessEq => "<=",
            Operator::GreaterEq => ">=",
            Operator::EqEq => "==",
            Operator::NotEq => "!=",
            Operator::Plus => "+",
            Operator::Minus => "-",
            Operator::Star => "*",
            Operator::Slash => "/",
            Operator::Percent => "%",
            Operator::Less => "<",
            Operator::Greater => ">",
            Operator::Bang => "!",
        }
    }

    /// The binary operator this token denotes, if any. `!` is unary only.
    pub fn binary_op(self) -> Option<BinaryOp> {
        Some(match self {
            Operator::AndAnd => BinaryOp::And,
            Operator::OrOr => BinaryOp::Or,
            Operator::LessEq => BinaryOp::Le,
            Operator::GreaterEq => BinaryOp::Ge,
            Operator::EqEq => BinaryOp::Eq,
            Operator::NotEq => BinaryOp::Ne,
            Operator::Plus => BinaryOp::Add,
            Operator::Minus => BinaryOp::Sub,
            Operator::Star => BinaryOp::Mul,
            Operator::Slash => BinaryOp::Div,
            Operator::Percent => BinaryOp::Rem,
            Operator::Less => BinaryOp::Lt,
            Operator::Greater => BinaryOp::Gt,
            Operator::Bang => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Number,
    String,
    Identifier,
    Operator(Operator),
    LParen,
    RParen,
    Comma,
    Dot,
    Question,
    Colon,
    TemplateStart,
    TemplateText,
    TemplateExprStart,
    TemplateExprEnd,
    TemplateEnd,
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Number => f.write_str("number"),
            TokenKind::String => f.write_str("string"),
            TokenKind::Identifier => f.write_str("identifier"),
            TokenKind::Operator(op) => write!(f, "'{}'", op.as_str()),
            TokenKind::LParen => f.write_str("'('"),
            TokenKind::RParen => f.write_str("')'"),
            TokenKind::Comma => f.write_str("','"),
            TokenKind::Dot => f.write_str("'.'"),
            TokenKind::Question => f.write_str("'?'"),
            TokenKind::Colon => f.write_str("':'"),
            TokenKind::TemplateStart => f.write_str("template string"),
            TokenKind::TemplateText => f.write_str("template text"),
            TokenKind::TemplateExprStart => f.write_str("'${'"),
            TokenKind::TemplateExprEnd => f.write_str("'}'"),
            TokenKind::TemplateEnd => f.write_str("end of template string"),
            TokenKind::Eof => f.write_str("end of input"),
        }
    }
}

/// A lexed token.
///
/// `text` holds the raw source slice, except for strings and template text
/// where it holds the unescaped value.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: EcoString,
    pub span: Span,
    pub line: usize,
    pub column: usize,
}

impl Token {
    /// Human readable description used in parse errors.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Number | TokenKind::Identifier => format!("{} '{}'", self.kind, self.text),
            TokenKind::String => format!("string \"{}\"", self.text),
            _ => self.kind.to_string(),
        }
    }
}
