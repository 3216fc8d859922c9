//! Tokenizer for gamexpr source text.
//!
//! Produces a flat token stream. Template strings (back-tick delimited) are
//! split into `TemplateStart`, `TemplateText`, `TemplateExprStart` ...
//! `TemplateExprEnd`, `TemplateEnd` tokens; the tokens of each `${ ... }`
//! section are emitted inline so the parser can run a full sub-expression
//! parse over them.

mod error;
#[allow(clippy::module_inception)]
mod lexer;
mod token;


pub use error::{LexError, LexErrorKind};
pub use lexer::{Lexer, tokenize};
pub use token::{Operator, Token, TokenKind};
