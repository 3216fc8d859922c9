use super::{Expr, ExprKind, ParseError, ParseErrorKind, Span, TemplatePart, UnaryOp};
use crate::lexer::{Operator, Token, TokenKind, tokenize};

/// Default maximum nesting depth accepted by [`parse`].
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Parse `source` into an expression tree.
pub fn parse(source: &str) -> Result<Expr, ParseError> {
    parse_with_max_depth(source, DEFAULT_MAX_DEPTH)
}

/// Parse `source`, rejecting input nested deeper than `max_depth`.
///
/// Nesting counts sub-expressions (parentheses, call arguments, ternary
/// branches, template sections), chained unary operators, every binary
/// operator in a chain and every member or call step.
pub fn parse_with_max_depth(source: &str, max_depth: usize) -> Result<Expr, ParseError> {
    let tokens = tokenize(source).map_err(|err| ParseError::from_lex(err, source))?;
    let mut parser = Parser {
        source,
        tokens,
        pos: 0,
        depth: 0,
        max_depth,
    };
    let expr = parser.parse_expression()?;
    parser.expect(TokenKind::Eof, "end of input")?;
    Ok(expr)
}

struct Parser<'s> {
    source: &'s str,
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    max_depth: usize,
}

impl<'s> Parser<'s> {
    fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.enter()?;
        let result = self.parse_ternary();
        self.depth -= 1;
        result
    }

    fn parse_ternary(&mut self) -> Result<Expr, ParseError> {
        let cond = self.parse_binary(1)?;
        if !self.eat(TokenKind::Question) {
            return Ok(cond);
        }

        let then_branch = self.parse_expression()?;
        self.expect(TokenKind::Colon, "':'")?;
        let else_branch = self.parse_expression()?;
        let span = Span::combine(&cond.span, &else_branch.span);
        Ok(Expr::new(
            ExprKind::Ternary {
                cond: Box::new(cond),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            },
            span,
        ))
    }

    /// Precedence climbing over left-associative binary operators.
    ///
    /// Each fold nests the chain one level deeper, so long flat chains are
    /// bounded by the same depth limit as parentheses.
    fn parse_binary(&mut self, min_prec: u8) -> Result<Expr, ParseError> {
        let depth = self.depth;
        let result = self.parse_binary_chain(min_prec);
        self.depth = depth;
        result
    }

    fn parse_binary_chain(&mut self, min_prec: u8) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;

        while let TokenKind::Operator(op) = self.peek().kind {
            let Some(op) = op.binary_op() else { break };
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            self.enter()?;
            self.advance();
            let right = self.parse_binary(prec + 1)?;
            let span = Span::combine(&left.span, &right.span);
            left = Expr::new(
                ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let op = match self.peek().kind {
            TokenKind::Operator(Operator::Minus) => UnaryOp::Neg,
            TokenKind::Operator(Operator::Bang) => UnaryOp::Not,
            _ => return self.parse_postfix(),
        };
        let start = self.advance().span.clone();

        self.enter()?;
        let operand = self.parse_unary();
        self.depth -= 1;
        let operand = operand?;

        let span = Span::combine(&start, &operand.span);
        Ok(Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        ))
    }

    /// Member and call steps count toward the depth limit like binary folds.
    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let depth = self.depth;
        let result = self.parse_postfix_chain();
        self.depth = depth;
        result
    }

    fn parse_postfix_chain(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;

        loop {
            match self.peek().kind {
                TokenKind::Dot => {
                    self.enter()?;
                    self.advance();
                    let property = self.expect(TokenKind::Identifier, "property name")?;
                    let span = Span::combine(&expr.span, &property.span);
                    expr = Expr::new(
                        ExprKind::Member {
                            object: Box::new(expr),
                            property: property.text,
                        },
                        span,
                    );
                }
                TokenKind::LParen => {
                    // Only a bare identifier can be called.
                    let ExprKind::Ident(name) = &expr.kind else {
                        return Ok(expr);
                    };
                    let name = name.clone();
                    self.enter()?;
                    self.advance();
                    let args = self.parse_arguments()?;
                    let close = self.expect(TokenKind::RParen, "')'")?;
                    expr = Expr::new(
                        ExprKind::Call {
                            name,
                            name_span: expr.span.clone(),
                            args,
                        },
                        Span::combine(&expr.span, &close.span),
                    );
                }
                _ => return Ok(expr),
            }
        }
    }

    /// Comma-separated arguments up to (not including) the closing paren.
    fn parse_arguments(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();
        if self.peek().kind == TokenKind::RParen {
            return Ok(args);
        }
        loop {
            args.push(self.parse_expression()?);
            if !self.eat(TokenKind::Comma) {
                return Ok(args);
            }
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Number => {
                self.advance();
                let value = token.text.parse::<f64>().map_err(|_| {
                    self.error_at(
                        &token,
                        ParseErrorKind::InvalidNumber {
                            text: token.text.to_string(),
                        },
                    )
                })?;
                Ok(Expr::new(ExprKind::Number(value), token.span))
            }
            TokenKind::String => {
                self.advance();
                Ok(Expr::new(ExprKind::Str(token.text), token.span))
            }
            TokenKind::TemplateStart => self.parse_template(),
            TokenKind::Identifier => {
                self.advance();
                match token.text.as_str() {
                    "true" => Ok(Expr::new(ExprKind::Bool(true), token.span)),
                    "false" => Ok(Expr::new(ExprKind::Bool(false), token.span)),
                    "vec2" if self.peek().kind == TokenKind::LParen => self.parse_vector(token),
                    _ => Ok(Expr::new(ExprKind::Ident(token.text), token.span)),
                }
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(inner)
            }
            _ => Err(self.unexpected(&token, "expression")),
        }
    }

    /// `vec2 ( expr , expr )`, with the `vec2` identifier already consumed.
    fn parse_vector(&mut self, keyword: Token) -> Result<Expr, ParseError> {
        self.expect(TokenKind::LParen, "'('")?;
        let x = self.parse_expression()?;
        self.expect(TokenKind::Comma, "','")?;
        let y = self.parse_expression()?;
        let close = self.expect(TokenKind::RParen, "')'")?;
        Ok(Expr::new(
            ExprKind::Vector {
                x: Box::new(x),
                y: Box::new(y),
            },
            Span::combine(&keyword.span, &close.span),
        ))
    }

    fn parse_template(&mut self) -> Result<Expr, ParseError> {
        let start = self.advance().span.clone();
        let mut parts = Vec::new();

        loop {
            let token = self.peek().clone();
            match token.kind {
                TokenKind::TemplateText => {
                    self.advance();
                    parts.push(TemplatePart::Text(token.text));
                }
                TokenKind::TemplateExprStart => {
                    self.advance();
                    let expr = self.parse_expression()?;
                    self.expect(TokenKind::TemplateExprEnd, "'}'")?;
                    parts.push(TemplatePart::Expr(expr));
                }
                TokenKind::TemplateEnd => {
                    self.advance();
                    return Ok(Expr::new(
                        ExprKind::Template(parts),
                        Span::combine(&start, &token.span),
                    ));
                }
                _ => return Err(self.unexpected(&token, "template text or '${'")),
            }
        }
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        if self.depth >= self.max_depth {
            let token = self.peek().clone();
            return Err(self.error_at(
                &token,
                ParseErrorKind::MaxDepthExceeded {
                    max_depth: self.max_depth,
                },
            ));
        }
        self.depth += 1;
        Ok(())
    }

    fn peek(&self) -> &Token {
        // The token stream always ends with Eof, and `advance` never moves past it.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> &Token {
        let index = self.pos.min(self.tokens.len() - 1);
        if self.tokens[index].kind != TokenKind::Eof {
            self.pos += 1;
        }
        &self.tokens[index]
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.peek().kind == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token, ParseError> {
        let token = self.peek().clone();
        if token.kind != kind {
            return Err(self.unexpected(&token, expected));
        }
        self.advance();
        Ok(token)
    }

    fn unexpected(&self, token: &Token, expected: &str) -> ParseError {
        self.error_at(
            token,
            ParseErrorKind::UnexpectedToken {
                expected: expected.to_string(),
                found: token.describe(),
            },
        )
    }

    fn error_at(&self, token: &Token, kind: ParseErrorKind) -> ParseError {
        ParseError {
            kind,
            source: self.source.to_string(),
            span: token.span.clone(),
            line: token.line,
            column: token.column,
        }
    }
}
