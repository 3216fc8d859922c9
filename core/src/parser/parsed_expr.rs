use core::fmt;

use ecow::EcoString;

use crate::parser::{BinaryOp, Span, UnaryOp};
use crate::values::format_number;

/// A parsed expression node with the source span it covers.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Number(f64),
    Bool(bool),
    Str(EcoString),
    /// `vec2(x, y)`
    Vector {
        x: Box<Expr>,
        y: Box<Expr>,
    },
    Ident(EcoString),
    Member {
        object: Box<Expr>,
        property: EcoString,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Ternary {
        cond: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
    /// Calls only ever target a bare builtin name.
    Call {
        name: EcoString,
        name_span: Span,
        args: Vec<Expr>,
    },
    Template(Vec<TemplatePart>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TemplatePart {
    Text(EcoString),
    Expr(Expr),
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Visit this node and every descendant, parents before children.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Expr)) {
        f(self);
        match &self.kind {
            ExprKind::Number(_) | ExprKind::Bool(_) | ExprKind::Str(_) | ExprKind::Ident(_) => {}
            ExprKind::Vector { x, y } => {
                x.walk(f);
                y.walk(f);
            }
            ExprKind::Member { object, .. } => object.walk(f),
            ExprKind::Binary { left, right, .. } => {
                left.walk(f);
                right.walk(f);
            }
            ExprKind::Unary { operand, .. } => operand.walk(f),
            ExprKind::Ternary {
                cond,
                then_branch,
                else_branch,
            } => {
                cond.walk(f);
                then_branch.walk(f);
                else_branch.walk(f);
            }
            ExprKind::Call { args, .. } => {
                for arg in args {
                    arg.walk(f);
                }
            }
            ExprKind::Template(parts) => {
                for part in parts {
                    if let TemplatePart::Expr(expr) = part {
                        expr.walk(f);
                    }
                }
            }
        }
    }

    /// Free identifiers referenced by this expression, in first-use order,
    /// without duplicates and without reserved globals. Function names are
    /// not identifiers.
    pub fn dependencies(&self) -> Vec<EcoString> {
        let mut deps: Vec<EcoString> = Vec::new();
        self.walk(&mut |node| {
            if let ExprKind::Ident(name) = &node.kind {
                if !crate::is_reserved_global(name) && !deps.contains(name) {
                    deps.push(name.clone());
                }
            }
        });
        deps
    }

    /// Nesting depth of the tree; a leaf has depth 1.
    #[cfg(test)]
    pub(crate) fn depth(&self) -> usize {
        let mut max_child = 0;
        match &self.kind {
            ExprKind::Number(_) | ExprKind::Bool(_) | ExprKind::Str(_) | ExprKind::Ident(_) => {}
            ExprKind::Vector { x, y } => max_child = x.depth().max(y.depth()),
            ExprKind::Member { object, .. } => max_child = object.depth(),
            ExprKind::Binary { left, right, .. } => max_child = left.depth().max(right.depth()),
            ExprKind::Unary { operand, .. } => max_child = operand.depth(),
            ExprKind::Ternary {
                cond,
                then_branch,
                else_branch,
            } => {
                max_child = cond
                    .depth()
                    .max(then_branch.depth())
                    .max(else_branch.depth())
            }
            ExprKind::Call { args, .. } => {
                max_child = args.iter().map(Expr::depth).max().unwrap_or(0)
            }
            ExprKind::Template(parts) => {
                max_child = parts
                    .iter()
                    .filter_map(|p| match p {
                        TemplatePart::Expr(e) => Some(e.depth()),
                        TemplatePart::Text(_) => None,
                    })
                    .max()
                    .unwrap_or(0)
            }
        }
        max_child + 1
    }
}

/// Fully parenthesized rendering, independent of the original spacing.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Number(n) => f.write_str(&format_number(*n)),
            ExprKind::Bool(b) => write!(f, "{}", b),
            ExprKind::Str(s) => write!(f, "{:?}", s.as_str()),
            ExprKind::Vector { x, y } => write!(f, "vec2({}, {})", x, y),
            ExprKind::Ident(name) => f.write_str(name),
            ExprKind::Member { object, property } => write!(f, "{}.{}", object, property),
            ExprKind::Binary { op, left, right } => write!(f, "({} {} {})", left, op, right),
            ExprKind::Unary { op, operand } => write!(f, "({}{})", op, operand),
            ExprKind::Ternary {
                cond,
                then_branch,
                else_branch,
            } => write!(f, "({} ? {} : {})", cond, then_branch, else_branch),
            ExprKind::Call { name, args, .. } => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(")")
            }
            ExprKind::Template(parts) => {
                f.write_str("`")?;
                for part in parts {
                    match part {
                        TemplatePart::Text(text) => {
                            for ch in text.chars() {
                                match ch {
                                    '`' | '$' | '\\' => write!(f, "\\{}", ch)?,
                                    '\n' => f.write_str("\\n")?,
                                    other => write!(f, "{}", other)?,
                                }
                            }
                        }
                        TemplatePart::Expr(expr) => write!(f, "${{{}}}", expr)?,
                    }
                }
                f.write_str("`")
            }
        }
    }
}
