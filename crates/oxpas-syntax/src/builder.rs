// builder.rs
//
// Programmatic construction of expression trees with fresh node ids.

use oxpas_identity::{NodeId, Span};
use smallvec::SmallVec;

use crate::ast::*;
use crate::operators::{BinaryOp, UnaryOp};

/// Allocates node ids and synthetic spans while building expressions.
///
/// The tree layer owns parsing; this builder is what a parser (or a test)
/// uses to produce nodes with unique ids.
#[derive(Debug, Default)]
pub struct AstBuilder {
    next_id: u32,
    offset: usize,
}

impl AstBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> NodeId {
        let id = NodeId::new(self.next_id);
        self.next_id += 1;
        id
    }

    fn span(&mut self, width: usize) -> Span {
        let start = self.offset;
        self.offset += width.max(1) + 1;
        Span::new(start, start + width.max(1), 1, start as u32 + 1)
    }

    fn expr(&mut self, kind: ExprKind, width: usize) -> Expr {
        Expr {
            id: self.next_id(),
            span: self.span(width),
            kind,
        }
    }

    pub fn int(&mut self, value: i128) -> Expr {
        self.expr(ExprKind::IntLiteral(value), value.to_string().len())
    }

    pub fn real(&mut self, value: f64) -> Expr {
        self.expr(ExprKind::RealLiteral(value), value.to_string().len())
    }

    pub fn string(&mut self, value: &str) -> Expr {
        self.expr(ExprKind::StringLiteral(value.to_string()), value.len() + 2)
    }

    pub fn nil(&mut self) -> Expr {
        self.expr(ExprKind::Nil, 3)
    }

    /// A dotted name reference; segments may carry `<..>` generic arguments,
    /// e.g. `"TList<Integer>.Create"`.
    pub fn name_ref(&mut self, image: &str) -> NameReference {
        let id = self.next_id();
        let start = self.offset;
        let mut segments = SmallVec::new();
        for piece in split_segments(image) {
            let (ident, type_args) = match piece.find('<') {
                Some(open) => {
                    let inner = &piece[open + 1..piece.len() - 1];
                    let args = split_top_level(inner, ',')
                        .into_iter()
                        .map(|arg| self.name_ref(arg.trim()))
                        .collect();
                    (&piece[..open], Some(args))
                }
                None => (piece, None),
            };
            segments.push(NameSegment {
                id: self.next_id(),
                span: self.span(ident.len()),
                ident: ident.to_string(),
                type_args,
            });
        }
        let end = self.offset.saturating_sub(1).max(start + 1);
        NameReference {
            id,
            span: Span::new(start, end, 1, start as u32 + 1),
            segments,
        }
    }

    pub fn name_part(&mut self, image: &str) -> PrimaryPart {
        PrimaryPart::Name(self.name_ref(image))
    }

    pub fn args_part(&mut self, args: Vec<Expr>) -> PrimaryPart {
        PrimaryPart::Arguments(ArgumentList {
            id: self.next_id(),
            span: self.span(2),
            args,
        })
    }

    pub fn index_part(&mut self, args: Vec<Expr>) -> PrimaryPart {
        PrimaryPart::Index(ArgumentList {
            id: self.next_id(),
            span: self.span(2),
            args,
        })
    }

    pub fn deref_part(&mut self) -> PrimaryPart {
        PrimaryPart::Dereference(Marker {
            id: self.next_id(),
            span: self.span(1),
        })
    }

    pub fn inherited_part(&mut self) -> PrimaryPart {
        PrimaryPart::Inherited(Marker {
            id: self.next_id(),
            span: self.span(9),
        })
    }

    pub fn paren_part(&mut self, inner: Expr) -> PrimaryPart {
        PrimaryPart::Parenthesized(Box::new(inner))
    }

    pub fn primary(&mut self, parts: Vec<PrimaryPart>) -> Expr {
        let span = parts
            .iter()
            .map(PrimaryPart::span)
            .reduce(Span::merge)
            .unwrap_or_default();
        Expr {
            id: self.next_id(),
            span,
            kind: ExprKind::Primary(Box::new(PrimaryExpr { parts })),
        }
    }

    /// `a.b.c` as a whole expression.
    pub fn path(&mut self, image: &str) -> Expr {
        let part = self.name_part(image);
        self.primary(vec![part])
    }

    /// `Foo(args)` as a whole expression.
    pub fn call(&mut self, image: &str, args: Vec<Expr>) -> Expr {
        let name = self.name_part(image);
        let args = self.args_part(args);
        self.primary(vec![name, args])
    }

    /// `(inner)` as a whole expression.
    pub fn paren(&mut self, inner: Expr) -> Expr {
        let part = self.paren_part(inner);
        self.primary(vec![part])
    }

    pub fn binary(&mut self, left: Expr, op: BinaryOp, right: Expr) -> Expr {
        let span = left.span.merge(right.span);
        Expr {
            id: self.next_id(),
            span,
            kind: ExprKind::Binary(Box::new(BinaryExpr { left, op, right })),
        }
    }

    pub fn unary(&mut self, op: UnaryOp, operand: Expr) -> Expr {
        let span = operand.span;
        Expr {
            id: self.next_id(),
            span,
            kind: ExprKind::Unary(Box::new(UnaryExpr { op, operand })),
        }
    }

    pub fn array(&mut self, elements: Vec<Expr>) -> Expr {
        self.expr(ExprKind::ArrayConstructor(elements), 2)
    }
}

/// Split on dots that are not inside angle brackets.
fn split_segments(image: &str) -> Vec<&str> {
    split_top_level(image, '.')
}

fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            c if c == separator && depth == 0 => {
                pieces.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    pieces.push(&text[start..]);
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_ref_splits_segments_and_generic_args() {
        let mut b = AstBuilder::new();
        let name = b.name_ref("Generics.TList<Integer, TPair<A, B>>.Create");
        let idents: Vec<_> = name.segments.iter().map(|s| s.ident.as_str()).collect();
        assert_eq!(idents, ["Generics", "TList", "Create"]);
        let args = name.segments[1].type_args.as_ref().unwrap();
        assert_eq!(args.len(), 2);
        assert_eq!(args[1].image(), "TPair");
        assert_eq!(args[1].segments[0].type_args.as_ref().unwrap().len(), 2);
        assert!(!name.segments[0].is_generic());
    }

    #[test]
    fn node_ids_are_unique() {
        let mut b = AstBuilder::new();
        let one = b.int(1);
        let call = b.call("Foo", vec![one]);
        let ExprKind::Primary(primary) = &call.kind else {
            panic!("expected primary");
        };
        let mut ids = vec![call.id];
        ids.extend(primary.parts.iter().map(PrimaryPart::id));
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 3);
        assert!(call.as_bare_name().is_none());
    }
}
