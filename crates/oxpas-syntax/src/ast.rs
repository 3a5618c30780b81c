// ast.rs
//
// Expression trees as the parser hands them to name resolution.

use oxpas_identity::{NodeId, Span};
use smallvec::SmallVec;

use crate::operators::{BinaryOp, UnaryOp};

#[derive(Debug, Clone)]
pub struct Expr {
    pub id: NodeId,
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    /// Returns true if this expression is a literal value
    pub fn is_literal(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::IntLiteral(..)
                | ExprKind::RealLiteral(..)
                | ExprKind::StringLiteral(..)
                | ExprKind::Nil
        )
    }

    /// The primary expression, if this is one.
    pub fn as_primary(&self) -> Option<&PrimaryExpr> {
        match &self.kind {
            ExprKind::Primary(primary) => Some(primary),
            _ => None,
        }
    }

    /// The name reference of a primary expression consisting of a single
    /// name and nothing else (`Foo`, `a.b.c`, `Foo<Integer>`).
    pub fn as_bare_name(&self) -> Option<&NameReference> {
        match self.as_primary()?.parts.as_slice() {
            [PrimaryPart::Name(name)] => Some(name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    IntLiteral(i128),
    RealLiteral(f64),
    /// Quoted text. A single character types as a char.
    StringLiteral(String),
    Nil,

    /// Name chains, calls, indexing, dereference, `inherited`, grouping.
    Primary(Box<PrimaryExpr>),

    Binary(Box<BinaryExpr>),
    Unary(Box<UnaryExpr>),

    /// Array constructor / set literal: `[1, 2, 3]`
    ArrayConstructor(Vec<Expr>),
}

/// A sequence of postfix parts read left to right.
///
/// `a.b(1)[2]^.c` is `[Name(a.b), Arguments(1), Index(2), Dereference, Name(c)]`.
#[derive(Debug, Clone)]
pub struct PrimaryExpr {
    pub parts: Vec<PrimaryPart>,
}

impl PrimaryExpr {
    pub fn starts_with_inherited(&self) -> bool {
        matches!(self.parts.first(), Some(PrimaryPart::Inherited(_)))
    }
}

#[derive(Debug, Clone)]
pub enum PrimaryPart {
    Name(NameReference),
    Arguments(ArgumentList),
    Index(ArgumentList),
    Dereference(Marker),
    /// `inherited`, optionally followed by a `Name` part.
    Inherited(Marker),
    Parenthesized(Box<Expr>),
}

impl PrimaryPart {
    pub fn id(&self) -> NodeId {
        match self {
            PrimaryPart::Name(name) => name.id,
            PrimaryPart::Arguments(args) | PrimaryPart::Index(args) => args.id,
            PrimaryPart::Dereference(marker) | PrimaryPart::Inherited(marker) => marker.id,
            PrimaryPart::Parenthesized(expr) => expr.id,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            PrimaryPart::Name(name) => name.span,
            PrimaryPart::Arguments(args) | PrimaryPart::Index(args) => args.span,
            PrimaryPart::Dereference(marker) | PrimaryPart::Inherited(marker) => marker.span,
            PrimaryPart::Parenthesized(expr) => expr.span,
        }
    }
}

/// A keyword or punctuation part with no payload.
#[derive(Debug, Clone, Copy)]
pub struct Marker {
    pub id: NodeId,
    pub span: Span,
}

/// Dotted chain of identifiers, each optionally carrying generic arguments.
#[derive(Debug, Clone)]
pub struct NameReference {
    pub id: NodeId,
    pub span: Span,
    pub segments: SmallVec<[NameSegment; 2]>,
}

impl NameReference {
    /// The full dotted image, without generic arguments.
    pub fn image(&self) -> String {
        self.segments
            .iter()
            .map(|segment| segment.ident.as_str())
            .collect::<Vec<_>>()
            .join(".")
    }

    pub fn last(&self) -> Option<&NameSegment> {
        self.segments.last()
    }
}

#[derive(Debug, Clone)]
pub struct NameSegment {
    pub id: NodeId,
    pub span: Span,
    pub ident: String,
    /// `Foo<Integer, string>`; None when no angle brackets were written.
    pub type_args: Option<Vec<NameReference>>,
}

impl NameSegment {
    pub fn is_generic(&self) -> bool {
        self.type_args.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct ArgumentList {
    pub id: NodeId,
    pub span: Span,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone)]
pub struct BinaryExpr {
    pub left: Expr,
    pub op: BinaryOp,
    pub right: Expr,
}

#[derive(Debug, Clone)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub operand: Expr,
}
