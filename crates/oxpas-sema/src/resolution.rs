// resolution.rs
//
// Outcome of resolving one name or call.

use oxpas_identity::DeclId;

/// The tagged result of a resolution step.
///
/// `Unresolved` is not an error: the reference keeps the unknown type.
/// `Ambiguous` is fatal for the unit and is surfaced as
/// [`SemanticError::AmbiguousReference`](crate::errors::SemanticError).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(DeclId),
    Unresolved,
    Ambiguous(Vec<DeclId>),
}

impl Resolution {
    /// Classify a remaining candidate set.
    pub fn from_candidates(candidates: &[DeclId]) -> Self {
        match candidates {
            [] => Resolution::Unresolved,
            [single] => Resolution::Resolved(*single),
            many => Resolution::Ambiguous(many.to_vec()),
        }
    }

    pub fn declaration(&self) -> Option<DeclId> {
        match self {
            Resolution::Resolved(decl) => Some(*decl),
            _ => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Resolution::Ambiguous(_))
    }
}
