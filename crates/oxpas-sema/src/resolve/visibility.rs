// resolve/visibility.rs
//
// Whether a method is visible from the method a reference is written in.

use oxpas_identity::DeclId;

use crate::symbols::Visibility;
use crate::type_arena::{TypeArena, TypeId};

use super::{NameResolver, ResolveCx};

/// Method visibility between the type a reference is written in (`from`)
/// and the type declaring the method (`to`).
///
/// | relation                        | same unit | visible iff                              |
/// |---------------------------------|-----------|------------------------------------------|
/// | `from` is `to`                  | either    | always                                   |
/// | `from` descends from `to`       | yes       | not strict private                       |
/// | `from` descends from `to`       | no        | not private                              |
/// | `from` is a helper of `to`      | either    | not private                              |
/// | unrelated                       | yes       | not strict private, not strict protected |
/// | unrelated                       | no        | public or published                      |
pub fn is_method_visible_from(
    types: &TypeArena,
    from: TypeId,
    to: TypeId,
    visibility: Visibility,
    same_unit: bool,
) -> bool {
    if !from.is_unknown() && !to.is_unknown() {
        if types.is_same(from, to) {
            return true;
        }
        if types.is_subtype_of(from, to) {
            return if same_unit {
                !visibility.is_strict_private()
            } else {
                !visibility.is_private()
            };
        }
        if let Some(extended) = types.extended_type(from)
            && types.subtype_distance(extended, to).is_some()
        {
            return !visibility.is_private();
        }
    }
    if same_unit {
        !visibility.is_strict_private() && !visibility.is_strict_protected()
    } else {
        visibility.is_public_or_published()
    }
}

impl NameResolver {
    /// Only methods are subject to visibility, and only when the reference
    /// is written inside a method.
    pub(super) fn is_visible_declaration(&self, cx: &ResolveCx<'_>, id: DeclId) -> bool {
        let symbols = &*cx.symbols;
        let types = &*cx.types;
        let decl = symbols.decl(id);
        if !decl.is_routine() {
            return true;
        }
        let Some(from_scope) = symbols.enclosing_method_scope(self.site) else {
            return true;
        };

        let from_type = symbols
            .method_scope_type(from_scope)
            .unwrap_or(TypeId::UNKNOWN);
        let to_type = decl.declaring_type().unwrap_or(TypeId::UNKNOWN);

        let current_file = symbols.file_scope_of(from_scope);
        let method_file = symbols.file_scope_of(decl.scope);
        let type_file = types
            .extract_scoped_type(self.current_type)
            .and_then(|scoped| types.type_scope(scoped))
            .and_then(|scope| symbols.file_scope_of(scope));
        let same_unit =
            current_file == method_file || (type_file.is_some() && current_file == type_file);

        is_method_visible_from(types, from_type, to_type, decl.visibility, same_unit)
    }
}
