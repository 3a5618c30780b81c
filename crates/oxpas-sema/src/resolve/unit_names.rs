// resolve/unit_names.rs
//
// Retrying a failed chain as a reference qualified by a dotted unit name
// (`System.SysUtils.Format`).

use oxpas_identity::{DeclId, QualifiedName};
use oxpas_syntax::NameReference;

use crate::errors::SemanticError;
use crate::occurrence::NameOccurrence;
use crate::symbols::DeclKind;

use super::{NameResolver, ResolveCx};

impl NameResolver {
    /// Match the leading segments against the unit's own name and its
    /// imports, longest name first, then read the rest of the chain from
    /// the matched unit. `self` is the state before the failed attempt.
    ///
    /// Returns the resolver of the first retry that resolves completely.
    pub(super) fn read_possible_unit_name(
        self,
        cx: &mut ResolveCx<'_>,
        name: &NameReference,
    ) -> Result<Option<NameResolver>, SemanticError> {
        let Some(file) = cx
            .symbols
            .file_scope_of(self.site)
            .and_then(|scope| cx.symbols.scope(scope).as_file())
        else {
            return Ok(None);
        };

        let mut units: Vec<(DeclId, QualifiedName)> = file
            .unit_decl
            .into_iter()
            .chain(file.imports.iter().copied())
            .filter_map(|decl| match &cx.symbols.decl(decl).kind {
                DeclKind::Unit { name, .. } | DeclKind::UnitImport { name, .. } => {
                    Some((decl, name.clone()))
                }
                _ => None,
            })
            .collect();
        // Reverse alphabetical order puts `A.B.C` ahead of its prefix `A.B`
        units.sort_by_key(|(_, unit)| std::cmp::Reverse(unit.image().to_ascii_lowercase()));

        let parts: Vec<&str> = name.segments.iter().map(|s| s.ident.as_str()).collect();
        for (decl, unit) in units {
            let len = unit.len();
            if len == 0 || len > parts.len() || !unit.matches(&parts[..len]) {
                continue;
            }
            let matched = &name.segments[..len];
            if matched.iter().any(|s| s.is_generic()) {
                continue;
            }
            let span = matched
                .iter()
                .skip(1)
                .fold(matched[0].span, |span, s| span.merge(s.span));

            let mut resolver = self.clone();
            resolver.add_name(NameOccurrence::new(
                matched[len - 1].id,
                span,
                &parts[..len].join("."),
                self.site,
            ));
            resolver.declarations = vec![decl];
            resolver.add_resolved(cx)?;
            resolver.read_name_segments(cx, &name.segments[len..])?;

            if !resolver.name_resolution_failed() {
                tracing::trace!(unit = %unit, "resolved through unit name");
                return Ok(Some(resolver));
            }
        }
        Ok(None)
    }
}
