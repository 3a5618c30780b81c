// resolve/primary.rs
//
// Reading primary expressions part by part: name links, argument lists,
// indexers, dereferences, `inherited` and parenthesized heads.

use oxpas_identity::{DeclId, ScopeId};
use oxpas_syntax::{
    ArgumentList, Expr, ExprKind, Marker, NameReference, NameSegment, PrimaryExpr, PrimaryPart,
    UnaryOp,
};

use crate::errors::SemanticError;
use crate::invocation::{Invocable, InvocationCandidate, InvocationResolver};
use crate::occurrence::NameOccurrence;
use crate::symbols::{DeclKind, ReturnSpec};
use crate::type_arena::{SemaType, Substitutions, TypeId};

use super::{NameResolver, ResolveCx, resolve_expression};

impl NameResolver {
    pub(crate) fn read_primary(
        &mut self,
        cx: &mut ResolveCx<'_>,
        primary: &PrimaryExpr,
    ) -> Result<(), SemanticError> {
        let mut start = 0;
        if let Some(PrimaryPart::Inherited(marker)) = primary.parts.first() {
            let name = match primary.parts.get(1) {
                Some(PrimaryPart::Name(name)) => Some(name),
                _ => None,
            };
            self.read_inherited(cx, *marker, name)?;
            start = if name.is_some() { 2 } else { 1 };
        }

        for (index, part) in primary.parts.iter().enumerate().skip(start) {
            if self.name_resolution_failed() {
                // Arguments of an unresolved call still reference things
                return resolve_orphan_arguments(cx, &primary.parts[index..]);
            }
            self.read_part(cx, part)?;
        }
        Ok(())
    }

    fn read_part(
        &mut self,
        cx: &mut ResolveCx<'_>,
        part: &PrimaryPart,
    ) -> Result<(), SemanticError> {
        match part {
            PrimaryPart::Name(name) => {
                self.commit_pending(cx)?;
                self.read_name_reference(cx, name)
            }
            PrimaryPart::Arguments(list) => self.disambiguate_arguments(cx, &list.args, true),
            PrimaryPart::Index(list) => self.read_array_accessor(cx, list),
            PrimaryPart::Dereference(_) => self.read_dereference(cx),
            PrimaryPart::Parenthesized(inner) => {
                self.commit_pending(cx)?;
                let ty = resolve_expression(cx, inner, None)?;
                self.update_type(cx, ty);
                Ok(())
            }
            // Only meaningful as the first part
            PrimaryPart::Inherited(_) => Ok(()),
        }
    }

    /// Settle the pending candidates before moving past them: routines are
    /// invoked with an empty argument list, anything else is committed.
    fn commit_pending(&mut self, cx: &mut ResolveCx<'_>) -> Result<(), SemanticError> {
        if self.declarations.is_empty() {
            return Ok(());
        }
        self.disambiguate_implicit_empty_argument_list(cx)?;
        self.add_resolved(cx)?;
        Ok(())
    }

    pub(crate) fn disambiguate_implicit_empty_argument_list(
        &mut self,
        cx: &mut ResolveCx<'_>,
    ) -> Result<(), SemanticError> {
        let any_routine = self
            .declarations
            .iter()
            .any(|&d| cx.symbols.decl(d).is_routine());
        if any_routine {
            self.disambiguate_arguments(cx, &[], false)?;
        }
        Ok(())
    }

    // ========================================================================
    // Names
    // ========================================================================

    pub(crate) fn read_name_reference(
        &mut self,
        cx: &mut ResolveCx<'_>,
        name: &NameReference,
    ) -> Result<(), SemanticError> {
        let could_be_unit = self.current_scope.is_none_or(|scope| scope == self.site);
        let before = could_be_unit.then(|| self.clone());

        self.read_name_segments(cx, &name.segments)?;

        if self.name_resolution_failed()
            && let Some(before) = before
            && let Some(resolver) = before.read_possible_unit_name(cx, name)?
        {
            *self = resolver;
        }
        Ok(())
    }

    /// Resolve each segment against the scope the previous one led to.
    /// Stops at the first segment without candidates.
    pub(super) fn read_name_segments(
        &mut self,
        cx: &mut ResolveCx<'_>,
        segments: &[NameSegment],
    ) -> Result<(), SemanticError> {
        for (index, segment) in segments.iter().enumerate() {
            if self.is_explicit_array_constructor(cx, segment) {
                // `TBytes.Create(..)` builds the array itself
                if let Some(array) = cx.types.class_of(self.current_type) {
                    self.update_type(cx, array);
                }
                return Ok(());
            }

            let occurrence = self.create_occurrence(cx, segment)?;
            self.add_name(occurrence);
            self.search_for_declaration(cx);
            self.specialize_declarations(cx);
            self.disambiguate_is_callable(cx.symbols);
            self.disambiguate_visibility(cx);

            if self.declarations.is_empty() {
                tracing::trace!(name = %segment.ident, "no candidates");
                return Ok(());
            }
            if index + 1 < segments.len() {
                self.disambiguate_implicit_empty_argument_list(cx)?;
                self.add_resolved(cx)?;
            }
        }
        Ok(())
    }

    fn is_explicit_array_constructor(&self, cx: &ResolveCx<'_>, segment: &NameSegment) -> bool {
        let Some(&last) = self.resolved.last() else {
            return false;
        };
        matches!(cx.symbols.decl(last).kind, DeclKind::Type { .. })
            && cx
                .types
                .class_of(self.current_type)
                .is_some_and(|ty| cx.types.is_dynamic_array(ty))
            && segment.ident.eq_ignore_ascii_case("Create")
    }

    fn create_occurrence(
        &self,
        cx: &mut ResolveCx<'_>,
        segment: &NameSegment,
    ) -> Result<NameOccurrence, SemanticError> {
        let mut occurrence =
            NameOccurrence::new(segment.id, segment.span, &segment.ident, self.site);
        if let Some(type_args) = &segment.type_args {
            let mut resolved = Vec::with_capacity(type_args.len());
            for arg in type_args {
                resolved.push(Self::resolve_type_reference(cx, self.site, arg)?);
            }
            occurrence.type_arguments = Some(resolved);
        }
        Ok(occurrence)
    }

    /// Resolve a name used as a type (a generic argument) on its own
    /// resolver. Yields the named type, not its class reference.
    pub(super) fn resolve_type_reference(
        cx: &mut ResolveCx<'_>,
        site: ScopeId,
        name: &NameReference,
    ) -> Result<TypeId, SemanticError> {
        let mut resolver = NameResolver::new(site);
        resolver.read_name_reference(cx, name)?;
        resolver.commit(cx)?;
        let ty = resolver.approximate_type(cx);
        let ty = cx.types.class_of(ty).unwrap_or(ty);
        if cx.record {
            cx.nodes.set_type(name.id, ty);
        }
        Ok(ty)
    }

    /// Bind explicit generic arguments to the type parameters of every
    /// candidate declaring the same number of them.
    fn specialize_declarations(&mut self, cx: &ResolveCx<'_>) {
        let Some(args) = self.names.last().and_then(|n| n.type_arguments.clone()) else {
            return;
        };
        for &decl in &self.declarations {
            let params = cx.symbols.decl(decl).type_params();
            if params.len() != args.len() {
                continue;
            }
            let subs: Substitutions = params
                .iter()
                .zip(&args)
                .filter_map(|(&param, &arg)| cx.symbols.decl(param).ty().map(|ty| (ty, arg)))
                .collect();
            self.explicit_subs.insert(decl, subs);
        }
    }

    // ========================================================================
    // Invocation
    // ========================================================================

    /// Pick the invocable among the pending candidates that takes `args`.
    ///
    /// `explicit` is false for the empty argument list implied by a bare
    /// routine name.
    pub(super) fn disambiguate_arguments(
        &mut self,
        cx: &mut ResolveCx<'_>,
        args: &[Expr],
        explicit: bool,
    ) -> Result<(), SemanticError> {
        if self.handle_hard_cast(cx, args)? || self.handle_procedural_invocation(cx, args)? {
            return Ok(());
        }
        if self.declarations.is_empty() {
            return resolve_loose_arguments(cx, args);
        }

        self.disambiguate_invocable(cx.symbols);
        self.disambiguate_arity(cx.symbols, args.len());

        // Bare routine names are typed by their signature until the callee
        // is known, then resolved against the matching parameter.
        let mut arg_types = Vec::with_capacity(args.len());
        let mut deferred = Vec::new();
        for (index, arg) in args.iter().enumerate() {
            match self.routine_argument_type(cx, arg)? {
                Some(ty) => {
                    arg_types.push(ty);
                    deferred.push(index);
                }
                None => arg_types.push(resolve_expression(cx, arg, None)?),
            }
        }

        let mut resolver = InvocationResolver::new();
        for &decl in &self.declarations {
            let subs = self.substitutions_for(decl);
            resolver.add_candidate(InvocationCandidate::for_declaration(
                cx.types,
                decl,
                cx.symbols.decl(decl),
                &arg_types,
                subs.as_ref(),
            ));
        }
        resolver.process_candidates(cx.types, &arg_types);
        let best = resolver.choose_best();

        self.declarations = best.iter().filter_map(|c| c.invocable.declaration()).collect();
        self.disambiguate_distance_from_call_site(cx);
        self.disambiguate_regular_over_implicit(cx.symbols);

        let chosen = match self.declarations.as_slice() {
            [single] => best
                .into_iter()
                .find(|c| c.invocable == Invocable::Declaration(*single)),
            _ => None,
        };
        if explicit && let Some(name) = self.names.last_mut() {
            name.explicit_invocation = true;
        }
        let committed = self.add_resolved(cx)?;

        for index in deferred {
            let expected = chosen
                .as_ref()
                .and_then(|c| c.params.get(index))
                .map(|p| p.ty);
            arg_types[index] = resolve_expression(cx, &args[index], expected)?;
        }

        let Some(decl) = committed else {
            tracing::debug!(args = args.len(), "no invocable matches the arguments");
            return Ok(());
        };
        let decl = cx.symbols.decl(decl);
        if decl.is_constructor() {
            return Ok(());
        }
        let ret = match decl.return_spec() {
            ReturnSpec::Fixed(_) => chosen.map(|c| c.ret).unwrap_or(TypeId::UNKNOWN),
            spec => spec.evaluate(cx.types, &arg_types),
        };
        self.update_type(cx, ret);
        Ok(())
    }

    /// The signature of the first routine a bare name (or `@name`) argument
    /// denotes, found without recording anything. None for anything else.
    fn routine_argument_type(
        &self,
        cx: &mut ResolveCx<'_>,
        arg: &Expr,
    ) -> Result<Option<TypeId>, SemanticError> {
        let name = match &arg.kind {
            ExprKind::Unary(unary) if unary.op == UnaryOp::AddressOf => {
                unary.operand.as_bare_name()
            }
            _ => arg.as_bare_name(),
        };
        let Some(name) = name else {
            return Ok(None);
        };
        let mut speculative = cx.speculative();
        let mut resolver = NameResolver::new(self.site);
        if resolver.read_name_reference(&mut speculative, name).is_err()
            || !resolver.has_pending_routines(speculative.symbols)
        {
            return Ok(None);
        }
        Ok(resolver
            .declarations
            .first()
            .and_then(|&d| speculative.symbols.decl(d).ty()))
    }

    /// `TFoo(x)`: a type identifier applied to one argument is a cast.
    fn handle_hard_cast(
        &mut self,
        cx: &mut ResolveCx<'_>,
        args: &[Expr],
    ) -> Result<bool, SemanticError> {
        if args.len() == 1
            && let [decl] = self.declarations.as_slice()
            && cx.symbols.decl(*decl).is_type_identifier()
        {
            self.add_resolved(cx)?;
        }
        if !self.declarations.is_empty() || args.len() != 1 {
            return Ok(false);
        }
        let Some(target) = cx.types.class_of(self.current_type) else {
            return Ok(false);
        };
        resolve_loose_arguments(cx, args)?;
        self.update_type(cx, target);
        Ok(true)
    }

    /// Calling a variable or property of procedural type, or the procedural
    /// value the chain produced so far.
    fn handle_procedural_invocation(
        &mut self,
        cx: &mut ResolveCx<'_>,
        args: &[Expr],
    ) -> Result<bool, SemanticError> {
        let callee = match self.declarations.as_slice() {
            [decl] => match &cx.symbols.decl(*decl).kind {
                DeclKind::Variable { ty, .. } => Some(*ty),
                DeclKind::Property(property) if !property.is_array_property() => Some(property.ty),
                _ => None,
            },
            [] => Some(self.current_type),
            _ => None,
        };
        let Some(signature) = callee.and_then(|ty| cx.types.procedural_type(ty)).cloned() else {
            return Ok(false);
        };

        if let Some(name) = self.names.last_mut()
            && !self.declarations.is_empty()
        {
            name.explicit_invocation = true;
        }
        self.add_resolved(cx)?;
        for (index, arg) in args.iter().enumerate() {
            let expected = signature.params.get(index).map(|p| p.ty);
            resolve_expression(cx, arg, expected)?;
        }
        self.update_type(cx, signature.ret);
        Ok(true)
    }

    // ========================================================================
    // Indexing and dereference
    // ========================================================================

    fn read_array_accessor(
        &mut self,
        cx: &mut ResolveCx<'_>,
        list: &ArgumentList,
    ) -> Result<(), SemanticError> {
        let array_property = !self.declarations.is_empty()
            && self.declarations.iter().all(|&d| {
                cx.symbols
                    .decl(d)
                    .property()
                    .is_some_and(|p| p.is_array_property())
            });
        if array_property {
            return self.disambiguate_arguments(cx, &list.args, true);
        }
        self.commit_pending(cx)?;

        let mut ty = self.current_type;
        let mut indexes = list.args.len();
        if let Some(target) = cx.types.pointer_target(ty) {
            ty = target;
            // `P[i]` on a plain pointer indexes the pointer itself
            let indexable = cx.types.is_array(target)
                || cx.types.is_string(target)
                || cx.types.is_struct(target);
            if !indexable {
                indexes = indexes.saturating_sub(1);
            }
        }

        if indexes > 0 && cx.types.is_struct(ty) {
            let properties = cx.symbols.default_array_properties(cx.types, ty);
            if !properties.is_empty() {
                return self.read_default_array_property(cx, list, ty, properties);
            }
        }

        resolve_loose_arguments(cx, &list.args)?;
        for _ in 0..indexes {
            ty = index_type(cx, ty);
        }
        self.update_type(cx, ty);
        Ok(())
    }

    /// `obj[i]` through the default indexed property of `obj`'s type. The
    /// property is resolved on its own resolver and recorded as an implicit
    /// reference at the indexer.
    fn read_default_array_property(
        &mut self,
        cx: &mut ResolveCx<'_>,
        list: &ArgumentList,
        ty: TypeId,
        properties: Vec<DeclId>,
    ) -> Result<(), SemanticError> {
        let image = cx.symbols.decl(properties[0]).image.clone();
        let mut resolver = NameResolver::new(self.site);
        resolver.update_type(cx, ty);
        resolver.names.push(NameOccurrence::new(list.id, list.span, &image, self.site));
        resolver.declarations = properties;
        resolver.disambiguate_arguments(cx, &list.args, true)?;

        match resolver.resolved.first() {
            Some(&property) => {
                let occurrence = resolver.names[0].clone();
                Self::record_bound(cx, occurrence, property);
                self.current_type = resolver.current_type;
                self.current_scope = resolver.current_scope;
            }
            None => self.update_type(cx, TypeId::UNKNOWN),
        }
        Ok(())
    }

    fn read_dereference(&mut self, cx: &mut ResolveCx<'_>) -> Result<(), SemanticError> {
        self.commit_pending(cx)?;
        let target = cx
            .types
            .pointer_target(self.current_type)
            .unwrap_or(TypeId::UNKNOWN);
        self.update_type(cx, target);
        Ok(())
    }

    // ========================================================================
    // inherited
    // ========================================================================

    /// `inherited` searches from the super type of the type whose method
    /// encloses the reference, skipping helpers. Inside a helper it searches
    /// the extended type; a bare `inherited` there goes one step further up.
    fn read_inherited(
        &mut self,
        cx: &mut ResolveCx<'_>,
        marker: Marker,
        name: Option<&NameReference>,
    ) -> Result<(), SemanticError> {
        let method_scope = cx.symbols.enclosing_method_scope(self.site);
        let routine = method_scope.and_then(|scope| cx.symbols.method_scope_routine(scope));
        let target = method_scope
            .and_then(|scope| cx.symbols.method_scope_type(scope))
            .and_then(|ty| match cx.types.extended_type(ty) {
                Some(extended) if name.is_some() => Some(extended),
                Some(extended) => cx.types.super_type(extended),
                None => cx.types.super_type(ty),
            });

        let Some(target) = target else {
            tracing::debug!("inherited outside of a method with a super type");
            let image = name.map(NameReference::image).unwrap_or_else(|| "inherited".to_string());
            self.add_name(NameOccurrence::new(marker.id, marker.span, &image, self.site));
            return Ok(());
        };
        self.update_type(cx, target);
        self.skip_helpers = true;

        if let Some(name) = name {
            return self.read_name_segments(cx, &name.segments);
        }

        let Some(routine) = routine else {
            self.add_name(NameOccurrence::new(marker.id, marker.span, "inherited", self.site));
            return Ok(());
        };
        let decl = cx.symbols.decl(routine);
        let image = decl.image.clone();
        let params: Vec<TypeId> = decl.params().iter().map(|p| p.ty).collect();

        let mut occurrence = NameOccurrence::new(marker.id, marker.span, &image, self.site);
        occurrence.explicit_invocation = true;
        self.add_name(occurrence);
        self.search_for_declaration(cx);
        self.disambiguate_is_callable(cx.symbols);
        self.disambiguate_visibility(cx);
        self.disambiguate_parameters(cx, &params);

        if let Some(resolved) = self.add_resolved(cx)?
            && !cx.symbols.decl(resolved).is_constructor()
        {
            let ret = cx.symbols.decl(resolved).return_spec().declared();
            self.update_type(cx, ret);
        }
        Ok(())
    }
}

/// Element type reached by one index: array elements, string chars.
fn index_type(cx: &ResolveCx<'_>, ty: TypeId) -> TypeId {
    if let Some(element) = cx.types.element_type(ty)
        && cx.types.is_array(ty)
    {
        return element;
    }
    match cx.types.get(cx.types.skip_alias(ty)) {
        SemaType::String(kind) => kind.char_type(),
        SemaType::Variant => TypeId::VARIANT,
        SemaType::Pointer(pointer) => pointer.target,
        _ => TypeId::UNKNOWN,
    }
}

/// Resolve argument expressions with nothing to match them against.
fn resolve_loose_arguments(cx: &mut ResolveCx<'_>, args: &[Expr]) -> Result<(), SemanticError> {
    for arg in args {
        resolve_expression(cx, arg, None)?;
    }
    Ok(())
}

fn resolve_orphan_arguments(
    cx: &mut ResolveCx<'_>,
    parts: &[PrimaryPart],
) -> Result<(), SemanticError> {
    for part in parts {
        if let PrimaryPart::Arguments(list) | PrimaryPart::Index(list) = part {
            resolve_loose_arguments(cx, &list.args)?;
        }
    }
    Ok(())
}
