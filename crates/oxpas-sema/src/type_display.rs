//! Type display utilities for formatting types in error messages.

use oxpas_identity::DeclId;

use crate::symbols::SymbolTable;
use crate::type_arena::{
    ArrayKind, MatcherKind, ProceduralKind, SemaType, StringKind, TypeArena, TypeId,
};

/// Display a TypeId in source-like syntax.
pub fn display_type_id(type_id: TypeId, arena: &TypeArena) -> String {
    display_sema_type(type_id, arena, 0)
}

/// A routine or property as `Name(Type, Type): Result`, used to list tied
/// candidates.
pub fn display_signature(decl: DeclId, symbols: &SymbolTable, arena: &TypeArena) -> String {
    let decl = symbols.decl(decl);
    let params: Vec<String> = decl
        .params()
        .iter()
        .map(|p| display_type_id(p.ty, arena))
        .collect();
    let mut out = format!("{}({})", decl.qualified_name, params.join(", "));
    let ret = decl.return_spec().declared();
    if decl.is_routine() && !ret.is_void() && !ret.is_untyped() {
        out.push_str(": ");
        out.push_str(&display_type_id(ret, arena));
    }
    out
}

fn display_sema_type(type_id: TypeId, arena: &TypeArena, depth: usize) -> String {
    if depth > 16 {
        return "...".to_string();
    }
    let nested = |id: TypeId| display_sema_type(id, arena, depth + 1);
    match arena.get(type_id) {
        SemaType::Unknown => "<unknown>".to_string(),
        SemaType::Void => "<void>".to_string(),
        SemaType::Untyped => "<untyped>".to_string(),
        SemaType::Nil => "nil".to_string(),
        SemaType::Integer(int) => int.kind.name().to_string(),
        SemaType::Real(real) => format!("{:?}", real.kind),
        SemaType::Boolean(kind) => format!("{kind:?}"),
        SemaType::Char(kind) => format!("{kind:?}Char"),
        SemaType::String(kind) => match kind {
            StringKind::Ansi => "AnsiString",
            StringKind::Unicode => "string",
            StringKind::Short => "ShortString",
            StringKind::Wide => "WideString",
        }
        .to_string(),
        SemaType::Variant => "Variant".to_string(),
        SemaType::Enumeration(e) => e.name.clone(),
        SemaType::Set(element) => format!("set of {}", nested(*element)),
        SemaType::Array(array) => match (&array.name, array.kind) {
            (Some(name), _) => name.clone(),
            (None, ArrayKind::Static) => format!("array[] of {}", nested(array.element)),
            (None, _) => format!("array of {}", nested(array.element)),
        },
        SemaType::ArrayConstructor(elements) => {
            let parts: Vec<String> = elements.iter().map(|&e| nested(e)).collect();
            format!("[{}]", parts.join(", "))
        }
        SemaType::Pointer(p) => match &p.name {
            Some(name) => name.clone(),
            None => format!("^{}", nested(p.target)),
        },
        SemaType::Procedural(p) => {
            let params: Vec<String> = p.params.iter().map(|param| nested(param.ty)).collect();
            let head = if p.ret.is_void() { "procedure" } else { "function" };
            let mut out = format!("{head}({})", params.join(", "));
            if !p.ret.is_void() {
                out.push_str(&format!(": {}", nested(p.ret)));
            }
            match p.kind {
                ProceduralKind::Method => out.push_str(" of object"),
                ProceduralKind::Reference => out = format!("reference to {out}"),
                ProceduralKind::Procedure | ProceduralKind::Routine => {}
            }
            out
        }
        SemaType::ClassReference(class) => format!("class of {}", nested(*class)),
        SemaType::Struct(s) => s.name.clone(),
        SemaType::Helper(h) => h.name.clone(),
        SemaType::TypeParameter(p) => p.name.clone(),
        SemaType::Alias(alias) => alias.name.clone(),
        SemaType::Forward(f) => f.name.clone(),
        SemaType::Matcher(matcher) => match matcher {
            MatcherKind::AnyOrdinal => "<ordinal>",
            MatcherKind::AnySet => "<set>",
            MatcherKind::PointerMathOperand => "<pointer>",
        }
        .to_string(),
    }
}
