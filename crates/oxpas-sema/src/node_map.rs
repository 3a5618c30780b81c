//! Per-node resolution results.
//!
//! Every expression-shaped node gets at most one resolved type and at most
//! one resolved declaration. Later writes to an already-set slot are ignored,
//! so sub-resolutions that revisit a node cannot overwrite the first result.

use oxpas_identity::{DeclId, NodeId};
use rustc_hash::FxHashMap;

use crate::type_arena::TypeId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeData {
    /// Resolved type; absent means unknown.
    pub ty: Option<TypeId>,
    pub decl: Option<DeclId>,
}

#[derive(Debug, Clone, Default)]
pub struct NodeMap {
    nodes: FxHashMap<NodeId, NodeData>,
}

impl NodeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the type of a node. Returns false if it was already set.
    pub fn set_type(&mut self, node: NodeId, ty: TypeId) -> bool {
        let data = self.nodes.entry(node).or_default();
        if data.ty.is_some() {
            return false;
        }
        data.ty = Some(ty);
        true
    }

    /// Record the declaration a node denotes. Returns false if it was
    /// already set.
    pub fn set_decl(&mut self, node: NodeId, decl: DeclId) -> bool {
        let data = self.nodes.entry(node).or_default();
        if data.decl.is_some() {
            return false;
        }
        data.decl = Some(decl);
        true
    }

    /// The resolved type, or UNKNOWN when the node was never typed.
    pub fn type_of(&self, node: NodeId) -> TypeId {
        self.nodes
            .get(&node)
            .and_then(|data| data.ty)
            .unwrap_or(TypeId::UNKNOWN)
    }

    pub fn decl_of(&self, node: NodeId) -> Option<DeclId> {
        self.nodes.get(&node).and_then(|data| data.decl)
    }

    pub fn get(&self, node: NodeId) -> Option<&NodeData> {
        self.nodes.get(&node)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
