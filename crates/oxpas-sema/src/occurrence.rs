// occurrence.rs
//
// Name occurrences and the declaration -> references index.

use oxpas_identity::{DeclId, NodeId, ScopeId, Span};
use rustc_hash::FxHashMap;

use crate::type_arena::TypeId;

/// Position of an occurrence in the [`OccurrenceIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OccurrenceId(u32);

impl OccurrenceId {
    pub fn index(self) -> u32 {
        self.0
    }
}

/// One reference to a name at a source position.
#[derive(Debug, Clone)]
pub struct NameOccurrence {
    /// The name segment node.
    pub node: NodeId,
    pub span: Span,
    pub image: String,
    /// Scope the reference is written in.
    pub site: ScopeId,
    /// Followed by an argument list.
    pub explicit_invocation: bool,
    /// A routine used as a value of procedural type.
    pub method_reference: bool,
    /// Explicit generic arguments (`Foo<Integer>`); None without brackets.
    pub type_arguments: Option<Vec<TypeId>>,
    /// Qualifies the next name in a chain (`a` in `a.b`).
    pub qualifies_next: bool,
    /// The next occurrence in the chain, assigned when recorded.
    pub next: Option<OccurrenceId>,
    pub declaration: Option<DeclId>,
}

impl NameOccurrence {
    pub fn new(node: NodeId, span: Span, image: &str, site: ScopeId) -> Self {
        Self {
            node,
            span,
            image: image.to_string(),
            site,
            explicit_invocation: false,
            method_reference: false,
            type_arguments: None,
            qualifies_next: false,
            next: None,
            declaration: None,
        }
    }

    pub fn is_generic(&self) -> bool {
        self.type_arguments.is_some()
    }
}

/// Every recorded occurrence, indexed by the declaration it binds to.
#[derive(Debug, Clone, Default)]
pub struct OccurrenceIndex {
    occurrences: Vec<NameOccurrence>,
    by_decl: FxHashMap<DeclId, Vec<OccurrenceId>>,
    by_node: FxHashMap<NodeId, OccurrenceId>,
}

impl OccurrenceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a resolved chain. Consecutive occurrences flagged
    /// `qualifies_next` are linked to their successor.
    ///
    /// A node is recorded once: resolving the same expression again yields
    /// the ids of its first recording.
    pub fn record_chain(&mut self, chain: Vec<NameOccurrence>) -> Vec<OccurrenceId> {
        let mut ids = Vec::with_capacity(chain.len());
        for occurrence in chain {
            if let Some(&id) = self.by_node.get(&occurrence.node) {
                ids.push(id);
                continue;
            }
            let id = OccurrenceId(self.occurrences.len() as u32);
            self.by_node.insert(occurrence.node, id);
            if let Some(decl) = occurrence.declaration {
                self.by_decl.entry(decl).or_default().push(id);
            }
            self.occurrences.push(occurrence);
            ids.push(id);
        }
        for pair in ids.windows(2) {
            let occurrence = &mut self.occurrences[pair[0].0 as usize];
            if occurrence.qualifies_next && occurrence.next.is_none() {
                occurrence.next = Some(pair[1]);
            }
        }
        ids
    }

    /// The occurrence recorded for a name node.
    pub fn at_node(&self, node: NodeId) -> Option<&NameOccurrence> {
        self.by_node.get(&node).map(|&id| self.get(id))
    }

    pub fn get(&self, id: OccurrenceId) -> &NameOccurrence {
        &self.occurrences[id.0 as usize]
    }

    /// Every reference to `decl`, in resolution order.
    pub fn of_declaration(&self, decl: DeclId) -> impl Iterator<Item = &NameOccurrence> + '_ {
        self.by_decl
            .get(&decl)
            .map(|ids| ids.as_slice())
            .unwrap_or(&[])
            .iter()
            .map(|&id| self.get(id))
    }

    pub fn is_referenced(&self, decl: DeclId) -> bool {
        self.by_decl.contains_key(&decl)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NameOccurrence> {
        self.occurrences.iter()
    }

    pub fn len(&self) -> usize {
        self.occurrences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chains_link_qualifiers_and_index_declarations() {
        let site = ScopeId::new(1);
        let mut a = NameOccurrence::new(NodeId::new(1), Span::default(), "a", site);
        a.qualifies_next = true;
        a.declaration = Some(DeclId::new(10));
        let mut b = NameOccurrence::new(NodeId::new(2), Span::default(), "b", site);
        b.declaration = Some(DeclId::new(11));

        let mut index = OccurrenceIndex::new();
        let ids = index.record_chain(vec![a, b]);
        assert_eq!(index.get(ids[0]).next, Some(ids[1]));
        assert_eq!(index.get(ids[1]).next, None);
        assert!(index.is_referenced(DeclId::new(11)));
        assert_eq!(index.of_declaration(DeclId::new(10)).count(), 1);
        assert_eq!(index.of_declaration(DeclId::new(99)).count(), 0);
    }

    #[test]
    fn recording_the_same_nodes_twice_keeps_one_reference() {
        let site = ScopeId::new(1);
        let chain = || {
            let mut a = NameOccurrence::new(NodeId::new(1), Span::default(), "a", site);
            a.qualifies_next = true;
            a.declaration = Some(DeclId::new(10));
            let mut b = NameOccurrence::new(NodeId::new(2), Span::default(), "b", site);
            b.declaration = Some(DeclId::new(11));
            vec![a, b]
        };

        let mut index = OccurrenceIndex::new();
        let first = index.record_chain(chain());
        let second = index.record_chain(chain());
        assert_eq!(first, second);
        assert_eq!(index.len(), 2);
        assert_eq!(index.of_declaration(DeclId::new(10)).count(), 1);
        assert_eq!(index.of_declaration(DeclId::new(11)).count(), 1);
        assert_eq!(index.at_node(NodeId::new(2)).map(|o| o.image.as_str()), Some("b"));
    }
}
