// intern.rs
//
// Case-insensitive string interning.

use std::hash::BuildHasher;

use crate::Symbol;
use rustc_hash::FxBuildHasher;

/// Interns names to unique Symbol IDs, folding ASCII case.
///
/// The language is case-insensitive, so `Foo`, `FOO` and `foo` share a
/// symbol. The first spelling seen is kept as the display form.
#[derive(Debug, Clone)]
pub struct Interner {
    map: hashbrown::HashMap<String, Symbol, FxBuildHasher>,
    folded: Vec<String>,
    spellings: Vec<String>,
}

impl Default for Interner {
    fn default() -> Self {
        Self {
            map: hashbrown::HashMap::with_hasher(FxBuildHasher),
            folded: Vec::new(),
            spellings: Vec::new(),
        }
    }
}

fn fold(s: &str) -> std::borrow::Cow<'_, str> {
    if s.bytes().any(|b| b.is_ascii_uppercase()) {
        std::borrow::Cow::Owned(s.to_ascii_lowercase())
    } else {
        std::borrow::Cow::Borrowed(s)
    }
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, s: &str) -> Symbol {
        use hashbrown::hash_map::RawEntryMut;

        let key = fold(s);
        // Hash once, reuse for both lookup and insert.
        let hash = self.map.hasher().hash_one(key.as_ref());

        let entry = self
            .map
            .raw_entry_mut()
            .from_hash(hash, |k| k.as_str() == key.as_ref());

        match entry {
            RawEntryMut::Occupied(e) => *e.get(),
            RawEntryMut::Vacant(e) => {
                let sym = Symbol::new(self.folded.len() as u32);
                let owned = key.into_owned();
                self.folded.push(owned.clone());
                self.spellings.push(s.to_string());
                e.insert_hashed_nocheck(hash, owned, sym);
                sym
            }
        }
    }

    /// The case-folded form of the symbol.
    pub fn resolve(&self, sym: Symbol) -> &str {
        &self.folded[sym.index() as usize]
    }

    /// The first spelling this symbol was interned with.
    pub fn spelling(&self, sym: Symbol) -> &str {
        &self.spellings[sym.index() as usize]
    }

    pub fn len(&self) -> usize {
        self.folded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folded.is_empty()
    }

    /// Look up a name without interning it.
    /// Returns None if no spelling of the name has been interned.
    pub fn lookup(&self, s: &str) -> Option<Symbol> {
        self.map.get(fold(s).as_ref()).copied()
    }
}
