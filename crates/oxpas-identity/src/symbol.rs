// symbol.rs
//
// Unique identifier for case-folded names.

/// Unique identifier for an interned, case-folded name.
///
/// Two spellings that differ only by ASCII case map to the same `Symbol`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(u32);

impl Symbol {
    /// Create a Symbol from a raw index. Only the interner should use this.
    pub(crate) fn new(index: u32) -> Self {
        Self(index)
    }

    /// Return the underlying index.
    pub fn index(self) -> u32 {
        self.0
    }

    /// Create a Symbol with an arbitrary index in test code.
    #[cfg(any(test, feature = "testing"))]
    pub fn new_for_test(index: u32) -> Self {
        Self(index)
    }
}
