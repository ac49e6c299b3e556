use slotmap::new_key_type;
use std::fmt;

new_key_type! {
    pub struct ResidueId;
}

/// Identifies a residue by its chain identifier and residue sequence number.
///
/// This is the stable, file-derived identity of a residue. Atoms refer back to
/// their owning residue through this key rather than through a pointer, and the
/// derived `Ord` (chain first, then number) is the canonical iteration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResidueKey {
    /// Single-character chain identifier (column 22 of an ATOM record).
    pub chain: char,
    /// Residue sequence number (columns 23-26 of an ATOM record).
    pub number: isize,
}

impl ResidueKey {
    pub fn new(chain: char, number: isize) -> Self {
        Self { chain, number }
    }
}

impl fmt::Display for ResidueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chain, self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_order_by_chain_then_number() {
        let mut keys = vec![
            ResidueKey::new('B', 1),
            ResidueKey::new('A', 10),
            ResidueKey::new('A', -2),
            ResidueKey::new('A', 3),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                ResidueKey::new('A', -2),
                ResidueKey::new('A', 3),
                ResidueKey::new('A', 10),
                ResidueKey::new('B', 1),
            ]
        );
    }

    #[test]
    fn display_joins_chain_and_number() {
        assert_eq!(ResidueKey::new('A', 42).to_string(), "A:42");
    }
}
