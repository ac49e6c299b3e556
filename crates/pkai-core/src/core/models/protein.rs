use super::atom::Atom;
use super::ids::{ResidueId, ResidueKey};
use super::residue::Residue;
use slotmap::SlotMap;
use std::collections::{BTreeMap, BTreeSet};

/// Represents a parsed protein structure as an arena of residues.
///
/// Residues live in a slot map and are addressed by [`ResidueId`]. Two ordered
/// views are maintained over that arena: every residue (`all_residues`) and the
/// titratable subset (`tit_residues`). Both are keyed by [`ResidueKey`], so
/// iteration visits chains in sorted order and residue numbers ascending within
/// each chain, independent of the order in which residues appeared in the file.
#[derive(Debug, Clone, Default)]
pub struct Protein {
    /// Primary storage for residues.
    residues: SlotMap<ResidueId, Residue>,
    /// Canonical ordered index over every residue.
    all_residues: BTreeMap<ResidueKey, ResidueId>,
    /// Canonical ordered subset of titratable residues.
    tit_residues: BTreeSet<ResidueKey>,
}

impl Protein {
    /// Creates a new, empty protein.
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieves a residue by its arena ID.
    pub fn residue(&self, id: ResidueId) -> Option<&Residue> {
        self.residues.get(id)
    }

    /// Finds the arena ID of a residue by chain and residue number.
    pub fn find_residue(&self, key: ResidueKey) -> Option<ResidueId> {
        self.all_residues.get(&key).copied()
    }

    /// Retrieves a residue by chain and residue number.
    pub fn residue_by_key(&self, key: ResidueKey) -> Option<&Residue> {
        self.find_residue(key).and_then(|id| self.residues.get(id))
    }

    /// Adds a new residue or returns the existing one for the same key.
    ///
    /// This method is idempotent: the residue name given on the first call for a
    /// key is the one that is kept. A residue whose name is a titratable type is
    /// registered in the titratable view when it is created.
    ///
    /// # Return
    ///
    /// The residue ID and whether the residue was newly created.
    pub fn add_residue(&mut self, key: ResidueKey, name: &str) -> (ResidueId, bool) {
        if let Some(&id) = self.all_residues.get(&key) {
            return (id, false);
        }

        let residue = Residue::new(key, name);
        if residue.titratable_type().is_some() {
            self.tit_residues.insert(key);
        }
        let id = self.residues.insert(residue);
        self.all_residues.insert(key, id);
        (id, true)
    }

    /// Attaches an atom to an existing residue.
    ///
    /// # Return
    ///
    /// `None` if the residue does not exist, otherwise `Some` holding the atom that
    /// was replaced because it carried the same serial (if any).
    pub fn add_atom_to_residue(&mut self, id: ResidueId, atom: Atom) -> Option<Option<Atom>> {
        self.residues.get_mut(id).map(|residue| residue.add_atom(atom))
    }

    /// Iterates over every residue in canonical order.
    pub fn residues(&self) -> impl Iterator<Item = (ResidueId, &Residue)> {
        self.all_residues
            .values()
            .map(move |&id| (id, &self.residues[id]))
    }

    /// Iterates over the titratable residues in canonical order.
    pub fn titratable_residues(&self) -> impl Iterator<Item = (ResidueId, &Residue)> {
        self.tit_residues.iter().map(move |key| {
            let id = self.all_residues[key];
            (id, &self.residues[id])
        })
    }

    /// Iterates over every atom in canonical order.
    ///
    /// Residues are visited in canonical order and atoms within a residue in
    /// file-encounter order.
    pub fn atoms(&self) -> impl Iterator<Item = &Atom> {
        self.residues().flat_map(|(_, residue)| residue.atoms().iter())
    }

    pub fn residue_count(&self) -> usize {
        self.all_residues.len()
    }

    pub fn titratable_count(&self) -> usize {
        self.tit_residues.len()
    }

    pub fn atom_count(&self) -> usize {
        self.residues.values().map(|r| r.atoms().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.all_residues.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn push_atom(protein: &mut Protein, chain: char, number: isize, res: &str, name: &str, serial: usize) {
        let key = ResidueKey::new(chain, number);
        let (id, _) = protein.add_residue(key, res);
        let atom = Atom::new(name, serial, Point3::new(serial as f64, 0.0, 0.0), key);
        protein.add_atom_to_residue(id, atom).unwrap();
    }

    fn unordered_protein() -> Protein {
        let mut protein = Protein::new();
        push_atom(&mut protein, 'B', 2, "LYS", "NZ", 1);
        push_atom(&mut protein, 'A', 10, "GLU", "OE1", 2);
        push_atom(&mut protein, 'A', 3, "SER", "OG", 3);
        push_atom(&mut protein, 'A', 10, "GLU", "OE2", 4);
        push_atom(&mut protein, 'A', -1, "ASP", "OD1", 5);
        protein
    }

    mod construction {
        use super::*;

        #[test]
        fn add_residue_is_idempotent_and_keeps_first_name() {
            let mut protein = Protein::new();
            let key = ResidueKey::new('A', 1);
            let (id1, created1) = protein.add_residue(key, "ASP");
            let (id2, created2) = protein.add_residue(key, "GLY");
            assert!(created1);
            assert!(!created2);
            assert_eq!(id1, id2);
            assert_eq!(protein.residue(id1).unwrap().name, "ASP");
            assert_eq!(protein.residue_count(), 1);
        }

        #[test]
        fn titratable_residues_are_registered_on_creation() {
            let protein = unordered_protein();
            assert_eq!(protein.residue_count(), 4);
            assert_eq!(protein.titratable_count(), 3);
            assert!(protein.residue_by_key(ResidueKey::new('A', 3)).is_some());
        }

        #[test]
        fn add_atom_to_missing_residue_returns_none() {
            let mut protein = Protein::new();
            let (id, _) = protein.add_residue(ResidueKey::new('A', 1), "ALA");
            let mut other = Protein::new();
            let atom = Atom::new("N", 1, Point3::origin(), ResidueKey::new('A', 1));
            assert!(other.add_atom_to_residue(id, atom).is_none());
            assert_eq!(protein.atom_count(), 0);
        }
    }

    mod ordering {
        use super::*;

        #[test]
        fn residues_iterate_in_canonical_order() {
            let protein = unordered_protein();
            let keys: Vec<_> = protein.residues().map(|(_, r)| r.key).collect();
            assert_eq!(
                keys,
                vec![
                    ResidueKey::new('A', -1),
                    ResidueKey::new('A', 3),
                    ResidueKey::new('A', 10),
                    ResidueKey::new('B', 2),
                ]
            );
        }

        #[test]
        fn titratable_view_skips_other_residues() {
            let protein = unordered_protein();
            let names: Vec<_> = protein
                .titratable_residues()
                .map(|(_, r)| r.name.clone())
                .collect();
            assert_eq!(names, vec!["ASP", "GLU", "LYS"]);
        }

        #[test]
        fn atoms_iterate_by_residue_then_file_order() {
            let protein = unordered_protein();
            let serials: Vec<_> = protein.atoms().map(|a| a.serial).collect();
            assert_eq!(serials, vec![5, 3, 2, 4, 1]);
            assert_eq!(protein.atom_count(), 5);
        }
    }
}
