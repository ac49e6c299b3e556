use super::atom::Atom;
use super::ids::ResidueKey;
use crate::core::chemistry::titratable::TitratableType;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct Residue {
    pub key: ResidueKey,                 // Chain identifier and residue number
    pub name: String,                    // Residue type as read from the file (e.g., "ASP")
    atoms: Vec<Atom>,                    // Atoms in file-encounter order
    serial_map: HashMap<usize, usize>,   // Map from atom serial to its index in `atoms`
}

impl Residue {
    pub(crate) fn new(key: ResidueKey, name: &str) -> Self {
        Self {
            key,
            name: name.trim().to_string(),
            atoms: Vec::new(),
            serial_map: HashMap::new(),
        }
    }

    /// Adds an atom, keeping serial numbers unique within the residue.
    ///
    /// A repeated serial replaces the earlier atom in place, so the position in
    /// encounter order is that of the first occurrence. The replaced atom is
    /// returned.
    pub(crate) fn add_atom(&mut self, atom: Atom) -> Option<Atom> {
        match self.serial_map.get(&atom.serial) {
            Some(&index) => Some(std::mem::replace(&mut self.atoms[index], atom)),
            None => {
                self.serial_map.insert(atom.serial, self.atoms.len());
                self.atoms.push(atom);
                None
            }
        }
    }

    pub fn chain(&self) -> char {
        self.key.chain
    }

    pub fn number(&self) -> isize {
        self.key.number
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atom_by_serial(&self, serial: usize) -> Option<&Atom> {
        self.serial_map.get(&serial).map(|&i| &self.atoms[i])
    }

    pub fn titratable_type(&self) -> Option<TitratableType> {
        self.name.parse().ok()
    }

    /// Returns the atoms that define the titratable site of this residue.
    ///
    /// Non-titratable residues have no reference atoms.
    pub fn reference_atoms(&self) -> Vec<&Atom> {
        let Some(site) = self.titratable_type() else {
            return Vec::new();
        };
        let names = site.reference_atom_names();
        self.atoms
            .iter()
            .filter(|atom| names.contains(&atom.name.as_str()))
            .collect()
    }
}
