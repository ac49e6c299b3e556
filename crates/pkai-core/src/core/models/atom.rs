use super::ids::ResidueKey;
use nalgebra::Point3;

/// Element symbol implied by an atom name: its first character.
pub fn element_symbol(atom_name: &str) -> Option<char> {
    atom_name.chars().next()
}

/// Represents a retained heavy atom of a parsed structure.
///
/// Atoms are immutable once created. The owning residue is referenced by its
/// [`ResidueKey`] so that the protein model stays a tree of owned values with
/// no back-pointers.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The trimmed atom name (e.g., "OD1", "NZ", "N").
    pub name: String,
    /// The atom serial number from the source file.
    pub serial: usize,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
    /// The key of the residue this atom belongs to.
    pub residue: ResidueKey,
}

impl Atom {
    /// Creates a new `Atom`.
    ///
    /// # Arguments
    ///
    /// * `name` - The atom name; surrounding whitespace is removed.
    /// * `serial` - The atom serial number.
    /// * `position` - The 3D coordinates of the atom.
    /// * `residue` - The key of the owning residue.
    pub fn new(name: &str, serial: usize, position: Point3<f64>, residue: ResidueKey) -> Self {
        Self {
            name: name.trim().to_string(),
            serial,
            position,
            residue,
        }
    }
}
