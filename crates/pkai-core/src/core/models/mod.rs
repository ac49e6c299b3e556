//! # Core Models Module
//!
//! Data structures describing a parsed protein structure.
//!
//! ## Overview
//!
//! The model is an arena: a [`protein::Protein`] owns its residues in a slot map,
//! each [`residue::Residue`] owns its atoms, and atoms refer back to their
//! residue through a [`ids::ResidueKey`] (chain identifier and residue number)
//! instead of a pointer. Once parsing is finished the model is read-only, which
//! is what allows per-residue feature extraction to run in parallel without
//! synchronization.
//!
//! ## Key Components
//!
//! - [`atom`] - A retained heavy atom with its coordinates
//! - [`residue`] - A residue and its atoms in file order
//! - [`protein`] - The residue arena with its canonical ordered views
//! - [`ids`] - Arena IDs and the residue key
//!
//! ## Usage
//!
//! ```ignore
//! use pkai::core::models::{protein::Protein, atom::Atom, ids::ResidueKey};
//!
//! let mut protein = Protein::new();
//! let key = ResidueKey::new('A', 12);
//! let (residue_id, _) = protein.add_residue(key, "ASP");
//! protein.add_atom_to_residue(residue_id, Atom::new("OD1", 1, Point3::origin(), key));
//! ```

pub mod atom;
pub mod ids;
pub mod protein;
pub mod residue;
