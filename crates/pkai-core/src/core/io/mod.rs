//! Provides input functionality for molecular structure files.
//!
//! The [`traits::StructureFile`] trait is the common reading interface;
//! [`pdb::PdbFile`] implements it for the fixed-column PDB `ATOM` record layout,
//! keeping only the polar heavy atoms that take part in titration chemistry.

pub mod pdb;
pub mod traits;
