//! # Core Module
//!
//! Stateless building blocks of the pipeline.
//!
//! - **Molecular Representation** ([`models`]) - Atoms, residues and the
//!   [`Protein`](models::protein::Protein) arena with its canonical ordering.
//! - **File I/O** ([`io`]) - The fixed-column PDB `ATOM` reader.
//! - **Chemistry** ([`chemistry`]) - Titratable site types, their reference
//!   atoms and reference pKa values.
//! - **Utilities** ([`utils`]) - Distance computations.

pub mod chemistry;
pub mod io;
pub mod models;
pub mod utils;
