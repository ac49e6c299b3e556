//! # pKAI Core Library
//!
//! Predicts the pKa values of titratable residues in a protein structure from
//! the arrangement of polar atoms around each site.
//!
//! ## Architecture
//!
//! - **[`core`]: The Foundation.** The protein model (`Protein`, `Residue`,
//!   `Atom`), the fixed-column PDB reader, titratable-site chemistry tables and
//!   geometry helpers.
//!
//! - **[`engine`]: The Feature Pipeline.** Cutoff-based environment selection,
//!   environment-class mapping and the encoder that produces fixed-length model
//!   inputs laid out by a versioned `FeatureCatalog`.
//!
//! - **[`model`]: The Predictor Boundary.** The `Predictor` trait, a dense
//!   network implementation, model artifacts and the local `ModelRegistry`.
//!
//! - **[`workflows`]: The Public API.** The `predict` workflow that ties a
//!   structure, a loaded model and a configuration together.
//!
//! ## Features
//!
//! - `parallel` (default): processes titratable sites concurrently with `rayon`.

pub mod core;
pub mod engine;
pub mod model;
pub mod workflows;
