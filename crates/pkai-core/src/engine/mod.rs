//! # Engine Module
//!
//! Turns a parsed [`Protein`](crate::core::models::protein::Protein) into
//! model inputs, one per titratable site.
//!
//! ## Pipeline
//!
//! 1. [`selection`] gathers the environment of a site: every atom of another
//!    residue within the cutoff radius of the site's reference atoms.
//! 2. [`classify`] maps each environment atom to a class label.
//! 3. [`encoder`] orders the classified atoms by distance and quantizes them
//!    into an [`EncodedInput`](encoder::EncodedInput) laid out by a
//!    [`FeatureCatalog`](catalog::FeatureCatalog).
//!
//! Supporting modules hold the pipeline [`config`], the [`error`] umbrella and
//! [`progress`] reporting.
//!
//! Selection compares every atom against every reference atom of every site,
//! so its cost grows with the square of the protein size. This is the dominant
//! cost of a prediction.

pub mod catalog;
pub mod classify;
pub mod config;
pub mod encoder;
pub mod error;
pub mod progress;
pub mod selection;
