//! # Workflows Module
//!
//! End-to-end procedures built from the [`core`](crate::core) and
//! [`engine`](crate::engine) layers.
//!
//! - **Prediction** ([`predict`]) - Reads a structure, encodes every titratable
//!   site and returns one [`PkaPrediction`](predict::PkaPrediction) per site,
//!   ordered by chain and residue number.

pub mod predict;
