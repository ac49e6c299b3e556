//! Chemical knowledge tables used by the feature pipeline.
//!
//! - [`titratable`] - The closed set of titratable site types, their functional
//!   (reference) atoms, and their intrinsic reference pKa values.

pub mod titratable;
