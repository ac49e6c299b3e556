//! # Model Module
//!
//! The boundary between the feature pipeline and the regression model.
//!
//! - [`predictor`] - The [`Predictor`](predictor::Predictor) trait and
//!   [`LoadedModel`](predictor::LoadedModel), which pairs a predictor with the
//!   feature catalog its inputs must be encoded with.
//! - [`dense`] - A feed-forward network evaluated with `nalgebra`.
//! - [`artifact`] - Reading a model directory (TOML manifest and CSV tensors).
//! - [`registry`] - Resolving model names against a local model store.

pub mod artifact;
pub mod dense;
pub mod predictor;
pub mod registry;
