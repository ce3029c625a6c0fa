//! Core compute primitives (Vector, Matrix).
//!
//! These types provide the foundation for pool storage, predictive
//! distributions, and batch assembly.

mod matrix;
mod vector;

pub use matrix::Matrix;
pub use vector::Vector;
