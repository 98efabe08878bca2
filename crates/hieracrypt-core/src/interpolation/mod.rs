//! Scope interpolation seam
//!
//! The backend never expands variables itself. Hosts inject an
//! `Interpolator` that knows their template syntax; strings, hierarchy
//! entries, data directories and key paths all pass through it.

mod traits;

pub use traits::{Interpolator, PassthroughInterpolator, SharedInterpolator};
