//! Lookup resolution
//!
//! - `AnswerResolver`: interpolates and decrypts every string in a value
//! - `LookupEngine`: walks the hierarchy and combines per-source answers

mod answer;
mod lookup;

pub use answer::AnswerResolver;
pub use lookup::LookupEngine;
