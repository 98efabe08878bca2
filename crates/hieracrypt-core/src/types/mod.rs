//! Core types shared by the resolver and its collaborators

mod value;
mod scope;
mod strategy;

pub use value::{ConfigValue, ConfigMap};
pub use scope::Scope;
pub use strategy::ResolutionStrategy;
