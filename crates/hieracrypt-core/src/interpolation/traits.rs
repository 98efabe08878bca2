//! Interpolator trait definition

use std::sync::Arc;

use crate::types::Scope;

/// Substitutes scope variables into configuration strings
///
/// Must return the input unchanged when it holds no variable references.
///
/// Any `Fn(&str, &Scope) -> String` closure is an interpolator:
///
/// ```
/// use hieracrypt_core::interpolation::Interpolator;
/// use hieracrypt_core::types::Scope;
///
/// let interp = |text: &str, scope: &Scope| {
///     text.replace("%{env}", scope.get("env").unwrap_or(""))
/// };
/// let scope = Scope::new().with_var("env", "prod");
/// assert_eq!(interp.interpolate("hosts/%{env}", &scope), "hosts/prod");
/// ```
pub trait Interpolator: Send + Sync {
    /// Expand scope variables in `text`
    fn interpolate(&self, text: &str, scope: &Scope) -> String;
}

/// Type alias for an Arc-wrapped interpolator
pub type SharedInterpolator = Arc<dyn Interpolator>;

/// Interpolator that returns every string unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughInterpolator;

impl PassthroughInterpolator {
    pub fn new() -> Self {
        Self
    }
}

impl Interpolator for PassthroughInterpolator {
    fn interpolate(&self, text: &str, _scope: &Scope) -> String {
        text.to_string()
    }
}

impl<F> Interpolator for F
where
    F: Fn(&str, &Scope) -> String + Send + Sync,
{
    fn interpolate(&self, text: &str, scope: &Scope) -> String {
        self(text, scope)
    }
}
