//! Outputs of design checks.

use crate::log::Log;

/// The result of a check: messages at two severities plus the measured data.
///
/// Warnings never abort generation; errors mark results that should not be fabricated.
#[derive(Debug, Clone)]
pub struct ValidatorOutput<W, E, D> {
    pub(crate) warnings: Vec<W>,
    pub(crate) errors: Vec<E>,
    pub(crate) data: D,
}

/// Placeholder for a message severity a check never produces.
#[derive(Default, Debug, Clone, Eq, PartialEq, Hash)]
pub struct Empty;

impl Log for Empty {
    fn log(&self) {}
}

impl<W, E, D> ValidatorOutput<W, E, D>
where
    W: Log,
    E: Log,
    D: Log,
{
    /// Creates an output carrying `data` and no messages.
    pub fn with_data(data: D) -> Self {
        Self {
            warnings: Vec::new(),
            errors: Vec::new(),
            data,
        }
    }

    /// Logs the data, then every warning and error.
    pub fn log(&self) {
        self.data.log();
        self.warnings.log();
        self.errors.log();
    }

    #[inline]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    #[inline]
    pub fn warnings(&self) -> &[W] {
        &self.warnings
    }

    #[inline]
    pub fn errors(&self) -> &[E] {
        &self.errors
    }

    #[inline]
    pub fn data(&self) -> &D {
        &self.data
    }
}
