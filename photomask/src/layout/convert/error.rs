//! Error reporting shared by format converters.

use std::fmt;

use arcstr::ArcStr;

/// Builds errors that carry the converter's current position in the mask.
pub trait ErrorHelper {
    type Error;

    fn err(&self, msg: impl Into<String>) -> Self::Error;

    /// Fails with the message produced by `msg` unless `cond` holds.
    fn ensure(&self, cond: bool, msg: impl FnOnce() -> String) -> Result<(), Self::Error> {
        if cond {
            Ok(())
        } else {
            Err(self.err(msg()))
        }
    }
}

/// One level of the mask hierarchy being converted.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorContext {
    Library,
    Device(ArcStr),
    Component(ArcStr),
    Geometry,
    Annotations,
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Library => f.write_str("library"),
            Self::Device(name) => write!(f, "device {name}"),
            Self::Component(name) => write!(f, "component {name}"),
            Self::Geometry => f.write_str("geometry"),
            Self::Annotations => f.write_str("annotations"),
        }
    }
}

/// Joins a conversion trail into `library > device X > geometry` form.
pub fn trail(stack: &[ErrorContext]) -> String {
    stack
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" > ")
}
