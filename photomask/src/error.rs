//! Error and result types for mask generation.
//!
//! Every fallible operation returns a [`PhotomaskError`]: an [`ErrorSource`] describing
//! what went wrong, plus a trail of [`ErrorContext`] entries recording which tasks were
//! running when it happened. Context is attached on the way out with [`with_err_context`].

use std::fmt::{self, Display};
use std::path::PathBuf;

use arcstr::ArcStr;
use thiserror::Error;

use crate::layout::elements::PortError;
use crate::layout::error::LayoutError;
use crate::layout::routing::error::RoutingError;

pub type Result<T> = std::result::Result<T, PhotomaskError>;

/// A failure and the tasks that were running when it occurred, innermost first.
#[derive(Debug)]
pub struct PhotomaskError {
    source: ErrorSource,
    context: Vec<ErrorContext>,
}

impl PhotomaskError {
    pub fn new(source: impl Into<ErrorSource>) -> Self {
        Self {
            source: source.into(),
            context: Vec::new(),
        }
    }

    /// Appends an outer task to the context trail.
    pub fn with_context(mut self, ctx: impl Into<ErrorContext>) -> Self {
        self.context.push(ctx.into());
        self
    }

    pub fn source(&self) -> &ErrorSource {
        &self.source
    }

    pub fn context(&self) -> &[ErrorContext] {
        &self.context
    }
}

impl<T: Into<ErrorSource>> From<T> for PhotomaskError {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl std::error::Error for PhotomaskError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

impl Display for PhotomaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)?;
        for ctx in &self.context {
            write!(f, "\n  while {ctx}")?;
        }
        Ok(())
    }
}

/// Maps the error of `result` into a [`PhotomaskError`] and tags it with `ctx`.
#[inline]
pub fn with_err_context<T, E, C>(result: std::result::Result<T, E>, ctx: C) -> Result<T>
where
    E: Into<PhotomaskError>,
    C: FnOnce() -> ErrorContext,
{
    result.map_err(|err| err.into().with_context(ctx()))
}

/// A task in progress when an error was raised.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ErrorContext {
    GenDevice { name: ArcStr, kind: ArcStr },
    CreateDir(PathBuf),
    CreateFile(PathBuf),
    ReadFile(PathBuf),
    Task(ArcStr),
}

impl Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GenDevice { name, kind } => write!(f, "generating {kind} {name:?}"),
            Self::CreateDir(path) => write!(f, "creating directory {}", path.display()),
            Self::CreateFile(path) => write!(f, "writing {}", path.display()),
            Self::ReadFile(path) => write!(f, "reading {}", path.display()),
            Self::Task(task) => f.write_str(task),
        }
    }
}

/// The underlying cause of a [`PhotomaskError`].
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ErrorSource {
    #[error("routing failed: {0}")]
    Routing(#[from] RoutingError),

    #[error("layout export failed: {0}")]
    Layout(#[from] LayoutError),

    #[error("bad port reference: {0}")]
    Port(#[from] PortError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("malformed TOML: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("could not serialize TOML: {0}")]
    TomlWriting(#[from] toml::ser::Error),

    #[error("could not serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
}
