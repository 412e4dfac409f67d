//! Logging macros.
//!
//! Unit tests print to stdout; all other builds log through the `log` facade.

#[cfg(test)]
#[allow(unused_imports)]
pub(crate) use std::{println as debug, println as info, println as warn};

#[cfg(not(test))]
#[allow(unused_imports)]
pub(crate) use log::{debug, info, warn};

/// A report that can write itself to the log.
pub trait Log {
    fn log(&self);
}

impl<T: Log> Log for [T] {
    fn log(&self) {
        for item in self {
            item.log();
        }
    }
}
