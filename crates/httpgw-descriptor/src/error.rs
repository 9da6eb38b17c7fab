use serde::Serialize;
use std::fmt;

///
/// ErrorTree
///
/// Flat collector for validation errors, each tagged with the route of the
/// node that produced it. A generation run either passes cleanly or fails
/// with the whole tree; partial output is never emitted.
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct ErrorTree {
    entries: Vec<Entry>,
}

#[derive(Clone, Debug, Serialize)]
struct Entry {
    route: String,
    message: String,
}

impl ErrorTree {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Record an error with no route context.
    pub fn add(&mut self, err: impl fmt::Display) {
        self.add_message(err.to_string());
    }

    pub fn add_message(&mut self, message: String) {
        self.entries.push(Entry {
            route: String::new(),
            message,
        });
    }

    /// Record an error against a specific node route.
    pub fn add_at(&mut self, route: impl Into<String>, err: impl fmt::Display) {
        self.entries.push(Entry {
            route: route.into(),
            message: err.to_string(),
        });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Collapse into a `Result`, consuming the tree.
    pub fn result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ErrorTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            if entry.route.is_empty() {
                write!(f, "{}", entry.message)?;
            } else {
                write!(f, "{}: {}", entry.route, entry.message)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ErrorTree {}

/// Push a formatted error message onto an [`ErrorTree`].
#[macro_export]
macro_rules! err {
    ($errs:expr, $($arg:tt)+) => {
        $errs.add_message(format!($($arg)+))
    };
}
