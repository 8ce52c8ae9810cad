use std::{error::Error, fmt::Display};

use crate::{
    analysis::CyclicReferenceError,
    sema::{ResolveError, SemaError},
};

/// Any kind of error reported by the library, in a form ready to show to a
/// user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Unique error code reference
    pub error_code: String,

    /// Severity of the error
    pub level: Level,

    /// Name of the diagnostic
    pub name: String,

    /// All labels with information about this diagnostic
    pub labels: Vec<Label>,
}

/// A single piece of information attached to a diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    /// The definition or node the message is about, if any
    pub subject: Option<String>,

    /// The message to display to the user.
    pub message: String,
}

/// Severity of a given diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// A fatal error
    Error,

    /// Should be fixed but processing can still continue.
    Warning,

    /// Notice about some code
    Note,
}

impl Diagnostic {
    /// Create a new diagnostic
    fn new(level: Level, code: String) -> Self {
        Diagnostic {
            error_code: code,
            level,
            name: String::new(),
            labels: vec![],
        }
    }

    /// Create an error diagnostic
    pub(crate) fn error(code: impl Into<String>) -> Self {
        Self::new(Level::Error, code.into())
    }

    /// Set the descriptive name of an error
    pub(crate) fn name(self, value: impl Into<String>) -> Self {
        Self {
            name: value.into(),
            ..self
        }
    }

    /// Add a label to the diagnostic
    pub(crate) fn label(mut self, label: impl Into<Label>) -> Self {
        self.labels.push(label.into());
        self
    }
}

impl Label {
    /// Create a new empty label
    pub(crate) fn new() -> Label {
        Label {
            subject: None,
            message: String::new(),
        }
    }

    /// Set the message for this label
    pub(crate) fn message(self, value: impl Into<String>) -> Self {
        Self {
            message: value.into(),
            ..self
        }
    }

    /// Set what this label is about
    pub fn subject(self, value: impl Into<String>) -> Self {
        Self {
            subject: Some(value.into()),
            ..self
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} {}: {}", self.level, self.error_code, self.name)?;

        for label in &self.labels {
            writeln!(f)?;
            match &label.subject {
                Some(subject) => write!(f, "\t{:?} [{subject}]: {}", self.level, label.message)?,
                None => write!(f, "\t{:?}: {}", self.level, label.message)?,
            }
        }

        Ok(())
    }
}

impl Error for Diagnostic {}

impl From<&str> for Label {
    fn from(value: &str) -> Self {
        Label::new().message(value)
    }
}

impl From<String> for Label {
    fn from(value: String) -> Self {
        Label::new().message(value)
    }
}

impl From<SemaError> for Diagnostic {
    fn from(value: SemaError) -> Self {
        match &value {
            SemaError::UnknownNodeKind { kind } => Diagnostic::error("E0001")
                .name("Unknown parse node kind")
                .label(Label::new().subject(kind).message(value.to_string())),
            SemaError::MalformedInput { tag, problem } => Diagnostic::error("E0002")
                .name("Malformed parse tree")
                .label(Label::new().subject(tag.name()).message(problem.to_string()))
                .label("the parse tree does not match the grammar the model builder expects"),
        }
    }
}

impl From<CyclicReferenceError> for Diagnostic {
    fn from(value: CyclicReferenceError) -> Self {
        value.names.iter().fold(
            Diagnostic::error("E0003").name("Cyclic references cannot be sorted"),
            |diagnostic, name| {
                diagnostic.label(
                    Label::new()
                        .subject(name)
                        .message("part of or depends on a cycle"),
                )
            },
        )
    }
}

impl From<ResolveError> for Diagnostic {
    fn from(value: ResolveError) -> Self {
        match &value {
            ResolveError::UnresolvedReference { name } => Diagnostic::error("E0004")
                .name("Unresolved type reference")
                .label(Label::new().subject(name).message("not defined in this module")),
            ResolveError::RecursiveAlias { chain } => Diagnostic::error("E0005")
                .name("Recursive type alias")
                .label(
                    Label::new()
                        .subject(chain.first().cloned().unwrap_or_default())
                        .message(value.to_string()),
                ),
        }
    }
}
