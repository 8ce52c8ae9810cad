//! The primary interface for turning parse trees into semantic models.

use std::{
    ops::{Deref, DerefMut},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, OnceLock,
    },
};

use tracing::debug;

use crate::{
    cst::{ParseNode, ParseTag},
    sema::{ElementIter, Malformed, Module, Result, SemaError},
};

/// Builds semantic models from parse trees, holding the enabled features and
/// the source of placeholder names for anonymous members.
#[derive(Debug, Clone, Default)]
pub struct ModelBuilder {
    /// The enabled features.
    features: Features,

    /// Sequence used to name anonymous members
    counter: UnnamedCounter,
}

/// All options that change how models are built.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Features {
    /// Give anonymous SEQUENCE, SET and CHOICE members a generated name.  If
    /// disabled, an anonymous member is an error.
    pub unnamed_members: bool,

    /// Stem of generated member names
    pub unnamed_prefix: String,
}

/// Handle to a sequence of placeholder numbers.  Clones share the sequence.
#[derive(Debug, Clone)]
pub struct UnnamedCounter(Arc<AtomicUsize>);

impl ModelBuilder {
    /// Create a builder using the process wide unnamed member sequence
    pub fn new() -> Self {
        Default::default()
    }

    /// Create a builder drawing placeholder names from the given sequence
    pub fn with_counter(counter: UnnamedCounter) -> Self {
        Self {
            features: Features::default(),
            counter,
        }
    }

    /// Build one module per root of the parse forest
    pub fn build(&self, forest: &[ParseNode]) -> Result<Vec<Module>> {
        forest
            .iter()
            .map(|root| {
                let mut iter = ElementIter::new(root);
                if root.tag != ParseTag::ModuleDefinition {
                    return Err(iter.malformed(Malformed::WrongCategory {
                        expected: "a module",
                        got: root.tag,
                    }));
                }

                let module = self.module(&mut iter)?;
                debug!(
                    module = %module.name,
                    assignments = module.assignments().len(),
                    "built module"
                );
                Ok(module)
            })
            .collect()
    }

    /// Generate the next placeholder name for an anonymous member
    pub(crate) fn next_unnamed(&self) -> String {
        self.counter.next_name(&self.unnamed_prefix)
    }
}

impl Deref for ModelBuilder {
    type Target = Features;

    fn deref(&self) -> &Self::Target {
        &self.features
    }
}

impl DerefMut for ModelBuilder {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.features
    }
}

impl Default for Features {
    fn default() -> Self {
        Self {
            unnamed_members: true,
            unnamed_prefix: String::from("unnamed"),
        }
    }
}

impl UnnamedCounter {
    /// Create a sequence independent of every other
    pub fn new() -> Self {
        Self(Arc::new(AtomicUsize::new(0)))
    }

    /// The sequence shared by the whole process
    pub fn global() -> Self {
        static GLOBAL: OnceLock<UnnamedCounter> = OnceLock::new();
        GLOBAL.get_or_init(UnnamedCounter::new).clone()
    }

    /// Take the next number in the sequence, starting at 1
    pub fn next(&self) -> usize {
        self.0.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Take the next number and attach it to the prefix
    pub fn next_name(&self, prefix: &str) -> String {
        format!("{prefix}{}", self.next())
    }
}

impl Default for UnnamedCounter {
    fn default() -> Self {
        Self::global()
    }
}

/// Build the semantic model of every module in the forest with the default
/// features
pub fn build_semantic_model(forest: &[ParseNode]) -> Result<Vec<Module>, SemaError> {
    ModelBuilder::new().build(forest)
}
