use std::{fmt::Display, sync::OnceLock};

use indexmap::{IndexMap, IndexSet};
use tracing::{trace, warn};

use crate::{analysis::Dependent, builder::ModelBuilder, cst::ParseTag};

use super::{
    error::{ResolveError, Result},
    node::{Node, Reference},
    ElementIter, TypeDecl, Value,
};

/// A single ASN.1 module and all its assignments
#[derive(Debug, Clone)]
pub struct Module {
    /// Name of the module
    pub name: String,

    /// Every type and value assignment, in source order
    assignments: Vec<Assignment>,

    /// Name to assignment index of every type assignment, built on first use
    user_types: OnceLock<IndexMap<String, usize>>,
}

/// A top level type or value definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assignment {
    Type(TypeAssignment),
    Value(ValueAssignment),
}

/// `TypeName ::= Type`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeAssignment {
    pub type_name: String,
    pub type_decl: TypeDecl,
}

/// `valueName Type ::= value`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueAssignment {
    pub value_name: String,
    pub type_decl: TypeDecl,
    pub value: Value,
}

impl Module {
    /// Create a module from already built assignments
    pub fn new(name: impl Into<String>, assignments: Vec<Assignment>) -> Self {
        Self {
            name: name.into(),
            assignments,
            user_types: OnceLock::new(),
        }
    }

    /// All assignments in source order
    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn type_assignments(&self) -> impl Iterator<Item = &TypeAssignment> {
        self.assignments.iter().filter_map(|a| match a {
            Assignment::Type(assignment) => Some(assignment),
            Assignment::Value(_) => None,
        })
    }

    pub fn value_assignments(&self) -> impl Iterator<Item = &ValueAssignment> {
        self.assignments.iter().filter_map(|a| match a {
            Assignment::Value(assignment) => Some(assignment),
            Assignment::Type(_) => None,
        })
    }

    /// Index of type assignments by name.  A later assignment with the same
    /// name replaces an earlier one.
    fn type_index(&self) -> &IndexMap<String, usize> {
        self.user_types.get_or_init(|| {
            let mut index = IndexMap::new();
            for (idx, assignment) in self.assignments.iter().enumerate() {
                if let Assignment::Type(assignment) = assignment {
                    index.insert(assignment.type_name.clone(), idx);
                }
            }
            index
        })
    }

    /// Every user defined type and its declaration
    pub fn user_types(&self) -> impl Iterator<Item = (&str, &TypeDecl)> {
        self.type_index()
            .iter()
            .filter_map(|(name, &idx)| match &self.assignments[idx] {
                Assignment::Type(assignment) => Some((name.as_str(), &assignment.type_decl)),
                Assignment::Value(_) => None,
            })
    }

    /// Get the declaration of a user defined type
    pub fn user_type(&self, name: &str) -> Option<&TypeDecl> {
        let &idx = self.type_index().get(name)?;
        match &self.assignments[idx] {
            Assignment::Type(assignment) => Some(&assignment.type_decl),
            Assignment::Value(_) => None,
        }
    }

    /// Follow type references until reaching a declaration that is not a
    /// plain reference.  Fails if an alias chain loops back on itself or names
    /// a type this module does not define.
    pub fn resolve_type_decl<'a>(
        &'a self,
        type_decl: &'a TypeDecl,
    ) -> Result<&'a TypeDecl, ResolveError> {
        let mut current = type_decl;
        let mut chain: IndexSet<&str> = IndexSet::new();

        while let TypeDecl::Referenced(reference) = current {
            let name = reference.type_name.as_str();
            if !chain.insert(name) {
                let chain: Vec<String> = chain
                    .iter()
                    .copied()
                    .chain([name])
                    .map(String::from)
                    .collect();
                warn!(module = %self.name, ?chain, "recursive type alias");
                return Err(ResolveError::RecursiveAlias { chain });
            }

            current = self
                .user_type(name)
                .ok_or_else(|| ResolveError::UnresolvedReference {
                    name: name.to_string(),
                })?;
        }

        Ok(current)
    }
}

impl PartialEq for Module {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.assignments == other.assignments
    }
}

impl Eq for Module {}

impl Assignment {
    pub fn type_decl(&self) -> &TypeDecl {
        match self {
            Assignment::Type(assignment) => &assignment.type_decl,
            Assignment::Value(assignment) => &assignment.type_decl,
        }
    }
}

impl Reference for Assignment {
    fn reference_name(&self) -> &str {
        match self {
            Assignment::Type(assignment) => assignment.reference_name(),
            Assignment::Value(assignment) => assignment.reference_name(),
        }
    }
}

impl Reference for TypeAssignment {
    fn reference_name(&self) -> &str {
        &self.type_name
    }
}

impl Reference for ValueAssignment {
    fn reference_name(&self) -> &str {
        &self.value_name
    }
}

/// Every name referenced anywhere below a node
fn referenced_names(node: &impl Node) -> IndexSet<String> {
    node.descendants()
        .into_iter()
        .filter_map(|descendant| descendant.as_reference())
        .map(|reference| reference.reference_name().to_string())
        .collect()
}

impl Dependent for Assignment {
    fn references(&self) -> IndexSet<String> {
        referenced_names(self)
    }
}

impl Dependent for TypeAssignment {
    fn references(&self) -> IndexSet<String> {
        referenced_names(self)
    }
}

impl Dependent for ValueAssignment {
    fn references(&self) -> IndexSet<String> {
        referenced_names(self)
    }
}

impl ModelBuilder {
    /// Interpret a module definition
    pub(crate) fn module(&self, iter: &mut ElementIter) -> Result<Module> {
        let name = iter
            .node_iter(&[ParseTag::ModuleReference])?
            .next_token()?
            .to_string();

        // DEFINITIONS, tagging and extensibility defaults and `::=`
        iter.skip(4)?;
        let mut body = iter.node_iter(&[ParseTag::ModuleBody])?;
        iter.skip(1)?;
        iter.assert_empty()?;

        // exports and imports
        body.skip(2)?;
        let mut list = body.node_iter(&[ParseTag::AssignmentList])?;
        body.assert_empty()?;

        let mut assignments = vec![];
        while list.peek(0).is_some() {
            let assignment = self.next_as::<Assignment>(&mut list)?;
            trace!(module = %name, assignment = assignment.reference_name(), "built assignment");
            assignments.push(assignment);
        }

        Ok(Module::new(name, assignments))
    }

    /// Interpret `TypeName ::= Type`
    pub(super) fn type_assignment(&self, iter: &mut ElementIter) -> Result<TypeAssignment> {
        let type_name = iter.next_token()?.to_string();
        iter.next_token()?;
        let type_decl = self.next_as::<TypeDecl>(iter)?;
        iter.assert_empty()?;

        Ok(TypeAssignment {
            type_name,
            type_decl,
        })
    }

    /// Interpret `valueName Type ::= value`
    pub(super) fn value_assignment(&self, iter: &mut ElementIter) -> Result<ValueAssignment> {
        let value_name = iter.next_token()?.to_string();
        let type_decl = self.next_as::<TypeDecl>(iter)?;
        iter.next_token()?;
        let value = self.next_value(iter)?;
        iter.assert_empty()?;

        Ok(ValueAssignment {
            value_name,
            type_decl,
            value,
        })
    }
}

impl Display for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} DEFINITIONS ::=", self.name)?;
        writeln!(f, "BEGIN")?;
        for assignment in &self.assignments {
            writeln!(f, "{assignment}")?;
        }
        writeln!(f, "END")
    }
}

impl Display for Assignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Assignment::Type(assignment) => assignment.fmt(f),
            Assignment::Value(assignment) => assignment.fmt(f),
        }
    }
}

impl Display for TypeAssignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ::= {}", self.type_name, self.type_decl)
    }
}

impl Display for ValueAssignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} ::= {}", self.value_name, self.type_decl, self.value)
    }
}
