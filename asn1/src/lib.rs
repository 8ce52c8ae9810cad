//! Semantic model of ASN.1 modules, built from annotated parse trees, and the
//! dependency ordering code generators need to emit definitions in a valid
//! order.

#![forbid(unsafe_code)]

mod analysis;
mod builder;
mod cst;
mod diagnostic;
mod oid;
mod sema;
mod util;

#[cfg(test)]
mod test_utils;

pub use analysis::{
    dependency_graph, dependency_sort, topological_sort, CyclicReferenceError, Dependent,
};
pub use builder::{build_semantic_model, Features, ModelBuilder, UnnamedCounter};
pub use cst::{Element, ParseNode, ParseTag, TAG_DATA};
pub use diagnostic::{Diagnostic, Label, Level};
pub use oid::{registered_oid_arc, REGISTERED_OID_NAMES};
pub use sema::{
    Assignment, BinaryStringValue, BitStringType, CollectionKind, CollectionType, ComponentType,
    Constraint, ConstraintKind, ConstructedKind, ConstructedType, ExtensionMarker, HexStringValue,
    Malformed, Member, Module, NameAndNumberForm, NameForm, NamedType, NamedValue, Node, NodeRef,
    NumberForm, ObjectIdentifierComponent, ObjectIdentifierValue, Presence, Reference,
    ReferencedType, ReferencedValue, ResolveError, SemaError, SemaNode, SimpleType, TaggedType,
    TypeAssignment, TypeDecl, ValueAssignment, Value, ValueListItem, ValueListType,
};
