//! Uniform, borrowed view over every kind of semantic node, used to walk the
//! model without caring which concrete node kind is being looked at.

use std::fmt::Display;

use super::{
    Assignment, BinaryStringValue, BitStringType, CollectionType, ComponentType, Constraint,
    ConstructedType, ExtensionMarker, HexStringValue, Member, Module, NameAndNumberForm, NameForm,
    NamedType, NamedValue, NumberForm, ObjectIdentifierComponent, ObjectIdentifierValue,
    Presence, ReferencedType, ReferencedValue, SimpleType, TaggedType, TypeAssignment, TypeDecl,
    Value, ValueAssignment, ValueListItem, ValueListType,
};

/// A reference to any node within the semantic model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRef<'a> {
    Module(&'a Module),
    TypeAssignment(&'a TypeAssignment),
    ValueAssignment(&'a ValueAssignment),
    ConstructedType(&'a ConstructedType),
    CollectionType(&'a CollectionType),
    TaggedType(&'a TaggedType),
    SimpleType(&'a SimpleType),
    ReferencedType(&'a ReferencedType),
    ReferencedValue(&'a ReferencedValue),
    Constraint(&'a Constraint),
    ComponentType(&'a ComponentType),
    NamedType(&'a NamedType),
    ValueListType(&'a ValueListType),
    BitStringType(&'a BitStringType),
    NamedValue(&'a NamedValue),
    ExtensionMarker(&'a ExtensionMarker),
    NameForm(&'a NameForm),
    NumberForm(&'a NumberForm),
    NameAndNumberForm(&'a NameAndNumberForm),
    ObjectIdentifierValue(&'a ObjectIdentifierValue),
    BinaryStringValue(&'a BinaryStringValue),
    HexStringValue(&'a HexStringValue),
}

/// A node that stands for a name defined elsewhere, or that defines a name
/// others can refer to.
pub trait Reference {
    /// The name being referenced or defined
    fn reference_name(&self) -> &str;
}

impl<T: Reference + ?Sized> Reference for &T {
    fn reference_name(&self) -> &str {
        (**self).reference_name()
    }
}

/// Anything that is part of the semantic model tree
pub trait Node {
    /// Get a uniform view of this node
    fn as_node(&self) -> NodeRef<'_>;

    /// All directly owned nodes
    fn children(&self) -> Vec<NodeRef<'_>> {
        self.as_node().children()
    }

    /// All recursively owned nodes, depth first, pre-order
    fn descendants(&self) -> Vec<NodeRef<'_>> {
        self.as_node().descendants()
    }
}

impl<'a> NodeRef<'a> {
    /// All directly owned nodes, in declaration order.  Raw literal values are
    /// not nodes and are skipped.
    pub fn children(self) -> Vec<NodeRef<'a>> {
        let mut out = vec![];

        match self {
            NodeRef::Module(module) => {
                out.extend(module.assignments().iter().map(Assignment::as_node))
            }
            NodeRef::TypeAssignment(assignment) => out.push(assignment.type_decl.as_node()),
            NodeRef::ValueAssignment(assignment) => {
                out.push(assignment.type_decl.as_node());
                out.extend(assignment.value.as_node());
            }
            NodeRef::ConstructedType(ty) => {
                out.extend(ty.components.iter().map(Member::as_node))
            }
            NodeRef::CollectionType(ty) => {
                out.extend(ty.size_constraint.as_ref().map(NodeRef::Constraint));
                out.push(ty.type_decl.as_node());
            }
            NodeRef::TaggedType(ty) => out.push(ty.type_decl.as_node()),
            NodeRef::SimpleType(ty) => out.extend(ty.constraint.as_ref().map(NodeRef::Constraint)),
            NodeRef::Constraint(constraint) => {
                out.extend(constraint.min_value.as_node());
                out.extend(constraint.max_value.as_node());
            }
            NodeRef::ComponentType(ComponentType::Named {
                type_decl,
                presence,
                ..
            }) => {
                out.push(type_decl.as_node());
                if let Presence::Default(value) = presence {
                    out.extend(value.as_node());
                }
            }
            NodeRef::ComponentType(ComponentType::ComponentsOf(type_decl)) => {
                out.push(type_decl.as_node())
            }
            NodeRef::NamedType(named) => out.push(named.type_decl.as_node()),
            NodeRef::ValueListType(ty) => out.extend(
                ty.named_values
                    .iter()
                    .flatten()
                    .map(ValueListItem::as_node),
            ),
            NodeRef::BitStringType(ty) => {
                out.extend(ty.named_bits.iter().flatten().map(ValueListItem::as_node))
            }
            NodeRef::NameAndNumberForm(form) => {
                out.push(NodeRef::NameForm(&form.name));
                out.push(NodeRef::NumberForm(&form.number));
            }
            NodeRef::ObjectIdentifierValue(oid) => out.extend(
                oid.components
                    .iter()
                    .map(ObjectIdentifierComponent::as_node),
            ),
            NodeRef::ReferencedType(_)
            | NodeRef::ReferencedValue(_)
            | NodeRef::NamedValue(_)
            | NodeRef::ExtensionMarker(_)
            | NodeRef::NameForm(_)
            | NodeRef::NumberForm(_)
            | NodeRef::BinaryStringValue(_)
            | NodeRef::HexStringValue(_) => {}
        }

        out
    }

    /// All recursively owned nodes.  Each child is listed before its own
    /// descendants, siblings left to right.  A node never lists itself.
    pub fn descendants(self) -> Vec<NodeRef<'a>> {
        let mut out = vec![];
        self.collect_descendants(&mut out);
        out
    }

    fn collect_descendants(self, out: &mut Vec<NodeRef<'a>>) {
        for child in self.children() {
            out.push(child);
            child.collect_descendants(out);
        }
    }

    /// Get the reference name capability of this node, if it has one
    pub fn as_reference(self) -> Option<&'a dyn Reference> {
        match self {
            NodeRef::TypeAssignment(node) => Some(node),
            NodeRef::ValueAssignment(node) => Some(node),
            NodeRef::ReferencedType(node) => Some(node),
            NodeRef::ReferencedValue(node) => Some(node),
            NodeRef::NameForm(node) => Some(node),
            _ => None,
        }
    }

    /// Name of the node kind, matching the grammar production it is built from
    pub fn kind(self) -> &'static str {
        match self {
            NodeRef::Module(_) => "ModuleDefinition",
            NodeRef::TypeAssignment(_) => "TypeAssignment",
            NodeRef::ValueAssignment(_) => "ValueAssignment",
            NodeRef::ConstructedType(ty) => ty.kind.production(),
            NodeRef::CollectionType(ty) => ty.kind.production(),
            NodeRef::TaggedType(_) => "TaggedType",
            NodeRef::SimpleType(_) => "SimpleType",
            NodeRef::ReferencedType(_) => "ReferencedType",
            NodeRef::ReferencedValue(_) => "ReferencedValue",
            NodeRef::Constraint(constraint) => constraint.kind.production(),
            NodeRef::ComponentType(_) => "ComponentType",
            NodeRef::NamedType(_) => "NamedType",
            NodeRef::ValueListType(_) => "ValueListType",
            NodeRef::BitStringType(_) => "BitStringType",
            NodeRef::NamedValue(_) => "NamedValue",
            NodeRef::ExtensionMarker(_) => "ExtensionMarker",
            NodeRef::NameForm(_) => "NameForm",
            NodeRef::NumberForm(_) => "NumberForm",
            NodeRef::NameAndNumberForm(_) => "NameAndNumberForm",
            NodeRef::ObjectIdentifierValue(_) => "ObjectIdentifierValue",
            NodeRef::BinaryStringValue(_) => "BinaryStringValue",
            NodeRef::HexStringValue(_) => "HexStringValue",
        }
    }
}

impl Display for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            NodeRef::Module(node) => node.fmt(f),
            NodeRef::TypeAssignment(node) => node.fmt(f),
            NodeRef::ValueAssignment(node) => node.fmt(f),
            NodeRef::ConstructedType(node) => node.fmt(f),
            NodeRef::CollectionType(node) => node.fmt(f),
            NodeRef::TaggedType(node) => node.fmt(f),
            NodeRef::SimpleType(node) => node.fmt(f),
            NodeRef::ReferencedType(node) => node.fmt(f),
            NodeRef::ReferencedValue(node) => node.fmt(f),
            NodeRef::Constraint(node) => node.fmt(f),
            NodeRef::ComponentType(node) => node.fmt(f),
            NodeRef::NamedType(node) => node.fmt(f),
            NodeRef::ValueListType(node) => node.fmt(f),
            NodeRef::BitStringType(node) => node.fmt(f),
            NodeRef::NamedValue(node) => node.fmt(f),
            NodeRef::ExtensionMarker(node) => node.fmt(f),
            NodeRef::NameForm(node) => node.fmt(f),
            NodeRef::NumberForm(node) => node.fmt(f),
            NodeRef::NameAndNumberForm(node) => node.fmt(f),
            NodeRef::ObjectIdentifierValue(node) => node.fmt(f),
            NodeRef::BinaryStringValue(node) => node.fmt(f),
            NodeRef::HexStringValue(node) => node.fmt(f),
        }
    }
}

macro_rules! impl_node {
    ($($ty:ident),* $(,)?) => {
        $(
            impl Node for $ty {
                fn as_node(&self) -> NodeRef<'_> {
                    NodeRef::$ty(self)
                }
            }
        )*
    };
}

impl_node!(
    Module,
    TypeAssignment,
    ValueAssignment,
    ConstructedType,
    CollectionType,
    TaggedType,
    SimpleType,
    ReferencedType,
    ReferencedValue,
    Constraint,
    ComponentType,
    NamedType,
    ValueListType,
    BitStringType,
    NamedValue,
    ExtensionMarker,
    NameForm,
    NumberForm,
    NameAndNumberForm,
    ObjectIdentifierValue,
    BinaryStringValue,
    HexStringValue,
);

impl Node for TypeDecl {
    fn as_node(&self) -> NodeRef<'_> {
        match self {
            TypeDecl::Constructed(ty) => NodeRef::ConstructedType(ty),
            TypeDecl::Collection(ty) => NodeRef::CollectionType(ty),
            TypeDecl::Tagged(ty) => NodeRef::TaggedType(ty),
            TypeDecl::Simple(ty) => NodeRef::SimpleType(ty),
            TypeDecl::Referenced(ty) => NodeRef::ReferencedType(ty),
            TypeDecl::ValueList(ty) => NodeRef::ValueListType(ty),
            TypeDecl::BitString(ty) => NodeRef::BitStringType(ty),
        }
    }
}

impl Node for Assignment {
    fn as_node(&self) -> NodeRef<'_> {
        match self {
            Assignment::Type(assignment) => NodeRef::TypeAssignment(assignment),
            Assignment::Value(assignment) => NodeRef::ValueAssignment(assignment),
        }
    }
}

impl Node for Member {
    fn as_node(&self) -> NodeRef<'_> {
        match self {
            Member::Component(member) => NodeRef::ComponentType(member),
            Member::Named(member) => NodeRef::NamedType(member),
            Member::Extension(marker) => NodeRef::ExtensionMarker(marker),
        }
    }
}

impl Node for ValueListItem {
    fn as_node(&self) -> NodeRef<'_> {
        match self {
            ValueListItem::Named(value) => NodeRef::NamedValue(value),
            ValueListItem::Extension(marker) => NodeRef::ExtensionMarker(marker),
        }
    }
}

impl Node for ObjectIdentifierComponent {
    fn as_node(&self) -> NodeRef<'_> {
        match self {
            ObjectIdentifierComponent::Name(form) => NodeRef::NameForm(form),
            ObjectIdentifierComponent::Number(form) => NodeRef::NumberForm(form),
            ObjectIdentifierComponent::NameAndNumber(form) => NodeRef::NameAndNumberForm(form),
        }
    }
}

impl Value {
    /// The node held by this value, or `None` for a raw literal
    pub fn as_node(&self) -> Option<NodeRef<'_>> {
        match self {
            Value::Literal(_) => None,
            Value::Referenced(value) => Some(NodeRef::ReferencedValue(value)),
            Value::ObjectIdentifier(value) => Some(NodeRef::ObjectIdentifierValue(value)),
            Value::BinaryString(value) => Some(NodeRef::BinaryStringValue(value)),
            Value::HexString(value) => Some(NodeRef::HexStringValue(value)),
        }
    }
}
