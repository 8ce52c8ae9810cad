//! Builders for parse trees shaped the way the parser hands them over

use indexmap::IndexSet;

use crate::{
    analysis::Dependent,
    cst::{Element, ParseNode, ParseTag},
    sema::Reference,
};

pub fn node<E: Into<Element>>(tag: ParseTag, elements: impl IntoIterator<Item = E>) -> ParseNode {
    ParseNode::new(tag, elements.into_iter().map(Into::into))
}

/// Wrap a type production in the generic `Type` node
pub fn ty(inner: ParseNode) -> ParseNode {
    node(ParseTag::Type, [inner])
}

pub fn simple(name: &str) -> ParseNode {
    ty(node(ParseTag::SimpleType, [name]))
}

pub fn simple_range(name: &str, min: &str, max: &str) -> ParseNode {
    ty(node(
        ParseTag::SimpleType,
        [
            Element::from(name),
            node(ParseTag::Constraint, [min, max]).into(),
        ],
    ))
}

pub fn reference(name: &str) -> ParseNode {
    ty(node(ParseTag::ReferencedType, [name]))
}

pub fn qualified_reference(module: &str, name: &str) -> ParseNode {
    ty(node(
        ParseTag::ReferencedType,
        [
            Element::from(node(ParseTag::ModuleReference, [module])),
            Element::from(name),
        ],
    ))
}

pub fn named_type(identifier: &str, type_node: ParseNode) -> ParseNode {
    node(
        ParseTag::NamedType,
        [node(ParseTag::Identifier, [identifier]), type_node],
    )
}

/// A member with no identifier, e.g. a CHOICE alternative written as a bare type
pub fn anonymous(type_node: ParseNode) -> ParseNode {
    node(ParseTag::NamedType, [type_node])
}

pub fn component(named: ParseNode) -> ParseNode {
    node(ParseTag::ComponentType, [named])
}

pub fn optional(named: ParseNode) -> ParseNode {
    component(node(ParseTag::ComponentTypeOptional, [named]))
}

pub fn default(named: ParseNode, value: impl Into<Element>) -> ParseNode {
    component(node(
        ParseTag::ComponentTypeDefault,
        [Element::from(named), value.into()],
    ))
}

pub fn components_of(type_node: ParseNode) -> ParseNode {
    component(node(ParseTag::ComponentTypeComponentsOf, [type_node]))
}

pub fn sequence(members: Vec<ParseNode>) -> ParseNode {
    constructed(ParseTag::SequenceType, "SEQUENCE", members)
}

pub fn choice(members: Vec<ParseNode>) -> ParseNode {
    constructed(ParseTag::ChoiceType, "CHOICE", members)
}

pub fn set(members: Vec<ParseNode>) -> ParseNode {
    constructed(ParseTag::SetType, "SET", members)
}

fn constructed(tag: ParseTag, keyword: &str, members: Vec<ParseNode>) -> ParseNode {
    ty(node(tag, [Element::from(keyword), Element::from(members)]))
}

pub fn sequence_of(size: Option<(&str, &str)>, element: ParseNode) -> ParseNode {
    let mut elements = vec![];
    if let Some((min, max)) = size {
        elements.push(node(ParseTag::SizeConstraint, [min, max]));
    }
    elements.push(element);
    ty(node(ParseTag::SequenceOfType, elements))
}

pub fn set_of(size: Option<(&str, &str)>, element: ParseNode) -> ParseNode {
    let mut elements = vec![];
    if let Some((min, max)) = size {
        elements.push(node(ParseTag::SizeConstraint, [min, max]));
    }
    elements.push(element);
    ty(node(ParseTag::SetOfType, elements))
}

/// A context specific tag, with an optional IMPLICIT or EXPLICIT keyword
pub fn tagged(number: &str, keyword: Option<&str>, type_node: ParseNode) -> ParseNode {
    let tag = node(ParseTag::Tag, [node(ParseTag::TagClassNumber, [number])]);

    let mut elements = vec![Element::from(tag)];
    elements.extend(keyword.map(Element::from));
    elements.push(type_node.into());
    ty(node(ParseTag::TaggedType, elements))
}

pub fn named_value(identifier: &str, value: Option<&str>) -> ParseNode {
    match value {
        None => node(ParseTag::NamedValue, [identifier]),
        Some(value) => node(
            ParseTag::NamedValue,
            [
                node(ParseTag::Identifier, [identifier]),
                node(ParseTag::Value, [value]),
            ],
        ),
    }
}

pub fn extension() -> ParseNode {
    ParseNode::new(ParseTag::ExtensionMarker, [])
}

pub fn enumerated(items: Vec<ParseNode>) -> ParseNode {
    ty(node(
        ParseTag::ValueListType,
        [Element::from("ENUMERATED"), Element::from(items)],
    ))
}

/// BIT STRING, with named bits when given
pub fn bit_string(bits: Option<Vec<ParseNode>>) -> ParseNode {
    let mut elements = vec![Element::from("BIT STRING")];
    elements.extend(bits.map(Element::from));
    ty(node(ParseTag::BitStringType, elements))
}

pub fn name_and_number(name: &str, number: &str) -> ParseNode {
    node(
        ParseTag::NameAndNumberForm,
        [
            node(ParseTag::NameForm, [name]),
            node(ParseTag::NumberForm, [number]),
        ],
    )
}

pub fn oid(components: Vec<ParseNode>) -> ParseNode {
    node(ParseTag::ObjectIdentifierValue, components)
}

pub fn type_assignment(name: &str, type_node: ParseNode) -> ParseNode {
    node(
        ParseTag::TypeAssignment,
        [Element::from(name), Element::from("::="), type_node.into()],
    )
}

pub fn value_assignment(name: &str, type_node: ParseNode, value: impl Into<Element>) -> ParseNode {
    node(
        ParseTag::ValueAssignment,
        [
            Element::from(name),
            type_node.into(),
            Element::from("::="),
            value.into(),
        ],
    )
}

pub fn module(name: &str, assignments: Vec<ParseNode>) -> ParseNode {
    let body = node(
        ParseTag::ModuleBody,
        [
            node(ParseTag::Exports, Vec::<Element>::new()),
            node(ParseTag::Imports, Vec::<Element>::new()),
            node(ParseTag::AssignmentList, assignments),
        ],
    );

    node(
        ParseTag::ModuleDefinition,
        [
            Element::from(node(ParseTag::ModuleReference, [name])),
            Element::from("DEFINITIONS"),
            Element::from("AUTOMATIC TAGS"),
            Element::from(""),
            Element::from("::="),
            Element::from(body),
            Element::from("END"),
        ],
    )
}

/// A bare named definition for exercising the ordering algorithms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub name: &'static str,
    pub references: Vec<&'static str>,
}

pub fn def(name: &'static str, references: &[&'static str]) -> Definition {
    Definition {
        name,
        references: references.to_vec(),
    }
}

pub fn names<T: Reference>(items: &[T]) -> Vec<&str> {
    items.iter().map(|item| item.reference_name()).collect()
}

impl Reference for Definition {
    fn reference_name(&self) -> &str {
        self.name
    }
}

impl Dependent for Definition {
    fn references(&self) -> IndexSet<String> {
        self.references.iter().map(|name| name.to_string()).collect()
    }
}
