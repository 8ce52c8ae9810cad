//! The semantic model of an ASN.1 module, built from an annotated parse tree.

mod error;
mod member;
mod module;
mod node;
mod ty;
mod value;

#[cfg(test)]
mod build_tests;

use std::{fmt::Display, slice};

use crate::{
    builder::ModelBuilder,
    cst::{Element, ParseNode, ParseTag},
    util::{CowVec, Peek, Peekable},
};

pub use self::{
    error::{Malformed, ResolveError, Result, SemaError},
    member::{ComponentType, ExtensionMarker, Member, NamedType, NamedValue, Presence, ValueListItem},
    module::{Assignment, Module, TypeAssignment, ValueAssignment},
    node::{Node, NodeRef, Reference},
    ty::{
        BitStringType, CollectionKind, CollectionType, ConstraintKind, Constraint, ConstructedKind,
        ConstructedType, ReferencedType, SimpleType, TaggedType, TypeDecl, ValueListType,
    },
    value::{
        BinaryStringValue, HexStringValue, NameAndNumberForm, NameForm, NumberForm,
        ObjectIdentifierComponent, ObjectIdentifierValue, ReferencedValue, Value,
    },
};

/// Any node the model builder can produce from a single parse node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SemaNode {
    Module(Module),
    TypeAssignment(TypeAssignment),
    ValueAssignment(ValueAssignment),
    Type(TypeDecl),
    ComponentType(ComponentType),
    NamedType(NamedType),
    NamedValue(NamedValue),
    ExtensionMarker(ExtensionMarker),
    SizeConstraint(Constraint),
    ReferencedValue(ReferencedValue),
    ObjectIdentifierValue(ObjectIdentifierValue),
    NameForm(NameForm),
    NumberForm(NumberForm),
    NameAndNumberForm(NameAndNumberForm),
    BinaryStringValue(BinaryStringValue),
    HexStringValue(HexStringValue),
}

impl Node for SemaNode {
    fn as_node(&self) -> NodeRef<'_> {
        match self {
            SemaNode::Module(node) => node.as_node(),
            SemaNode::TypeAssignment(node) => node.as_node(),
            SemaNode::ValueAssignment(node) => node.as_node(),
            SemaNode::Type(node) => node.as_node(),
            SemaNode::ComponentType(node) => node.as_node(),
            SemaNode::NamedType(node) => node.as_node(),
            SemaNode::NamedValue(node) => node.as_node(),
            SemaNode::ExtensionMarker(node) => node.as_node(),
            SemaNode::SizeConstraint(node) => node.as_node(),
            SemaNode::ReferencedValue(node) => node.as_node(),
            SemaNode::ObjectIdentifierValue(node) => node.as_node(),
            SemaNode::NameForm(node) => node.as_node(),
            SemaNode::NumberForm(node) => node.as_node(),
            SemaNode::NameAndNumberForm(node) => node.as_node(),
            SemaNode::BinaryStringValue(node) => node.as_node(),
            SemaNode::HexStringValue(node) => node.as_node(),
        }
    }
}

impl Display for SemaNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.as_node().fmt(f)
    }
}

/// A typed slot within a node that only accepts some kinds of node
pub(crate) trait Category: TryFrom<SemaNode, Error = SemaNode> {
    /// Description of the accepted kinds, for error messages
    const EXPECTED: &'static str;
}

macro_rules! category {
    ($ty:ty, $expected:literal, { $($pat:pat => $out:expr),* $(,)? }) => {
        impl TryFrom<SemaNode> for $ty {
            type Error = SemaNode;

            fn try_from(value: SemaNode) -> std::result::Result<Self, Self::Error> {
                match value {
                    $($pat => Ok($out),)*
                    other => Err(other),
                }
            }
        }

        impl Category for $ty {
            const EXPECTED: &'static str = $expected;
        }
    };
}

category!(TypeDecl, "a type", {
    SemaNode::Type(ty) => ty,
});

category!(Assignment, "an assignment", {
    SemaNode::TypeAssignment(a) => Assignment::Type(a),
    SemaNode::ValueAssignment(a) => Assignment::Value(a),
});

category!(Value, "a value", {
    SemaNode::ReferencedValue(v) => Value::Referenced(v),
    SemaNode::ObjectIdentifierValue(v) => Value::ObjectIdentifier(v),
    SemaNode::BinaryStringValue(v) => Value::BinaryString(v),
    SemaNode::HexStringValue(v) => Value::HexString(v),
});

category!(Member, "a SEQUENCE, SET or CHOICE member", {
    SemaNode::ComponentType(m) => Member::Component(m),
    SemaNode::NamedType(m) => Member::Named(m),
    SemaNode::ExtensionMarker(m) => Member::Extension(m),
});

category!(ValueListItem, "a named value", {
    SemaNode::NamedValue(v) => ValueListItem::Named(v),
    SemaNode::ExtensionMarker(m) => ValueListItem::Extension(m),
});

category!(ObjectIdentifierComponent, "an object identifier component", {
    SemaNode::NameForm(c) => ObjectIdentifierComponent::Name(c),
    SemaNode::NumberForm(c) => ObjectIdentifierComponent::Number(c),
    SemaNode::NameAndNumberForm(c) => ObjectIdentifierComponent::NameAndNumber(c),
});

category!(Module, "a module", {
    SemaNode::Module(m) => m,
});

/// Cursor over the elements of a single parse node
#[derive(Debug, Clone)]
pub(crate) struct ElementIter<'a> {
    /// Tag of the node being read
    pub tag: ParseTag,

    /// Index of the next element
    index: usize,

    iter: Peekable<slice::Iter<'a, Element>>,
}

impl<'a> ElementIter<'a> {
    pub fn new(node: &'a ParseNode) -> Self {
        Self {
            tag: node.tag,
            index: 0,
            iter: node.elements.iter().n_peekable(),
        }
    }

    /// Create an error about the node being read
    pub fn malformed(&self, problem: Malformed) -> SemaError {
        SemaError::MalformedInput {
            tag: self.tag,
            problem,
        }
    }

    /// Error for a required node that is not present
    pub fn missing(&self, expected: impl Into<CowVec<ParseTag>>) -> SemaError {
        self.malformed(Malformed::ExpectedNode {
            index: self.index,
            expected: expected.into(),
        })
    }

    /// Look at an element without consuming it
    pub fn peek(&mut self, n: usize) -> Option<&'a Element> {
        self.iter.peek(n).copied()
    }

    /// Tag of an upcoming element, if it is a node
    pub fn peek_tag(&mut self, n: usize) -> Option<ParseTag> {
        self.peek(n).and_then(Element::tag)
    }

    /// Value of an upcoming element, if it is a token
    pub fn peek_token(&mut self, n: usize) -> Option<&'a str> {
        match self.peek(n)? {
            Element::Token(tok) => Some(tok),
            _ => None,
        }
    }

    /// Consume any element
    pub fn next_element(&mut self) -> Result<&'a Element> {
        let Some(element) = self.iter.next() else {
            return Err(self.missing(&[]));
        };
        self.index += 1;
        Ok(element)
    }

    /// Consume elements whose content does not matter
    pub fn skip(&mut self, count: usize) -> Result {
        for _ in 0..count {
            self.next_element()?;
        }
        Ok(())
    }

    /// Consume a node with one of the given tags.  If an empty list is given,
    /// accepts any node.
    pub fn next_node(&mut self, expected: impl Into<CowVec<ParseTag>>) -> Result<&'a ParseNode> {
        let expected = expected.into();
        let index = self.index;

        let node = match self.iter.next() {
            Some(Element::Node(node)) => node,
            _ => return Err(self.malformed(Malformed::ExpectedNode { index, expected })),
        };
        self.index += 1;

        if !expected.is_empty() && !expected.contains(&node.tag) {
            return Err(self.malformed(Malformed::WrongNode {
                index,
                expected,
                got: node.tag,
            }));
        }

        Ok(node)
    }

    /// Consume a node with one of the given tags and iterate over its elements
    pub fn node_iter(&mut self, expected: impl Into<CowVec<ParseTag>>) -> Result<ElementIter<'a>> {
        Ok(ElementIter::new(self.next_node(expected)?))
    }

    /// Consume a raw token
    pub fn next_token(&mut self) -> Result<&'a str> {
        let index = self.index;
        match self.iter.next() {
            Some(Element::Token(tok)) => {
                self.index += 1;
                Ok(tok)
            }
            _ => Err(self.malformed(Malformed::ExpectedToken { index })),
        }
    }

    /// Consume a nested sequence of nodes
    pub fn next_list(&mut self) -> Result<&'a [ParseNode]> {
        let index = self.index;
        match self.iter.next() {
            Some(Element::List(list)) => {
                self.index += 1;
                Ok(list)
            }
            _ => Err(self.malformed(Malformed::ExpectedList { index })),
        }
    }

    /// Are there any more elements in this iterator
    pub fn assert_empty(&mut self) -> Result {
        if self.iter.remaining() == 0 {
            Ok(())
        } else {
            Err(self.malformed(Malformed::TrailingElement { index: self.index }))
        }
    }
}

/// Skip any number of generic `Type` wrappers
fn unwrap_type(mut node: &ParseNode) -> &ParseNode {
    while node.tag == ParseTag::Type {
        match node.first_node() {
            Some(inner) => node = inner,
            None => break,
        }
    }
    node
}

impl ModelBuilder {
    /// Build the semantic node for a single parse node
    pub fn build_node(&self, node: &ParseNode) -> Result<SemaNode> {
        let mut iter = ElementIter::new(node);
        let iter = &mut iter;

        let result = match node.tag {
            // type productions wrap a more specific production
            ParseTag::Type => return self.build_node(iter.next_node(&[])?),

            ParseTag::ModuleDefinition => SemaNode::Module(self.module(iter)?),
            ParseTag::TypeAssignment => SemaNode::TypeAssignment(self.type_assignment(iter)?),
            ParseTag::ValueAssignment => SemaNode::ValueAssignment(self.value_assignment(iter)?),

            ParseTag::SequenceType => SemaNode::Type(TypeDecl::Constructed(
                self.constructed_type(iter, ConstructedKind::Sequence)?,
            )),
            ParseTag::SetType => SemaNode::Type(TypeDecl::Constructed(
                self.constructed_type(iter, ConstructedKind::Set)?,
            )),
            ParseTag::ChoiceType => SemaNode::Type(TypeDecl::Constructed(
                self.constructed_type(iter, ConstructedKind::Choice)?,
            )),
            ParseTag::SequenceOfType => SemaNode::Type(TypeDecl::Collection(
                self.collection_type(iter, CollectionKind::SequenceOf)?,
            )),
            ParseTag::SetOfType => SemaNode::Type(TypeDecl::Collection(
                self.collection_type(iter, CollectionKind::SetOf)?,
            )),
            ParseTag::TaggedType => SemaNode::Type(TypeDecl::Tagged(self.tagged_type(iter)?)),
            ParseTag::SimpleType => SemaNode::Type(TypeDecl::Simple(self.simple_type(iter)?)),
            ParseTag::ReferencedType => {
                SemaNode::Type(TypeDecl::Referenced(self.referenced_type(iter)?))
            }
            ParseTag::ValueListType => {
                SemaNode::Type(TypeDecl::ValueList(self.value_list_type(iter)?))
            }
            ParseTag::BitStringType => {
                SemaNode::Type(TypeDecl::BitString(self.bit_string_type(iter)?))
            }
            ParseTag::SizeConstraint => {
                SemaNode::SizeConstraint(self.constraint(iter, ConstraintKind::Size)?)
            }

            ParseTag::ComponentType => SemaNode::ComponentType(self.component_type(iter)?),
            ParseTag::NamedType => SemaNode::NamedType(self.named_type(iter)?),
            ParseTag::NamedValue => SemaNode::NamedValue(self.named_value(iter)?),
            ParseTag::ExtensionMarker => SemaNode::ExtensionMarker(ExtensionMarker),

            ParseTag::ReferencedValue => SemaNode::ReferencedValue(self.referenced_value(iter)?),
            ParseTag::ObjectIdentifierValue => {
                SemaNode::ObjectIdentifierValue(self.object_identifier_value(iter)?)
            }
            ParseTag::NameForm => SemaNode::NameForm(self.name_form(iter)?),
            ParseTag::NumberForm => SemaNode::NumberForm(self.number_form(iter)?),
            ParseTag::NameAndNumberForm => {
                SemaNode::NameAndNumberForm(self.name_and_number_form(iter)?)
            }
            ParseTag::BinaryStringValue => SemaNode::BinaryStringValue(BinaryStringValue {
                value: self.string_digits(iter)?,
            }),
            ParseTag::HexStringValue => SemaNode::HexStringValue(HexStringValue {
                value: self.string_digits(iter)?,
            }),

            // only meaningful nested inside one of the productions above
            ParseTag::ModuleReference
            | ParseTag::ModuleBody
            | ParseTag::Exports
            | ParseTag::Imports
            | ParseTag::AssignmentList
            | ParseTag::Tag
            | ParseTag::TagClass
            | ParseTag::TagClassNumber
            | ParseTag::Constraint
            | ParseTag::ComponentTypeOptional
            | ParseTag::ComponentTypeDefault
            | ParseTag::ComponentTypeComponentsOf
            | ParseTag::Identifier
            | ParseTag::Value => {
                return Err(SemaError::UnknownNodeKind {
                    kind: node.tag.to_string(),
                })
            }
        };

        Ok(result)
    }

    /// Build a node that has to fit the given slot of the node being read
    pub(crate) fn build_as<T: Category>(&self, iter: &ElementIter, node: &ParseNode) -> Result<T> {
        T::try_from(self.build_node(node)?).map_err(|_| {
            iter.malformed(Malformed::WrongCategory {
                expected: T::EXPECTED,
                got: unwrap_type(node).tag,
            })
        })
    }

    /// Consume the next node and build it for the given slot
    pub(crate) fn next_as<T: Category>(&self, iter: &mut ElementIter) -> Result<T> {
        let node = iter.next_node(&[])?;
        self.build_as(iter, node)
    }

    /// Consume the next element as a value: a raw token becomes a literal
    pub(crate) fn next_value(&self, iter: &mut ElementIter) -> Result<Value> {
        let index = iter.index;
        match iter.next_element()? {
            Element::Token(tok) => Ok(Value::Literal(tok.clone())),
            Element::Node(node) => self.build_as(iter, node),
            Element::List(_) => Err(iter.malformed(Malformed::ExpectedNode {
                index,
                expected: CowVec::Borrowed(&[]),
            })),
        }
    }
}
