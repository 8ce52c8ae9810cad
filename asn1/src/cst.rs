//! Representation of an annotated ASN.1 parse tree, as handed over by the
//! parser.  Every node carries the grammar production that produced it and the
//! ordered elements the production matched.

use std::{fmt::Display, str::FromStr};

use crate::sema::SemaError;

/// A single annotated node of the parse tree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParseNode {
    /// The grammar production this node was produced by
    pub tag: ParseTag,

    /// Everything matched by the production, in source order
    pub elements: Vec<Element>,
}

/// One element of a parse node
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Element {
    /// A nested production
    Node(ParseNode),

    /// A raw token value, e.g. a name, keyword or number
    Token(String),

    /// A nested ordered sequence of productions, e.g. a component list
    List(Vec<ParseNode>),
}

/// The possible kinds of parse tree node
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ParseTag {
    // module
    ModuleDefinition,
    ModuleReference,
    ModuleBody,
    Exports,
    Imports,
    AssignmentList,
    TypeAssignment,
    ValueAssignment,

    // type
    Type,
    SimpleType,
    ReferencedType,
    TaggedType,
    Tag,
    TagClass,
    TagClassNumber,
    SequenceType,
    SetType,
    ChoiceType,
    SequenceOfType,
    SetOfType,
    ValueListType,
    BitStringType,
    Constraint,
    SizeConstraint,

    // members
    ComponentType,
    ComponentTypeOptional,
    ComponentTypeDefault,
    ComponentTypeComponentsOf,
    NamedType,
    NamedValue,
    Identifier,
    ExtensionMarker,

    // value
    Value,
    ReferencedValue,
    ObjectIdentifierValue,
    NameForm,
    NumberForm,
    NameAndNumberForm,
    BinaryStringValue,
    HexStringValue,
}

/// String/Enum mapping for production names
pub const TAG_DATA: [(&str, ParseTag); 40] = [
    ("ModuleDefinition", ParseTag::ModuleDefinition),
    ("ModuleReference", ParseTag::ModuleReference),
    ("ModuleBody", ParseTag::ModuleBody),
    ("Exports", ParseTag::Exports),
    ("Imports", ParseTag::Imports),
    ("AssignmentList", ParseTag::AssignmentList),
    ("TypeAssignment", ParseTag::TypeAssignment),
    ("ValueAssignment", ParseTag::ValueAssignment),
    ("Type", ParseTag::Type),
    ("SimpleType", ParseTag::SimpleType),
    ("ReferencedType", ParseTag::ReferencedType),
    ("TaggedType", ParseTag::TaggedType),
    ("Tag", ParseTag::Tag),
    ("TagClass", ParseTag::TagClass),
    ("TagClassNumber", ParseTag::TagClassNumber),
    ("SequenceType", ParseTag::SequenceType),
    ("SetType", ParseTag::SetType),
    ("ChoiceType", ParseTag::ChoiceType),
    ("SequenceOfType", ParseTag::SequenceOfType),
    ("SetOfType", ParseTag::SetOfType),
    ("ValueListType", ParseTag::ValueListType),
    ("BitStringType", ParseTag::BitStringType),
    ("Constraint", ParseTag::Constraint),
    ("SizeConstraint", ParseTag::SizeConstraint),
    ("ComponentType", ParseTag::ComponentType),
    ("ComponentTypeOptional", ParseTag::ComponentTypeOptional),
    ("ComponentTypeDefault", ParseTag::ComponentTypeDefault),
    ("ComponentTypeComponentsOf", ParseTag::ComponentTypeComponentsOf),
    ("NamedType", ParseTag::NamedType),
    ("NamedValue", ParseTag::NamedValue),
    ("Identifier", ParseTag::Identifier),
    ("ExtensionMarker", ParseTag::ExtensionMarker),
    ("Value", ParseTag::Value),
    ("ReferencedValue", ParseTag::ReferencedValue),
    ("ObjectIdentifierValue", ParseTag::ObjectIdentifierValue),
    ("NameForm", ParseTag::NameForm),
    ("NumberForm", ParseTag::NumberForm),
    ("NameAndNumberForm", ParseTag::NameAndNumberForm),
    ("BinaryStringValue", ParseTag::BinaryStringValue),
    ("HexStringValue", ParseTag::HexStringValue),
];

impl ParseTag {
    /// The grammar production name of this tag
    pub fn name(self) -> &'static str {
        TAG_DATA
            .iter()
            .find(|(_, tag)| *tag == self)
            .map(|(name, _)| *name)
            .unwrap_or("?")
    }
}

impl FromStr for ParseTag {
    type Err = SemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TAG_DATA
            .iter()
            .find(|(name, _)| *name == s)
            .map(|(_, tag)| *tag)
            .ok_or_else(|| SemaError::UnknownNodeKind {
                kind: s.to_string(),
            })
    }
}

impl Display for ParseTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl ParseNode {
    /// Create a new parse node
    pub fn new(tag: ParseTag, elements: impl IntoIterator<Item = Element>) -> Self {
        Self {
            tag,
            elements: elements.into_iter().collect(),
        }
    }

    /// Create a parse node from a textual production name, as produced by
    /// parsers that annotate their output with strings.
    pub fn from_tagged(
        tag: &str,
        elements: impl IntoIterator<Item = Element>,
    ) -> Result<Self, SemaError> {
        Ok(Self::new(tag.parse()?, elements))
    }

    /// The first element of this node, if it is itself a node
    pub fn first_node(&self) -> Option<&ParseNode> {
        match self.elements.first() {
            Some(Element::Node(node)) => Some(node),
            _ => None,
        }
    }
}

impl Element {
    /// The production tag of this element if it is a node
    pub fn tag(&self) -> Option<ParseTag> {
        match self {
            Element::Node(node) => Some(node.tag),
            _ => None,
        }
    }
}

impl From<ParseNode> for Element {
    fn from(value: ParseNode) -> Self {
        Element::Node(value)
    }
}

impl From<&str> for Element {
    fn from(value: &str) -> Self {
        Element::Token(value.to_string())
    }
}

impl From<String> for Element {
    fn from(value: String) -> Self {
        Element::Token(value)
    }
}

impl From<Vec<ParseNode>> for Element {
    fn from(value: Vec<ParseNode>) -> Self {
        Element::List(value)
    }
}

impl Display for ParseNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fmt = TreeFormatter {
            item: TreeItem::Node(self),
            prefix: String::new(),
            child_prefix: String::new(),
        };

        write!(f, "{fmt}")
    }
}

/// Anything that can appear as a line of the tree dump
#[derive(Clone, Copy)]
enum TreeItem<'a> {
    Node(&'a ParseNode),
    Element(&'a Element),
}

struct TreeFormatter<'a> {
    item: TreeItem<'a>,
    prefix: String,
    child_prefix: String,
}

impl TreeFormatter<'_> {
    /// Write a header line followed by all children with tree guides
    fn branch<'c>(
        &self,
        f: &mut std::fmt::Formatter<'_>,
        header: impl Display,
        children: impl Iterator<Item = TreeItem<'c>>,
    ) -> std::fmt::Result {
        let children: Vec<_> = children.collect();
        let Some((last, head)) = children.split_last() else {
            return writeln!(f, "{header} (empty)");
        };

        writeln!(f, "{header}")?;

        for &item in head {
            let fmt = TreeFormatter {
                item,
                prefix: self.child_prefix.clone() + "|-- ",
                child_prefix: self.child_prefix.clone() + "|   ",
            };

            write!(f, "{fmt}")?;
        }

        let fmt = TreeFormatter {
            item: *last,
            prefix: self.child_prefix.clone() + "`-- ",
            child_prefix: self.child_prefix.clone() + "    ",
        };

        write!(f, "{fmt}")
    }
}

impl Display for TreeFormatter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.prefix)?;

        match self.item {
            TreeItem::Node(node) => self.branch(
                f,
                format_args!("{}:", node.tag),
                node.elements.iter().map(TreeItem::Element),
            ),
            TreeItem::Element(Element::Node(node)) => TreeFormatter {
                item: TreeItem::Node(node),
                prefix: String::new(),
                child_prefix: self.child_prefix.clone(),
            }
            .fmt(f),
            TreeItem::Element(Element::Token(value)) => writeln!(f, "{value:?}"),
            TreeItem::Element(Element::List(nodes)) => {
                self.branch(f, "[list]", nodes.iter().map(TreeItem::Node))
            }
        }
    }
}
