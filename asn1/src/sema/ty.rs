use std::fmt::Display;

use itertools::Itertools;

use crate::{builder::ModelBuilder, cst::ParseTag};

use super::{
    error::{Malformed, Result},
    node::Reference,
    ElementIter, Member, Value, ValueListItem,
};

/// Any type declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDecl {
    Constructed(ConstructedType),
    Collection(CollectionType),
    Tagged(TaggedType),
    Simple(SimpleType),
    Referenced(ReferencedType),
    ValueList(ValueListType),
    BitString(BitStringType),
}

/// SEQUENCE, SET or CHOICE with a list of members
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructedType {
    pub kind: ConstructedKind,

    /// The keyword as written, e.g. `SEQUENCE`
    pub type_name: String,

    /// Members, including any extension markers
    pub components: Vec<Member>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConstructedKind {
    Sequence,
    Set,
    Choice,
}

/// SEQUENCE OF or SET OF
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionType {
    pub kind: CollectionKind,

    /// Optional SIZE constraint written before `OF`
    pub size_constraint: Option<Constraint>,

    /// The element type
    pub type_decl: Box<TypeDecl>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CollectionKind {
    SequenceOf,
    SetOf,
}

/// A type with an explicit tag, e.g. `[APPLICATION 2] IMPLICIT INTEGER`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedType {
    /// UNIVERSAL, APPLICATION or PRIVATE; context specific when absent
    pub class_name: Option<String>,

    /// The tag number.  Kept as written, it may be a defined value.
    pub class_number: String,

    /// Whether the tag was declared IMPLICIT.  EXPLICIT and no tagging
    /// keyword are both recorded as false.
    pub implicit: bool,

    pub type_decl: Box<TypeDecl>,
}

/// A builtin type, e.g. `INTEGER (0..255)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleType {
    pub type_name: String,
    pub constraint: Option<Constraint>,
}

/// A reference to a type defined by an assignment, possibly in another module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferencedType {
    /// Module the type is defined in, if qualified.  Not resolved.
    pub module_reference: Option<String>,
    pub type_name: String,
}

/// A value range or size bound
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub kind: ConstraintKind,
    pub min_value: Value,
    pub max_value: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConstraintKind {
    /// `(min..max)`
    ValueRange,

    /// `SIZE(min..max)`
    Size,
}

/// ENUMERATED or INTEGER with a list of named values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueListType {
    pub type_name: String,

    /// Every named value has a number once the type is built
    pub named_values: Option<Vec<ValueListItem>>,
}

/// BIT STRING, optionally with named bits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitStringType {
    pub type_name: String,
    pub named_bits: Option<Vec<ValueListItem>>,
}

impl TypeDecl {
    /// The ASN.1 name of the type.  A tagged type reports the type it tags.
    pub fn type_name(&self) -> &str {
        match self {
            TypeDecl::Constructed(ty) => &ty.type_name,
            TypeDecl::Collection(ty) => ty.kind.type_name(),
            TypeDecl::Tagged(ty) => ty.type_decl.type_name(),
            TypeDecl::Simple(ty) => &ty.type_name,
            TypeDecl::Referenced(ty) => &ty.type_name,
            TypeDecl::ValueList(ty) => &ty.type_name,
            TypeDecl::BitString(ty) => &ty.type_name,
        }
    }

    /// Is this a bare reference to another type
    pub fn is_reference(&self) -> bool {
        matches!(self, TypeDecl::Referenced(_))
    }
}

impl ConstructedKind {
    pub(crate) fn production(self) -> &'static str {
        match self {
            ConstructedKind::Sequence => "SequenceType",
            ConstructedKind::Set => "SetType",
            ConstructedKind::Choice => "ChoiceType",
        }
    }
}

impl CollectionKind {
    /// The keyword preceding `OF`
    pub fn keyword(self) -> &'static str {
        match self {
            CollectionKind::SequenceOf => "SEQUENCE",
            CollectionKind::SetOf => "SET",
        }
    }

    pub fn type_name(self) -> &'static str {
        match self {
            CollectionKind::SequenceOf => "SEQUENCE OF",
            CollectionKind::SetOf => "SET OF",
        }
    }

    pub(crate) fn production(self) -> &'static str {
        match self {
            CollectionKind::SequenceOf => "SequenceOfType",
            CollectionKind::SetOf => "SetOfType",
        }
    }
}

impl ConstraintKind {
    pub(crate) fn production(self) -> &'static str {
        match self {
            ConstraintKind::ValueRange => "Constraint",
            ConstraintKind::Size => "SizeConstraint",
        }
    }
}

impl ValueListType {
    /// All named values with their numbers, skipping extension markers
    pub fn values(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.named_values
            .iter()
            .flatten()
            .filter_map(ValueListItem::named)
            .map(|named| (named.identifier.as_str(), named.value.as_deref()))
    }
}

impl Reference for ReferencedType {
    fn reference_name(&self) -> &str {
        &self.type_name
    }
}

impl ModelBuilder {
    /// Interpret a SEQUENCE, SET or CHOICE node
    pub(super) fn constructed_type(
        &self,
        iter: &mut ElementIter,
        kind: ConstructedKind,
    ) -> Result<ConstructedType> {
        let type_name = iter.next_token()?.to_string();
        let list = iter.next_list()?;
        iter.assert_empty()?;

        let components = list
            .iter()
            .map(|node| self.build_as::<Member>(iter, node))
            .collect::<Result<_>>()?;

        Ok(ConstructedType {
            kind,
            type_name,
            components,
        })
    }

    /// Interpret a SEQUENCE OF or SET OF node, with or without a size
    /// constraint in front of the element type.
    pub(super) fn collection_type(
        &self,
        iter: &mut ElementIter,
        kind: CollectionKind,
    ) -> Result<CollectionType> {
        let first = iter.next_node(&[ParseTag::Type, ParseTag::SizeConstraint])?;

        let (size_constraint, type_node) = if first.tag == ParseTag::SizeConstraint {
            let constraint = self.constraint(&mut ElementIter::new(first), ConstraintKind::Size)?;
            (Some(constraint), iter.next_node(&[ParseTag::Type])?)
        } else {
            (None, first)
        };
        iter.assert_empty()?;

        let type_decl = self.build_as::<TypeDecl>(iter, type_node)?;

        Ok(CollectionType {
            kind,
            size_constraint,
            type_decl: Box::new(type_decl),
        })
    }

    /// Interpret a tagged type: `tag type`, `tag IMPLICIT type` or
    /// `tag EXPLICIT type`.
    pub(super) fn tagged_type(&self, iter: &mut ElementIter) -> Result<TaggedType> {
        let mut tag = iter.node_iter(&[ParseTag::Tag])?;

        let mut class_name = None;
        let mut class_number = None;
        while tag.peek(0).is_some() {
            let mut inner = tag.node_iter(&[ParseTag::TagClassNumber, ParseTag::TagClass])?;
            let value = inner.next_token()?.to_string();
            if inner.tag == ParseTag::TagClassNumber {
                class_number = Some(value);
            } else {
                class_name = Some(value);
            }
        }
        let Some(class_number) = class_number else {
            return Err(tag.missing(&[ParseTag::TagClassNumber]));
        };

        let mut implicit = false;
        if let Some(keyword) = iter.peek_token(0) {
            implicit = keyword == "IMPLICIT";
            iter.next_token()?;
        }

        let type_decl = self.next_as::<TypeDecl>(iter)?;
        iter.assert_empty()?;

        Ok(TaggedType {
            class_name,
            class_number,
            implicit,
            type_decl: Box::new(type_decl),
        })
    }

    /// Interpret a builtin type with an optional value range constraint
    pub(super) fn simple_type(&self, iter: &mut ElementIter) -> Result<SimpleType> {
        let type_name = iter.next_token()?.to_string();

        let constraint = if iter.peek_tag(0) == Some(ParseTag::Constraint) {
            let mut inner = iter.node_iter(&[ParseTag::Constraint])?;
            Some(self.constraint(&mut inner, ConstraintKind::ValueRange)?)
        } else {
            None
        };
        iter.assert_empty()?;

        Ok(SimpleType {
            type_name,
            constraint,
        })
    }

    /// Interpret a type reference, optionally qualified by a module name
    pub(super) fn referenced_type(&self, iter: &mut ElementIter) -> Result<ReferencedType> {
        let module_reference = self.module_reference(iter)?;
        let type_name = iter.next_token()?.to_string();
        iter.assert_empty()?;

        Ok(ReferencedType {
            module_reference,
            type_name,
        })
    }

    /// Interpret a leading module reference if there is one
    pub(super) fn module_reference(&self, iter: &mut ElementIter) -> Result<Option<String>> {
        if iter.peek_tag(0) != Some(ParseTag::ModuleReference) {
            return Ok(None);
        }

        let mut inner = iter.node_iter(&[ParseTag::ModuleReference])?;
        Ok(Some(inner.next_token()?.to_string()))
    }

    /// Interpret the min and max bound of a constraint
    pub(super) fn constraint(
        &self,
        iter: &mut ElementIter,
        kind: ConstraintKind,
    ) -> Result<Constraint> {
        let min_value = self.next_value(iter)?;
        let max_value = self.next_value(iter)?;
        iter.assert_empty()?;

        Ok(Constraint {
            kind,
            min_value,
            max_value,
        })
    }

    /// Interpret an ENUMERATED or INTEGER list.  Named values without an
    /// explicit number are numbered one past the previous named value, or 0
    /// if there is none.
    pub(super) fn value_list_type(&self, iter: &mut ElementIter) -> Result<ValueListType> {
        let type_name = iter.next_token()?.to_string();
        let mut named_values = self.value_list_items(iter)?;
        iter.assert_empty()?;

        let mut previous: Option<String> = None;
        for named in named_values.iter_mut().flatten().filter_map(ValueListItem::named_mut) {
            if named.value.is_none() {
                let next = match previous {
                    None => 0,
                    Some(prev) => {
                        let Ok(value) = prev.trim().parse::<i64>() else {
                            return Err(iter.malformed(Malformed::NonIntegerValue {
                                identifier: named.identifier.clone(),
                                previous: prev,
                            }));
                        };
                        let Some(next) = value.checked_add(1) else {
                            return Err(iter.malformed(Malformed::ValueOverflow {
                                identifier: named.identifier.clone(),
                                previous: prev,
                            }));
                        };
                        next
                    }
                };
                named.value = Some(next.to_string());
            }
            previous = named.value.clone();
        }

        Ok(ValueListType {
            type_name,
            named_values,
        })
    }

    /// Interpret a BIT STRING with optional named bits
    pub(super) fn bit_string_type(&self, iter: &mut ElementIter) -> Result<BitStringType> {
        let type_name = iter.next_token()?.to_string();
        let named_bits = self.value_list_items(iter)?;
        iter.assert_empty()?;

        Ok(BitStringType {
            type_name,
            named_bits,
        })
    }

    fn value_list_items(&self, iter: &mut ElementIter) -> Result<Option<Vec<ValueListItem>>> {
        if iter.peek(0).is_none() {
            return Ok(None);
        }

        let list = iter.next_list()?;
        let items = list
            .iter()
            .map(|node| self.build_as::<ValueListItem>(iter, node))
            .collect::<Result<_>>()?;

        Ok(Some(items))
    }
}

impl Display for TypeDecl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeDecl::Constructed(ty) => ty.fmt(f),
            TypeDecl::Collection(ty) => ty.fmt(f),
            TypeDecl::Tagged(ty) => ty.fmt(f),
            TypeDecl::Simple(ty) => ty.fmt(f),
            TypeDecl::Referenced(ty) => ty.fmt(f),
            TypeDecl::ValueList(ty) => ty.fmt(f),
            TypeDecl::BitString(ty) => ty.fmt(f),
        }
    }
}

impl Display for ConstructedType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.components.is_empty() {
            return write!(f, "{} {{}}", self.type_name);
        }

        write!(
            f,
            "{} {{ {} }}",
            self.type_name,
            self.components.iter().join(", ")
        )
    }
}

impl Display for CollectionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ", self.kind.keyword())?;
        if let Some(constraint) = &self.size_constraint {
            write!(f, "{constraint} ")?;
        }
        write!(f, "OF {}", self.type_decl)
    }
}

impl Display for TaggedType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.class_name {
            Some(class) => write!(f, "[{class} {}] ", self.class_number)?,
            None => write!(f, "[{}] ", self.class_number)?,
        }

        if self.implicit {
            write!(f, "IMPLICIT ")?;
        }

        write!(f, "{}", self.type_decl)
    }
}

impl Display for SimpleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.constraint {
            Some(constraint) => write!(f, "{} {constraint}", self.type_name),
            None => write!(f, "{}", self.type_name),
        }
    }
}

impl Display for ReferencedType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(module) = &self.module_reference {
            write!(f, "{module}.")?;
        }
        write!(f, "{}", self.type_name)
    }
}

impl Display for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            ConstraintKind::ValueRange => write!(f, "({}..{})", self.min_value, self.max_value),
            ConstraintKind::Size => write!(f, "SIZE({}..{})", self.min_value, self.max_value),
        }
    }
}

impl Display for ValueListType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.named_values {
            Some(values) if !values.is_empty() => {
                write!(f, "{} {{ {} }}", self.type_name, values.iter().join(", "))
            }
            _ => write!(f, "{}", self.type_name),
        }
    }
}

impl Display for BitStringType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.named_bits {
            Some(bits) if !bits.is_empty() => {
                write!(f, "{} {{ {} }}", self.type_name, bits.iter().join(", "))
            }
            _ => write!(f, "{}", self.type_name),
        }
    }
}
