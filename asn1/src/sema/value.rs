use std::fmt::Display;

use itertools::Itertools;

use crate::{builder::ModelBuilder, cst::ParseTag, oid::registered_oid_arc};

use super::{error::Result, node::Reference, ElementIter};

/// Any value: either a raw literal such as `5` or `TRUE`, or a value node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Literal(String),
    Referenced(ReferencedValue),
    ObjectIdentifier(ObjectIdentifierValue),
    BinaryString(BinaryStringValue),
    HexString(HexStringValue),
}

/// A reference to a value defined by an assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferencedValue {
    /// Module the value is defined in, if qualified.  Not resolved.
    pub module_reference: Option<String>,
    pub name: String,
}

/// `{ iso member-body(2) 840 }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectIdentifierValue {
    pub components: Vec<ObjectIdentifierComponent>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectIdentifierComponent {
    Name(NameForm),
    Number(NumberForm),
    NameAndNumber(NameAndNumberForm),
}

/// A symbolic OID arc, either a registered name or a defined value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameForm {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberForm {
    pub value: String,
}

/// `member-body(2)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameAndNumberForm {
    pub name: NameForm,
    pub number: NumberForm,
}

/// `'0101'B`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryStringValue {
    pub value: String,
}

/// `'0FA3'H`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexStringValue {
    pub value: String,
}

impl Value {
    /// The raw literal, if this value is one
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Value::Literal(value) => Some(value),
            _ => None,
        }
    }
}

impl ObjectIdentifierValue {
    /// Resolve every arc to its number.  Symbolic arcs are looked up in the
    /// registered arc names; returns `None` if any arc is some other name.
    pub fn numeric_arcs(&self) -> Option<Vec<u64>> {
        self.components
            .iter()
            .map(|component| match component {
                ObjectIdentifierComponent::Number(number)
                | ObjectIdentifierComponent::NameAndNumber(NameAndNumberForm { number, .. }) => {
                    number.value.trim().parse().ok()
                }
                ObjectIdentifierComponent::Name(name) => {
                    registered_oid_arc(&name.name).map(u64::from)
                }
            })
            .collect()
    }
}

impl Reference for ReferencedValue {
    fn reference_name(&self) -> &str {
        &self.name
    }
}

impl Reference for NameForm {
    fn reference_name(&self) -> &str {
        &self.name
    }
}

impl ModelBuilder {
    /// Interpret a value reference, optionally qualified by a module name
    pub(super) fn referenced_value(&self, iter: &mut ElementIter) -> Result<ReferencedValue> {
        let module_reference = self.module_reference(iter)?;
        let name = iter.next_token()?.to_string();
        iter.assert_empty()?;

        Ok(ReferencedValue {
            module_reference,
            name,
        })
    }

    /// Interpret an object identifier value, made only of OID components
    pub(super) fn object_identifier_value(
        &self,
        iter: &mut ElementIter,
    ) -> Result<ObjectIdentifierValue> {
        let mut components = vec![];
        while iter.peek(0).is_some() {
            components.push(self.next_as::<ObjectIdentifierComponent>(iter)?);
        }

        Ok(ObjectIdentifierValue { components })
    }

    pub(super) fn name_form(&self, iter: &mut ElementIter) -> Result<NameForm> {
        let name = iter.next_token()?.to_string();
        iter.assert_empty()?;
        Ok(NameForm { name })
    }

    pub(super) fn number_form(&self, iter: &mut ElementIter) -> Result<NumberForm> {
        let value = iter.next_token()?.to_string();
        iter.assert_empty()?;
        Ok(NumberForm { value })
    }

    pub(super) fn name_and_number_form(&self, iter: &mut ElementIter) -> Result<NameAndNumberForm> {
        let name = self.name_form(&mut iter.node_iter(&[ParseTag::NameForm])?)?;
        let number = self.number_form(&mut iter.node_iter(&[ParseTag::NumberForm])?)?;
        iter.assert_empty()?;

        Ok(NameAndNumberForm { name, number })
    }

    /// Interpret the digits of a binary or hex string
    pub(super) fn string_digits(&self, iter: &mut ElementIter) -> Result<String> {
        let value = iter.next_token()?.to_string();
        iter.assert_empty()?;
        Ok(value)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Literal(value) => write!(f, "{value}"),
            Value::Referenced(value) => value.fmt(f),
            Value::ObjectIdentifier(value) => value.fmt(f),
            Value::BinaryString(value) => value.fmt(f),
            Value::HexString(value) => value.fmt(f),
        }
    }
}

impl Display for ReferencedValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(module) = &self.module_reference {
            write!(f, "{module}.")?;
        }
        write!(f, "{}", self.name)
    }
}

impl Display for ObjectIdentifierValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}}}", self.components.iter().join(" "))
    }
}

impl Display for ObjectIdentifierComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectIdentifierComponent::Name(form) => form.fmt(f),
            ObjectIdentifierComponent::Number(form) => form.fmt(f),
            ObjectIdentifierComponent::NameAndNumber(form) => form.fmt(f),
        }
    }
}

impl Display for NameForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl Display for NumberForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl Display for NameAndNumberForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.number)
    }
}

impl Display for BinaryStringValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}'B", self.value)
    }
}

impl Display for HexStringValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}'H", self.value)
    }
}
