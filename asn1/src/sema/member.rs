use std::fmt::Display;

use crate::{builder::ModelBuilder, cst::ParseTag};

use super::{
    error::{Malformed, Result},
    ElementIter, TypeDecl, Value,
};

/// Anything that can be listed inside SEQUENCE, SET or CHOICE braces
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    Component(ComponentType),
    Named(NamedType),
    Extension(ExtensionMarker),
}

/// One member of a SEQUENCE or SET
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentType {
    /// `identifier Type`, optionally OPTIONAL or with a DEFAULT
    Named {
        identifier: String,
        type_decl: TypeDecl,
        presence: Presence,
    },

    /// `COMPONENTS OF Type`
    ComponentsOf(TypeDecl),
}

/// Whether a named component has to be present
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
    Default(Value),
}

/// An identifier and type pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedType {
    /// Either from the source, or generated for anonymous members
    pub identifier: String,
    pub type_decl: TypeDecl,
}

/// Anything that can be listed in an enumeration or named bit list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueListItem {
    Named(NamedValue),
    Extension(ExtensionMarker),
}

/// An identifier bound to a literal value, e.g. `red(0)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedValue {
    pub identifier: String,
    pub value: Option<String>,
}

/// The `...` extensibility marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtensionMarker;

impl ComponentType {
    /// The member identifier, absent for COMPONENTS OF
    pub fn identifier(&self) -> Option<&str> {
        match self {
            ComponentType::Named { identifier, .. } => Some(identifier),
            ComponentType::ComponentsOf(_) => None,
        }
    }

    pub fn type_decl(&self) -> &TypeDecl {
        match self {
            ComponentType::Named { type_decl, .. } => type_decl,
            ComponentType::ComponentsOf(type_decl) => type_decl,
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(
            self,
            ComponentType::Named {
                presence: Presence::Optional,
                ..
            }
        )
    }

    pub fn default_value(&self) -> Option<&Value> {
        match self {
            ComponentType::Named {
                presence: Presence::Default(value),
                ..
            } => Some(value),
            _ => None,
        }
    }
}

impl ValueListItem {
    pub fn named(&self) -> Option<&NamedValue> {
        match self {
            ValueListItem::Named(named) => Some(named),
            ValueListItem::Extension(_) => None,
        }
    }

    pub(crate) fn named_mut(&mut self) -> Option<&mut NamedValue> {
        match self {
            ValueListItem::Named(named) => Some(named),
            ValueListItem::Extension(_) => None,
        }
    }
}

impl ModelBuilder {
    /// Interpret a SEQUENCE or SET member in one of its four forms
    pub(super) fn component_type(&self, iter: &mut ElementIter) -> Result<ComponentType> {
        let first = iter.next_node(&[
            ParseTag::NamedType,
            ParseTag::ComponentTypeOptional,
            ParseTag::ComponentTypeDefault,
            ParseTag::ComponentTypeComponentsOf,
        ])?;
        iter.assert_empty()?;

        let mut inner = ElementIter::new(first);
        let component = match first.tag {
            ParseTag::NamedType => {
                let named = self.named_type(&mut inner)?;
                ComponentType::Named {
                    identifier: named.identifier,
                    type_decl: named.type_decl,
                    presence: Presence::Required,
                }
            }
            ParseTag::ComponentTypeOptional => {
                let named = self.named_type(&mut inner.node_iter(&[ParseTag::NamedType])?)?;
                inner.assert_empty()?;
                ComponentType::Named {
                    identifier: named.identifier,
                    type_decl: named.type_decl,
                    presence: Presence::Optional,
                }
            }
            ParseTag::ComponentTypeDefault => {
                let named = self.named_type(&mut inner.node_iter(&[ParseTag::NamedType])?)?;
                let value = self.next_value(&mut inner)?;
                inner.assert_empty()?;
                ComponentType::Named {
                    identifier: named.identifier,
                    type_decl: named.type_decl,
                    presence: Presence::Default(value),
                }
            }
            _ => {
                let type_decl = self.next_as::<TypeDecl>(&mut inner)?;
                inner.assert_empty()?;
                ComponentType::ComponentsOf(type_decl)
            }
        };

        Ok(component)
    }

    /// Interpret an identifier and type pair.  An anonymous member gets a
    /// generated identifier.
    pub(super) fn named_type(&self, iter: &mut ElementIter) -> Result<NamedType> {
        let first = iter.next_node(&[ParseTag::Type, ParseTag::Identifier])?;

        let (identifier, type_node) = if first.tag == ParseTag::Type {
            if !self.unnamed_members {
                return Err(iter.malformed(Malformed::UnnamedMember));
            }
            (self.next_unnamed(), first)
        } else {
            let identifier = ElementIter::new(first).next_token()?.to_string();
            (identifier, iter.next_node(&[])?)
        };
        iter.assert_empty()?;

        let type_decl = self.build_as::<TypeDecl>(iter, type_node)?;

        Ok(NamedType {
            identifier,
            type_decl,
        })
    }

    /// Interpret a named value: a bare identifier, or an identifier and the
    /// node holding its value.
    pub(super) fn named_value(&self, iter: &mut ElementIter) -> Result<NamedValue> {
        let named = if iter.peek_token(0).is_some() {
            NamedValue {
                identifier: iter.next_token()?.to_string(),
                value: None,
            }
        } else {
            let identifier = iter.node_iter(&[ParseTag::Identifier])?.next_token()?;
            let mut value_iter = iter.node_iter(&[])?;
            let value = value_iter.next_token()?;
            value_iter.assert_empty()?;
            NamedValue {
                identifier: identifier.to_string(),
                value: Some(value.to_string()),
            }
        };
        iter.assert_empty()?;

        Ok(named)
    }
}

impl Display for Member {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Member::Component(member) => member.fmt(f),
            Member::Named(member) => member.fmt(f),
            Member::Extension(marker) => marker.fmt(f),
        }
    }
}

impl Display for ComponentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (identifier, type_decl, presence) = match self {
            ComponentType::ComponentsOf(type_decl) => {
                return write!(f, "COMPONENTS OF {type_decl}")
            }
            ComponentType::Named {
                identifier,
                type_decl,
                presence,
            } => (identifier, type_decl, presence),
        };

        write!(f, "{identifier} {type_decl}")?;
        match presence {
            Presence::Required => Ok(()),
            Presence::Optional => write!(f, " OPTIONAL"),
            Presence::Default(value) => write!(f, " DEFAULT {value}"),
        }
    }
}

impl Display for NamedType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.identifier, self.type_decl)
    }
}

impl Display for ValueListItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueListItem::Named(named) => named.fmt(f),
            ValueListItem::Extension(marker) => marker.fmt(f),
        }
    }
}

impl Display for NamedValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}({value})", self.identifier),
            None => write!(f, "{}", self.identifier),
        }
    }
}

impl Display for ExtensionMarker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "...")
    }
}
