use indoc::indoc;
use insta::assert_snapshot;

use super::*;
use crate::{
    builder::{ModelBuilder, UnnamedCounter},
    cst::{ParseNode, ParseTag},
    test_utils::*,
};

fn builder() -> ModelBuilder {
    ModelBuilder::with_counter(UnnamedCounter::new())
}

fn build_type(builder: &ModelBuilder, node: &ParseNode) -> TypeDecl {
    match builder.build_node(node).unwrap() {
        SemaNode::Type(ty) => ty,
        other => panic!("expected a type, got {other:?}"),
    }
}

fn values(ty: &TypeDecl) -> Vec<String> {
    let TypeDecl::ValueList(ty) = ty else {
        panic!("expected a value list, got {ty:?}");
    };
    ty.values()
        .map(|(_, value)| value.unwrap().to_string())
        .collect()
}

#[test]
fn enumeration_continues_after_explicit_value() {
    let node = enumerated(vec![
        named_value("a", None),
        named_value("b", Some("5")),
        named_value("c", None),
        named_value("d", None),
    ]);
    let ty = build_type(&builder(), &node);

    assert_eq!(values(&ty), ["0", "5", "6", "7"]);
    assert_snapshot!(ty.to_string(), @"ENUMERATED { a(0), b(5), c(6), d(7) }");
}

#[test]
fn enumeration_numbered_from_zero() {
    let node = enumerated(vec![
        named_value("red", None),
        named_value("green", None),
        named_value("blue", None),
    ]);
    let ty = build_type(&builder(), &node);

    assert_eq!(values(&ty), ["0", "1", "2"]);
}

#[test]
fn enumeration_numbering_skips_extension_marker() {
    let node = enumerated(vec![
        named_value("a", None),
        named_value("b", Some("3")),
        extension(),
        named_value("c", None),
    ]);
    let ty = build_type(&builder(), &node);

    assert_eq!(values(&ty), ["0", "3", "4"]);
    assert_snapshot!(ty.to_string(), @"ENUMERATED { a(0), b(3), ..., c(4) }");
}

#[test]
fn enumeration_after_non_integer_value() {
    let node = enumerated(vec![named_value("a", Some("max")), named_value("b", None)]);
    let err = builder().build_node(&node).unwrap_err();

    assert_eq!(
        err,
        SemaError::MalformedInput {
            tag: ParseTag::ValueListType,
            problem: Malformed::NonIntegerValue {
                identifier: "b".to_string(),
                previous: "max".to_string(),
            },
        }
    );
}

#[test]
fn enumeration_after_largest_value() {
    let node = enumerated(vec![
        named_value("c", Some("9223372036854775807")),
        named_value("d", None),
    ]);
    let err = builder().build_node(&node).unwrap_err();

    assert_eq!(
        err,
        SemaError::MalformedInput {
            tag: ParseTag::ValueListType,
            problem: Malformed::ValueOverflow {
                identifier: "d".to_string(),
                previous: "9223372036854775807".to_string(),
            },
        }
    );
    assert_snapshot!(
        err.to_string(),
        @"malformed `ValueListType` node: cannot number `d` after `9223372036854775807` without overflow"
    );
}

#[test]
fn named_value_with_trailing_element() {
    let node = node(
        ParseTag::NamedValue,
        [
            node(ParseTag::Identifier, ["a"]),
            node(ParseTag::Value, ["1", "2"]),
        ],
    );
    let err = builder().build_node(&node).unwrap_err();

    assert_eq!(
        err,
        SemaError::MalformedInput {
            tag: ParseTag::Value,
            problem: Malformed::TrailingElement { index: 1 },
        }
    );
}

#[test]
fn bit_string_named() {
    let node = bit_string(Some(vec![
        named_value("a", Some("0")),
        named_value("b", Some("3")),
        named_value("c", None),
    ]));
    let ty = build_type(&builder(), &node);

    let TypeDecl::BitString(bits) = &ty else {
        panic!("expected a bit string, got {ty:?}");
    };
    let values = bits
        .named_bits
        .iter()
        .flatten()
        .map(|item| match item {
            ValueListItem::Named(named) => named.value.clone(),
            other => panic!("expected a named bit, got {other:?}"),
        })
        .collect::<Vec<_>>();

    // only value lists are numbered
    assert_eq!(values, [Some("0".to_string()), Some("3".to_string()), None]);
    assert_eq!(ty.as_node().kind(), "BitStringType");
    assert_eq!(
        ty.descendants().iter().map(|node| node.kind()).collect::<Vec<_>>(),
        ["NamedValue", "NamedValue", "NamedValue"]
    );
    assert_snapshot!(ty.to_string(), @"BIT STRING { a(0), b(3), c }");
}

#[test]
fn bit_string_without_named_bits() {
    let ty = build_type(&builder(), &bit_string(None));

    assert_eq!(
        ty,
        TypeDecl::BitString(BitStringType {
            type_name: "BIT STRING".to_string(),
            named_bits: None,
        })
    );
    assert!(ty.children().is_empty());
    assert_snapshot!(ty.to_string(), @"BIT STRING");
}

#[test]
fn set_of_without_size() {
    let ty = build_type(&builder(), &set_of(None, simple("INTEGER")));

    let TypeDecl::Collection(collection) = &ty else {
        panic!("expected a collection, got {ty:?}");
    };
    assert_eq!(collection.kind, CollectionKind::SetOf);
    assert_eq!(ty.type_name(), "SET OF");
    assert_eq!(ty.as_node().kind(), "SetOfType");
    assert_snapshot!(ty.to_string(), @"SET OF INTEGER");
}

#[test]
fn set_of_with_size() {
    let ty = build_type(&builder(), &set_of(Some(("0", "4")), reference("Item")));

    let kinds = ty.descendants().iter().map(|node| node.kind()).collect::<Vec<_>>();
    assert_eq!(kinds, ["SizeConstraint", "ReferencedType"]);
    assert_snapshot!(ty.to_string(), @"SET SIZE(0..4) OF Item");
}

#[test]
fn set_members() {
    let ty = build_type(&builder(), &set(vec![component(named_type("x", simple("NULL")))]));

    let TypeDecl::Constructed(set) = &ty else {
        panic!("expected a constructed type, got {ty:?}");
    };
    assert_eq!(set.kind, ConstructedKind::Set);
    assert_eq!(ty.as_node().kind(), "SetType");
    assert_snapshot!(ty.to_string(), @"SET { x NULL }");
}

#[test]
fn tagged_implicit() {
    let node = tagged("2", Some("IMPLICIT"), simple("INTEGER"));
    let ty = build_type(&builder(), &node);

    let TypeDecl::Tagged(tagged) = &ty else {
        panic!("expected a tagged type, got {ty:?}");
    };
    assert!(tagged.implicit);
    assert_eq!(tagged.class_name, None);
    assert_eq!(ty.type_name(), "INTEGER");
    assert_snapshot!(ty.to_string(), @"[2] IMPLICIT INTEGER");
}

#[test]
fn tagged_explicit_and_untagged_keyword() {
    let explicit = build_type(&builder(), &tagged("2", Some("EXPLICIT"), simple("INTEGER")));
    let plain = build_type(&builder(), &tagged("2", None, simple("INTEGER")));

    assert_eq!(explicit, plain);
    assert_snapshot!(explicit.to_string(), @"[2] INTEGER");
}

#[test]
fn tagged_with_class() {
    let tag = node(
        ParseTag::Tag,
        [
            node(ParseTag::TagClass, ["APPLICATION"]),
            node(ParseTag::TagClassNumber, ["5"]),
        ],
    );
    let node = ty(node(
        ParseTag::TaggedType,
        [tag, simple("OCTET STRING")],
    ));

    let ty = build_type(&builder(), &node);
    assert_snapshot!(ty.to_string(), @"[APPLICATION 5] OCTET STRING");
}

#[test]
fn sequence_of_with_size() {
    let ty = build_type(&builder(), &sequence_of(Some(("1", "10")), simple("INTEGER")));

    assert_eq!(ty.type_name(), "SEQUENCE OF");
    assert_snapshot!(ty.to_string(), @"SEQUENCE SIZE(1..10) OF INTEGER");
}

#[test]
fn sequence_of_without_size() {
    let ty = build_type(&builder(), &sequence_of(None, reference("Item")));

    let TypeDecl::Collection(collection) = &ty else {
        panic!("expected a collection, got {ty:?}");
    };
    assert_eq!(collection.kind, CollectionKind::SequenceOf);
    assert!(collection.size_constraint.is_none());
    assert_snapshot!(ty.to_string(), @"SEQUENCE OF Item");
}

#[test]
fn sequence_component_forms() {
    let node = sequence(vec![
        component(named_type("id", simple_range("INTEGER", "0", "255"))),
        optional(named_type("name", simple("UTF8String"))),
        default(named_type("flag", simple("BOOLEAN")), "TRUE"),
        components_of(reference("Base")),
        extension(),
    ]);
    let ty = build_type(&builder(), &node);

    let TypeDecl::Constructed(sequence) = &ty else {
        panic!("expected a constructed type, got {ty:?}");
    };
    assert_eq!(sequence.kind, ConstructedKind::Sequence);
    assert_eq!(sequence.components.len(), 5);

    let Member::Component(name) = &sequence.components[1] else {
        panic!("expected a component");
    };
    assert!(name.is_optional());
    assert_eq!(name.default_value(), None);

    let Member::Component(flag) = &sequence.components[2] else {
        panic!("expected a component");
    };
    assert!(!flag.is_optional());
    assert_eq!(flag.default_value(), Some(&Value::Literal("TRUE".to_string())));

    let Member::Component(base) = &sequence.components[3] else {
        panic!("expected a component");
    };
    assert_eq!(base.identifier(), None);
    assert_eq!(base.type_decl().type_name(), "Base");

    assert_snapshot!(
        ty.to_string(),
        @"SEQUENCE { id INTEGER (0..255), name UTF8String OPTIONAL, flag BOOLEAN DEFAULT TRUE, COMPONENTS OF Base, ... }"
    );
}

#[test]
fn empty_sequence() {
    let ty = build_type(&builder(), &sequence(vec![]));
    assert_snapshot!(ty.to_string(), @"SEQUENCE {}");
}

#[test]
fn anonymous_members_are_numbered() {
    let builder = builder();
    let node = choice(vec![
        anonymous(simple("INTEGER")),
        named_type("text", simple("IA5String")),
        anonymous(simple("BOOLEAN")),
    ]);
    let ty = build_type(&builder, &node);

    assert_snapshot!(ty.to_string(), @"CHOICE { unnamed1 INTEGER, text IA5String, unnamed2 BOOLEAN }");
}

#[test]
fn anonymous_member_names_never_repeat() {
    let node = choice(vec![anonymous(simple("INTEGER"))]);

    let first = build_type(&ModelBuilder::new(), &node);
    let second = build_type(&ModelBuilder::new(), &node);

    assert_ne!(first, second);
    assert!(first.to_string().starts_with("CHOICE { unnamed"));
    assert!(second.to_string().starts_with("CHOICE { unnamed"));
}

#[test]
fn anonymous_member_prefix() {
    let mut builder = builder();
    builder.unnamed_prefix = "anon".to_string();

    let ty = build_type(&builder, &choice(vec![anonymous(simple("NULL"))]));
    assert_snapshot!(ty.to_string(), @"CHOICE { anon1 NULL }");
}

#[test]
fn anonymous_member_rejected() {
    let mut builder = builder();
    builder.unnamed_members = false;

    let err = builder
        .build_node(&choice(vec![anonymous(simple("NULL"))]))
        .unwrap_err();
    assert_eq!(
        err,
        SemaError::MalformedInput {
            tag: ParseTag::NamedType,
            problem: Malformed::UnnamedMember,
        }
    );
}

#[test]
fn nested_type_wrappers() {
    let node = ty(ty(node(ParseTag::SimpleType, ["BOOLEAN"])));
    let ty = build_type(&builder(), &node);

    assert_eq!(
        ty,
        TypeDecl::Simple(SimpleType {
            type_name: "BOOLEAN".to_string(),
            constraint: None,
        })
    );
}

#[test]
fn qualified_references() {
    let ty = build_type(&builder(), &qualified_reference("Other-Module", "Thing"));

    let TypeDecl::Referenced(reference) = &ty else {
        panic!("expected a reference, got {ty:?}");
    };
    assert_eq!(reference.module_reference.as_deref(), Some("Other-Module"));
    assert_eq!(reference.reference_name(), "Thing");
    assert_snapshot!(ty.to_string(), @"Other-Module.Thing");
}

#[test]
fn object_identifier_value() {
    let node = oid(vec![
        node(ParseTag::NameForm, ["iso"]),
        name_and_number("member-body", "2"),
        node(ParseTag::NumberForm, ["840"]),
    ]);

    let SemaNode::ObjectIdentifierValue(value) = builder().build_node(&node).unwrap() else {
        panic!("expected an object identifier");
    };
    assert_eq!(value.numeric_arcs(), Some(vec![1, 2, 840]));
    assert_snapshot!(value.to_string(), @"{iso member-body(2) 840}");
}

#[test]
fn object_identifier_with_defined_name() {
    let node = oid(vec![
        node(ParseTag::NameForm, ["rsadsi"]),
        node(ParseTag::NumberForm, ["1"]),
    ]);

    let SemaNode::ObjectIdentifierValue(value) = builder().build_node(&node).unwrap() else {
        panic!("expected an object identifier");
    };
    assert_eq!(value.numeric_arcs(), None);
}

#[test]
fn string_values() {
    let binary = builder()
        .build_node(&node(ParseTag::BinaryStringValue, ["0101"]))
        .unwrap();
    let hex = builder()
        .build_node(&node(ParseTag::HexStringValue, ["0FA3"]))
        .unwrap();

    assert_snapshot!(binary.to_string(), @"'0101'B");
    assert_snapshot!(hex.to_string(), @"'0FA3'H");
}

#[test]
fn value_assignment_with_reference() {
    let node = value_assignment(
        "limit",
        simple("INTEGER"),
        node(ParseTag::ReferencedValue, ["maxSize"]),
    );

    let SemaNode::ValueAssignment(assignment) = builder().build_node(&node).unwrap() else {
        panic!("expected a value assignment");
    };
    assert_eq!(
        assignment.value,
        Value::Referenced(ReferencedValue {
            module_reference: None,
            name: "maxSize".to_string(),
        })
    );
    assert_snapshot!(assignment.to_string(), @"limit INTEGER ::= maxSize");
}

#[test]
fn unknown_node_kind() {
    let err = builder()
        .build_node(&node(ParseTag::Identifier, ["x"]))
        .unwrap_err();
    assert_eq!(
        err,
        SemaError::UnknownNodeKind {
            kind: "Identifier".to_string()
        }
    );

    let err = ParseNode::from_tagged("ParameterizedType", [])
        .unwrap_err();
    assert_snapshot!(err.to_string(), @"unknown node kind `ParameterizedType`");
}

#[test]
fn missing_element() {
    let err = builder()
        .build_node(&node(ParseTag::TypeAssignment, ["T", "::="]))
        .unwrap_err();

    assert!(matches!(
        err,
        SemaError::MalformedInput {
            tag: ParseTag::TypeAssignment,
            problem: Malformed::ExpectedNode { index: 2, .. },
        }
    ));
    assert_snapshot!(err.to_string(), @"malformed `TypeAssignment` node: expected anything node at element 2");
}

#[test]
fn wrong_category() {
    let node = type_assignment("T", oid(vec![]));
    let err = builder().build_node(&node).unwrap_err();

    assert_snapshot!(
        err.to_string(),
        @"malformed `TypeAssignment` node: `ObjectIdentifierValue` cannot be used as a type"
    );
}

#[test]
fn wrong_collection_shape() {
    let node = node(
        ParseTag::SequenceOfType,
        [node(ParseTag::Constraint, ["1", "2"])],
    );
    let err = builder().build_node(&node).unwrap_err();

    assert_snapshot!(
        err.to_string(),
        @"malformed `SequenceOfType` node: expected one of `Type`, `SizeConstraint` node at element 0, got `Constraint`"
    );
}

#[test]
fn trailing_element() {
    let err = builder()
        .build_node(&node(ParseTag::NameForm, ["a", "b"]))
        .unwrap_err();

    assert_eq!(
        err,
        SemaError::MalformedInput {
            tag: ParseTag::NameForm,
            problem: Malformed::TrailingElement { index: 1 },
        }
    );
}

#[test]
fn non_module_root() {
    let err = builder()
        .build(&[type_assignment("T", simple("INTEGER"))])
        .unwrap_err();

    assert_eq!(
        err,
        SemaError::MalformedInput {
            tag: ParseTag::TypeAssignment,
            problem: Malformed::WrongCategory {
                expected: "a module",
                got: ParseTag::TypeAssignment,
            },
        }
    );
}

#[test]
fn parse_tree_dump() {
    let tree = type_assignment("T", simple("INTEGER"));

    assert_eq!(
        tree.to_string(),
        indoc! {r#"
            TypeAssignment:
            |-- "T"
            |-- "::="
            `-- Type:
                `-- SimpleType:
                    `-- "INTEGER"
        "#}
    );
}

#[test]
fn parse_tree_dump_with_list() {
    let tree = enumerated(vec![named_value("a", None), extension()]);

    assert_eq!(
        tree.to_string(),
        indoc! {r#"
            Type:
            `-- ValueListType:
                |-- "ENUMERATED"
                `-- [list]
                    |-- NamedValue:
                    |   `-- "a"
                    `-- ExtensionMarker: (empty)
        "#}
    );
}
