use thiserror::Error;

use crate::{cst::ParseTag, util::CowVec};

/// Any error that can be produced while building the semantic model.  The
/// parse tree is expected to be grammar-valid, so if one of these reaches the
/// user it points at a mismatch between the parser and the model builder, not
/// at a problem in the user's ASN.1 source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemaError {
    /// A parse node tag that the model builder has no constructor for
    #[error("unknown node kind `{kind}`")]
    UnknownNodeKind { kind: String },

    /// A parse node whose elements do not have the shape its tag guarantees
    #[error("malformed `{tag}` node: {problem}")]
    MalformedInput { tag: ParseTag, problem: Malformed },
}

/// The specific way a parse node was malformed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Malformed {
    /// Expected a nested node but found something else
    #[error("expected {expected} node at element {index}")]
    ExpectedNode {
        index: usize,
        expected: CowVec<ParseTag>,
    },

    /// Expected a nested node of a given kind, but got something different
    #[error("expected {expected} node at element {index}, got `{got}`")]
    WrongNode {
        index: usize,
        expected: CowVec<ParseTag>,
        got: ParseTag,
    },

    /// Expected a raw token but found something else
    #[error("expected token at element {index}")]
    ExpectedToken { index: usize },

    /// Expected a nested sequence of nodes but found something else
    #[error("expected node list at element {index}")]
    ExpectedList { index: usize },

    /// Expected the element list to be finished
    #[error("unexpected trailing element {index}")]
    TrailingElement { index: usize },

    /// A constructed node does not fit the slot it was built for
    #[error("`{got}` cannot be used as {expected}")]
    WrongCategory { expected: &'static str, got: ParseTag },

    /// An anonymous member was found with unnamed members disabled
    #[error("anonymous member not permitted")]
    UnnamedMember,

    /// An enumeration value that cannot be auto-numbered from
    #[error("cannot number `{identifier}` after non-integer value `{previous}`")]
    NonIntegerValue { identifier: String, previous: String },

    /// An enumeration value one past the largest representable number
    #[error("cannot number `{identifier}` after `{previous}` without overflow")]
    ValueOverflow { identifier: String, previous: String },
}

pub type Result<T = (), E = SemaError> = std::result::Result<T, E>;

/// Failure to follow a chain of type references within a module
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// A referenced type is not assigned in the module
    #[error("unresolved type reference `{name}`")]
    UnresolvedReference { name: String },

    /// Following the aliases leads back to a type already visited
    #[error("recursive type alias {}", .chain.join(" -> "))]
    RecursiveAlias { chain: Vec<String> },
}
