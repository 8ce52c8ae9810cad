//! Well known object identifier arc names.
//!
//! These are the only symbolic arcs whose number can be known without
//! resolving value assignments.

/// Registered arc names and their numbers.  Names below different roots may
/// share a number.
pub const REGISTERED_OID_NAMES: [(&str, u32); 13] = [
    ("ccitt", 0),
    ("iso", 1),
    ("joint-iso-ccitt", 2),
    // below ccitt
    ("recommendation", 0),
    ("question", 1),
    ("administration", 2),
    ("network-operator", 3),
    // below iso
    ("standard", 0),
    ("registration-authority", 1),
    ("member-body", 2),
    ("identified-organization", 3),
    // below joint-iso-ccitt
    ("country", 16),
    ("registration-procedures", 17),
];

/// Look up the number of a registered arc name
pub fn registered_oid_arc(name: &str) -> Option<u32> {
    REGISTERED_OID_NAMES
        .iter()
        .find(|(registered, _)| *registered == name)
        .map(|&(_, arc)| arc)
}
