use indexmap::{IndexMap, IndexSet};

use crate::sema::Reference;

/// A named definition that depends on other names
pub trait Dependent: Reference {
    /// Names of everything this definition refers to, in first use order
    fn references(&self) -> IndexSet<String>;
}

impl<T: Dependent + ?Sized> Dependent for &T {
    fn references(&self) -> IndexSet<String> {
        (**self).references()
    }
}

/// Map from each definition's name to the names it refers to.  If a name is
/// defined more than once, its references are merged.
pub fn dependency_graph<T: Dependent>(
    items: impl IntoIterator<Item = T>,
) -> IndexMap<String, IndexSet<String>> {
    let mut graph: IndexMap<String, IndexSet<String>> = IndexMap::new();

    for item in items {
        graph
            .entry(item.reference_name().to_string())
            .or_default()
            .extend(item.references());
    }

    graph
}
