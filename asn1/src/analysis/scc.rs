use indexmap::IndexMap;
use tracing::{debug, trace};

use super::Dependent;

/// Group definitions into strongly connected components, ordered so that a
/// component only refers to itself and components before it.  A component
/// with more than one member is a reference cycle.  Never fails.
pub fn dependency_sort<T: Dependent>(items: impl IntoIterator<Item = T>) -> Vec<Vec<T>> {
    let items: Vec<T> = items.into_iter().collect();

    // a later definition of a name replaces an earlier one
    let by_name: IndexMap<&str, usize> = items
        .iter()
        .enumerate()
        .map(|(idx, item)| (item.reference_name(), idx))
        .collect();

    let edges: Vec<Vec<usize>> = items
        .iter()
        .map(|item| {
            item.references()
                .iter()
                .filter_map(|name| by_name.get(name.as_str()).copied())
                .collect()
        })
        .collect();

    let components = SccFinder::find(&edges);
    debug!(
        definitions = items.len(),
        components = components.len(),
        "dependency sorted definitions"
    );

    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    components
        .into_iter()
        .map(|component| {
            let group: Vec<T> = component
                .into_iter()
                .filter_map(|idx| slots[idx].take())
                .collect();
            trace!(
                names = ?group.iter().map(|item| item.reference_name()).collect::<Vec<_>>(),
                "component"
            );
            group
        })
        .collect()
}

/// Tarjan's algorithm over definition indices
struct SccFinder<'a> {
    edges: &'a [Vec<usize>],
    index: usize,
    stack: Vec<usize>,
    on_stack: Vec<bool>,
    indices: Vec<Option<usize>>,
    lowlinks: Vec<usize>,
    sccs: Vec<Vec<usize>>,
}

impl<'a> SccFinder<'a> {
    fn find(edges: &'a [Vec<usize>]) -> Vec<Vec<usize>> {
        let count = edges.len();
        let mut finder = Self {
            edges,
            index: 0,
            stack: Vec::new(),
            on_stack: vec![false; count],
            indices: vec![None; count],
            lowlinks: vec![0; count],
            sccs: Vec::new(),
        };

        for node in 0..count {
            if finder.indices[node].is_none() {
                finder.strongconnect(node);
            }
        }

        finder.sccs
    }

    fn strongconnect(&mut self, node: usize) {
        self.indices[node] = Some(self.index);
        self.lowlinks[node] = self.index;
        self.index += 1;
        self.stack.push(node);
        self.on_stack[node] = true;

        let edges = self.edges;
        for &next in &edges[node] {
            match self.indices[next] {
                None => {
                    self.strongconnect(next);
                    self.lowlinks[node] = self.lowlinks[node].min(self.lowlinks[next]);
                }
                Some(next_index) if self.on_stack[next] => {
                    self.lowlinks[node] = self.lowlinks[node].min(next_index);
                }
                Some(_) => {}
            }
        }

        if Some(self.lowlinks[node]) == self.indices[node] {
            let mut scc = Vec::new();
            while let Some(member) = self.stack.pop() {
                self.on_stack[member] = false;
                scc.push(member);
                if member == node {
                    break;
                }
            }
            self.sccs.push(scc);
        }
    }
}
