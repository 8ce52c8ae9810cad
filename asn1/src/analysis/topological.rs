use std::collections::VecDeque;

use indexmap::{IndexMap, IndexSet};
use tracing::{debug, warn};

use super::{dependency_graph, CyclicReferenceError, Dependent};

/// Order definitions so that everything a definition refers to comes before
/// it.  A definition referring to itself is allowed, as are references to
/// names not in the input.  Any other cycle is an error.
pub fn topological_sort<T: Dependent>(
    items: impl IntoIterator<Item = T>,
) -> Result<Vec<T>, CyclicReferenceError> {
    let mut items: Vec<T> = items.into_iter().collect();
    let mut graph = dependency_graph(&items);

    let defined: IndexSet<String> = graph.keys().cloned().collect();
    for (name, references) in graph.iter_mut() {
        references.retain(|reference| reference != name && defined.contains(reference));
    }

    // number of remaining definitions referring to each name
    let mut in_degree: IndexMap<String, usize> =
        graph.keys().map(|name| (name.clone(), 0)).collect();
    for reference in graph.values().flatten() {
        if let Some(degree) = in_degree.get_mut(reference) {
            *degree += 1;
        }
    }

    let mut roots: Vec<String> = in_degree
        .iter()
        .filter(|(_, &degree)| degree == 0)
        .map(|(name, _)| name.clone())
        .collect();

    let mut order = VecDeque::with_capacity(graph.len());
    while let Some(root) = roots.pop() {
        for successor in graph.shift_remove(&root).unwrap_or_default() {
            if let Some(degree) = in_degree.get_mut(&successor) {
                *degree -= 1;
                if *degree == 0 {
                    roots.push(successor);
                }
            }
        }
        order.push_front(root);
    }

    if !graph.is_empty() {
        // definitions the cycles depend on are not part of them
        loop {
            let sinks: Vec<String> = graph
                .iter()
                .filter(|(_, references)| references.iter().all(|r| !graph.contains_key(r)))
                .map(|(name, _)| name.clone())
                .collect();
            if sinks.is_empty() {
                break;
            }
            for sink in sinks {
                graph.shift_remove(&sink);
            }
        }

        let names: Vec<String> = graph.into_keys().collect();
        warn!(?names, "cyclic references prevent topological sort");
        return Err(CyclicReferenceError { names });
    }

    let position: IndexMap<String, usize> = order
        .into_iter()
        .enumerate()
        .map(|(idx, name)| (name, idx))
        .collect();
    items.sort_by_key(|item| position.get(item.reference_name()).copied());

    debug!(count = items.len(), "topologically sorted definitions");
    Ok(items)
}
