//! Longest-path layer assignment.
//!
//! A node sits one layer below its deepest parent; roots sit on layer 0. The walk is an explicit
//! DFS stack over dense indices, so deep hierarchies cannot overflow the call stack.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    Unvisited,
    InProgress,
    Done,
}

/// Assigns a layer to every node given its parent lists.
///
/// A parent reached again while still on the current DFS path is a back edge of a cycle and
/// counts as layer 0. Cyclic subgraphs therefore terminate with a locally non-optimal layering
/// instead of recursing forever.
pub fn assign_layers(parents: &[Vec<usize>]) -> Vec<usize> {
    let n = parents.len();
    let mut state: Vec<Visit> = vec![Visit::Unvisited; n];
    let mut layer: Vec<usize> = vec![0; n];
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for root in 0..n {
        if state[root] != Visit::Unvisited {
            continue;
        }
        state[root] = Visit::InProgress;
        stack.push((root, 0));

        while let Some(top) = stack.last_mut() {
            let (v, cursor) = *top;
            if let Some(&p) = parents[v].get(cursor) {
                top.1 += 1;
                if state[p] == Visit::Unvisited {
                    state[p] = Visit::InProgress;
                    stack.push((p, 0));
                }
                continue;
            }

            layer[v] = parents[v]
                .iter()
                .map(|&p| match state[p] {
                    Visit::Done => layer[p] + 1,
                    _ => 1,
                })
                .max()
                .unwrap_or(0);
            state[v] = Visit::Done;
            stack.pop();
        }
    }

    layer
}

/// Groups nodes by layer, dropping layers left empty by cycle breaking.
///
/// Within a layer nodes keep ascending index order.
pub fn build_layers(layer_of: &[usize]) -> Vec<Vec<usize>> {
    let depth = layer_of.iter().max().map_or(0, |m| m + 1);
    let mut layers: Vec<Vec<usize>> = vec![Vec::new(); depth];
    for (v, &l) in layer_of.iter().enumerate() {
        layers[l].push(v);
    }
    layers.retain(|l| !l.is_empty());
    layers
}
