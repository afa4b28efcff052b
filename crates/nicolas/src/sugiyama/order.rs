//! Barycenter crossing minimization.

use tracing::trace;

/// Alternating top-down / bottom-up barycenter sweeps.
///
/// Runs up to `iterations` down/up sweep pairs. Each pair is scored with [`cross_count`]; the
/// ordering with the fewest crossings seen (the initial one included) is kept, earliest first on
/// ties. Sweeping stops as soon as the best ordering has no crossings, so a crossing-free initial
/// ordering is returned unchanged even where a barycenter pass would have permuted it.
pub fn minimize_crossings(
    layers: &mut [Vec<usize>],
    parents: &[Vec<usize>],
    children: &[Vec<usize>],
    iterations: usize,
) {
    if layers.len() < 2 {
        return;
    }

    let node_count = parents.len();
    let mut layer_of: Vec<usize> = vec![0; node_count];
    let mut pos: Vec<usize> = vec![0; node_count];
    for (l, layer) in layers.iter().enumerate() {
        for (i, &v) in layer.iter().enumerate() {
            layer_of[v] = l;
            pos[v] = i;
        }
    }

    let mut best_cc = cross_count(layers, children, &layer_of);
    let mut best: Vec<Vec<usize>> = layers.to_vec();

    for iteration in 0..iterations {
        if best_cc == 0 {
            break;
        }
        for l in 1..layers.len() {
            reorder(&mut layers[l], parents, l - 1, &layer_of, &mut pos);
        }
        for l in (0..layers.len() - 1).rev() {
            reorder(&mut layers[l], children, l + 1, &layer_of, &mut pos);
        }

        let cc = cross_count(layers, children, &layer_of);
        trace!(iteration, crossings = cc, "barycenter sweep");
        if cc < best_cc {
            best_cc = cc;
            best = layers.to_vec();
        }
    }

    for (layer, kept) in layers.iter_mut().zip(best) {
        *layer = kept;
    }
}

/// Sorts `layer` by the mean position of its neighbors in layer `fixed`.
///
/// Nodes without such neighbors use their current index, which keeps their relative order.
fn reorder(
    layer: &mut Vec<usize>,
    neighbors: &[Vec<usize>],
    fixed: usize,
    layer_of: &[usize],
    pos: &mut [usize],
) {
    let mut keyed: Vec<(f64, usize)> = layer
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let (sum, count) = neighbors[v]
                .iter()
                .filter(|&&u| layer_of[u] == fixed)
                .fold((0.0, 0usize), |(sum, count), &u| (sum + pos[u] as f64, count + 1));
            let barycenter = if count == 0 {
                i as f64
            } else {
                sum / count as f64
            };
            (barycenter, v)
        })
        .collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));

    layer.clear();
    layer.extend(keyed.into_iter().map(|(_, v)| v));
    for (i, &v) in layer.iter().enumerate() {
        pos[v] = i;
    }
}

/// Number of edge crossings between adjacent layers.
///
/// Only parent/child edges that span exactly one layer are counted.
pub fn cross_count(
    layers: &[Vec<usize>],
    children: &[Vec<usize>],
    layer_of: &[usize],
) -> usize {
    (1..layers.len())
        .map(|l| two_layer_cross_count(&layers[l - 1], &layers[l], children, layer_of, l))
        .sum()
}

/// Accumulator-tree count (Barth, Jünger, Mutzel).
fn two_layer_cross_count(
    north: &[usize],
    south: &[usize],
    children: &[Vec<usize>],
    layer_of: &[usize],
    south_layer: usize,
) -> usize {
    if south.is_empty() {
        return 0;
    }

    let mut south_pos: Vec<usize> = vec![usize::MAX; layer_of.len()];
    for (i, &v) in south.iter().enumerate() {
        south_pos[v] = i;
    }

    let mut south_entries: Vec<usize> = Vec::new();
    for &v in north {
        let mut entries: Vec<usize> = children[v]
            .iter()
            .filter(|&&c| layer_of[c] == south_layer && south_pos[c] != usize::MAX)
            .map(|&c| south_pos[c])
            .collect();
        entries.sort_unstable();
        south_entries.extend(entries);
    }

    let mut first_index: usize = 1;
    while first_index < south.len() {
        first_index <<= 1;
    }
    let tree_size = 2 * first_index - 1;
    first_index -= 1;
    let mut tree: Vec<usize> = vec![0; tree_size];

    let mut cc = 0;
    for p in south_entries {
        let mut index = p + first_index;
        tree[index] += 1;
        let mut weight_sum = 0;
        while index > 0 {
            if index % 2 == 1 {
                weight_sum += tree[index + 1];
            }
            index = (index - 1) >> 1;
            tree[index] += 1;
        }
        cc += weight_sum;
    }
    cc
}
