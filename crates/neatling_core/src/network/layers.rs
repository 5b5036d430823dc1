//! Feed-forward layering of the enabled-connection graph.

use std::collections::BTreeSet;

/// Nodes whose values can influence an output: the outputs themselves plus
/// every non-input ancestor reachable backwards through `connections`.
pub fn required_for_output(
    inputs: &[i64],
    outputs: &[i64],
    connections: &[(i64, i64)],
) -> BTreeSet<i64> {
    let inputs: BTreeSet<i64> = inputs.iter().copied().collect();
    let mut required: BTreeSet<i64> = outputs.iter().copied().collect();
    let mut frontier = required.clone();

    loop {
        let upstream: BTreeSet<i64> = connections
            .iter()
            .filter(|(a, b)| frontier.contains(b) && !frontier.contains(a))
            .map(|&(a, _)| a)
            .collect();
        if upstream.is_empty() {
            break;
        }

        let layer_nodes: BTreeSet<i64> = upstream
            .iter()
            .filter(|n| !inputs.contains(*n))
            .copied()
            .collect();
        if layer_nodes.is_empty() {
            break;
        }

        required.extend(layer_nodes);
        frontier.extend(upstream);
    }

    required
}

/// Groups required nodes into layers that only depend on inputs or earlier layers.
///
/// Each layer holds every node whose predecessors have all been scheduled and
/// that is fed by at least one scheduled node. Nodes that never become ready,
/// such as those downstream of a dangling hidden node, are left out. Layers are
/// sorted by node id.
pub fn feed_forward_layers(
    inputs: &[i64],
    outputs: &[i64],
    connections: &[(i64, i64)],
) -> Vec<Vec<i64>> {
    let required = required_for_output(inputs, outputs, connections);

    let mut layers = Vec::new();
    let mut scheduled: BTreeSet<i64> = inputs.iter().copied().collect();

    loop {
        let candidates: BTreeSet<i64> = connections
            .iter()
            .filter(|(a, b)| scheduled.contains(a) && !scheduled.contains(b))
            .map(|&(_, b)| b)
            .collect();

        let ready: Vec<i64> = candidates
            .into_iter()
            .filter(|n| {
                required.contains(n)
                    && connections
                        .iter()
                        .filter(|(_, b)| b == n)
                        .all(|(a, _)| scheduled.contains(a))
            })
            .collect();

        if ready.is_empty() {
            break;
        }

        scheduled.extend(ready.iter().copied());
        layers.push(ready);
    }

    layers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_connection_single_layer() {
        let layers = feed_forward_layers(&[-1, -2], &[0], &[(-1, 0), (-2, 0)]);
        assert_eq!(layers, vec![vec![0]]);
    }

    #[test]
    fn test_hidden_chain_orders_layers() {
        let connections = [(-1, 1), (1, 2), (2, 0), (-1, 0)];
        let layers = feed_forward_layers(&[-1], &[0], &connections);
        assert_eq!(layers, vec![vec![1], vec![2], vec![0]]);
    }

    #[test]
    fn test_output_waits_for_all_predecessors() {
        let connections = [(-1, 3), (-2, 0), (3, 0), (-2, 1)];
        let layers = feed_forward_layers(&[-1, -2], &[0, 1], &connections);
        assert_eq!(layers, vec![vec![1, 3], vec![0]]);
    }

    #[test]
    fn test_unrequired_hidden_node_is_skipped() {
        // Node 5 feeds nothing that reaches an output.
        let connections = [(-1, 0), (-1, 5)];
        let layers = feed_forward_layers(&[-1], &[0], &connections);
        assert_eq!(layers, vec![vec![0]]);
        assert!(!required_for_output(&[-1], &[0], &connections).contains(&5));
    }

    #[test]
    fn test_dangling_predecessor_blocks_node() {
        // Hidden 4 has no path from an input, so 0 never becomes ready.
        let connections = [(-1, 0), (4, 0)];
        let layers = feed_forward_layers(&[-1], &[0], &connections);
        assert!(layers.is_empty());
    }

    #[test]
    fn test_no_connections() {
        assert!(feed_forward_layers(&[-1], &[0], &[]).is_empty());
    }
}
