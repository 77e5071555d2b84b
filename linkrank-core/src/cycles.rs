use crate::graph::{AdjacencyMatrix, Edge};
use tracing::debug;

#[derive(Debug, Clone, Copy)]
struct Frame {
    vertex: usize,
    /// Next target column this level will look at when it resumes.
    next_target: usize,
}

enum Step {
    Descend(usize),
    BackEdge,
    Exhausted,
}

/// Removes the loop-closing edges one depth-first walk from vertex 0
/// finds, and returns them in discovery order.
///
/// The walk marks each traversed edge. At each level, outgoing edges are
/// scanned in increasing target order: an unmarked edge is marked and
/// descended into; an already-marked edge ends that level immediately and
/// records the predecessor edge, one level up, for removal. The parent
/// level then resumes its own scan.
///
/// This is deliberately not exhaustive cycle elimination. Vertices
/// unreachable from vertex 0 are never visited, and a level stops at its
/// first marked edge, so disjoint or late cycles can survive in the
/// returned matrix.
pub fn strip_cycles(matrix: &mut AdjacencyMatrix) -> Vec<Edge> {
    let removed = find_return_edges(matrix);
    for edge in &removed {
        matrix.clear(edge.source, edge.target);
    }
    if !removed.is_empty() {
        debug!("Stripped {} loop-closing edges", removed.len());
    }
    removed
}

/// The traversal itself, iterative with an explicit stack. Recursion
/// depth would be bounded by V; the stack lifts that bound while keeping
/// the visit order identical.
fn find_return_edges(matrix: &AdjacencyMatrix) -> Vec<Edge> {
    let v = matrix.size();
    let mut recorded = Vec::new();
    if v == 0 {
        return recorded;
    }

    let mut visited = vec![false; v * v];
    let mut stack = vec![Frame {
        vertex: 0,
        next_target: 0,
    }];

    while let Some(&Frame {
        vertex,
        next_target,
    }) = stack.last()
    {
        let mut step = Step::Exhausted;
        for target in next_target..v {
            if !matrix.get(vertex, target) {
                continue;
            }
            if visited[vertex * v + target] {
                step = Step::BackEdge;
                break;
            }
            visited[vertex * v + target] = true;
            step = Step::Descend(target);
            break;
        }

        match step {
            Step::Descend(target) => {
                stack.last_mut().unwrap().next_target = target + 1;
                stack.push(Frame {
                    vertex: target,
                    next_target: 0,
                });
            }
            Step::BackEdge => {
                stack.pop();
                match stack.last() {
                    Some(parent) => recorded.push(Edge::new(parent.vertex, vertex)),
                    // A walk that loops back to vertex 0 always stops on
                    // vertex 0's first marked edge one level deeper, so
                    // the root level never meets a marked edge itself.
                    None => debug_assert!(false, "marked edge at traversal root"),
                }
            }
            Step::Exhausted => {
                stack.pop();
            }
        }
    }

    recorded
}
