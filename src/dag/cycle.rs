// src/dag/cycle.rs

//! Whole-graph cycle check.
//!
//! Depth-first search keeping a `visited` set and an `on_stack` set; reaching
//! a node that is still on the stack is a back edge, i.e. a cycle. The
//! recursion is replaced by an explicit stack of `(node, next child)` frames
//! so deep chains cannot overflow the call stack.

use crate::dag::graph::Node;

/// Returns `true` if the children edges of `nodes` contain a cycle.
pub(crate) fn has_cycle(nodes: &[Node]) -> bool {
    let mut visited = vec![false; nodes.len()];
    let mut on_stack = vec![false; nodes.len()];
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for start in 0..nodes.len() {
        if visited[start] {
            continue;
        }

        visited[start] = true;
        on_stack[start] = true;
        stack.push((start, 0));

        while let Some(frame) = stack.last_mut() {
            let (node, next) = *frame;

            match nodes[node].children.get(next) {
                Some(child) => {
                    frame.1 += 1;
                    let child = child.0;

                    if on_stack[child] {
                        return true;
                    }
                    if !visited[child] {
                        visited[child] = true;
                        on_stack[child] = true;
                        stack.push((child, 0));
                    }
                }
                None => {
                    on_stack[node] = false;
                    stack.pop();
                }
            }
        }
    }

    false
}
