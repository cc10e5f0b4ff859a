use std::collections::{HashMap, VecDeque};

use serde::Serialize;

use crate::graph::{Edge, Node};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Tuning knobs for the tree layout. Defaults match a 1200px-wide canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    pub canvas_width: f64,
    pub level_gap: f64,
    pub sibling_gap: f64,
    pub offset_step: f64,
    pub base_y: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            canvas_width: 1200.0,
            level_gap: 200.0,
            sibling_gap: 200.0,
            offset_step: 15.0,
            base_y: 100.0,
        }
    }
}

/// Assigns a position to every node reachable from `root_id`.
///
/// Levels come from a breadth-first traversal over the edges in insertion
/// order; a node keeps the level of its first-discovered parent, so later
/// cross-edges never move it. Each level is laid out left to right in
/// discovery order, centered on the canvas midline, with a small alternating
/// vertical offset so sibling-heavy rows don't collapse their edges onto one
/// line. Nodes unreachable from the root get no position.
///
/// Pure function of its inputs: the same graph and parameters always produce
/// the same map.
pub fn layout(
    nodes: &[Node],
    edges: &[Edge],
    root_id: &str,
    params: &LayoutParams,
) -> HashMap<String, Position> {
    let mut positions = HashMap::new();
    if !nodes.iter().any(|n| n.id == root_id) {
        return positions;
    }

    let mut children_map: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in edges {
        children_map
            .entry(edge.source.as_str())
            .or_default()
            .push(edge.target.as_str());
    }

    // BFS layering; first discovery wins.
    let mut levels: HashMap<&str, usize> = HashMap::new();
    let mut level_rows: Vec<Vec<&str>> = vec![vec![root_id]];
    levels.insert(root_id, 0);
    let mut queue = VecDeque::from([root_id]);
    while let Some(parent) = queue.pop_front() {
        let parent_level = levels[parent];
        for &target in children_map.get(parent).into_iter().flatten() {
            if levels.contains_key(target) {
                continue;
            }
            levels.insert(target, parent_level + 1);
            if level_rows.len() <= parent_level + 1 {
                level_rows.push(Vec::new());
            }
            level_rows[parent_level + 1].push(target);
            queue.push_back(target);
        }
    }

    for (level, row) in level_rows.iter().enumerate() {
        let k = row.len();
        for (i, &id) in row.iter().enumerate() {
            let jitter = if i % 2 == 0 {
                params.offset_step
            } else {
                -params.offset_step
            };
            positions.insert(
                id.to_string(),
                Position {
                    x: params.canvas_width / 2.0 + i as f64 * params.sibling_gap
                        - (k - 1) as f64 * params.sibling_gap / 2.0,
                    y: params.base_y + level as f64 * params.level_gap + jitter,
                },
            );
        }
    }

    positions
}
