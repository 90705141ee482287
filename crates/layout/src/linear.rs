//! Orientation analysis of a list of siblings.

use crate::descriptor::LinearData;
use crate::tree::NodeTree;
use boxflow_style::Float;
use boxflow_types::NodeId;

impl NodeTree {
    /// Computes `linear_x`/`linear_y`, the float sides present and the clear markers for
    /// `nodes`, taken in the given order. Hidden, excluded and out-of-flow nodes are ignored.
    pub fn linear_data(&self, nodes: &[NodeId], tolerance: f32) -> LinearData {
        let members: Vec<NodeId> = nodes
            .iter()
            .copied()
            .filter(|n| {
                let node = &self[*n];
                node.visible && !node.excluded && node.page_flow()
            })
            .collect();

        let mut data = LinearData::default();
        let (mut active_left, mut active_right) = (false, false);
        for id in &members {
            let node = &self[*id];
            let clear = node.style.clear;
            let crosses_left = active_left && clear.clears(Float::Left);
            let crosses_right = active_right && clear.clears(Float::Right);
            if crosses_left || crosses_right {
                data.cleared.insert(*id, clear);
                if crosses_left {
                    active_left = false;
                }
                if crosses_right {
                    active_right = false;
                }
            }
            match node.float() {
                Float::Left => {
                    data.floated.left = true;
                    active_left = true;
                }
                Float::Right => {
                    data.floated.right = true;
                    active_right = true;
                }
                Float::None => {}
            }
        }

        match members.len() {
            0 => {}
            1 => {
                data.linear_x = true;
                data.linear_y = true;
            }
            _ => {
                let mut linear_x = data.cleared.is_empty();
                let mut linear_y = true;
                for pair in members.windows(2) {
                    let previous = self.bounds(pair[0]);
                    let current = self.bounds(pair[1]);
                    let below = current.top() >= previous.bottom() - tolerance;
                    let beside = current.left() >= previous.right() - tolerance;
                    if below || !beside || self[pair[1]].block_static() {
                        linear_x = false;
                    }
                    if !below {
                        linear_y = false;
                    }
                }
                data.linear_x = linear_x;
                data.linear_y = linear_y;
            }
        }
        data
    }

    /// Run contains both floating and in-flow members that do not line up horizontally.
    pub fn is_float_mixed(&self, nodes: &[NodeId], tolerance: f32) -> bool {
        let floating = nodes.iter().any(|n| self[*n].floating());
        let flowing = nodes.iter().any(|n| self[*n].in_flow() && !self[*n].excluded);
        floating && flowing && !self.linear_data(nodes, tolerance).linear_x
    }
}
