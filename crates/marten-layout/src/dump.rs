//! Serializable snapshot of a laid-out box tree, for tests and tooling.

use marten_form::ControlId;
use serde::Serialize;

use crate::box_tree::{BoxId, BoxTree, BoxType};

/// One box with its geometry and its children, nested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoxDump {
    /// Index in the arena.
    pub id: usize,
    /// Box kind.
    pub box_type: BoxType,
    /// Content edge relative to the parent's content edge.
    pub x: i32,
    /// Content edge relative to the parent's content edge.
    pub y: i32,
    /// Content edge relative to the dumped root.
    pub absolute_x: i32,
    /// Content edge relative to the dumped root.
    pub absolute_y: i32,
    /// Content width.
    pub width: i32,
    /// Content height.
    pub height: i32,
    /// Text carried by the box.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Link target.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Form control rendered by the box.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gadget: Option<ControlId>,
    /// Child boxes in order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<BoxDump>,
}

/// Snapshot the subtree rooted at `id`.
#[must_use]
pub fn dump_box_tree(tree: &BoxTree, id: BoxId) -> BoxDump {
    dump_at(tree, id, (0, 0))
}

fn dump_at(tree: &BoxTree, id: BoxId, (origin_x, origin_y): (i32, i32)) -> BoxDump {
    let b = &tree[id];
    let (absolute_x, absolute_y) = if b.parent.is_some() {
        (origin_x + b.x, origin_y + b.y)
    } else {
        (0, 0)
    };
    BoxDump {
        id: id.0,
        box_type: b.box_type,
        x: b.x,
        y: b.y,
        absolute_x,
        absolute_y,
        width: b.width,
        height: b.height,
        text: b.text.as_ref().map(|run| run.text.clone()),
        href: b.href.clone(),
        gadget: b.gadget,
        children: b
            .children
            .iter()
            .map(|&child| dump_at(tree, child, (absolute_x, absolute_y)))
            .collect(),
    }
}

impl BoxDump {
    /// Every box in the snapshot, pre-order.
    #[must_use]
    pub fn flatten(&self) -> Vec<&Self> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.flatten());
        }
        out
    }
}
