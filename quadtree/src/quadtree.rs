mod config;

pub use config::Config;

use crate::collision_detection;
use crate::error::{validate_rectangle, QuadtreeResult};
use crate::shapes::Rectangle;

use smallvec::SmallVec;

const ROOT: usize = 0;

type NodeStack = SmallVec<[usize; 32]>;

struct QuadNode {
    bounding_box: Rectangle,
    entries: Vec<(u32, Rectangle)>,
    // nw, ne, sw, se
    children: Option<[usize; 4]>,
    depth: usize,
}

impl QuadNode {
    fn new(bounding_box: Rectangle, depth: usize) -> Self {
        Self {
            bounding_box,
            entries: Vec::new(),
            children: None,
            depth,
        }
    }

    fn initialize(&mut self, bounding_box: Rectangle, depth: usize) {
        self.bounding_box = bounding_box;
        self.entries.clear();
        self.children = None;
        self.depth = depth;
    }
}

/// Region quadtree rebuilt from scratch every frame.
///
/// Entries are stored at the deepest node whose region fully contains their
/// bounding box, so a node's entries never leave its region. Entries that do
/// not fit the root region are kept at the root.
pub struct QuadTree {
    nodes: Vec<QuadNode>,
    // Nodes past this index are pooled slots from earlier rebuilds.
    live_nodes: usize,
    len: usize,
    config: Config,
}

impl QuadTree {
    pub fn new_with_config(bounding_box: Rectangle, config: Config) -> Self {
        let mut nodes = Vec::with_capacity(config.pool_size.max(1));
        nodes.push(QuadNode::new(bounding_box, 0));
        QuadTree {
            nodes,
            live_nodes: 1,
            len: 0,
            config,
        }
    }

    pub fn new(bounding_box: Rectangle) -> Self {
        Self::new_with_config(bounding_box, Config::default())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn bounds(&self) -> Rectangle {
        self.nodes[ROOT].bounding_box
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn node_count(&self) -> usize {
        self.live_nodes
    }

    /// Drops every entry and starts over with a single empty node over `bounds`.
    pub fn rebuild(&mut self, bounds: Rectangle) {
        self.nodes.truncate(self.config.pool_size.max(1));
        self.nodes[ROOT].initialize(bounds, 0);
        self.live_nodes = 1;
        self.len = 0;
    }

    pub fn insert(&mut self, value: u32, bounding_box: Rectangle) -> QuadtreeResult<()> {
        validate_rectangle(&bounding_box)?;

        let mut node_index = ROOT;
        while let Some(children) = self.nodes[node_index].children {
            match self.child_containing(&children, &bounding_box) {
                Some(child) => node_index = child,
                None => break,
            }
        }

        self.nodes[node_index].entries.push((value, bounding_box));
        self.len += 1;
        self.split_if_needed(node_index);
        Ok(())
    }

    /// Appends every value stored in a node whose region touches `bounding_box`.
    ///
    /// Results are candidates only: a value may be returned even though its own
    /// box does not overlap, but an overlapping value is never left out.
    pub fn query(&self, out: &mut Vec<u32>, bounding_box: &Rectangle) {
        let mut stack = NodeStack::new();
        stack.push(ROOT);

        while let Some(node_index) = stack.pop() {
            let node = &self.nodes[node_index];
            out.extend(node.entries.iter().map(|(value, _)| *value));

            if let Some(children) = node.children {
                for child in children {
                    if collision_detection::rectangle_rectangle(
                        &self.nodes[child].bounding_box,
                        bounding_box,
                    ) {
                        stack.push(child);
                    }
                }
            }
        }
    }

    pub fn all_node_bounding_boxes(&self, bounding_boxes: &mut Vec<Rectangle>) {
        bounding_boxes.extend(
            self.nodes[..self.live_nodes]
                .iter()
                .map(|node| node.bounding_box),
        );
    }

    pub fn all_entries(&self, entries: &mut Vec<(u32, Rectangle)>) {
        for node in &self.nodes[..self.live_nodes] {
            entries.extend_from_slice(&node.entries);
        }
    }

    /// Deepest level currently holding a node.
    pub fn depth(&self) -> usize {
        self.nodes[..self.live_nodes]
            .iter()
            .map(|node| node.depth)
            .max()
            .unwrap_or(0)
    }

    fn child_containing(&self, children: &[usize; 4], bounding_box: &Rectangle) -> Option<usize> {
        children.iter().copied().find(|&child| {
            collision_detection::rectangle_contains_rectangle(
                &self.nodes[child].bounding_box,
                bounding_box,
            )
        })
    }

    fn split_if_needed(&mut self, node_index: usize) {
        let node = &self.nodes[node_index];
        if node.children.is_some()
            || node.entries.len() <= self.config.node_capacity
            || node.depth >= self.config.max_depth
        {
            return;
        }

        let depth = node.depth + 1;
        let quadrants = node.bounding_box.quadrants();
        let children = quadrants.map(|quadrant| self.alloc_node(quadrant, depth));
        self.nodes[node_index].children = Some(children);

        // Move down whatever fits a quadrant; straddlers stay here.
        let entries = std::mem::take(&mut self.nodes[node_index].entries);
        for (value, bounding_box) in entries {
            match self.child_containing(&children, &bounding_box) {
                Some(child) => self.nodes[child].entries.push((value, bounding_box)),
                None => self.nodes[node_index].entries.push((value, bounding_box)),
            }
        }

        for child in children {
            self.split_if_needed(child);
        }
    }

    fn alloc_node(&mut self, bounding_box: Rectangle, depth: usize) -> usize {
        let index = self.live_nodes;
        if index < self.nodes.len() {
            self.nodes[index].initialize(bounding_box, depth);
        } else {
            self.nodes.push(QuadNode::new(bounding_box, depth));
        }
        self.live_nodes += 1;
        index
    }
}
