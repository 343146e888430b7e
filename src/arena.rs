use generational_arena::{Arena, Index};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::instrument;

/// Data payload for one classification entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    /// Classification symbol, e.g. `A01B1/00`
    pub code: String,
    /// Human-readable title
    pub title: String,
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)
    }
}

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug)]
pub struct TreeNode {
    pub data: NodeData,
    /// Index of the parent node, None for roots
    pub parent: Option<Index>,
    /// Child indices in discovery order, never reordered
    pub children: Vec<Index>,
}

/// Arena-based forest of classification trees.
///
/// Uses a generational arena for memory-safe node references and O(1)
/// lookups. Nodes are append-only for the duration of a parse run; the raw
/// data has no universal root, so the forest keeps an ordered root list.
#[derive(Debug, Default)]
pub struct Forest {
    arena: Arena<TreeNode>,
    roots: Vec<Index>,
}

impl Forest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, appending it to the parent's children or, without a
    /// parent, to the root list.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(&mut self, data: NodeData, parent: Option<Index>) -> Index {
        let node_idx = self.arena.insert(TreeNode {
            data,
            parent,
            children: Vec::new(),
        });

        match parent {
            Some(parent_idx) => {
                if let Some(parent) = self.arena.get_mut(parent_idx) {
                    parent.children.push(node_idx);
                }
            }
            None => self.roots.push(node_idx),
        }

        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    /// Code of the node at `idx`, for diagnostics.
    pub fn code_of(&self, idx: Index) -> &str {
        self.get_node(idx).map(|n| n.data.code.as_str()).unwrap_or("")
    }

    pub fn roots(&self) -> &[Index] {
        &self.roots
    }

    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Depth-first pre-order iterator over all trees, roots in stored order.
    pub fn iter(&self) -> ForestIterator {
        ForestIterator::new(self)
    }

    /// Length of the longest root-to-leaf chain.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.roots
            .iter()
            .map(|&root| self.calculate_depth(root))
            .max()
            .unwrap_or(0)
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        if let Some(node) = self.get_node(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Root-to-leaf chains, one per leaf, in depth-first pre-order.
    ///
    /// A root without children is itself a leaf and yields a length-1 path.
    /// Must only be called once building has completed; row order of the
    /// flattened table is defined by this order.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_paths(&self) -> Vec<Vec<Index>> {
        let mut paths = Vec::new();
        let mut current = Vec::new();
        for &root in &self.roots {
            self.collect_leaf_paths(root, &mut current, &mut paths);
        }
        paths
    }

    fn collect_leaf_paths(&self, node_idx: Index, current: &mut Vec<Index>, paths: &mut Vec<Vec<Index>>) {
        let Some(node) = self.get_node(node_idx) else {
            return;
        };
        current.push(node_idx);
        if node.children.is_empty() {
            paths.push(current.clone());
        } else {
            for &child in &node.children {
                self.collect_leaf_paths(child, current, paths);
            }
        }
        current.pop();
    }

    /// Nested serializable view of the forest (the JSON export artifact).
    pub fn to_nested(&self) -> Vec<NestedNode> {
        self.roots.iter().map(|&root| self.nested_from(root)).collect()
    }

    fn nested_from(&self, node_idx: Index) -> NestedNode {
        match self.get_node(node_idx) {
            Some(node) => NestedNode {
                code: node.data.code.clone(),
                title: node.data.title.clone(),
                children: node
                    .children
                    .iter()
                    .map(|&child| self.nested_from(child))
                    .collect(),
            },
            None => NestedNode::default(),
        }
    }
}

/// One node of the nested JSON artifact; a leaf has empty `children`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestedNode {
    pub code: String,
    pub title: String,
    pub children: Vec<NestedNode>,
}

pub struct ForestIterator<'a> {
    forest: &'a Forest,
    stack: Vec<Index>,
}

impl<'a> ForestIterator<'a> {
    fn new(forest: &'a Forest) -> Self {
        let stack = forest.roots.iter().rev().copied().collect();
        Self { forest, stack }
    }
}

impl<'a> Iterator for ForestIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        let current_idx = self.stack.pop()?;
        let node = self.forest.get_node(current_idx)?;
        // Push children in reverse order for left-to-right traversal
        for &child in node.children.iter().rev() {
            self.stack.push(child);
        }
        Some((current_idx, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(code: &str) -> NodeData {
        NodeData {
            code: code.to_string(),
            title: format!("title of {}", code),
        }
    }

    //      A         B
    //     / \
    //   A01 A02
    //    |
    //  A01B
    fn sample_forest() -> Forest {
        let mut forest = Forest::new();
        let a = forest.insert_node(data("A"), None);
        let a01 = forest.insert_node(data("A01"), Some(a));
        forest.insert_node(data("A01B"), Some(a01));
        forest.insert_node(data("A02"), Some(a));
        forest.insert_node(data("B"), None);
        forest
    }

    #[test]
    fn test_iter_is_preorder_across_roots() {
        let forest = sample_forest();
        let codes: Vec<&str> = forest.iter().map(|(_, n)| n.data.code.as_str()).collect();
        assert_eq!(codes, vec!["A", "A01", "A01B", "A02", "B"]);
    }

    #[test]
    fn test_depth_is_longest_chain() {
        assert_eq!(sample_forest().depth(), 3);
        assert_eq!(Forest::new().depth(), 0);
    }

    #[test]
    fn test_leaf_paths_preorder() {
        let forest = sample_forest();
        let paths: Vec<Vec<&str>> = forest
            .leaf_paths()
            .iter()
            .map(|p| p.iter().map(|&i| forest.code_of(i)).collect())
            .collect();
        assert_eq!(
            paths,
            vec![vec!["A", "A01", "A01B"], vec!["A", "A02"], vec!["B"]]
        );
    }

    #[test]
    fn test_longest_leaf_path_equals_depth() {
        let forest = sample_forest();
        let longest = forest.leaf_paths().iter().map(|p| p.len()).max().unwrap();
        assert_eq!(longest, forest.depth());
    }

    #[test]
    fn test_childless_root_is_a_leaf_path() {
        let mut forest = Forest::new();
        forest.insert_node(data("X"), None);
        assert_eq!(forest.leaf_paths().len(), 1);
        assert_eq!(forest.depth(), 1);
    }

    #[test]
    fn test_to_nested_mirrors_structure() {
        let forest = sample_forest();
        let nested = forest.to_nested();
        assert_eq!(nested.len(), 2);
        assert_eq!(nested[0].code, "A");
        assert_eq!(nested[0].children.len(), 2);
        assert_eq!(nested[0].children[0].code, "A01");
        assert_eq!(nested[0].children[0].children[0].code, "A01B");
        assert!(nested[1].children.is_empty());
    }
}
