//! Bounding volume hierarchy backend.
//!
//! A binary tree whose branches store the union of their children's boxes.
//! Queries skip any subtree whose box misses the query item.
//!
//! Equal `(box, value)` pairs share one leaf with a repetition count, so
//! duplicates cost no extra nodes.
//!
//! Inserts descend toward the child whose box grows least (by surface area).
//! When one side holds more than twice the leaves of the other, inserts go to
//! the lighter side instead, which keeps the depth logarithmic even when every
//! box covers the whole space.

use std::ops::ControlFlow;

use bbq_math::{BoundingBox, QueryItem};
use tracing::debug;

use crate::cache::CachedCount;
use crate::lookup::{BoundingBoxCollection, BoundingBoxLookup, Entry};

#[derive(Debug, Clone)]
enum Node<T> {
    Leaf {
        bounding_box: BoundingBox,
        value: T,
        count: usize,
    },
    Branch {
        bounding_box: BoundingBox,
        /// Number of leaves below this branch.
        leaves: usize,
        left: Box<Node<T>>,
        right: Box<Node<T>>,
    },
}

impl<T> Node<T> {
    fn leaf(bounding_box: BoundingBox, value: T) -> Box<Self> {
        Box::new(Node::Leaf {
            bounding_box,
            value,
            count: 1,
        })
    }

    /// Join two subtrees, refitting the branch box.
    fn branch(left: Box<Self>, right: Box<Self>) -> Box<Self> {
        Box::new(Node::Branch {
            bounding_box: left.bounding_box().union(right.bounding_box()),
            leaves: left.leaves() + right.leaves(),
            left,
            right,
        })
    }

    fn bounding_box(&self) -> &BoundingBox {
        match self {
            Node::Leaf { bounding_box, .. } | Node::Branch { bounding_box, .. } => bounding_box,
        }
    }

    fn leaves(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Branch { leaves, .. } => *leaves,
        }
    }

    /// Sum of leaf repetition counts.
    fn entries(&self) -> usize {
        match self {
            Node::Leaf { count, .. } => *count,
            Node::Branch { left, right, .. } => left.entries() + right.entries(),
        }
    }

    fn depth(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Branch { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

impl<T: PartialEq> Node<T> {
    fn insert(self: Box<Self>, value: T, bounding_box: BoundingBox) -> Box<Self> {
        match *self {
            Node::Leaf {
                bounding_box: stored_box,
                value: stored,
                count,
            } => {
                if stored_box == bounding_box && stored == value {
                    return Box::new(Node::Leaf {
                        bounding_box: stored_box,
                        value: stored,
                        count: count + 1,
                    });
                }
                let existing = Box::new(Node::Leaf {
                    bounding_box: stored_box,
                    value: stored,
                    count,
                });
                Node::branch(existing, Node::leaf(bounding_box, value))
            }
            Node::Branch { left, right, .. } => {
                if descend_left(&left, &right, &bounding_box) {
                    Node::branch(left.insert(value, bounding_box), right)
                } else {
                    Node::branch(left, right.insert(value, bounding_box))
                }
            }
        }
    }

    /// Remove one occurrence of the pair. Returns the replacement subtree.
    fn remove_one(
        self: Box<Self>,
        value: &T,
        bounding_box: &BoundingBox,
        removed: &mut bool,
    ) -> Option<Box<Self>> {
        if *removed || !self.bounding_box().contains(bounding_box) {
            return Some(self);
        }

        match *self {
            Node::Leaf {
                bounding_box: stored_box,
                value: stored,
                count,
            } => {
                let matches = stored_box == *bounding_box && stored == *value;
                if !matches {
                    return Some(Box::new(Node::Leaf {
                        bounding_box: stored_box,
                        value: stored,
                        count,
                    }));
                }
                *removed = true;
                (count > 1).then(|| {
                    Box::new(Node::Leaf {
                        bounding_box: stored_box,
                        value: stored,
                        count: count - 1,
                    })
                })
            }
            Node::Branch { left, right, .. } => {
                let left = left.remove_one(value, bounding_box, removed);
                let right = right.remove_one(value, bounding_box, removed);
                join(left, right)
            }
        }
    }

    /// Drop every leaf holding `value`, adding their counts to `removed`.
    fn remove_all(self: Box<Self>, value: &T, removed: &mut usize) -> Option<Box<Self>> {
        match *self {
            Node::Leaf {
                bounding_box,
                value: stored,
                count,
            } => {
                if stored == *value {
                    *removed += count;
                    return None;
                }
                Some(Box::new(Node::Leaf {
                    bounding_box,
                    value: stored,
                    count,
                }))
            }
            Node::Branch { left, right, .. } => {
                let left = left.remove_all(value, removed);
                let right = right.remove_all(value, removed);
                join(left, right)
            }
        }
    }
}

/// Rebuild a branch after its children changed, collapsing empty sides.
fn join<T>(left: Option<Box<Node<T>>>, right: Option<Box<Node<T>>>) -> Option<Box<Node<T>>> {
    match (left, right) {
        (Some(left), Some(right)) => Some(Node::branch(left, right)),
        (Some(only), None) | (None, Some(only)) => Some(only),
        (None, None) => None,
    }
}

fn descend_left<T>(left: &Node<T>, right: &Node<T>, bounding_box: &BoundingBox) -> bool {
    let (left_leaves, right_leaves) = (left.leaves(), right.leaves());
    if left_leaves > 2 * right_leaves + 1 {
        return false;
    }
    if right_leaves > 2 * left_leaves + 1 {
        return true;
    }

    let growth = |node: &Node<T>| {
        let current = node.bounding_box();
        current.union(bounding_box).surface_area() - current.surface_area()
    };
    let (left_growth, right_growth) = (growth(left), growth(right));
    if left_growth == right_growth {
        left_leaves < right_leaves
    } else {
        left_growth < right_growth
    }
}

fn visit_node<'a, T>(
    node: &'a Node<T>,
    query: &QueryItem,
    visitor: &mut dyn FnMut(Entry<'a, T>) -> ControlFlow<()>,
) -> ControlFlow<()> {
    if !node.bounding_box().intersects(query) {
        return ControlFlow::Continue(());
    }
    match node {
        Node::Leaf {
            bounding_box,
            value,
            count,
        } => {
            for _ in 0..*count {
                visitor(Entry::new(*bounding_box, value))?;
            }
            ControlFlow::Continue(())
        }
        Node::Branch { left, right, .. } => {
            visit_node(left, query, visitor)?;
            visit_node(right, query, visitor)
        }
    }
}

/// A lookup backed by a bounding volume hierarchy.
#[derive(Debug, Clone)]
pub struct TreeLookup<T> {
    root: Option<Box<Node<T>>>,
    len: CachedCount,
}

impl<T> TreeLookup<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: None,
            len: CachedCount::new(),
        }
    }

    /// Height of the tree; 0 when empty.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, |root| root.depth())
    }

    /// The box enclosing every entry, or `None` when empty.
    #[must_use]
    pub fn bounds(&self) -> Option<BoundingBox> {
        self.root.as_ref().map(|root| *root.bounding_box())
    }

    pub fn clear(&mut self) {
        self.root = None;
        self.len.invalidate();
    }
}

impl<T> Default for TreeLookup<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq> BoundingBoxCollection<T> for TreeLookup<T> {
    fn insert(&mut self, value: T, bounding_box: BoundingBox) {
        self.len.invalidate();
        self.root = Some(match self.root.take() {
            Some(root) => root.insert(value, bounding_box),
            None => Node::leaf(bounding_box, value),
        });
    }

    fn remove_value(&mut self, value: &T) -> usize {
        let Some(root) = self.root.take() else {
            return 0;
        };
        let mut removed = 0;
        self.root = root.remove_all(value, &mut removed);
        if removed > 0 {
            self.len.invalidate();
            debug!(removed, depth = self.depth(), "removed tree entries by value");
        }
        removed
    }

    fn len(&self) -> usize {
        self.len
            .get(|| self.root.as_ref().map_or(0, |root| root.entries()))
    }

    fn for_each_intersecting<'a>(
        &'a self,
        query: &QueryItem,
        visitor: &mut dyn FnMut(Entry<'a, T>) -> ControlFlow<()>,
    ) -> ControlFlow<()> {
        match &self.root {
            Some(root) => visit_node(root, query, visitor),
            None => ControlFlow::Continue(()),
        }
    }
}

impl<T: PartialEq> BoundingBoxLookup<T> for TreeLookup<T> {
    fn remove(&mut self, value: &T, bounding_box: &BoundingBox) -> bool {
        let Some(root) = self.root.take() else {
            return false;
        };
        let mut removed = false;
        self.root = root.remove_one(value, bounding_box, &mut removed);
        if removed {
            self.len.invalidate();
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use bbq_math::DVec3;

    use super::*;

    fn cube(min: f64, max: f64) -> BoundingBox {
        BoundingBox::new(DVec3::splat(min), DVec3::splat(max)).unwrap()
    }

    #[test]
    fn test_duplicates_share_a_leaf() {
        let mut tree = TreeLookup::new();
        tree.insert("a", cube(0.0, 1.0));
        tree.insert("a", cube(0.0, 1.0));
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.visit(&QueryItem::ALL).len(), 2);
    }

    #[test]
    fn test_remove_collapses_branch() {
        let mut tree = TreeLookup::new();
        tree.insert(1, cube(0.0, 1.0));
        tree.insert(2, cube(5.0, 6.0));
        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.bounds(), Some(cube(0.0, 6.0)));

        assert!(tree.remove(&2, &cube(5.0, 6.0)));
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.bounds(), Some(cube(0.0, 1.0)));
        assert!(!tree.remove(&2, &cube(5.0, 6.0)));
    }

    #[test]
    fn test_remove_only_one_occurrence() {
        let mut tree = TreeLookup::new();
        for _ in 0..3 {
            tree.insert(9, cube(1.0, 2.0));
        }
        tree.insert(9, cube(3.0, 4.0));
        assert!(tree.remove(&9, &cube(1.0, 2.0)));
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.remove_value(&9), 3);
        assert!(tree.is_empty());
        assert_eq!(tree.bounds(), None);
    }

    #[test]
    fn test_depth_stays_logarithmic_for_overlapping_boxes() {
        let mut tree = TreeLookup::new();
        for i in 0..1024 {
            tree.insert(i, cube(0.0, 100.0));
        }
        assert_eq!(tree.len(), 1024);
        assert!(tree.depth() <= 32, "depth {} too large", tree.depth());
    }

    #[test]
    fn test_query_prunes_but_finds_all_matches() {
        let mut tree = TreeLookup::new();
        for i in 0..100 {
            let min = f64::from(i);
            tree.insert(i, cube(min, min + 0.5));
        }
        let mut hits: Vec<_> = tree
            .visit(&QueryItem::from(cube(10.0, 12.0)))
            .into_iter()
            .map(|e| *e.value)
            .collect();
        hits.sort_unstable();
        assert_eq!(hits, vec![10, 11, 12]);
    }

    #[test]
    fn test_early_stop_inside_repeated_leaf() {
        let mut tree = TreeLookup::new();
        for _ in 0..5 {
            tree.insert('x', cube(0.0, 1.0));
        }
        let mut seen = 0;
        let flow = tree.for_each(&mut |_| {
            seen += 1;
            if seen == 2 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert_eq!(flow, ControlFlow::Break(()));
        assert_eq!(seen, 2);
    }
}
