use std::cmp;
use std::collections::VecDeque;

pub(crate) type Link<T> = Option<Box<Node<T>>>;

#[derive(Clone)]
pub(crate) struct Node<T> {
    pub(crate) bucket: Vec<T>,
    pub(crate) left: Link<T>,
    pub(crate) right: Link<T>,
    pub(crate) height: usize,
}

impl<T> Node<T> {
    pub(crate) fn create(value: T) -> Box<Self> {
        Box::new(Node {
            bucket: vec![value],
            left: None,
            right: None,
            height: 1,
        })
    }

    /// The first element of the bucket positions the node in the tree.
    pub(crate) fn key(&self) -> &T {
        debug_assert!(!self.bucket.is_empty());
        &self.bucket[0]
    }

    pub(crate) fn adjust_height(&mut self) {
        self.height = 1 + cmp::max(height(&self.left), height(&self.right));
    }

    pub(crate) fn balance_factor(&self) -> isize {
        height(&self.left) as isize - height(&self.right) as isize
    }
}

pub(crate) fn height<T>(link: &Link<T>) -> usize {
    match link {
        None => 0,
        Some(node) => node.height,
    }
}

//   node          pivot
//   /  \          /   \
// pivot  c  ->   a    node
// /  \                /  \
// a   b              b    c
pub(crate) fn rotate_right<T>(mut node: Box<Node<T>>) -> Box<Node<T>> {
    match node.left.take() {
        None => node,
        Some(mut pivot) => {
            node.left = pivot.right.take();
            node.adjust_height();
            pivot.right = Some(node);
            pivot.adjust_height();
            pivot
        }
    }
}

pub(crate) fn rotate_left<T>(mut node: Box<Node<T>>) -> Box<Node<T>> {
    match node.right.take() {
        None => node,
        Some(mut pivot) => {
            node.right = pivot.left.take();
            node.adjust_height();
            pivot.left = Some(node);
            pivot.adjust_height();
            pivot
        }
    }
}

/// Restores the AVL condition at the given node and adjusts its height.
/// Returns the root of the rebalanced subtree, which differs from the given
/// node whenever a rotation took place.
///
/// Single rotations are preferred whenever the heavy child is balanced,
/// so the resulting shape after a deletion is deterministic.
pub(crate) fn rebalance<T>(mut node: Box<Node<T>>) -> Box<Node<T>> {
    node.adjust_height();
    let balance = node.balance_factor();
    debug_assert!((-2..=2).contains(&balance));
    if balance > 1 {
        // Left heavy
        if let Some(left) = node.left.take() {
            node.left = Some(if left.balance_factor() < 0 {
                rotate_left(left)
            } else {
                left
            });
        }
        rotate_right(node)
    } else if balance < -1 {
        // Right heavy
        if let Some(right) = node.right.take() {
            node.right = Some(if right.balance_factor() > 0 {
                rotate_right(right)
            } else {
                right
            });
        }
        rotate_left(node)
    } else {
        node
    }
}

/// Removes a node whose bucket ran empty and returns its replacement.
///
/// A node with two children adopts the bucket of its in-order successor,
/// which is unlinked from the right subtree as a whole.
pub(crate) fn splice<T>(mut node: Box<Node<T>>) -> Link<T> {
    debug_assert!(node.bucket.is_empty());
    match (node.left.take(), node.right.take()) {
        (None, None) => None,
        (Some(child), None) | (None, Some(child)) => Some(child),
        (Some(left), Some(right)) => {
            let (right, bucket) = take_leftmost(right);
            node.bucket = bucket;
            node.left = Some(left);
            node.right = right;
            Some(rebalance(node))
        }
    }
}

/// Unlinks the smallest node of a subtree.
/// Returns the remaining subtree and the bucket of the unlinked node.
pub(crate) fn take_leftmost<T>(mut node: Box<Node<T>>) -> (Link<T>, Vec<T>) {
    match node.left.take() {
        None => {
            let Node { bucket, right, .. } = *node;
            (right, bucket)
        }
        Some(left) => {
            let (left, bucket) = take_leftmost(left);
            node.left = left;
            (Some(rebalance(node)), bucket)
        }
    }
}

pub(crate) fn inorder<'a, T, F>(link: &'a Link<T>, f: &mut F)
where
    F: FnMut(&'a Node<T>),
{
    if let Some(node) = link {
        inorder(&node.left, f);
        f(node);
        inorder(&node.right, f);
    }
}

#[cfg(any(test, feature = "consistency_check"))]
pub(crate) fn preorder<'a, T, F>(link: &'a Link<T>, f: &mut F)
where
    F: FnMut(&'a Node<T>),
{
    if let Some(node) = link {
        f(node);
        preorder(&node.left, f);
        preorder(&node.right, f);
    }
}

pub(crate) fn level_order<T, F>(link: &Link<T>, mut f: F)
where
    F: FnMut(&Node<T>),
{
    let mut queue = VecDeque::new();
    if let Some(root) = link {
        queue.push_back(root.as_ref());
    }
    while let Some(node) = queue.pop_front() {
        f(node);
        if let Some(left) = &node.left {
            queue.push_back(left.as_ref());
        }
        if let Some(right) = &node.right {
            queue.push_back(right.as_ref());
        }
    }
}
