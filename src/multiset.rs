//! An ordered multiset implemented with an AVL tree.

use std::cmp::Ordering;
use std::fmt;
use std::iter::FromIterator;

use crate::node::{self, Link, Node};

/// Type of the ordering functions used when none is supplied.
pub type OrderFn<T> = fn(&T, &T) -> Ordering;

/// An ordered multiset implemented with an AVL tree.
///
/// Values that compare equal under the primary order share a single tree node
/// (a *bucket*). Within a bucket, values keep their insertion order unless a
/// secondary order is supplied, in which case the bucket is kept sorted by it.
///
/// ```
/// use avl_multiset::AvlMultiset;
/// let mut set = AvlMultiset::new();
/// set.insert(2);
/// set.insert(1);
/// set.insert(2);
/// assert_eq!(set.count(&2), 2);
/// set.delete(&2);
/// assert_eq!(set.in_order(), vec![&1, &2]);
/// ```
#[derive(Clone)]
pub struct AvlMultiset<T, P = OrderFn<T>, S = OrderFn<T>> {
    root: Link<T>,
    primary: P,
    secondary: Option<S>,
    num_values: usize,
    num_nodes: usize,
}

enum Removal<T> {
    Absent,
    // Value taken from a bucket that is still populated, the tree shape is untouched.
    FromBucket(T),
    // Last value of a bucket taken, the node has been spliced out.
    WithNode(T),
}

impl<T: Ord> AvlMultiset<T> {
    /// Creates an empty multiset ordered by `Ord`.
    /// No memory is allocated until the first value is inserted.
    pub fn new() -> Self {
        Self::with_order(T::cmp)
    }
}

impl<T, P> AvlMultiset<T, P>
where
    P: Fn(&T, &T) -> Ordering,
{
    /// Creates an empty multiset using a custom primary order.
    pub fn with_order(primary: P) -> Self {
        Self {
            root: None,
            primary,
            secondary: None,
            num_values: 0,
            num_nodes: 0,
        }
    }
}

impl<T, P, S> AvlMultiset<T, P, S>
where
    P: Fn(&T, &T) -> Ordering,
    S: Fn(&T, &T) -> Ordering,
{
    /// Creates an empty multiset using a custom primary order.
    /// Values equal under `primary` are kept sorted by `secondary`.
    pub fn with_orders(primary: P, secondary: S) -> Self {
        Self {
            root: None,
            primary,
            secondary: Some(secondary),
            num_values: 0,
            num_nodes: 0,
        }
    }

    /// Inserts a value into the multiset.
    ///
    /// If a bucket of equal values exists already, the value joins it after
    /// all values it does not precede under the secondary order.
    pub fn insert(&mut self, value: T) {
        let root = self.root.take();
        let (root, created) = self.insert_into(root, value);
        self.root = Some(root);
        self.num_values += 1;
        if created {
            self.num_nodes += 1;
        }
    }

    /// Returns true if the multiset contains a value equal to the given one
    /// under the primary order.
    pub fn contains(&self, value: &T) -> bool {
        self.find(value).is_some()
    }

    /// Returns the bucket of values equal to the given one under the primary order.
    pub fn bucket(&self, value: &T) -> Option<&[T]> {
        self.find(value).map(|node| node.bucket.as_slice())
    }

    /// Returns the number of values equal to the given one under the primary order.
    pub fn count(&self, value: &T) -> usize {
        self.find(value).map_or(0, |node| node.bucket.len())
    }

    fn find(&self, value: &T) -> Option<&Node<T>> {
        let mut current = &self.root;
        while let Some(node) = current {
            current = match (self.primary)(value, node.key()) {
                Ordering::Equal => return Some(node),
                Ordering::Less => &node.left,
                Ordering::Greater => &node.right,
            };
        }
        None
    }

    // Returns the new subtree root and whether a node has been created.
    fn insert_into(&self, link: Link<T>, value: T) -> (Box<Node<T>>, bool) {
        let mut node = match link {
            None => return (Node::create(value), true),
            Some(node) => node,
        };
        let created = match (self.primary)(&value, node.key()) {
            Ordering::Less => {
                let (left, created) = self.insert_into(node.left.take(), value);
                node.left = Some(left);
                created
            }
            Ordering::Greater => {
                let (right, created) = self.insert_into(node.right.take(), value);
                node.right = Some(right);
                created
            }
            Ordering::Equal => {
                self.add_to_bucket(&mut node.bucket, value);
                return (node, false);
            }
        };
        if created {
            (node::rebalance(node), true)
        } else {
            (node, false)
        }
    }

    fn add_to_bucket(&self, bucket: &mut Vec<T>, value: T) {
        match &self.secondary {
            None => bucket.push(value),
            Some(secondary) => {
                let pos =
                    bucket.partition_point(|other| secondary(other, &value) != Ordering::Greater);
                bucket.insert(pos, value);
            }
        }
    }

    /// Asserts that the internal tree structure is consistent.
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self) {
        let mut num_nodes = 0;
        let mut num_values = 0;
        node::preorder(&self.root, &mut |node: &Node<T>| {
            let left_height = node::height(&node.left);
            let right_height = node::height(&node.right);

            // Check height
            assert_eq!(node.height, 1 + left_height.max(right_height));

            // Check AVL condition (nearly balance)
            assert!(left_height <= right_height + 1);
            assert!(right_height <= left_height + 1);

            // Check bucket
            assert!(!node.bucket.is_empty());
            for value in &node.bucket {
                assert!((self.primary)(value, node.key()) == Ordering::Equal);
            }
            if let Some(secondary) = &self.secondary {
                for pair in node.bucket.windows(2) {
                    assert!(secondary(&pair[0], &pair[1]) != Ordering::Greater);
                }
            }

            num_nodes += 1;
            num_values += node.bucket.len();
        });

        // Check ordering between neighbouring buckets
        let mut prev: Option<&T> = None;
        node::inorder(&self.root, &mut |node| {
            if let Some(prev) = prev {
                assert!((self.primary)(prev, node.key()) == Ordering::Less);
            }
            prev = Some(node.key());
        });

        assert_eq!(num_nodes, self.num_nodes);
        assert_eq!(num_values, self.num_values);
    }
}

impl<T, P, S> AvlMultiset<T, P, S>
where
    T: PartialEq,
    P: Fn(&T, &T) -> Ordering,
    S: Fn(&T, &T) -> Ordering,
{
    /// Removes one occurrence of a value from the multiset.
    /// Returns whether the value was previously in the multiset.
    pub fn delete(&mut self, value: &T) -> bool {
        self.take(value).is_some()
    }

    /// Removes one occurrence of a value from the multiset.
    /// Returns the removed value if it was previously in the multiset.
    ///
    /// The value is looked up by the primary order, then by equality within its bucket.
    /// The tree is left untouched if no such value exists.
    pub fn take(&mut self, value: &T) -> Option<T> {
        let root = self.root.take();
        let (root, removal) = self.take_from(root, value);
        self.root = root;
        match removal {
            Removal::Absent => None,
            Removal::FromBucket(taken) => {
                self.num_values -= 1;
                Some(taken)
            }
            Removal::WithNode(taken) => {
                debug_assert!(self.num_nodes >= 1);
                self.num_values -= 1;
                self.num_nodes -= 1;
                Some(taken)
            }
        }
    }

    // Returns the new subtree root. Nodes are only rebalanced on the way back
    // up if a node has actually been spliced out below them.
    fn take_from(&self, link: Link<T>, value: &T) -> (Link<T>, Removal<T>) {
        let mut node = match link {
            None => return (None, Removal::Absent),
            Some(node) => node,
        };
        let removal = match (self.primary)(value, node.key()) {
            Ordering::Less => {
                let (left, removal) = self.take_from(node.left.take(), value);
                node.left = left;
                removal
            }
            Ordering::Greater => {
                let (right, removal) = self.take_from(node.right.take(), value);
                node.right = right;
                removal
            }
            Ordering::Equal => {
                let pos = match node.bucket.iter().position(|other| other == value) {
                    None => return (Some(node), Removal::Absent),
                    Some(pos) => pos,
                };
                let taken = node.bucket.remove(pos);
                if !node.bucket.is_empty() {
                    return (Some(node), Removal::FromBucket(taken));
                }
                return (node::splice(node), Removal::WithNode(taken));
            }
        };
        match removal {
            Removal::WithNode(_) => (Some(node::rebalance(node)), removal),
            _ => (Some(node), removal),
        }
    }
}

impl<T, P, S> AvlMultiset<T, P, S> {
    /// Returns true if the multiset contains no values.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of values in the multiset, counting duplicates.
    pub fn len(&self) -> usize {
        self.num_values
    }

    /// Returns the number of buckets, i.e. of distinct values under the primary order.
    pub fn node_count(&self) -> usize {
        self.num_nodes
    }

    /// Returns the height of the tree. An empty tree has height 0, a single node height 1.
    pub fn height(&self) -> usize {
        node::height(&self.root)
    }

    /// Clears the multiset, deallocating all memory.
    pub fn clear(&mut self) {
        self.root = None;
        self.num_values = 0;
        self.num_nodes = 0;
    }

    /// Returns the bucket holding the smallest values.
    pub fn first_bucket(&self) -> Option<&[T]> {
        let mut node = self.root.as_deref()?;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        Some(&node.bucket)
    }

    /// Returns the bucket holding the largest values.
    pub fn last_bucket(&self) -> Option<&[T]> {
        let mut node = self.root.as_deref()?;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        Some(&node.bucket)
    }

    /// Calls `f` on every value in ascending primary order.
    /// Values of one bucket are visited in bucket order.
    pub fn traverse<F>(&self, mut f: F)
    where
        F: FnMut(&T),
    {
        node::inorder(&self.root, &mut |node| node.bucket.iter().for_each(&mut f));
    }

    /// Returns all values in ascending primary order.
    pub fn in_order(&self) -> Vec<&T> {
        let mut values = Vec::with_capacity(self.num_values);
        node::inorder(&self.root, &mut |node| values.extend(node.bucket.iter()));
        values
    }

    /// Returns key and height of every node in pre-order.
    #[cfg(test)]
    pub(crate) fn shape(&self) -> Vec<(&T, usize)> {
        let mut shape = Vec::with_capacity(self.num_nodes);
        node::preorder(&self.root, &mut |node| shape.push((node.key(), node.height)));
        shape
    }

    /// Calls `f` on every bucket in level order, starting at the root.
    pub fn traverse_level_order<F>(&self, mut f: F)
    where
        F: FnMut(&[T]),
    {
        node::level_order(&self.root, |node| f(&node.bucket));
    }
}

impl<T: Ord> Default for AvlMultiset<T> {
    /// Creates an empty multiset.
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> FromIterator<T> for AvlMultiset<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<T, P, S> Extend<T> for AvlMultiset<T, P, S>
where
    P: Fn(&T, &T) -> Ordering,
    S: Fn(&T, &T) -> Ordering,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        iter.into_iter().for_each(move |value| self.insert(value));
    }
}

impl<T: fmt::Debug, P, S> fmt::Debug for AvlMultiset<T, P, S> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_list().entries(self.in_order()).finish()
    }
}
