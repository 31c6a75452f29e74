use std::{cmp::Ordering, collections::VecDeque, hash::Hash};

use crate::math::Map;

/// A node of a prefix tree. Every node stands for exactly one prefix, that is the sequence of
/// edge keys on the path from the root to it, and owns all nodes below it. There are no links
/// back to the parent or to siblings.
///
/// The prefix is the identity of a node: two nodes compare equal if and only if their prefixes
/// do, regardless of their outputs and children. In particular a node and its clone stay equal
/// even after one of them has been modified.
#[derive(Debug)]
pub struct PtaNode<K, O> {
    output: Option<O>,
    children: Map<K, PtaNode<K, O>>,
    prefix: Vec<K>,
}

impl<K, O> PtaNode<K, O> {
    /// Creates a node without children that is reached by `prefix` and has the given output.
    pub fn new(output: Option<O>, prefix: Vec<K>) -> Self {
        Self {
            output,
            children: Map::default(),
            prefix,
        }
    }

    /// Creates a root node, i.e. a node with empty prefix.
    pub fn root(output: Option<O>) -> Self {
        Self::new(output, vec![])
    }

    /// The output observed at this node, `None` if no observation reached it yet.
    pub fn output(&self) -> Option<&O> {
        self.output.as_ref()
    }

    /// Replaces the output of `self`, returning the previous one.
    pub fn set_output(&mut self, output: Option<O>) -> Option<O> {
        std::mem::replace(&mut self.output, output)
    }

    /// The sequence of edge keys that leads from the root to `self`.
    pub fn prefix(&self) -> &[K] {
        &self.prefix
    }

    /// Length of the prefix of `self`.
    pub fn depth(&self) -> usize {
        self.prefix.len()
    }

    /// Iterates over the outgoing edges of `self` as pairs of key and child.
    pub fn children(&self) -> impl Iterator<Item = (&K, &PtaNode<K, O>)> + '_ {
        self.children.iter()
    }

    /// Mutable access to the children, used by merging procedures that rewire subtrees.
    pub fn children_mut(&mut self) -> &mut Map<K, PtaNode<K, O>> {
        &mut self.children
    }

    /// Returns true if `self` has no outgoing edges.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Compares two nodes by the length of their prefixes only. Nodes of equal depth are
    /// considered equivalent, which allows processing nodes shortest-prefix-first.
    pub fn cmp_depth(&self, other: &Self) -> Ordering {
        self.depth().cmp(&other.depth())
    }

    /// Counts the nodes in the subtree rooted at `self`, including `self`.
    pub fn size(&self) -> usize {
        self.nodes().count()
    }

    /// Iterates over all nodes of the subtree rooted at `self` in breadth-first order, so nodes
    /// with shorter prefixes are produced first.
    pub fn nodes(&self) -> Nodes<'_, K, O> {
        Nodes {
            queue: VecDeque::from([self]),
        }
    }

    /// Iterates over all leaves of the subtree rooted at `self`.
    pub fn leaves(&self) -> impl Iterator<Item = &PtaNode<K, O>> + '_ {
        self.nodes().filter(|node| node.is_leaf())
    }
}

impl<K: Eq + Hash, O> PtaNode<K, O> {
    /// Gives the child reached by the edge labeled `key`.
    pub fn child(&self, key: &K) -> Option<&PtaNode<K, O>> {
        self.children.get(key)
    }

    /// Gives mutable access to the child reached by the edge labeled `key`.
    pub fn child_mut(&mut self, key: &K) -> Option<&mut PtaNode<K, O>> {
        self.children.get_mut(key)
    }

    /// Follows the given sequence of edge keys starting in `self`.
    pub fn descendant<'a, J>(&self, keys: J) -> Option<&PtaNode<K, O>>
    where
        K: 'a,
        J: IntoIterator<Item = &'a K>,
    {
        keys.into_iter()
            .try_fold(self, |node, key| node.children.get(key))
    }
}

impl<K: Clone + Eq + Hash, O> PtaNode<K, O> {
    /// Returns the child of `self` reached by `key`, creating it with the given output if it does
    /// not exist yet. The prefix of a created child extends the prefix of `self` by `key`.
    pub(crate) fn child_or_insert(&mut self, key: &K, output: O) -> &mut PtaNode<K, O> {
        let prefix = &self.prefix;
        self.children.entry(key.clone()).or_insert_with(|| {
            let mut child_prefix = Vec::with_capacity(prefix.len() + 1);
            child_prefix.extend_from_slice(prefix);
            child_prefix.push(key.clone());
            PtaNode::new(Some(output), child_prefix)
        })
    }
}

// Written out instead of derived so that every node is copied field by field and no node of the
// copy is shared with `self`. Nodes are visited with an explicit queue, the depth of the tree
// is only bounded by the longest trace.
impl<K: Clone + Eq + Hash, O: Clone> Clone for PtaNode<K, O> {
    fn clone(&self) -> Self {
        // breadth-first order, every entry knows the position of its parent and its edge key
        let mut order: Vec<(usize, Option<&K>, &Self)> = vec![(0, None, self)];
        let mut next = 0;
        while next < order.len() {
            let node = order[next].2;
            order.extend(node.children.iter().map(|(key, child)| (next, Some(key), child)));
            next += 1;
        }

        let mut copies: Vec<Self> = order
            .iter()
            .map(|(_, _, node)| Self::new(node.output.clone(), node.prefix.clone()))
            .collect();
        // children come after their parents, attaching back to front moves every copy only
        // once it has received all of its own children
        while copies.len() > 1 {
            let position = copies.len() - 1;
            let (parent, key, _) = order[position];
            let (Some(copy), Some(key)) = (copies.pop(), key) else {
                break;
            };
            copies[parent].children.insert(key.clone(), copy);
        }
        copies
            .pop()
            .unwrap_or_else(|| Self::new(self.output.clone(), self.prefix.clone()))
    }
}

// Dropping the children recursively would need one stack frame per level.
impl<K, O> Drop for PtaNode<K, O> {
    fn drop(&mut self) {
        let mut pending: Vec<PtaNode<K, O>> = self.children.drain().map(|(_, c)| c).collect();
        while let Some(mut node) = pending.pop() {
            pending.extend(node.children.drain().map(|(_, c)| c));
        }
    }
}

impl<K: PartialEq, O> PartialEq for PtaNode<K, O> {
    fn eq(&self, other: &Self) -> bool {
        self.prefix == other.prefix
    }
}

impl<K: Eq, O> Eq for PtaNode<K, O> {}

impl<K: Hash, O> Hash for PtaNode<K, O> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.prefix.hash(state)
    }
}

/// Breadth-first iterator over the nodes of a subtree, see [`PtaNode::nodes`].
#[derive(Debug, Clone)]
pub struct Nodes<'a, K, O> {
    queue: VecDeque<&'a PtaNode<K, O>>,
}

impl<'a, K, O> Iterator for Nodes<'a, K, O> {
    type Item = &'a PtaNode<K, O>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.queue.pop_front()?;
        self.queue.extend(node.children.values());
        Some(node)
    }
}
