use std::borrow::Borrow;

use owo_colors::OwoColorize;
use thiserror::Error;
use tracing::{debug, trace};

use crate::{semantics::Semantics, trace::Trace};

mod node;
pub use node::{Nodes, PtaNode};

mod extract;
mod query;

/// Raised when an observation contradicts what a prefix tree already knows. Construction of a
/// tree is aborted entirely when this occurs, the caller has to supply consistent data.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum ConflictError {
    /// The root output declared by a trace differs from the one declared earlier.
    #[error("root output `{observed}` conflicts with previously declared `{existing}`")]
    RootOutput {
        /// The output already stored at the root.
        existing: String,
        /// The output declared by the offending trace.
        observed: String,
    },
    /// A trace observes an output at a prefix that differs from the stored one.
    #[error("output `{observed}` at prefix {prefix} conflicts with previously observed `{existing}`")]
    Output {
        /// The prefix at which the outputs disagree.
        prefix: String,
        /// The output already stored for the prefix.
        existing: String,
        /// The output observed by the offending trace.
        observed: String,
    },
}

/// Node type of the prefix tree for the semantics `S`.
pub type NodeOf<S> = PtaNode<<S as Semantics>::EdgeKey, <S as Semantics>::Output>;

/// A prefix tree acceptor (PTA) for the semantics `S`. It is the tree of all prefixes of a
/// collection of traces, where every node knows the output that was observed for its prefix.
/// Which outputs are attached to nodes and how edges are keyed is determined by `S`, see
/// [`Semantics`].
///
/// Cloning a tree produces a deep copy that shares no node with the original, so a clone can
/// be modified freely, for example to try out a merge of states, and be discarded afterwards.
#[derive(Debug)]
pub struct PrefixTree<S: Semantics> {
    root: NodeOf<S>,
    semantics: S,
}

impl<S: Semantics> PrefixTree<S> {
    /// Creates a tree that consists only of the root, whose output is not known yet.
    pub fn new() -> Self {
        Self {
            root: PtaNode::root(None),
            semantics: S::default(),
        }
    }

    /// Builds the prefix tree for the given traces. Fails with a [`ConflictError`] on the first
    /// pair of observations that disagree, in which case no tree is produced at all.
    ///
    /// ```
    /// use automata_pta::prelude::*;
    ///
    /// let traces = [
    ///     Trace::with_root(false, [('a', false), ('b', true)]),
    ///     Trace::with_root(false, [('a', false), ('c', false)]),
    /// ];
    /// let pta: PrefixTree<DfaSemantics<char>> = PrefixTree::build(&traces).unwrap();
    /// assert_eq!(pta.size(), 4);
    /// assert_eq!(pta.get(&['a', 'b']).and_then(|n| n.output()), Some(&true));
    ///
    /// let conflicting = [Trace::new([('a', true)]), Trace::new([('a', false)])];
    /// assert!(PrefixTree::<DfaSemantics<char>>::build(&conflicting).is_err());
    /// ```
    pub fn build<T, X>(traces: T) -> Result<Self, ConflictError>
    where
        T: IntoIterator<Item = X>,
        X: Borrow<Trace<S::Input, S::Output>>,
    {
        let mut tree = Self::new();
        let mut count = 0usize;
        for (i, trace) in traces.into_iter().enumerate() {
            let trace: &Trace<S::Input, S::Output> = trace.borrow();
            trace!("inserting trace {i}: {trace}");
            if let Err(err) = tree.try_insert(trace) {
                debug!("{} in trace {i} ({}): {err}", "CONFLICT".bold().red(), S::KIND);
                return Err(err);
            }
            count += 1;
        }
        debug!(
            "built {} prefix tree with {} nodes from {count} traces",
            S::KIND,
            tree.size()
        );
        Ok(tree)
    }

    /// Inserts a single trace into `self`. The trace is checked against the tree before any
    /// node is touched, so if a [`ConflictError`] is returned, `self` is left unchanged.
    pub fn try_insert(&mut self, trace: &Trace<S::Input, S::Output>) -> Result<(), ConflictError> {
        self.check_insertion(trace)?;

        if let Some(root) = trace.root_output() {
            self.root.set_output(Some(root.clone()));
        }
        let mut current = &mut self.root;
        for (input, output) in trace {
            let key = S::edge_key(input, output);
            current = current.child_or_insert(&key, output.clone());
        }
        Ok(())
    }

    /// Walks `trace` through the tree without modifying it and reports the first observation
    /// that contradicts a stored output. Once the walk leaves the tree, the remaining
    /// observations would create fresh nodes and cannot conflict anymore.
    fn check_insertion(&self, trace: &Trace<S::Input, S::Output>) -> Result<(), ConflictError> {
        if let (Some(existing), Some(observed)) = (self.root.output(), trace.root_output()) {
            if existing != observed {
                return Err(ConflictError::RootOutput {
                    existing: format!("{existing:?}"),
                    observed: format!("{observed:?}"),
                });
            }
        }

        let mut current = &self.root;
        for (input, output) in trace {
            let key = S::edge_key(input, output);
            let Some(child) = current.child(&key) else {
                return Ok(());
            };
            if S::CHECKS_OUTPUT && child.output() != Some(output) {
                return Err(ConflictError::Output {
                    prefix: format!("{:?}", child.prefix()),
                    existing: child
                        .output()
                        .map_or_else(|| "nothing".to_string(), |o| format!("{o:?}")),
                    observed: format!("{output:?}"),
                });
            }
            current = child;
        }
        Ok(())
    }

    /// The root of the tree, i.e. the node for the empty prefix.
    pub fn root(&self) -> &NodeOf<S> {
        &self.root
    }

    /// Mutable access to the root, from which the whole tree can be modified.
    pub fn root_mut(&mut self) -> &mut NodeOf<S> {
        &mut self.root
    }

    /// Consumes `self` and returns the root node, which owns the entire tree.
    pub fn into_root(self) -> NodeOf<S> {
        self.root
    }

    /// Returns the node for the given prefix of edge keys, if it is present.
    pub fn get(&self, prefix: &[S::EdgeKey]) -> Option<&NodeOf<S>> {
        self.root.descendant(prefix)
    }

    /// The number of nodes, which is the number of distinct prefixes.
    pub fn size(&self) -> usize {
        self.root.size()
    }

    /// Iterates over all nodes, shortest prefixes first.
    pub fn nodes(&self) -> Nodes<'_, S::EdgeKey, S::Output> {
        self.root.nodes()
    }

    /// Returns the semantics `self` was built with.
    pub fn semantics(&self) -> S {
        self.semantics
    }
}

impl<S: Semantics> Default for PrefixTree<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Semantics> Clone for PrefixTree<S> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            semantics: self.semantics,
        }
    }
}

impl<S: Semantics> From<NodeOf<S>> for PrefixTree<S> {
    fn from(root: NodeOf<S>) -> Self {
        Self {
            root,
            semantics: S::default(),
        }
    }
}
