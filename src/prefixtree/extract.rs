use tracing::{debug, warn};

use super::{NodeOf, PrefixTree};
use crate::{semantics::Semantics, trace::Trace};

impl<S: Semantics> PrefixTree<S> {
    /// Computes the characteristic sample of `self`: one trace for every leaf, which consists of
    /// the observations along the path from the root to that leaf. Inserting the produced
    /// traces into an empty tree yields a tree with the same set of prefixes as `self`.
    ///
    /// Every trace declares the output of the root if it is known, so rebuilding from the
    /// sample restores the root as well. The traces are produced in no particular order. A path
    /// through a node whose output is unknown, which can only occur after the tree has been
    /// modified from the outside, cannot be turned into a trace and is skipped.
    ///
    /// ```
    /// use automata_pta::prelude::*;
    ///
    /// let pta = PrefixTree::<DfaSemantics<char>>::build([
    ///     Trace::new([('a', true), ('b', false)]),
    ///     Trace::new([('a', true)]),
    /// ])
    /// .unwrap();
    /// let sample: Vec<_> = pta.extract_sequences().collect();
    /// assert_eq!(sample, vec![Trace::new([('a', true), ('b', false)])]);
    /// ```
    pub fn extract_sequences(&self) -> std::vec::IntoIter<Trace<S::Input, S::Output>> {
        let root = self.root.output();
        let mut out = vec![];
        let mut path: Vec<(S::Input, S::Output)> = vec![];
        // each entry is a node, the length of the path above it and the observation on its edge
        let mut stack: Vec<(&NodeOf<S>, usize, Option<(S::Input, S::Output)>)> =
            vec![(&self.root, 0, None)];

        while let Some((node, depth, observation)) = stack.pop() {
            path.truncate(depth);
            path.extend(observation);
            if node.is_leaf() {
                let steps = path.iter().cloned();
                out.push(match root {
                    Some(root) => Trace::with_root(root.clone(), steps),
                    None => Trace::new(steps),
                });
                continue;
            }
            for (key, child) in node.children() {
                let Some(observation) = S::decompose(key, child.output()) else {
                    warn!(
                        "skipping paths through {:?}, its output is unknown",
                        child.prefix()
                    );
                    continue;
                };
                stack.push((child, path.len(), Some(observation)));
            }
        }

        debug!(
            "extracted {} traces from {} prefix tree",
            out.len(),
            S::KIND
        );
        out.into_iter()
    }
}
