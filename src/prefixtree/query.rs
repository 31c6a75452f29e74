use std::borrow::Borrow;

use tracing::trace;

use super::PrefixTree;
use crate::{semantics::Semantics, trace::Trace};

impl<S: Semantics> PrefixTree<S> {
    /// Checks whether `trace` is consistent with `self`, meaning every prefix of the trace is
    /// present in the tree and, for semantics that store outputs on nodes, the outputs agree.
    /// A root declaration contradicts the tree only if the root output is known and differs.
    ///
    /// This does not modify the tree. State-merging procedures use it to validate a candidate
    /// merge against traces that were held out of construction.
    pub fn is_consistent(&self, trace: &Trace<S::Input, S::Output>) -> bool {
        if let (Some(known), Some(declared)) = (self.root.output(), trace.root_output()) {
            if known != declared {
                trace!("root output {known:?} contradicts declared {declared:?}");
                return false;
            }
        }

        let mut current = &self.root;
        for (input, output) in trace {
            let Some(child) = current.child(&S::edge_key(input, output)) else {
                return false;
            };
            if S::CHECKS_OUTPUT && child.output() != Some(output) {
                return false;
            }
            current = child;
        }
        true
    }

    /// Returns true if every one of the given traces is consistent with `self`.
    pub fn is_consistent_with_all<T, X>(&self, traces: T) -> bool
    where
        T: IntoIterator<Item = X>,
        X: Borrow<Trace<S::Input, S::Output>>,
    {
        traces.into_iter().all(|trace| {
            let trace: &Trace<S::Input, S::Output> = trace.borrow();
            self.is_consistent(trace)
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use crate::tests::{branching_pta, branching_traces};

    #[test]
    fn inserted_traces_and_their_prefixes_are_consistent() {
        let pta = branching_pta();
        assert!(pta.is_consistent_with_all(branching_traces()));
        assert!(pta.is_consistent(&Trace::new([('a', false)])));
        assert!(pta.is_consistent(&Trace::new([])));
        assert!(pta.is_consistent(&Trace::with_root(false, [])));
    }

    #[test]
    fn missing_edges_and_wrong_outputs_are_inconsistent() {
        let pta = branching_pta();
        assert!(!pta.is_consistent(&Trace::new([('b', false)])));
        assert!(!pta.is_consistent(&Trace::new([('a', false), ('b', false)])));
        assert!(!pta.is_consistent(&Trace::new([('a', false), ('b', true), ('a', true)])));
        assert!(!pta.is_consistent(&Trace::with_root(true, [('a', false)])));
    }

    #[test]
    fn unknown_root_output_is_not_contradicted() {
        let pta =
            PrefixTree::<MooreSemantics<char, u8>>::build([Trace::new([('a', 1u8), ('b', 2)])])
                .unwrap();
        assert!(pta.is_consistent(&Trace::with_root(7, [('a', 1)])));
        assert!(!pta.is_consistent(&Trace::new([('a', 2)])));
    }

    #[test]
    fn mealy_outputs_are_checked_through_edge_keys() {
        let pta = PrefixTree::<MealySemantics<char, u8>>::build([
            Trace::new([('a', 0u8), ('b', 1)]),
            Trace::new([('b', 1u8)]),
        ])
        .unwrap();
        assert!(pta.is_consistent(&Trace::new([('a', 0), ('b', 1)])));
        assert!(!pta.is_consistent(&Trace::new([('a', 1)])));
        assert!(!pta.is_consistent(&Trace::new([('a', 0), ('b', 0)])));
    }
}
