//! Library for building prefix tree acceptors (PTAs) from observed input/output traces and
//! turning them into explicit finite-state models.
//!
//! A trace is a finite sequence of `(input, output)` observations made while running some
//! reactive system, optionally preceded by the output that is observed before any input is
//! given. The [`PrefixTree`] folds a collection of traces into a tree in which every node
//! corresponds to exactly one prefix of some trace. A node is identified by its prefix alone,
//! which is the sequence of edge keys leading from the root to it. Construction either
//! succeeds, producing a tree that is consistent with every trace, or fails with a
//! [`ConflictError`] as soon as two traces disagree on the output of a common prefix.
//!
//! Where outputs live depends on the kind of automaton that is learned, which is captured by
//! the [`Semantics`] trait. For [`DfaSemantics`] and [`MooreSemantics`] the output is a property
//! of the state that is reached, so edges are keyed by the raw input symbol and outputs are
//! checked at every node. For [`MealySemantics`] the output belongs to the transition, so the
//! edge key is the `(input, output)` pair itself.
//!
//! The tree is the data structure that state-merging algorithms such as RPNI operate on.
//! They pick a set of *red* nodes which become the states of the learned automaton, clone
//! the tree before trying a candidate merge and check candidates against held-out traces
//! using [`PrefixTree::is_consistent`]. Once the red nodes are fixed,
//! [`materialize`](crate::automaton::materialize) builds a [`Dfa`], [`MooreMachine`] or
//! [`MealyMachine`] from them.
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use automata_pta::prelude::*;` should be enough to use the package.
pub mod prelude {
    pub use super::{
        automaton::{
            materialize, Automaton, Dfa, MaterializeError, MealyMachine, MooreMachine, StateIndex,
        },
        dot::Dottable,
        math,
        prefixtree::{ConflictError, PrefixTree, PtaNode},
        semantics::{AutomatonKind, DfaSemantics, MealySemantics, MooreSemantics, Semantics},
        trace::{Trace, TraceError},
        Color, Symbol, Void,
    };
    #[cfg(feature = "random")]
    pub use super::random::{Reactive, TraceSampler};
}

/// This module contains some definitions of mathematical objects which are used throughout the crate and
/// do not really fit to the top level.
pub mod math;

/// Defines traces, the unit of observation from which prefix trees are built.
pub mod trace;
pub use trace::Trace;

/// Contains the strategies that decide how edges are keyed and where outputs are checked.
pub mod semantics;
pub use semantics::{AutomatonKind, DfaSemantics, MealySemantics, MooreSemantics, Semantics};

/// The prefix tree acceptor together with its construction, query and extraction operations.
pub mod prefixtree;
pub use prefixtree::{ConflictError, PrefixTree, PtaNode};

/// Explicit finite-state models and their materialization from a selection of tree nodes.
pub mod automaton;
pub use automaton::{Automaton, Dfa, MealyMachine, MooreMachine};

/// Export of trees and automata to the graphviz DOT format.
pub mod dot;

/// Sampling of random traces from models, feature gated behind `random`.
#[cfg(feature = "random")]
pub mod random;

use std::{fmt::Debug, hash::Hash};

/// A symbol is anything that can be used as an input, or as an edge key, of a tree.
pub trait Symbol: Clone + Eq + Ord + Hash + Debug {}

impl<T: Clone + Eq + Ord + Hash + Debug> Symbol for T {}

/// A color is simply a type that can be used as the output observed in a trace, i.e. as a
/// color on the nodes of a tree or on the states and transitions of an automaton.
pub trait Color: Clone + Eq + Ord + Hash + Debug {}

impl<T: Clone + Eq + Ord + Hash + Debug> Color for T {}

/// Represents the absence of a color. The states of a [`MealyMachine`] carry no output, and
/// neither do the transitions of a [`Dfa`] or [`MooreMachine`], in these positions `Void` is used.
#[derive(Hash, Eq, PartialEq, PartialOrd, Ord, Clone, Copy, Default)]
pub struct Void;

impl Debug for Void {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#")
    }
}
