use std::{fmt::Debug, marker::PhantomData};

use crate::{Color, Symbol, Void};

/// Runtime tag for the three kinds of automata that can be learned from traces.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub enum AutomatonKind {
    /// Deterministic finite automaton, outputs are acceptance values on states.
    Dfa,
    /// Moore machine, outputs are arbitrary values on states.
    Moore,
    /// Mealy machine, outputs are values on transitions.
    Mealy,
}

impl std::fmt::Display for AutomatonKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AutomatonKind::Dfa => write!(f, "dfa"),
            AutomatonKind::Moore => write!(f, "moore"),
            AutomatonKind::Mealy => write!(f, "mealy"),
        }
    }
}

/// Determines how a prefix tree is shaped by the traces that are inserted into it and how the
/// tree is turned into an automaton. An implementation fixes
/// - the type of edge keys and how they are computed from an observation,
/// - whether the output stored at a node has to agree with the observed output,
/// - how an edge key is split back into an observation,
/// - which colors the states and transitions of the materialized automaton carry.
///
/// The implementors are zero-sized marker types, the choice between them is made once through
/// a type parameter of [`crate::PrefixTree`].
pub trait Semantics: Debug + Clone + Copy + Default {
    /// The type of input symbols.
    type Input: Symbol;
    /// The type of outputs that are observed.
    type Output: Color;
    /// The type with which the edges of the tree are labeled.
    type EdgeKey: Symbol;
    /// Color of the states in the materialized automaton.
    type StateColor: Clone + Debug;
    /// Color of the transitions in the materialized automaton.
    type EdgeColor: Clone + Debug;

    /// The kind of automaton these semantics produce.
    const KIND: AutomatonKind;
    /// Whether the output stored at a node must match the output of an observation that
    /// reaches it.
    const CHECKS_OUTPUT: bool;

    /// Computes the key of the edge taken on the observation `(input, output)`.
    fn edge_key(input: &Self::Input, output: &Self::Output) -> Self::EdgeKey;

    /// Recovers the observation that corresponds to taking the edge labeled `key` into a
    /// node whose output is `target_output`. Returns `None` if the observation cannot be
    /// recovered because the output is not known.
    fn decompose(
        key: &Self::EdgeKey,
        target_output: Option<&Self::Output>,
    ) -> Option<(Self::Input, Self::Output)>;

    /// Gives the color of the automaton state that is created for a node with the given output.
    fn state_color(output: Option<&Self::Output>) -> Self::StateColor;

    /// Splits an edge key into the input symbol on which the corresponding transition is taken
    /// and the color that the transition carries.
    fn transition(key: &Self::EdgeKey) -> (Self::Input, Self::EdgeColor);
}

/// Semantics for learning a [`crate::Dfa`]. Outputs are booleans that indicate acceptance of
/// the prefix read so far. A node whose output was never observed becomes a rejecting state.
#[derive(Debug, Hash, Eq, PartialEq)]
pub struct DfaSemantics<I>(PhantomData<I>);

/// Semantics for learning a [`crate::MooreMachine`]. The output is a property of the state
/// that is reached, so edges are keyed by input symbols only.
#[derive(Debug, Hash, Eq, PartialEq)]
pub struct MooreSemantics<I, O>(PhantomData<(I, O)>);

/// Semantics for learning a [`crate::MealyMachine`]. Since a Mealy machine emits its output
/// while taking a transition, edges of the tree are keyed by `(input, output)` pairs and no
/// additional consistency check on node outputs is necessary.
#[derive(Debug, Hash, Eq, PartialEq)]
pub struct MealySemantics<I, O>(PhantomData<(I, O)>);

// Manual impls, deriving would require the symbol types to be `Copy` themselves.
impl<I> Clone for DfaSemantics<I> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<I> Copy for DfaSemantics<I> {}

impl<I, O> Clone for MooreSemantics<I, O> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<I, O> Copy for MooreSemantics<I, O> {}

impl<I, O> Clone for MealySemantics<I, O> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<I, O> Copy for MealySemantics<I, O> {}

impl<I> Default for DfaSemantics<I> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<I, O> Default for MooreSemantics<I, O> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<I, O> Default for MealySemantics<I, O> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<I: Symbol> Semantics for DfaSemantics<I> {
    type Input = I;
    type Output = bool;
    type EdgeKey = I;
    type StateColor = bool;
    type EdgeColor = Void;

    const KIND: AutomatonKind = AutomatonKind::Dfa;
    const CHECKS_OUTPUT: bool = true;

    fn edge_key(input: &I, _output: &bool) -> I {
        input.clone()
    }

    fn decompose(key: &I, target_output: Option<&bool>) -> Option<(I, bool)> {
        target_output.map(|o| (key.clone(), *o))
    }

    fn state_color(output: Option<&bool>) -> bool {
        output.copied().unwrap_or(false)
    }

    fn transition(key: &I) -> (I, Void) {
        (key.clone(), Void)
    }
}

impl<I: Symbol, O: Color> Semantics for MooreSemantics<I, O> {
    type Input = I;
    type Output = O;
    type EdgeKey = I;
    type StateColor = Option<O>;
    type EdgeColor = Void;

    const KIND: AutomatonKind = AutomatonKind::Moore;
    const CHECKS_OUTPUT: bool = true;

    fn edge_key(input: &I, _output: &O) -> I {
        input.clone()
    }

    fn decompose(key: &I, target_output: Option<&O>) -> Option<(I, O)> {
        target_output.map(|o| (key.clone(), o.clone()))
    }

    fn state_color(output: Option<&O>) -> Option<O> {
        output.cloned()
    }

    fn transition(key: &I) -> (I, Void) {
        (key.clone(), Void)
    }
}

impl<I: Symbol, O: Color> Semantics for MealySemantics<I, O> {
    type Input = I;
    type Output = O;
    type EdgeKey = (I, O);
    type StateColor = Void;
    type EdgeColor = O;

    const KIND: AutomatonKind = AutomatonKind::Mealy;
    const CHECKS_OUTPUT: bool = false;

    fn edge_key(input: &I, output: &O) -> (I, O) {
        (input.clone(), output.clone())
    }

    fn decompose(key: &(I, O), _target_output: Option<&O>) -> Option<(I, O)> {
        Some(key.clone())
    }

    fn state_color(_output: Option<&O>) -> Void {
        Void
    }

    fn transition(key: &(I, O)) -> (I, O) {
        key.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mealy_keys_carry_the_output() {
        type M = MealySemantics<char, u8>;
        let key = M::edge_key(&'a', &3);
        assert_eq!(key, ('a', 3));
        assert_eq!(M::decompose(&key, None), Some(('a', 3)));
        assert_eq!(M::transition(&key), ('a', 3));
        assert!(!M::CHECKS_OUTPUT);
    }

    #[test]
    fn state_based_keys_drop_the_output() {
        type D = DfaSemantics<char>;
        assert_eq!(D::edge_key(&'a', &true), 'a');
        assert_eq!(D::decompose(&'a', Some(&true)), Some(('a', true)));
        assert_eq!(D::decompose(&'a', None), None);
        assert!(!D::state_color(None));

        type Mo = MooreSemantics<char, u8>;
        assert_eq!(Mo::edge_key(&'b', &7), 'b');
        assert_eq!(Mo::state_color(Some(&7)), Some(7));
        assert_eq!(Mo::KIND.to_string(), "moore");
    }
}
