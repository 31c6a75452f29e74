use thiserror::Error;
use tracing::{debug, trace};

use super::{Automaton, State, StateIndex};
use crate::{
    math::{Bijection, Map, Set},
    prefixtree::{NodeOf, PrefixTree},
    semantics::Semantics,
};

/// Errors that prevent a selection of tree nodes from being turned into an automaton.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum MaterializeError {
    /// No nodes were given, so there is no initial state.
    #[error("cannot materialize an automaton from an empty set of red nodes")]
    EmptyPartition,
    /// A red node has a child whose prefix is not among the red nodes, its transition would
    /// lead nowhere.
    #[error("red node {node} has child {child} which is not a red node")]
    MissingRedChild {
        /// Prefix of the red node.
        node: String,
        /// Prefix of the child that is missing.
        child: String,
    },
    /// Two red nodes whose prefixes differ in their outputs only would become two states with
    /// the same access word.
    #[error("red node {node} has the access word {access} of an earlier red node")]
    AmbiguousAccess {
        /// Prefix of the later red node.
        node: String,
        /// The shared access word.
        access: String,
    },
    /// A red node has two children whose edge keys have the same input.
    #[error("red node {node} has more than one transition on input {input}")]
    Nondeterministic {
        /// Prefix of the red node.
        node: String,
        /// The input symbol in question.
        input: String,
    },
}

/// Builds an automaton from the given *red* nodes, which are the nodes that a state-merging
/// procedure decided to keep as states. Every distinct prefix among them becomes one state,
/// the first node gives the initial state. If the same prefix occurs more than once, the first
/// occurrence is used. For every red node and each of its children a transition is added,
/// which is why every child of a red node has to be red itself.
///
/// The semantics `S` cannot be inferred from the nodes, [`PrefixTree::materialize`] is usually
/// more convenient.
///
/// ```
/// use automata_pta::prelude::*;
///
/// let pta = PrefixTree::<DfaSemantics<char>>::build([
///     Trace::with_root(false, [('a', true)]),
/// ])
/// .unwrap();
/// let red = [pta.root(), pta.get(&['a']).unwrap()];
/// let dfa: Dfa = materialize::<DfaSemantics<char>, _>(red).unwrap();
/// assert!(dfa.accepts(&['a']));
/// ```
pub fn materialize<'a, S, R>(
    red: R,
) -> Result<Automaton<S::Input, S::StateColor, S::EdgeColor>, MaterializeError>
where
    S: Semantics,
    NodeOf<S>: 'a,
    R: IntoIterator<Item = &'a NodeOf<S>>,
{
    let mut index: Bijection<&'a [S::EdgeKey], StateIndex> = Bijection::new();
    let mut red_nodes: Vec<&'a NodeOf<S>> = vec![];
    for node in red {
        if index
            .insert_no_overwrite(node.prefix(), red_nodes.len())
            .is_ok()
        {
            red_nodes.push(node);
        } else {
            trace!("ignoring repeated red node {:?}", node.prefix());
        }
    }
    if red_nodes.is_empty() {
        return Err(MaterializeError::EmptyPartition);
    }

    let mut states: Vec<State<S::Input, S::StateColor, S::EdgeColor>> = red_nodes
        .iter()
        .map(|node| State {
            access: node.prefix().iter().map(|key| S::transition(key).0).collect(),
            color: S::state_color(node.output()),
            edges: Map::default(),
        })
        .collect();

    for (source, node) in red_nodes.iter().enumerate() {
        for (key, child) in node.children() {
            let Some(&target) = index.get_by_left(child.prefix()) else {
                return Err(MaterializeError::MissingRedChild {
                    node: format!("{:?}", node.prefix()),
                    child: format!("{:?}", child.prefix()),
                });
            };
            let (input, color) = S::transition(key);
            if states[source].edges.contains_key(&input) {
                return Err(MaterializeError::Nondeterministic {
                    node: format!("{:?}", node.prefix()),
                    input: format!("{input:?}"),
                });
            }
            states[source].edges.insert(input, (target, color));
        }
    }

    {
        let mut seen: Set<&[S::Input]> = Set::default();
        for (state, node) in states.iter().zip(&red_nodes) {
            if !seen.insert(state.access.as_slice()) {
                return Err(MaterializeError::AmbiguousAccess {
                    node: format!("{:?}", node.prefix()),
                    access: format!("{:?}", state.access),
                });
            }
        }
    }

    let automaton = Automaton { states, initial: 0 };
    debug!(
        "materialized {} with {} states and {} transitions",
        S::KIND,
        automaton.size(),
        automaton.transition_count()
    );
    Ok(automaton)
}

impl<S: Semantics> PrefixTree<S> {
    /// Builds an automaton from the given red nodes, see [`materialize`].
    pub fn materialize<'a, R>(
        &self,
        red: R,
    ) -> Result<Automaton<S::Input, S::StateColor, S::EdgeColor>, MaterializeError>
    where
        NodeOf<S>: 'a,
        R: IntoIterator<Item = &'a NodeOf<S>>,
    {
        materialize::<S, R>(red)
    }

    /// Builds the automaton that has one state for every node of `self`, with the root as
    /// initial state. Its transitions mirror the edges of the tree.
    pub fn to_automaton(
        &self,
    ) -> Result<Automaton<S::Input, S::StateColor, S::EdgeColor>, MaterializeError> {
        materialize::<S, _>(self.nodes())
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use crate::tests::branching_pta;

    #[test_log::test]
    fn branching_dfa() {
        let pta = branching_pta();
        let red = [
            pta.root(),
            pta.get(&['a']).unwrap(),
            pta.get(&['a', 'b']).unwrap(),
            pta.get(&['a', 'c']).unwrap(),
        ];
        let dfa: Dfa = pta.materialize(red).unwrap();

        assert_eq!(dfa.size(), 4);
        assert_eq!(dfa.initial(), 0);
        assert_eq!(dfa.access(dfa.initial()), Some(&[][..]));
        assert_eq!(dfa.transition_count(), 3);
        let accepting: Vec<_> = dfa.accepting_states().iter().collect();
        assert_eq!(accepting, vec![2]);
        assert_eq!(dfa.access(2), Some(&['a', 'b'][..]));
        assert!(dfa.accepts(&['a', 'b']));
        assert!(!dfa.accepts(&['a', 'c']));
        assert!(!dfa.accepts(&['a']));
        for trace in crate::tests::branching_traces() {
            assert!(dfa.agrees_with(&trace));
        }
    }

    #[test]
    fn initial_state_is_positional() {
        let pta = branching_pta();
        let red = [
            pta.get(&['a', 'b']).unwrap(),
            pta.get(&['a']).unwrap(),
            pta.get(&['a', 'c']).unwrap(),
            pta.root(),
        ];
        let dfa = pta.materialize(red).unwrap();
        assert_eq!(dfa.access(dfa.initial()), Some(&['a', 'b'][..]));
        assert_eq!(dfa.state_color(dfa.initial()), Some(&true));
        assert_eq!(dfa.successor(3, &'a'), Some(1));
    }

    #[test]
    fn children_outside_the_red_nodes_are_rejected() {
        let pta = branching_pta();
        let red = [pta.root(), pta.get(&['a']).unwrap(), pta.get(&['a', 'b']).unwrap()];
        assert_eq!(
            pta.materialize(red).unwrap_err(),
            MaterializeError::MissingRedChild {
                node: "['a']".to_string(),
                child: "['a', 'c']".to_string()
            }
        );
        assert_eq!(
            pta.materialize([]).unwrap_err(),
            MaterializeError::EmptyPartition
        );
    }

    #[test]
    fn repeated_red_nodes_collapse() {
        let pta = branching_pta();
        let snapshot = pta.clone();
        let mut red: Vec<_> = pta.nodes().collect();
        red.extend(snapshot.nodes());
        let dfa = pta.materialize(red).unwrap();
        assert_eq!(dfa.size(), 4);
        assert_eq!(dfa.transition_count(), 3);
    }

    #[test]
    fn full_materialization_mirrors_the_tree() {
        let traces = [
            Trace::with_root(0u8, [('a', 1), ('b', 2)]),
            Trace::new([('b', 0), ('b', 0), ('a', 3)]),
            Trace::new([('a', 1), ('a', 0)]),
        ];
        let pta = PrefixTree::<MooreSemantics<char, u8>>::build(traces.clone()).unwrap();
        let mm: MooreMachine<char, u8> = pta.to_automaton().unwrap();

        assert_eq!(mm.size(), pta.size());
        assert_eq!(mm.transition_count(), pta.size() - 1);
        for node in pta.nodes() {
            let q = mm.state_with_access(node.prefix()).unwrap();
            assert_eq!(mm.state_color(q).unwrap().as_ref(), node.output());
            for (key, child) in node.children() {
                let target = mm.successor(q, key).unwrap();
                assert_eq!(mm.access(target), Some(child.prefix()));
            }
        }
        for trace in &traces {
            assert!(mm.agrees_with(trace));
        }
    }

    #[test]
    fn mealy_transitions_carry_outputs() {
        let traces = [
            Trace::new([('a', 0u8), ('b', 1)]),
            Trace::new([('b', 1u8), ('a', 0)]),
        ];
        let pta = PrefixTree::<MealySemantics<char, u8>>::build(&traces).unwrap();
        let mm: MealyMachine<char, u8> = pta.to_automaton().unwrap();
        assert_eq!(mm.size(), 5);
        assert_eq!(mm.outputs(&['a', 'b']), Some(vec![0, 1]));
        assert_eq!(mm.outputs(&['b', 'a']), Some(vec![1, 0]));
        assert_eq!(mm.state_with_access(&['a', 'b']), mm.reached_state(&['a', 'b']));
        for trace in &traces {
            assert!(mm.agrees_with(trace));
        }
    }

    #[test]
    fn red_nodes_sharing_an_input_word_are_rejected() {
        let pta = PrefixTree::<MealySemantics<char, u8>>::build([
            Trace::new([('a', 1u8)]),
            Trace::new([('a', 0u8)]),
        ])
        .unwrap();
        let red = [pta.get(&[('a', 1)]).unwrap(), pta.get(&[('a', 0)]).unwrap()];
        assert_eq!(
            pta.materialize(red).unwrap_err(),
            MaterializeError::AmbiguousAccess {
                node: "[('a', 0)]".to_string(),
                access: "['a']".to_string(),
            }
        );
    }

    #[test]
    fn ambiguous_mealy_inputs_are_rejected() {
        let pta = PrefixTree::<MealySemantics<char, u8>>::build([
            Trace::new([('a', 0u8)]),
            Trace::new([('a', 1u8)]),
        ])
        .unwrap();
        assert!(matches!(
            pta.to_automaton(),
            Err(MaterializeError::Nondeterministic { .. })
        ));
    }
}
