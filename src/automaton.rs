use std::fmt::{Debug, Display};

use itertools::Itertools;
use owo_colors::OwoColorize;

use crate::{math::Map, Symbol};

mod dfa;
pub use dfa::Dfa;

mod moore;
pub use moore::MooreMachine;

mod mealy;
pub use mealy::MealyMachine;

mod materialize;
pub use materialize::{materialize, MaterializeError};

/// States of an [`Automaton`] are referred to by their position.
pub type StateIndex = usize;

#[derive(Debug, Clone)]
struct State<I, Q, C> {
    access: Vec<I>,
    color: Q,
    edges: Map<I, (StateIndex, C)>,
}

/// A deterministic automaton over inputs of type `I`, whose states are colored with `Q` and
/// whose transitions are colored with `C`. Each state remembers the word it was created for,
/// its *access word*, which for a materialized automaton is the sequence of inputs along the
/// prefix of the tree node the state stems from.
///
/// Depending on where outputs live, the colors are instantiated differently, see [`Dfa`],
/// [`MooreMachine`] and [`MealyMachine`]. Positions that carry no output use [`crate::Void`].
#[derive(Debug, Clone)]
pub struct Automaton<I, Q, C> {
    states: Vec<State<I, Q, C>>,
    initial: StateIndex,
}

impl<I: Symbol, Q, C> Automaton<I, Q, C> {
    /// Creates an automaton with a single state, which is initial, has the empty access word
    /// and the given color.
    pub fn new(initial_color: Q) -> Self {
        Self {
            states: vec![State {
                access: vec![],
                color: initial_color,
                edges: Map::default(),
            }],
            initial: 0,
        }
    }

    /// Adds a new state with the given access word and color, returning its index.
    pub fn add_state(&mut self, access: Vec<I>, color: Q) -> StateIndex {
        self.states.push(State {
            access,
            color,
            edges: Map::default(),
        });
        self.states.len() - 1
    }

    /// Adds a transition from `source` on `symbol` to `target` with the given color. If a
    /// transition on `symbol` existed before, it is replaced and returned. Returns `None`
    /// without doing anything if `source` or `target` does not exist.
    pub fn add_transition(
        &mut self,
        source: StateIndex,
        symbol: I,
        target: StateIndex,
        color: C,
    ) -> Option<(StateIndex, C)> {
        if target >= self.size() {
            return None;
        }
        self.states
            .get_mut(source)?
            .edges
            .insert(symbol, (target, color))
    }

    /// The designated initial state.
    pub fn initial(&self) -> StateIndex {
        self.initial
    }

    /// Number of states.
    pub fn size(&self) -> usize {
        self.states.len()
    }

    /// Iterates over the indices of all states.
    pub fn state_indices(&self) -> std::ops::Range<StateIndex> {
        0..self.states.len()
    }

    /// Gives a human readable name for the state, `s` followed by its index.
    pub fn state_name(&self, state: StateIndex) -> String {
        format!("s{state}")
    }

    /// The color of `state`, `None` if it does not exist.
    pub fn state_color(&self, state: StateIndex) -> Option<&Q> {
        self.states.get(state).map(|s| &s.color)
    }

    /// The access word of `state`, `None` if it does not exist.
    pub fn access(&self, state: StateIndex) -> Option<&[I]> {
        self.states.get(state).map(|s| s.access.as_slice())
    }

    /// Finds the state whose access word is `word`.
    pub fn state_with_access(&self, word: &[I]) -> Option<StateIndex> {
        self.states.iter().position(|s| s.access == word)
    }

    /// Gives the target and color of the transition from `state` on `symbol`.
    pub fn transition(&self, state: StateIndex, symbol: &I) -> Option<(StateIndex, &C)> {
        self.states
            .get(state)?
            .edges
            .get(symbol)
            .map(|(target, color)| (*target, color))
    }

    /// Gives the state reached from `state` on `symbol`.
    pub fn successor(&self, state: StateIndex, symbol: &I) -> Option<StateIndex> {
        self.transition(state, symbol).map(|(target, _)| target)
    }

    /// Iterates over the outgoing transitions of `state` as triples of symbol, target and color.
    pub fn edges_from(
        &self,
        state: StateIndex,
    ) -> impl Iterator<Item = (&I, StateIndex, &C)> + '_ {
        self.states
            .get(state)
            .into_iter()
            .flat_map(|s| s.edges.iter())
            .map(|(symbol, (target, color))| (symbol, *target, color))
    }

    /// Iterates over all transitions as tuples of source, symbol, target and color.
    pub fn transitions(&self) -> impl Iterator<Item = (StateIndex, &I, StateIndex, &C)> + '_ {
        self.state_indices().flat_map(move |q| {
            self.edges_from(q)
                .map(move |(symbol, target, color)| (q, symbol, target, color))
        })
    }

    /// Number of transitions.
    pub fn transition_count(&self) -> usize {
        self.states.iter().map(|s| s.edges.len()).sum()
    }

    /// All symbols that label at least one transition, in ascending order.
    pub fn alphabet(&self) -> Vec<I> {
        self.states
            .iter()
            .flat_map(|s| s.edges.keys())
            .unique()
            .sorted()
            .cloned()
            .collect()
    }

    /// Runs `word` from `state` and returns the state that is reached, or `None` if some
    /// transition along the way is missing.
    pub fn reached_state_from<'a, W>(&self, state: StateIndex, word: W) -> Option<StateIndex>
    where
        I: 'a,
        W: IntoIterator<Item = &'a I>,
    {
        word.into_iter()
            .try_fold(state, |q, symbol| self.successor(q, symbol))
    }

    /// Runs `word` from the initial state, see [`Self::reached_state_from`].
    pub fn reached_state<'a, W>(&self, word: W) -> Option<StateIndex>
    where
        I: 'a,
        W: IntoIterator<Item = &'a I>,
    {
        self.reached_state_from(self.initial, word)
    }
}

impl<I: Symbol, Q: Debug, C: Debug> Display for Automaton<I, Q, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let alphabet = self.alphabet();
        let mut b = tabled::builder::Builder::default();

        b.push_record(
            ["state".to_string(), "output".to_string()]
                .into_iter()
                .chain(alphabet.iter().map(|sym| format!("{sym:?}"))),
        );
        for q in self.state_indices() {
            let name = if q == self.initial {
                self.state_name(q).bold().to_string()
            } else {
                self.state_name(q)
            };
            let mut row = vec![name, format!("{:?}", self.states[q].color)];
            row.extend(alphabet.iter().map(|sym| match self.transition(q, sym) {
                Some((target, color)) => {
                    format!("{}|{:?}", self.state_name(target).blue(), color.purple())
                }
                None => "-".to_string(),
            }));
            b.push_record(row);
        }

        write!(
            f,
            "{}",
            b.build().with(tabled::settings::Style::ascii())
        )
    }
}
