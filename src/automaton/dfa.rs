use bit_set::BitSet;

use super::{Automaton, StateIndex};
use crate::{trace::Trace, Symbol, Void};

/// A deterministic finite automaton (DFA) is an automaton whose states are colored with a
/// boolean that indicates acceptance. It accepts a finite word if it reaches an accepting state.
pub type Dfa<I = char> = Automaton<I, bool, Void>;

impl<I: Symbol> Dfa<I> {
    /// Returns true if the run on `word` exists and ends in an accepting state.
    pub fn accepts<'a, W>(&self, word: W) -> bool
    where
        I: 'a,
        W: IntoIterator<Item = &'a I>,
    {
        self.reached_state(word)
            .and_then(|q| self.state_color(q))
            .copied()
            .unwrap_or(false)
    }

    /// Returns the indices of all states that are accepting.
    pub fn accepting_states(&self) -> BitSet {
        self.state_indices()
            .filter(|q| self.state_color(*q) == Some(&true))
            .collect()
    }

    /// Returns the indices of all states that are rejecting.
    pub fn rejecting_states(&self) -> BitSet {
        self.state_indices()
            .filter(|q| self.state_color(*q) == Some(&false))
            .collect()
    }

    /// Checks that `self` classifies every prefix of `trace` as the trace does. A declared root
    /// output has to match the acceptance of the initial state.
    pub fn agrees_with(&self, trace: &Trace<I, bool>) -> bool {
        if let Some(root) = trace.root_output() {
            if self.state_color(self.initial) != Some(root) {
                return false;
            }
        }
        let mut current: StateIndex = self.initial;
        for (input, output) in trace {
            match self.successor(current, input) {
                Some(q) if self.state_color(q) == Some(output) => current = q,
                _ => return false,
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::automaton::tests::two_state_parity;
    use crate::prelude::*;

    #[test]
    fn parity_of_a() {
        let dfa: Dfa = two_state_parity();
        assert!(dfa.accepts(&[]));
        assert!(dfa.accepts(&['a', 'b', 'a']));
        assert!(!dfa.accepts(&['a', 'b']));
        assert!(!dfa.accepts(&['c']));
        assert_eq!(dfa.accepting_states().iter().collect::<Vec<_>>(), vec![0]);
        assert_eq!(dfa.rejecting_states().iter().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn agreement_with_traces() {
        let dfa: Dfa = two_state_parity();
        assert!(dfa.agrees_with(&Trace::with_root(true, [('a', false), ('a', true)])));
        assert!(dfa.agrees_with(&Trace::new([('b', true)])));
        assert!(!dfa.agrees_with(&Trace::with_root(false, [])));
        assert!(!dfa.agrees_with(&Trace::new([('a', true)])));
        assert!(!dfa.agrees_with(&Trace::new([('c', true)])));
    }
}
