use super::{Automaton, StateIndex};
use crate::{trace::Trace, Color, Symbol, Void};

/// A Moore machine is an automaton where each state has an output. Running it on a word of
/// length `n` visits `n + 1` states, so in contrast to a [`super::MealyMachine`] the empty word
/// produces an output as well.
///
/// States that stem from a tree node whose output was never observed carry `None`.
pub type MooreMachine<I = char, O = usize> = Automaton<I, Option<O>, Void>;

impl<I: Symbol, O: Color> MooreMachine<I, O> {
    /// Runs `input` and returns the output of the state that is reached. Gives `None` if the
    /// run does not exist or the output of the reached state is unknown.
    pub fn map<'a, W>(&self, input: W) -> Option<O>
    where
        I: 'a,
        W: IntoIterator<Item = &'a I>,
    {
        self.reached_state(input)
            .and_then(|q| self.state_color(q))
            .cloned()
            .flatten()
    }

    /// Returns the outputs of all states visited while running `input`, starting with the
    /// output of the initial state.
    pub fn outputs<'a, W>(&self, input: W) -> Option<Vec<Option<O>>>
    where
        I: 'a,
        W: IntoIterator<Item = &'a I>,
    {
        let mut current = self.initial;
        let mut out = vec![self.state_color(current)?.clone()];
        for symbol in input {
            current = self.successor(current, symbol)?;
            out.push(self.state_color(current)?.clone());
        }
        Some(out)
    }

    /// Checks that running the inputs of `trace` produces precisely its outputs. A declared
    /// root output has to match the output of the initial state.
    pub fn agrees_with(&self, trace: &Trace<I, O>) -> bool {
        if let Some(root) = trace.root_output() {
            if self.state_color(self.initial) != Some(&Some(root.clone())) {
                return false;
            }
        }
        let mut current: StateIndex = self.initial;
        for (input, output) in trace {
            let Some(q) = self.successor(current, input) else {
                return false;
            };
            if self.state_color(q).and_then(|c| c.as_ref()) != Some(output) {
                return false;
            }
            current = q;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    fn counter() -> MooreMachine<char, u8> {
        let mut mm = MooreMachine::new(Some(0));
        let one = mm.add_state(vec!['i'], Some(1));
        let two = mm.add_state(vec!['i', 'i'], None);
        mm.add_transition(0, 'i', one, Void);
        mm.add_transition(one, 'i', two, Void);
        mm.add_transition(two, 'r', 0, Void);
        mm
    }

    #[test]
    fn maps_words_to_state_outputs() {
        let mm = counter();
        assert_eq!(mm.map(&[]), Some(0));
        assert_eq!(mm.map(&['i']), Some(1));
        assert_eq!(mm.map(&['i', 'i']), None);
        assert_eq!(mm.map(&['i', 'i', 'r', 'i']), Some(1));
        assert_eq!(mm.map(&['r']), None);
        assert_eq!(
            mm.outputs(&['i', 'i', 'r']),
            Some(vec![Some(0), Some(1), None, Some(0)])
        );
    }

    #[test]
    fn unknown_outputs_never_agree() {
        let mm = counter();
        assert!(mm.agrees_with(&Trace::with_root(0, [('i', 1)])));
        assert!(!mm.agrees_with(&Trace::with_root(1, [('i', 1)])));
        assert!(!mm.agrees_with(&Trace::new([('i', 1), ('i', 2)])));
    }
}
