use super::Automaton;
use crate::{trace::Trace, Color, Symbol, Void};

/// A Mealy machine is an automaton where each transition has an output. Running it on a word of
/// length `n` produces `n` outputs, one for each transition that is taken. The empty word does
/// not produce any output, so the states carry no color.
pub type MealyMachine<I = char, O = usize> = Automaton<I, Void, O>;

impl<I: Symbol, O: Color> MealyMachine<I, O> {
    /// Runs `input` and returns the output of the last transition that is taken. Gives `None`
    /// if the run does not exist or `input` is empty.
    pub fn map<'a, W>(&self, input: W) -> Option<O>
    where
        I: 'a,
        W: IntoIterator<Item = &'a I>,
    {
        self.outputs(input).and_then(|mut out| out.pop())
    }

    /// Returns the sequence of outputs produced while running `input`, `None` if some
    /// transition is missing.
    pub fn outputs<'a, W>(&self, input: W) -> Option<Vec<O>>
    where
        I: 'a,
        W: IntoIterator<Item = &'a I>,
    {
        let mut current = self.initial;
        input
            .into_iter()
            .map(|symbol| {
                let (target, color) = self.transition(current, symbol)?;
                current = target;
                Some(color.clone())
            })
            .collect()
    }

    /// Checks that running the inputs of `trace` produces precisely its outputs. Root
    /// declarations are ignored, as a Mealy machine produces no output on the empty word.
    pub fn agrees_with(&self, trace: &Trace<I, O>) -> bool {
        self.outputs(trace.inputs())
            .is_some_and(|out| out.iter().eq(trace.outputs()))
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    fn toggle() -> MealyMachine<char, u8> {
        let mut mm = MealyMachine::new(Void);
        let on = mm.add_state(vec!['t'], Void);
        mm.add_transition(0, 't', on, 1);
        mm.add_transition(0, 'k', 0, 0);
        mm.add_transition(on, 't', 0, 0);
        mm.add_transition(on, 'k', on, 1);
        mm
    }

    #[test]
    fn outputs_are_taken_from_transitions() {
        let mm = toggle();
        assert_eq!(mm.outputs(&['t', 'k', 't', 'k']), Some(vec![1, 1, 0, 0]));
        assert_eq!(mm.map(&['t', 'k']), Some(1));
        assert_eq!(mm.map(&[]), None);
        assert_eq!(mm.outputs(&['x']), None);
    }

    #[test]
    fn agreement_ignores_root_declarations() {
        let mm = toggle();
        assert!(mm.agrees_with(&Trace::with_root(7, [('t', 1), ('t', 0)])));
        assert!(!mm.agrees_with(&Trace::new([('t', 0)])));
        assert!(!mm.agrees_with(&Trace::new([('t', 1), ('x', 0)])));
    }
}
