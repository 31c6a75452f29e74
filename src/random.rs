use std::ops::Range;

use tracing::debug;

use crate::{
    automaton::{Dfa, MealyMachine, MooreMachine, StateIndex},
    trace::Trace,
    Color, Symbol,
};

/// A reactive system that can be observed step by step, such as a reference model against
/// which a learned automaton is compared. Traces sampled from it are consistent by construction.
pub trait Reactive {
    /// Type of the inputs.
    type Input: Symbol;
    /// Type of the produced outputs.
    type Output: Color;

    /// The state in which every run begins.
    fn start(&self) -> StateIndex;

    /// Output that is produced before any input is given, if the system has one.
    fn initial_output(&self) -> Option<Self::Output>;

    /// Processes `input` in `state`, returning the successor together with the output that is
    /// observed. Gives `None` if the system cannot process the input or produces no output.
    fn step(&self, state: StateIndex, input: &Self::Input) -> Option<(StateIndex, Self::Output)>;
}

impl<I: Symbol> Reactive for Dfa<I> {
    type Input = I;
    type Output = bool;

    fn start(&self) -> StateIndex {
        self.initial()
    }

    fn initial_output(&self) -> Option<bool> {
        self.state_color(self.initial()).copied()
    }

    fn step(&self, state: StateIndex, input: &I) -> Option<(StateIndex, bool)> {
        let target = self.successor(state, input)?;
        Some((target, *self.state_color(target)?))
    }
}

impl<I: Symbol, O: Color> Reactive for MooreMachine<I, O> {
    type Input = I;
    type Output = O;

    fn start(&self) -> StateIndex {
        self.initial()
    }

    fn initial_output(&self) -> Option<O> {
        self.state_color(self.initial()).cloned().flatten()
    }

    fn step(&self, state: StateIndex, input: &I) -> Option<(StateIndex, O)> {
        let target = self.successor(state, input)?;
        let output = self.state_color(target)?.clone()?;
        Some((target, output))
    }
}

impl<I: Symbol, O: Color> Reactive for MealyMachine<I, O> {
    type Input = I;
    type Output = O;

    fn start(&self) -> StateIndex {
        self.initial()
    }

    fn initial_output(&self) -> Option<O> {
        None
    }

    fn step(&self, state: StateIndex, input: &I) -> Option<(StateIndex, O)> {
        self.transition(state, input)
            .map(|(target, color)| (target, color.clone()))
    }
}

/// Produces traces by random walks through a [`Reactive`] system. Each walk starts in the
/// initial state, declares the initial output if there is one and then picks inputs uniformly
/// at random from a given alphabet. A walk ends when its length, drawn uniformly from the
/// configured range, is reached or when the system cannot process the chosen input.
#[derive(Debug, Clone)]
pub struct TraceSampler {
    rng: fastrand::Rng,
    lengths: Range<usize>,
}

impl TraceSampler {
    /// Creates a sampler with the given seed, which produces walks of length 5 to 19.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
            lengths: 5..20,
        }
    }

    /// Sets the range from which the length of each walk is drawn. An empty range fixes the
    /// length to its start.
    pub fn with_lengths(mut self, lengths: Range<usize>) -> Self {
        self.lengths = lengths;
        self
    }

    fn length(&mut self) -> usize {
        if self.lengths.is_empty() {
            self.lengths.start
        } else {
            self.rng.usize(self.lengths.clone())
        }
    }

    /// Samples a single trace from `system` using inputs from `alphabet`.
    pub fn sample<M: Reactive>(
        &mut self,
        system: &M,
        alphabet: &[M::Input],
    ) -> Trace<M::Input, M::Output> {
        let mut trace = Trace::new([]);
        if let Some(root) = system.initial_output() {
            trace.declare_root(root);
        }
        if alphabet.is_empty() {
            return trace;
        }

        let mut state = system.start();
        for _ in 0..self.length() {
            let input = &alphabet[self.rng.usize(..alphabet.len())];
            let Some((next, output)) = system.step(state, input) else {
                break;
            };
            trace.push(input.clone(), output);
            state = next;
        }
        trace
    }

    /// Samples `count` traces, see [`Self::sample`].
    pub fn samples<M: Reactive>(
        &mut self,
        system: &M,
        alphabet: &[M::Input],
        count: usize,
    ) -> Vec<Trace<M::Input, M::Output>> {
        let out: Vec<_> = (0..count).map(|_| self.sample(system, alphabet)).collect();
        debug!(
            "sampled {count} traces with {} observations in total",
            out.iter().map(|t| t.len()).sum::<usize>()
        );
        out
    }
}
