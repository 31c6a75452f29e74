use itertools::Itertools;
use thiserror::Error;

/// Errors that can occur when assembling a [`Trace`] from raw entries.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum TraceError {
    /// An entry without input may only appear in the very first position, where it declares
    /// the output of the empty prefix.
    #[error("entry {position} has no input, but only the first entry may declare the root output")]
    MisplacedRootDeclaration {
        /// Position of the offending entry.
        position: usize,
    },
}

/// A trace is the record of a single execution of a reactive system. It consists of a sequence
/// of `(input, output)` pairs and may additionally declare the output that is produced before
/// any input is given, i.e. the output of the empty prefix.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Trace<I, O> {
    root: Option<O>,
    steps: Vec<(I, O)>,
}

impl<I, O> Trace<I, O> {
    /// Creates a trace from the given observations, without a declaration for the root.
    pub fn new<J: IntoIterator<Item = (I, O)>>(steps: J) -> Self {
        Self {
            root: None,
            steps: steps.into_iter().collect(),
        }
    }

    /// Creates a trace from the given observations, where `root` is the output observed
    /// before the first input.
    pub fn with_root<J: IntoIterator<Item = (I, O)>>(root: O, steps: J) -> Self {
        Self {
            root: Some(root),
            steps: steps.into_iter().collect(),
        }
    }

    /// Builds a trace from entries whose input is optional. An entry with input `None` in the
    /// first position declares the root output, anywhere else it is rejected.
    ///
    /// ```
    /// use automata_pta::prelude::*;
    ///
    /// let trace = Trace::from_entries([(None, 0), (Some('a'), 1)]).unwrap();
    /// assert_eq!(trace.root_output(), Some(&0));
    /// assert_eq!(trace.steps(), &[('a', 1)]);
    ///
    /// let err = Trace::from_entries([(Some('a'), 1), (None, 0)]).unwrap_err();
    /// assert_eq!(err, TraceError::MisplacedRootDeclaration { position: 1 });
    /// ```
    pub fn from_entries<J: IntoIterator<Item = (Option<I>, O)>>(
        entries: J,
    ) -> Result<Self, TraceError> {
        let mut trace = Self {
            root: None,
            steps: vec![],
        };
        for (position, (input, output)) in entries.into_iter().enumerate() {
            match input {
                Some(input) => trace.steps.push((input, output)),
                None if position == 0 => trace.root = Some(output),
                None => return Err(TraceError::MisplacedRootDeclaration { position }),
            }
        }
        Ok(trace)
    }

    /// Returns the declared output of the empty prefix, if there is one.
    pub fn root_output(&self) -> Option<&O> {
        self.root.as_ref()
    }

    /// Gives a slice of all `(input, output)` observations in order.
    pub fn steps(&self) -> &[(I, O)] {
        &self.steps
    }

    /// Iterates over the inputs of `self`.
    pub fn inputs(&self) -> impl Iterator<Item = &I> + '_ {
        self.steps.iter().map(|(i, _)| i)
    }

    /// Iterates over the outputs of `self`, the root declaration is not included.
    pub fn outputs(&self) -> impl Iterator<Item = &O> + '_ {
        self.steps.iter().map(|(_, o)| o)
    }

    /// The number of observations, the root declaration does not count.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if `self` contains no observations. A trace that only declares the
    /// root output is empty.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Appends an observation.
    pub fn push(&mut self, input: I, output: O) {
        self.steps.push((input, output));
    }

    /// Sets the root declaration, returning the previous one.
    pub fn declare_root(&mut self, output: O) -> Option<O> {
        self.root.replace(output)
    }
}

impl<I: std::fmt::Debug, O: std::fmt::Debug> std::fmt::Display for Trace<I, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut steps = self
            .steps
            .iter()
            .map(|(i, o)| format!("({i:?}, {o:?})"));
        match &self.root {
            Some(root) => write!(
                f,
                "[{}]",
                std::iter::once(format!("(-, {root:?})")).chain(steps).join(", ")
            ),
            None => write!(f, "[{}]", steps.join(", ")),
        }
    }
}

impl<I, O> From<Vec<(I, O)>> for Trace<I, O> {
    fn from(steps: Vec<(I, O)>) -> Self {
        Self { root: None, steps }
    }
}

impl<I, O> FromIterator<(I, O)> for Trace<I, O> {
    fn from_iter<T: IntoIterator<Item = (I, O)>>(iter: T) -> Self {
        Self::new(iter)
    }
}

impl<'a, I, O> IntoIterator for &'a Trace<I, O> {
    type Item = &'a (I, O);
    type IntoIter = std::slice::Iter<'a, (I, O)>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{Trace, TraceError};

    #[test]
    fn root_declaration_is_kept_apart() {
        let trace = Trace::from_entries([(None, false), (Some('a'), true), (Some('b'), false)])
            .unwrap();
        assert_eq!(trace.root_output(), Some(&false));
        assert_eq!(trace.len(), 2);
        assert_eq!(trace.inputs().copied().collect::<String>(), "ab");
        assert_eq!(trace.outputs().copied().collect::<Vec<_>>(), vec![true, false]);
        assert_eq!(trace, Trace::with_root(false, [('a', true), ('b', false)]));
    }

    #[test]
    fn only_root_declaration_is_empty() {
        let trace: Trace<char, u8> = Trace::from_entries([(None, 3)]).unwrap();
        assert!(trace.is_empty());
        assert_eq!(trace.root_output(), Some(&3));
    }

    #[test]
    fn misplaced_declaration_is_rejected() {
        let res = Trace::from_entries([(Some('a'), 0), (Some('b'), 1), (None, 2)]);
        assert_eq!(
            res,
            Err(TraceError::MisplacedRootDeclaration { position: 2 })
        );
    }

    #[test]
    fn display() {
        let mut trace = Trace::from(vec![('a', 1), ('b', 0)]);
        assert_eq!(trace.to_string(), "[('a', 1), ('b', 0)]");
        assert_eq!(trace.declare_root(0), None);
        assert_eq!(trace.to_string(), "[(-, 0), ('a', 1), ('b', 0)]");
    }
}
