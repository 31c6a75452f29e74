use std::fmt::{Debug, Display};

use itertools::Itertools;
use tracing::trace;

use crate::{automaton::Automaton, math::Map, prefixtree::PrefixTree, semantics::Semantics, Symbol};

fn sanitize_dot_ident(name: &str) -> String {
    name.chars()
        .filter_map(|chr| match chr {
            c if c.is_alphanumeric() => Some(c),
            '_' | '|' | ':' | ',' => Some('_'),
            _ => None,
        })
        .join("")
}

fn escape_label(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

/// An attribute of a state or node in the DOT output.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum DotStateAttribute {
    /// The text that is displayed.
    Label(String),
    /// The shape of the node, e.g. `circle` or `doublecircle`.
    Shape(String),
}

impl Display for DotStateAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DotStateAttribute::Label(s) => write!(f, "label=\"{}\"", escape_label(s)),
            DotStateAttribute::Shape(s) => write!(f, "shape=\"{s}\""),
        }
    }
}

/// An attribute of an edge or transition in the DOT output.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum DotTransitionAttribute {
    /// The text that is displayed next to the edge.
    Label(String),
}

impl Display for DotTransitionAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DotTransitionAttribute::Label(s) => write!(f, "label=\"{}\"", escape_label(s)),
        }
    }
}

/// Objects that can be handed to graphviz for display. Only the textual representation is
/// produced here, rendering it is left to the caller.
pub trait Dottable {
    /// Name of the graph.
    fn dot_name(&self) -> String;

    /// Identifiers of all states together with their attributes. The first one is marked
    /// as the start.
    fn dot_states(&self) -> Vec<(String, Vec<DotStateAttribute>)>;

    /// All edges as source identifier, target identifier and attributes.
    fn dot_transitions(&self) -> Vec<(String, String, Vec<DotTransitionAttribute>)>;

    /// Compute the graphviz representation, for more information on the DOT format,
    /// see the [graphviz documentation](https://graphviz.org/doc/info/lang.html).
    fn dot_representation(&self) -> String {
        let states = self.dot_states();
        let start = states
            .first()
            .map(|(ident, _)| {
                vec![
                    "__start0 [label=\"\", shape=\"none\"]".to_string(),
                    format!("__start0 -> {}", sanitize_dot_ident(ident)),
                ]
            })
            .unwrap_or_default();

        let header = std::iter::once(format!("digraph {} {{", sanitize_dot_ident(&self.dot_name())));
        let states = states.into_iter().map(|(ident, attributes)| {
            format!(
                "{} [{}]",
                sanitize_dot_ident(&ident),
                attributes.iter().map(|attr| attr.to_string()).join(", ")
            )
        });
        let transitions = self
            .dot_transitions()
            .into_iter()
            .map(|(source, target, attributes)| {
                format!(
                    "{} -> {} [{}]",
                    sanitize_dot_ident(&source),
                    sanitize_dot_ident(&target),
                    attributes.iter().map(|attr| attr.to_string()).join(", ")
                )
            });

        let dot = header
            .chain(start)
            .chain(states)
            .chain(transitions)
            .chain(std::iter::once("}".to_string()))
            .join("\n");
        trace!("computed dot representation\n{dot}");
        dot
    }
}

impl<S: Semantics> Dottable for PrefixTree<S> {
    fn dot_name(&self) -> String {
        "fpta".to_string()
    }

    fn dot_states(&self) -> Vec<(String, Vec<DotStateAttribute>)> {
        self.nodes()
            .enumerate()
            .map(|(i, node)| {
                let label = match node.output() {
                    Some(o) => format!("{o:?}"),
                    None => "?".to_string(),
                };
                (format!("n{i}"), vec![DotStateAttribute::Label(label)])
            })
            .collect()
    }

    fn dot_transitions(&self) -> Vec<(String, String, Vec<DotTransitionAttribute>)> {
        let ids: Map<&[S::EdgeKey], usize> = self
            .nodes()
            .enumerate()
            .map(|(i, node)| (node.prefix(), i))
            .collect();
        let ids = &ids;
        self.nodes()
            .flat_map(move |node| {
                let source = ids[node.prefix()];
                node.children()
                    .sorted_by(|(k1, _), (k2, _)| k1.cmp(k2))
                    .filter_map(move |(key, child)| {
                        let target = ids.get(child.prefix())?;
                        Some((
                            format!("n{source}"),
                            format!("n{target}"),
                            vec![DotTransitionAttribute::Label(format!("{key:?}"))],
                        ))
                    })
            })
            .collect()
    }
}

impl<I: Symbol, Q: Debug, C: Debug> Dottable for Automaton<I, Q, C> {
    fn dot_name(&self) -> String {
        "A".to_string()
    }

    fn dot_states(&self) -> Vec<(String, Vec<DotStateAttribute>)> {
        std::iter::once(self.initial())
            .chain(self.state_indices().filter(|q| *q != self.initial()))
            .filter_map(|q| {
                let color = self.state_color(q)?;
                Some((
                    self.state_name(q),
                    vec![
                        DotStateAttribute::Label(format!("{}|{color:?}", self.state_name(q))),
                        DotStateAttribute::Shape("circle".to_string()),
                    ],
                ))
            })
            .collect()
    }

    fn dot_transitions(&self) -> Vec<(String, String, Vec<DotTransitionAttribute>)> {
        self.transitions()
            .sorted_by(|(p, a, _, _), (q, b, _, _)| p.cmp(q).then(a.cmp(b)))
            .map(|(source, symbol, target, color)| {
                (
                    self.state_name(source),
                    self.state_name(target),
                    vec![DotTransitionAttribute::Label(format!("{symbol:?}|{color:?}"))],
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{sanitize_dot_ident, Dottable};
    use crate::tests::branching_pta;

    #[test]
    fn identifiers_are_sanitized() {
        assert_eq!(sanitize_dot_ident("(a, b)"), "a_b");
        assert_eq!(sanitize_dot_ident("s1"), "s1");
    }

    #[test_log::test]
    fn tree_dot_has_a_node_per_prefix() {
        let pta = branching_pta();
        let dot = pta.dot_representation();
        assert!(dot.starts_with("digraph fpta {"));
        assert!(dot.ends_with('}'));
        assert!(dot.contains("__start0 -> n0"));
        assert!(dot.contains("n0 [label=\"false\"]"));
        assert!(dot.contains("n0 -> n1 [label=\"'a'\"]"));
        assert_eq!(dot.matches("label=\"true\"").count(), 1);
        assert_eq!(dot.matches(" -> ").count(), 4);
    }

    #[test]
    fn automaton_dot_marks_the_initial_state() {
        let dfa = branching_pta().to_automaton().unwrap();
        let dot = dfa.dot_representation();
        assert!(dot.contains("__start0 -> s0"));
        assert!(dot.contains("s0 [label=\"s0|false\", shape=\"circle\"]"));
        assert!(dot.contains("s0 -> s1 [label=\"'a'|#\"]"));
    }
}
