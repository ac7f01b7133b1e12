use super::{guard_labels, state_id, DiagramGenerator, StateNotes};
use crate::core::{Event, State};
use crate::engine::TransitionTable;

/// Mermaid `stateDiagram-v2` generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct MermaidGenerator;

impl DiagramGenerator for MermaidGenerator {
    fn generate<S: State, E: Event, D: 'static>(&self, table: &TransitionTable<S, E, D>) -> String {
        let mut diagram = String::from("stateDiagram-v2\n\n");

        let states = table.states();
        let mut notes = Vec::new();
        for state in &states {
            notes.extend(StateNotes::collect(table, state).lines(&state_id(state.name())));
        }
        for line in &notes {
            diagram.push_str(&format!("    {line}\n"));
        }
        if !notes.is_empty() {
            diagram.push('\n');
        }

        for transition in table.transitions() {
            let mut label: Vec<String> = transition
                .event
                .iter()
                .map(|event| event.name().to_string())
                .collect();
            label.extend(guard_labels(transition));

            let from = state_id(transition.from.name());
            let to = state_id(transition.to.state.name());
            if label.is_empty() {
                diagram.push_str(&format!("    {from} --> {to}\n"));
            } else {
                diagram.push_str(&format!("    {from} --> {to} : {}\n", label.join(" ")));
            }
        }

        for state in states.iter().filter(|s| s.is_final()) {
            diagram.push_str(&format!("    {} --> [*]\n", state_id(state.name())));
        }

        diagram
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::tests::document_table;

    #[test]
    fn renders_document_workflow() {
        let expected = "\
stateDiagram-v2

    ReadyForSign : ▶ notifySigner
    Signed : ◀ archive

    New --> ReadyForSign : TO_READY
    ReadyForSign --> Signed : USER_SIGN
    Signed --> AutoSent : TO_END [signRequired]
    Signed --> Canceled : TO_END
    AutoSent --> Done : TO_END
    Canceled --> [*]
    Done --> [*]
";

        assert_eq!(MermaidGenerator.generate(&document_table()), expected);
    }
}
