use super::{guard_labels, state_id, DiagramGenerator, StateNotes};
use crate::core::{Event, State};
use crate::engine::TransitionTable;

/// PlantUML state diagram generator.
///
/// Edge labels hold the event in brackets followed by guard labels,
/// e.g. `Signed --> AutoSent : [TO_END] [signRequired]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlantUmlGenerator;

impl DiagramGenerator for PlantUmlGenerator {
    fn generate<S: State, E: Event, D: 'static>(&self, table: &TransitionTable<S, E, D>) -> String {
        let mut uml = String::from("@startuml\n\n");

        let states = table.states();
        for state in &states {
            let id = state_id(state.name());
            uml.push_str(&format!("state \"{}\" as {id}\n", state.name()));
            for line in StateNotes::collect(table, state).lines(&id) {
                uml.push_str(&line);
                uml.push('\n');
            }
        }
        uml.push('\n');

        for transition in table.transitions() {
            let mut label: Vec<String> = transition
                .event
                .iter()
                .map(|event| format!("[{}]", event.name()))
                .collect();
            label.extend(guard_labels(transition));

            let from = state_id(transition.from.name());
            let to = state_id(transition.to.state.name());
            if label.is_empty() {
                uml.push_str(&format!("{from} --> {to}\n"));
            } else {
                uml.push_str(&format!("{from} --> {to} : {}\n", label.join(" ")));
            }
        }

        for state in states.iter().filter(|s| s.is_final()) {
            uml.push_str(&format!("{} --> [*]\n", state_id(state.name())));
        }

        uml.push_str("@enduml\n");
        uml
    }
}
