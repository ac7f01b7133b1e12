//! Text diagrams of transition tables.
//!
//! Generators render states in order of first appearance and edges in
//! declaration order, so output is stable and diffable. Named actions are
//! listed on the state they lead into (`▶` before the state write, `◀`
//! after it); guards are shown on the edge.

mod mermaid;
mod plantuml;

pub use mermaid::MermaidGenerator;
pub use plantuml::PlantUmlGenerator;

use crate::core::{Action, Event, State};
use crate::engine::{Transition, TransitionTable};

/// Renders a transition table in some diagram language.
pub trait DiagramGenerator {
    fn generate<S: State, E: Event, D: 'static>(&self, table: &TransitionTable<S, E, D>) -> String;
}

impl<S: State, E: Event, D: 'static> TransitionTable<S, E, D> {
    /// Render as a PlantUML state diagram.
    pub fn to_plantuml(&self) -> String {
        PlantUmlGenerator.generate(self)
    }

    /// Render as a Mermaid `stateDiagram-v2`.
    pub fn to_mermaid(&self) -> String {
        MermaidGenerator.generate(self)
    }
}

/// Identifier usable in both diagram languages.
pub(crate) fn state_id(name: &str) -> String {
    name.replace([' ', '-'], "_")
}

/// Named actions and post-actions attached to transitions entering `state`.
pub(crate) struct StateNotes {
    pub(crate) actions: Vec<String>,
    pub(crate) post_actions: Vec<String>,
}

impl StateNotes {
    pub(crate) fn collect<S: State, E: Event, D>(table: &TransitionTable<S, E, D>, state: &S) -> Self
    where
        D: 'static,
    {
        let entering = table.transitions().iter().filter(|t| &t.to.state == state);
        let mut notes = Self {
            actions: Vec::new(),
            post_actions: Vec::new(),
        };
        for transition in entering {
            notes.actions.extend(named(&transition.to.actions));
            notes.post_actions.extend(named(&transition.to.post_actions));
        }
        notes
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.actions.is_empty() && self.post_actions.is_empty()
    }

    /// Note lines in `ID : ▶ action` form.
    pub(crate) fn lines(&self, id: &str) -> Vec<String> {
        let actions = self.actions.iter().map(|a| format!("{id} : ▶ {a}"));
        let post_actions = self.post_actions.iter().map(|a| format!("{id} : ◀ {a}"));
        actions.chain(post_actions).collect()
    }
}

fn named<D>(actions: &[Action<D>]) -> impl Iterator<Item = String> + '_ {
    actions.iter().filter_map(|a| a.id().map(str::to_string))
}

/// Guard labels of a transition, e.g. `[signRequired] [anonymous]`.
pub(crate) fn guard_labels<S, E, D>(transition: &Transition<S, E, D>) -> Vec<String> {
    transition
        .to
        .conditions
        .iter()
        .map(|guard| format!("[{guard}]"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TransitionTableBuilder;
    use crate::core::{Action, Guard};
    use crate::state_enum;

    state_enum! {
        pub(super) enum Doc {
            New,
            ReadyForSign,
            Signed,
            AutoSent,
            Done,
            Canceled,
        }
        final: [Done, Canceled]
    }

    pub(super) struct Document {
        state: Doc,
        sign_required: bool,
    }

    impl crate::core::StateContext<Doc> for Document {
        fn state(&self) -> &Doc {
            &self.state
        }

        fn set_state(&mut self, state: Doc) {
            self.state = state;
        }
    }

    pub(super) fn document_table() -> TransitionTable<Doc, String, Document> {
        TransitionTableBuilder::new()
            .from(Doc::New)
            .to(Doc::ReadyForSign)
            .on_event("TO_READY".to_string())
            .perform(Action::named("notifySigner", |_: &mut Document| {}))
            .end()
            .from(Doc::ReadyForSign)
            .to(Doc::Signed)
            .on_event("USER_SIGN".to_string())
            .post_perform(Action::named("archive", |_: &mut Document| {}))
            .end()
            .from(Doc::Signed)
            .on_event("TO_END".to_string())
            .to_multiple()
            .to(Doc::AutoSent)
            .guard(Guard::named("signRequired", |d: &Document| d.sign_required))
            .end()
            .to(Doc::Canceled)
            .end()
            .end_multiple()
            .from(Doc::AutoSent)
            .to(Doc::Done)
            .on_event("TO_END".to_string())
            .end()
            .build()
            .unwrap()
    }

    #[test]
    fn state_ids_are_sanitized() {
        assert_eq!(state_id("READY FOR-SIGN"), "READY_FOR_SIGN");
    }

    #[test]
    fn notes_only_list_named_actions() {
        let table = TransitionTableBuilder::<Doc, String, Document>::new()
            .from(Doc::New)
            .to(Doc::Done)
            .on_event("GO".to_string())
            .action(|_| {})
            .perform(Action::named("stamp", |_: &mut Document| {}))
            .end()
            .build()
            .unwrap();

        let notes = StateNotes::collect(&table, &Doc::Done);
        assert_eq!(notes.actions, vec!["stamp".to_string()]);
        assert!(StateNotes::collect(&table, &Doc::New).is_empty());
        assert_eq!(notes.lines("Done"), vec!["Done : ▶ stamp".to_string()]);
    }

    #[test]
    fn guards_are_labelled_by_id() {
        let table = document_table();
        let guarded = &table.transitions()[2];

        assert_eq!(guard_labels(guarded), vec!["[signRequired]".to_string()]);
        assert!(guard_labels(&table.transitions()[3]).is_empty());
    }

    #[test]
    fn table_shortcuts_match_generators() {
        let table = document_table();
        assert_eq!(table.to_plantuml(), PlantUmlGenerator.generate(&table));
        assert_eq!(table.to_mermaid(), MermaidGenerator.generate(&table));
    }

    #[test]
    fn document_fixture_is_usable() {
        let table = document_table();
        let doc = Document {
            state: Doc::Signed,
            sign_required: true,
        };
        let transition = table.transition_for_event(&doc, "TO_END").unwrap();
        assert_eq!(transition.to.state, Doc::AutoSent);
    }
}
