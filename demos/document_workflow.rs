//! Document Signing Workflow
//!
//! This example drives several documents through one shared transition table.
//!
//! Key concepts:
//! - Linear steps plus a guarded branch (New -> ReadyForSign -> Signed -> AutoSent/Done/Canceled)
//! - Guards decide between candidates in declaration order
//! - Actions run before the state write and see the old state
//! - Events that do not apply are reported, not silently ignored
//!
//! Run with: cargo run --example document_workflow

use domain_fsm::builder::TransitionTableBuilder;
use domain_fsm::core::{Action, Guard, State, StateContext};
use domain_fsm::engine::{DomainFsm, TransitionError};
use domain_fsm::{event_enum, state_enum};
use std::sync::Arc;

state_enum! {
    enum DocState {
        New,
        ReadyForSign,
        Signed,
        AutoSent,
        Done,
        Canceled,
    }
    final: [Done, Canceled]
}

event_enum! {
    enum DocEvent {
        ToReady,
        UserSign,
        Failed,
        ToEnd,
    }
}

// Document entity
struct Document {
    id: u64,
    state: DocState,
    sign_required: bool,
    outbox: Vec<String>,
}

impl StateContext<DocState> for Document {
    fn state(&self) -> &DocState {
        &self.state
    }

    fn set_state(&mut self, state: DocState) {
        self.state = state;
    }
}

fn build_engine() -> DomainFsm<DocState, DocEvent, Document> {
    let send_copy = Action::named("sendCopy", |doc: &mut Document| {
        let message = format!("document {} sent automatically", doc.id);
        doc.outbox.push(message);
    });

    let mut fsm = TransitionTableBuilder::new()
        .from(DocState::New)
        .to(DocState::ReadyForSign)
        .on_event(DocEvent::ToReady)
        .end()
        .from(DocState::ReadyForSign)
        .to_multiple()
        .to(DocState::Signed)
        .on_event(DocEvent::UserSign)
        .end()
        .to(DocState::Canceled)
        .on_event(DocEvent::Failed)
        .end()
        .end_multiple()
        .from(DocState::Signed)
        .on_event(DocEvent::ToEnd)
        .to_multiple()
        .to(DocState::AutoSent)
        .guard(Guard::named("signRequired", |doc: &Document| doc.sign_required))
        .perform(send_copy)
        .end()
        .to(DocState::Done)
        .guard(Guard::named("signNotRequired", |doc: &Document| !doc.sign_required))
        .end()
        .to(DocState::Canceled)
        .end()
        .end_multiple()
        .from(DocState::AutoSent)
        .to(DocState::Done)
        .on_event(DocEvent::ToEnd)
        .end()
        .build()
        .expect("document workflow table is well formed")
        .into_domain_fsm();

    fsm.add_state_change_listener(Arc::new(
        |doc: &Document, old: &DocState, new: &DocState| {
            println!("  [{}] {} -> {}", doc.id, old.name(), new.name());
        },
    ));
    fsm
}

fn run(fsm: &DomainFsm<DocState, DocEvent, Document>, doc: &mut Document, events: &[DocEvent]) {
    for event in events {
        match fsm.handle(doc, event) {
            Ok(()) => {}
            Err(err @ TransitionError::NoTransitionFound { .. }) => println!("  [{}] skipped: {err}", doc.id),
            Err(err) => println!("  [{}] failed: {err}", doc.id),
        }
    }
}

fn main() {
    println!("=== Document Signing Workflow ===\n");

    let fsm = build_engine();
    println!("{}", fsm.table().to_plantuml());

    let events = [
        DocEvent::Failed,
        DocEvent::ToReady,
        DocEvent::UserSign,
        DocEvent::ToEnd,
        DocEvent::ToEnd,
        DocEvent::ToEnd,
    ];

    for (id, sign_required) in [(1, true), (2, false)] {
        let mut doc = Document {
            id,
            state: DocState::New,
            sign_required,
            outbox: Vec::new(),
        };
        println!("Document {id} (sign required: {sign_required}):");
        run(&fsm, &mut doc, &events);
        println!(
            "  final state: {} (terminal: {}), outbox: {:?}\n",
            doc.state.name(),
            doc.state.is_final(),
            doc.outbox
        );
    }
}
