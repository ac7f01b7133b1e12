//! Export and reload of transition tables.
//!
//! Closures cannot be serialized, so a table is exported as a versioned
//! [`TableDto`] in which guards and actions appear by id only. Tables with
//! anonymous guards or actions refuse to export. Loading resolves ids against a
//! [`Registry`] and runs the same structural validation as
//! [`TransitionTableBuilder::build`].

use crate::builder::TransitionTableBuilder;
use crate::core::{Action, Event, Guard, State};
use crate::engine::{Target, Transition, TransitionTable};
use serde::{Deserialize, Serialize};

pub mod error;
pub mod registry;

pub use error::SerializationError;
pub use registry::Registry;

/// Version identifier for the table format
pub const TABLE_FORMAT_VERSION: u32 = 1;

/// Serializable form of a transition table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TableDto<S: State, E: Event> {
    /// Table format version
    pub version: u32,

    pub auto_transitions: bool,

    pub max_auto_transitions: usize,

    /// Transitions in declaration order
    pub transitions: Vec<TransitionDto<S, E>>,
}

/// Serializable form of one transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TransitionDto<S: State, E: Event> {
    pub from: S,
    pub event: Option<E>,
    pub to: S,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default)]
    pub post_actions: Vec<String>,
}

impl<S: State, E: Event, D: 'static> TransitionTable<S, E, D> {
    /// Export to the serializable form.
    ///
    /// Fails when a guard or action has no id, since it could not be
    /// restored on load.
    pub fn to_dto(&self) -> Result<TableDto<S, E>, SerializationError> {
        let transitions = self
            .transitions()
            .iter()
            .map(|transition| {
                let target = &transition.to;
                let from = transition.from.name();
                let to = target.state.name();
                Ok(TransitionDto {
                    from: transition.from.clone(),
                    event: transition.event.clone(),
                    to: target.state.clone(),
                    conditions: guard_ids(&target.conditions, from, to)?,
                    actions: action_ids(&target.actions, from, to)?,
                    post_actions: action_ids(&target.post_actions, from, to)?,
                })
            })
            .collect::<Result<Vec<_>, SerializationError>>()?;

        Ok(TableDto {
            version: TABLE_FORMAT_VERSION,
            auto_transitions: self.auto_transitions_enabled(),
            max_auto_transitions: self.max_auto_transitions(),
            transitions,
        })
    }

    pub fn to_json(&self) -> Result<String, SerializationError> {
        serde_json::to_string_pretty(&self.to_dto()?)
            .map_err(|e| SerializationError::SerializationFailed(e.to_string()))
    }

    pub fn to_binary(&self) -> Result<Vec<u8>, SerializationError> {
        bincode::serialize(&self.to_dto()?)
            .map_err(|e| SerializationError::SerializationFailed(e.to_string()))
    }

    /// Rebuild a table, resolving guard and action ids through `registry`.
    pub fn from_dto(dto: TableDto<S, E>, registry: &Registry<D>) -> Result<Self, SerializationError> {
        if dto.version != TABLE_FORMAT_VERSION {
            return Err(SerializationError::UnsupportedVersion {
                found: dto.version,
                supported: TABLE_FORMAT_VERSION,
            });
        }

        let mut builder = TransitionTableBuilder::new()
            .auto_transitions(dto.auto_transitions)
            .max_auto_transitions(dto.max_auto_transitions);

        for transition in dto.transitions {
            let mut target = Target::new(transition.to);
            for id in &transition.conditions {
                target = target.guard(registry.resolve_guard(id)?);
            }
            for id in &transition.actions {
                target = target.perform(registry.resolve_action(id)?);
            }
            for id in &transition.post_actions {
                target = target.post_perform(registry.resolve_action(id)?);
            }
            builder = builder.add_transition(Transition::new(transition.from, transition.event, target));
        }

        Ok(builder.build()?)
    }

    pub fn from_json(json: &str, registry: &Registry<D>) -> Result<Self, SerializationError> {
        let dto: TableDto<S, E> = serde_json::from_str(json)
            .map_err(|e| SerializationError::DeserializationFailed(e.to_string()))?;
        Self::from_dto(dto, registry)
    }

    pub fn from_binary(bytes: &[u8], registry: &Registry<D>) -> Result<Self, SerializationError> {
        let dto: TableDto<S, E> = bincode::deserialize(bytes)
            .map_err(|e| SerializationError::DeserializationFailed(e.to_string()))?;
        Self::from_dto(dto, registry)
    }
}

fn guard_ids<D>(guards: &[Guard<D>], from: &str, to: &str) -> Result<Vec<String>, SerializationError> {
    guards
        .iter()
        .map(|guard| {
            guard.id().map(String::from).ok_or_else(|| SerializationError::AnonymousGuard {
                from: from.to_string(),
                to: to.to_string(),
            })
        })
        .collect()
}

fn action_ids<D>(actions: &[Action<D>], from: &str, to: &str) -> Result<Vec<String>, SerializationError> {
    actions
        .iter()
        .map(|action| {
            action.id().map(String::from).ok_or_else(|| SerializationError::AnonymousAction {
                from: from.to_string(),
                to: to.to_string(),
            })
        })
        .collect()
}
