//! Macros for declaring state and event enums.

/// Generate a `State` implementation for a plain enum.
///
/// The enum gets `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `Debug` and the
/// serde derives. Variants listed under `final:` report `is_final() == true`.
///
/// # Example
///
/// ```
/// use domain_fsm::core::State;
/// use domain_fsm::state_enum;
///
/// state_enum! {
///     pub enum DocumentState {
///         New,
///         ReadyForSign,
///         Signed,
///         Done,
///         Canceled,
///     }
///     final: [Done, Canceled]
/// }
///
/// assert_eq!(DocumentState::ReadyForSign.name(), "ReadyForSign");
/// assert!(DocumentState::Canceled.is_final());
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }

        $(final: [$($final:ident),* $(,)?])?
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            fn is_final(&self) -> bool {
                match self {
                    $($(Self::$final => true,)*)?
                    #[allow(unreachable_patterns)]
                    _ => false,
                }
            }
        }
    };
}

/// Generate an `Event` implementation for a plain enum.
///
/// ```
/// use domain_fsm::core::Event;
/// use domain_fsm::event_enum;
///
/// event_enum! {
///     pub enum DocumentEvent {
///         ToReady,
///         UserSign,
///     }
/// }
///
/// assert_eq!(DocumentEvent::UserSign.name(), "UserSign");
/// ```
#[macro_export]
macro_rules! event_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::Event for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{Event, State};

    state_enum! {
        enum TestState {
            Initial,
            Processing,
            Complete,
            Failed,
        }
        final: [Complete, Failed]
    }

    event_enum! {
        enum TestEvent {
            Start,
            Finish,
        }
    }

    #[test]
    fn state_enum_macro_generates_trait() {
        let state = TestState::Initial;
        assert_eq!(state.name(), "Initial");
        assert!(!state.is_final());

        assert!(TestState::Complete.is_final());
        assert!(TestState::Failed.is_final());
    }

    #[test]
    fn state_enum_supports_visibility() {
        state_enum! {
            pub enum PublicState {
                A,
                B,
            }
            final: [B]
        }

        let _state = PublicState::A;
    }

    #[test]
    fn state_enum_works_without_final() {
        state_enum! {
            enum MinimalState {
                One,
                Two,
            }
        }

        assert!(!MinimalState::One.is_final());
        assert!(!MinimalState::Two.is_final());
    }

    #[test]
    fn event_enum_macro_generates_trait() {
        assert_eq!(TestEvent::Start.name(), "Start");
        assert_eq!(TestEvent::Finish.name(), "Finish");
        assert_ne!(TestEvent::Start, TestEvent::Finish);
    }

    #[test]
    fn generated_types_serialize() {
        let json = serde_json::to_string(&TestState::Processing).unwrap();
        assert_eq!(json, "\"Processing\"");
        let back: TestEvent = serde_json::from_str("\"Finish\"").unwrap();
        assert_eq!(back, TestEvent::Finish);
    }
}
