//! Side-effecting procedures attached to transitions.

use super::guard::BoxError;
use std::fmt;
use std::sync::Arc;

type Procedure<D> = dyn Fn(&mut D) -> Result<(), BoxError> + Send + Sync;

/// Procedure executed when its transition is selected.
///
/// Actions run before the target state is written, so they still observe
/// the source state. Post-actions run after the write.
///
/// # Example
///
/// ```rust
/// use domain_fsm::core::Action;
///
/// struct Order {
///     notifications: u32,
/// }
///
/// let notify = Action::named("Notify", |order: &mut Order| order.notifications += 1);
///
/// let mut order = Order { notifications: 0 };
/// notify.run(&mut order).unwrap();
/// assert_eq!(order.notifications, 1);
/// ```
pub struct Action<D> {
    id: Option<String>,
    procedure: Arc<Procedure<D>>,
}

impl<D: 'static> Action<D> {
    pub fn new<F>(procedure: F) -> Self
    where
        F: Fn(&mut D) + Send + Sync + 'static,
    {
        Self::fallible(move |domain: &mut D| {
            procedure(domain);
            Ok(())
        })
    }

    pub fn named<F>(id: impl Into<String>, procedure: F) -> Self
    where
        F: Fn(&mut D) + Send + Sync + 'static,
    {
        Self::new(procedure).with_id(id)
    }

    /// Create an action that can fail.
    ///
    /// When an action fails the engine stops and returns the error; the
    /// state write for that transition does not happen.
    pub fn fallible<F>(procedure: F) -> Self
    where
        F: Fn(&mut D) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        Action {
            id: None,
            procedure: Arc::new(procedure),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

impl<D> Action<D> {
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn run(&self, domain: &mut D) -> Result<(), BoxError> {
        (self.procedure)(domain)
    }
}

impl<D> Clone for Action<D> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            procedure: Arc::clone(&self.procedure),
        }
    }
}

impl<D> fmt::Debug for Action<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action").field("id", &self.id).finish()
    }
}

impl<D> fmt::Display for Action<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id().unwrap_or("anonymous"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        hits: u32,
    }

    #[test]
    fn action_mutates_domain() {
        let action = Action::new(|c: &mut Counter| c.hits += 2);
        let mut counter = Counter::default();

        action.run(&mut counter).unwrap();
        action.run(&mut counter).unwrap();

        assert_eq!(counter.hits, 4);
    }

    #[test]
    fn fallible_action_returns_error() {
        let action = Action::fallible(|c: &mut Counter| {
            if c.hits == 0 {
                return Err("nothing to do".into());
            }
            Ok(())
        });

        let err = action.run(&mut Counter::default()).unwrap_err();
        assert_eq!(err.to_string(), "nothing to do");
    }

    #[test]
    fn named_action_keeps_id() {
        let action = Action::named("SendEmail", |_: &mut Counter| {});
        assert_eq!(action.id(), Some("SendEmail"));
        assert_eq!(action.clone().to_string(), "SendEmail");
    }
}
