//! Guard predicates for controlling state transitions.
//!
//! Guards are boolean functions over the domain object that decide whether
//! a candidate transition is eligible. They should be pure: the engine may
//! evaluate several guards before it picks a transition.

use std::fmt;
use std::sync::Arc;

/// Error type returned by fallible guards and actions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

type Predicate<D> = dyn Fn(&D) -> Result<bool, BoxError> + Send + Sync;

/// Predicate that determines if a transition can fire for a domain object.
///
/// Guards are cheap to clone; clones share the same predicate.
///
/// # Example
///
/// ```rust
/// use domain_fsm::core::Guard;
///
/// struct Document {
///     sign_required: bool,
/// }
///
/// let sign_required = Guard::named("signRequired", |doc: &Document| doc.sign_required);
///
/// assert!(sign_required.check(&Document { sign_required: true }).unwrap());
/// assert!(!sign_required.check(&Document { sign_required: false }).unwrap());
/// assert_eq!(sign_required.id(), Some("signRequired"));
/// ```
pub struct Guard<D> {
    id: Option<String>,
    predicate: Arc<Predicate<D>>,
}

impl<D: 'static> Guard<D> {
    /// Create an anonymous guard from a predicate.
    ///
    /// The predicate must be thread-safe (Send + Sync) so that tables can be
    /// shared between threads.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&D) -> bool + Send + Sync + 'static,
    {
        Self::fallible(move |domain: &D| Ok(predicate(domain)))
    }

    /// Create a guard with an identifier.
    ///
    /// The id shows up in diagrams and error messages and is the key used
    /// when a table is serialized.
    pub fn named<F>(id: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&D) -> bool + Send + Sync + 'static,
    {
        Self::new(predicate).with_id(id)
    }

    /// Create a guard whose evaluation can fail.
    ///
    /// A failing guard aborts `handle`; the error reaches the caller and the
    /// domain object is not touched.
    pub fn fallible<F>(predicate: F) -> Self
    where
        F: Fn(&D) -> Result<bool, BoxError> + Send + Sync + 'static,
    {
        Guard {
            id: None,
            predicate: Arc::new(predicate),
        }
    }

    /// Attach an identifier to this guard.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

impl<D> Guard<D> {
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Evaluate the guard against a domain object.
    pub fn check(&self, domain: &D) -> Result<bool, BoxError> {
        (self.predicate)(domain)
    }
}

impl<D> Clone for Guard<D> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<D> fmt::Debug for Guard<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard").field("id", &self.id).finish()
    }
}

impl<D> fmt::Display for Guard<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id().unwrap_or("anonymous"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Account {
        balance: i64,
        frozen: bool,
    }

    #[test]
    fn guard_allows_matching_objects() {
        let guard = Guard::new(|a: &Account| a.balance > 0);

        assert!(guard
            .check(&Account {
                balance: 10,
                frozen: false
            })
            .unwrap());
        assert!(!guard
            .check(&Account {
                balance: -5,
                frozen: false
            })
            .unwrap());
    }

    #[test]
    fn guard_is_deterministic() {
        let account = Account {
            balance: 3,
            frozen: true,
        };
        let guard = Guard::new(|a: &Account| !a.frozen);

        let result1 = guard.check(&account).unwrap();
        let result2 = guard.check(&account).unwrap();

        assert_eq!(result1, result2);
    }

    #[test]
    fn fallible_guard_surfaces_error() {
        let guard = Guard::fallible(|a: &Account| {
            if a.frozen {
                Err("account is frozen".into())
            } else {
                Ok(true)
            }
        });

        let err = guard
            .check(&Account {
                balance: 0,
                frozen: true,
            })
            .unwrap_err();
        assert_eq!(err.to_string(), "account is frozen");
    }

    #[test]
    fn clones_share_predicate_and_id() {
        let guard = Guard::named("positive", |a: &Account| a.balance > 0);
        let cloned = guard.clone();

        assert_eq!(cloned.id(), Some("positive"));
        assert!(cloned
            .check(&Account {
                balance: 1,
                frozen: false
            })
            .unwrap());
    }

    #[test]
    fn display_falls_back_to_anonymous() {
        let named = Guard::named("isAdmin", |_: &Account| true);
        let anonymous = Guard::new(|_: &Account| true);

        assert_eq!(named.to_string(), "isAdmin");
        assert_eq!(anonymous.to_string(), "anonymous");
    }
}
