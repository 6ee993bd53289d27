//! Reference-counted suppression of touch processing.
//!
//! Any number of independent callers can suppress touch queries at the same
//! time, a modal overlay and a scripted camera move for example; processing
//! stays suppressed until every caller has released its token. This is a
//! reference count, not a stack: no ordering is implied between the
//! acquire/release pairs of different callers.

use bevy_ecs::prelude::*;
use bevy_platform::collections::HashSet;

#[cfg(feature = "bevy_reflect")]
use bevy_reflect::{Reflect, std_traits::ReflectDefault};

/// An opaque handle for one outstanding suppression.
///
/// Tokens are allocated from a monotonically increasing counter that starts
/// above zero, so they are never reused and a zeroed default can never name a
/// live suppression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "bevy_reflect", derive(Reflect))]
pub struct SuppressionToken(u64);

/// The reference-counted gate over touch processing.
///
/// While at least one token is outstanding,
/// [`TouchQuery::all`](crate::touch::TouchQuery::all) reports an empty touch
/// set and [`TouchQuery::get`](crate::touch::TouchQuery::get) reports
/// not-found unless asked to read through the suppression.
#[derive(Resource, Debug, Clone, Default)]
#[cfg_attr(feature = "bevy_reflect", derive(Reflect), reflect(Default))]
pub struct TouchSuppression {
    next_token: u64,
    active: HashSet<SuppressionToken>,
}

impl TouchSuppression {
    /// Suppresses touch processing until the returned token is released.
    pub fn acquire(&mut self) -> SuppressionToken {
        self.next_token += 1;
        let token = SuppressionToken(self.next_token);
        self.active.insert(token);
        token
    }

    /// Releases `token`. Unknown and already-released tokens are no-ops, so
    /// a double release in calling code stays harmless.
    pub fn release(&mut self, token: SuppressionToken) {
        self.active.remove(&token);
    }

    /// Returns `true` while any token is outstanding.
    pub fn is_active(&self) -> bool {
        !self.active.is_empty()
    }

    /// Number of outstanding tokens.
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Drops every outstanding token at once. Releasing one of them afterwards
    /// is a no-op.
    pub fn clear(&mut self) {
        self.active.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suppression_is_reference_counted() {
        let mut suppression = TouchSuppression::default();
        assert!(!suppression.is_active());

        let first = suppression.acquire();
        let second = suppression.acquire();
        assert!(suppression.is_active());
        assert_eq!(suppression.active_count(), 2);

        suppression.release(first);
        assert!(suppression.is_active());

        suppression.release(second);
        assert!(!suppression.is_active());
    }

    #[test]
    fn double_release_is_a_no_op() {
        let mut suppression = TouchSuppression::default();
        let token = suppression.acquire();
        let other = suppression.acquire();

        suppression.release(token);
        suppression.release(token);
        assert!(suppression.is_active());
        assert_eq!(suppression.active_count(), 1);

        suppression.release(other);
        assert!(!suppression.is_active());
    }

    #[test]
    fn tokens_are_never_reused() {
        let mut suppression = TouchSuppression::default();
        let first = suppression.acquire();
        suppression.release(first);
        let second = suppression.acquire();
        assert_ne!(first, second);
    }

    #[test]
    fn clear_drops_all_tokens() {
        let mut suppression = TouchSuppression::default();
        let token = suppression.acquire();
        suppression.acquire();
        suppression.clear();
        assert!(!suppression.is_active());

        // A release kept across the reset stays harmless.
        suppression.release(token);
        assert!(!suppression.is_active());
    }
}
