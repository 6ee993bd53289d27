//! Hit-gated touch interaction: which entity may currently react to touch.
//!
//! The crate does not hit-test on its own. A host-injected backend system,
//! running in [`TouchEmulationSet::HitTest`](crate::TouchEmulationSet), writes
//! the entities under the pointer into [`PointerHits`] each frame; swapping
//! the backend is how a host selects between a cheap native overlap query and
//! a full raycast. [`TouchGate`] combines those hits with the suppression
//! state and per-entity [`TouchExemptions`] to answer touchability queries.

use bevy_derive::{Deref, DerefMut};
use bevy_ecs::entity::EntityHashSet;
use bevy_ecs::prelude::*;
use bevy_ecs::system::SystemParam;

use crate::suppression::TouchSuppression;

/// Entities under the current pointer position, most specific first.
///
/// Cleared by the crate at the start of every frame and repopulated by the
/// host's hit-test backend, so a silent backend means "the pointer is over
/// nothing" rather than stale hits. Backends should probe at
/// [`TouchQuery::pointer_position`](crate::touch::TouchQuery::pointer_position).
#[derive(Resource, Debug, Clone, Default, Deref, DerefMut)]
pub struct PointerHits(pub Vec<Entity>);

/// Declares entities that stay touchable while touch suppression is active.
///
/// Attach to any entity a hit-test backend can report. The gate consults the
/// set only when its entity is actually under the pointer, so an exemption is
/// scoped to interactions that happen through the declaring entity.
#[derive(Component, Debug, Clone, Default, Deref, DerefMut)]
pub struct TouchExemptions(pub EntityHashSet);

/// Decides whether an entity may currently accept touch interaction.
#[derive(SystemParam)]
pub struct TouchGate<'w, 's> {
    hits: Res<'w, PointerHits>,
    suppression: Res<'w, TouchSuppression>,
    exemptions: Query<'w, 's, &'static TouchExemptions>,
}

impl TouchGate<'_, '_> {
    /// Returns `true` if `target` may accept touch interaction this frame:
    /// either an entity under the pointer exempts it, or suppression is
    /// inactive.
    ///
    /// # Panics
    ///
    /// Panics if `target` is [`Entity::PLACEHOLDER`]. Gating a placeholder is
    /// an integration bug that must surface, not read as "not touchable".
    pub fn is_touchable(&self, target: Entity) -> bool {
        assert_ne!(
            target,
            Entity::PLACEHOLDER,
            "is_touchable target must be a real entity"
        );
        for &hit in self.hits.iter() {
            // Hits come from an external backend with its own lifecycle;
            // despawned entities and entities without exemptions are skipped.
            let Ok(exemptions) = self.exemptions.get(hit) else {
                continue;
            };
            if exemptions.contains(&target) {
                log::debug!("{target} is exempt from touch suppression via {hit}");
                return true;
            }
        }
        !self.suppression.is_active()
    }

    /// Whether the pointer overlaps any interactive entity at all.
    ///
    /// Purely geometric: exemptions and suppression are ignored. Useful to
    /// keep input from falling through UI onto world-space interactions.
    pub fn is_pointer_over_interactive(&self) -> bool {
        !self.hits.is_empty()
    }
}

/// Clears the previous frame's [`PointerHits`] before backends run.
pub fn reset_pointer_hits(mut hits: ResMut<PointerHits>) {
    hits.clear();
}
