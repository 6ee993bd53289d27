//! Run conditions for touch state.
//!
//! ```
//! # use bevy_app::prelude::*;
//! # use bevy_ecs::prelude::*;
//! # use bevy_touch_emulation::common_conditions::touch_active;
//! # use bevy_touch_emulation::prelude::*;
//! # fn handle_touches() {}
//! App::new()
//!     .add_plugins(TouchEmulationPlugin)
//!     .add_systems(Update, handle_touches.run_if(touch_active));
//! ```

use bevy_ecs::prelude::*;

use crate::gate::TouchGate;
use crate::suppression::TouchSuppression;
use crate::touch::TouchQuery;

/// Runs while at least one suppression token is outstanding.
pub fn touch_suppressed(suppression: Res<TouchSuppression>) -> bool {
    suppression.is_active()
}

/// Runs while the current frame carries at least one unsuppressed touch
/// sample, hardware or emulated.
pub fn touch_active(touches: TouchQuery) -> bool {
    touches.any()
}

/// Runs while the pointer is over any interactive entity.
pub fn pointer_over_interactive(gate: TouchGate) -> bool {
    gate.is_pointer_over_interactive()
}
