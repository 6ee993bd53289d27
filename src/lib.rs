//! Multi-touch emulation from a single mouse pointer.
//!
//! This crate lets an application author and test a multi-touch interaction
//! model on hosts that only have a mouse. It synthesizes persistent touch
//! samples with correct phase, per-finger delta, and identity semantics from
//! raw button transitions, including a two-point pinch emulation that mirrors
//! a second contact through the screen center. Hosts with a real touch screen
//! keep their hardware contacts; the same query surface serves both.
//!
//! On top of the queries sit two interaction gates: a reference-counted
//! [`TouchSuppression`](suppression::TouchSuppression) that drops the frame's
//! touches entirely while any token is outstanding (a modal overlay, for
//! example), and a [`TouchGate`](gate::TouchGate) that combines hit-test
//! results with per-entity [`TouchExemptions`](gate::TouchExemptions) so
//! chosen entities stay touchable through a suppression.
//!
//! All state lives in resources owned by the [`App`]; synthesis runs exactly
//! once per frame in [`PreUpdate`], so queries made anywhere later in the
//! frame observe one coherent touch set.
//!
//! # Usage
//!
//! ```
//! use bevy_app::prelude::*;
//! use bevy_touch_emulation::prelude::*;
//!
//! fn read_touches(touches: TouchQuery) {
//!     for touch in touches.all() {
//!         println!("finger {} at {}", touch.finger_id, touch.position);
//!     }
//! }
//!
//! App::new()
//!     .add_plugins(TouchEmulationPlugin)
//!     .add_systems(Update, read_touches)
//!     .update();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod common_conditions;
pub mod emulation;
pub mod gate;
pub mod suppression;
pub mod touch;

use bevy_app::prelude::*;
use bevy_ecs::prelude::*;
use bevy_input::{ButtonInput, InputSystem, mouse::MouseButton, touch::TouchInput};

use crate::emulation::{TouchEmulation, TouchEmulationSettings, touch_emulation_system};
use crate::gate::{PointerHits, reset_pointer_hits};
use crate::suppression::TouchSuppression;
use crate::touch::{HardwareTouches, hardware_touch_system};

/// Common exports for touch emulation.
pub mod prelude {
    #[doc(hidden)]
    pub use crate::{
        TouchEmulationPlugin, TouchEmulationSet,
        emulation::{EmulatedGesture, TouchEmulation, TouchEmulationSettings},
        gate::{PointerHits, TouchExemptions, TouchGate},
        suppression::{SuppressionToken, TouchSuppression},
        touch::{HardwareTouches, TouchPhase, TouchQuery, TouchSample},
    };
}

/// Label for the crate's [`PreUpdate`] work.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchEmulationSet {
    /// Folds raw input into the frame's touch samples and clears the previous
    /// frame's hits. Runs after [`InputSystem`].
    Synthesis,
    /// Host hit-test backends write [`PointerHits`] here.
    HitTest,
}

/// Adds single-pointer touch emulation, hardware touch pass-through, and the
/// suppression-aware touch gates to an [`App`].
///
/// The plugin reads the mouse through `ButtonInput<MouseButton>` and the
/// primary window's cursor, both kept current by the engine's input and
/// window plugins in a full app; under tests or in headless setups the
/// resources are initialized here and can be driven by hand.
#[derive(Default)]
pub struct TouchEmulationPlugin;

impl Plugin for TouchEmulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TouchEmulationSettings>()
            .init_resource::<TouchEmulation>()
            .init_resource::<HardwareTouches>()
            .init_resource::<TouchSuppression>()
            .init_resource::<PointerHits>()
            .init_resource::<ButtonInput<MouseButton>>()
            .add_event::<TouchInput>()
            .configure_sets(
                PreUpdate,
                (
                    TouchEmulationSet::Synthesis.after(InputSystem),
                    TouchEmulationSet::HitTest.after(TouchEmulationSet::Synthesis),
                ),
            )
            .add_systems(
                PreUpdate,
                (
                    hardware_touch_system,
                    touch_emulation_system,
                    reset_pointer_hits,
                )
                    .in_set(TouchEmulationSet::Synthesis),
            );

        #[cfg(feature = "bevy_reflect")]
        app.register_type::<touch::TouchPhase>()
            .register_type::<touch::TouchSample>()
            .register_type::<emulation::TouchEmulationSettings>()
            .register_type::<emulation::TouchEmulation>()
            .register_type::<emulation::EmulatedGesture>()
            .register_type::<suppression::SuppressionToken>()
            .register_type::<suppression::TouchSuppression>();
    }
}
