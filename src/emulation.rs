//! Mouse-driven synthesis of one- and two-point touch gestures.
//!
//! On hosts without a touch screen, [`touch_emulation_system`] watches the
//! mouse button oracle once per frame and drives up to three persistent
//! [`TouchSample`] records: a single contact that follows primary-button
//! drags, and a mirrored pair that emulates a pinch while the pinch button is
//! held. The mirrored point is the real pointer reflected through the screen
//! center, so dragging toward or away from the center produces an inward or
//! outward pinch.

use bevy_ecs::prelude::*;
use bevy_input::{ButtonInput, mouse::MouseButton};
use bevy_math::Vec2;
use bevy_window::{PrimaryWindow, Window};

#[cfg(feature = "bevy_reflect")]
use bevy_reflect::{Reflect, std_traits::ReflectDefault};

use crate::touch::{TouchPhase, TouchSample};

/// Settings for the gesture synthesis.
#[derive(Resource, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "bevy_reflect", derive(Reflect), reflect(Default))]
pub struct TouchEmulationSettings {
    /// Set by hosts whose platform reports real multi-touch. While `true` the
    /// mouse is never consulted and hardware contacts pass through unchanged.
    pub native_multi_touch: bool,
    /// Button that drives the single-point gesture.
    pub primary_button: MouseButton,
    /// Button that drives the mirrored two-point pinch gesture.
    pub pinch_button: MouseButton,
}

impl Default for TouchEmulationSettings {
    fn default() -> Self {
        Self {
            native_multi_touch: false,
            primary_button: MouseButton::Left,
            pinch_button: MouseButton::Right,
        }
    }
}

/// Which gesture the emulation produced this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "bevy_reflect", derive(Reflect), reflect(Default))]
pub enum EmulatedGesture {
    /// No mouse button drives a gesture this frame.
    #[default]
    None,
    /// The primary button drives a single contact.
    Single,
    /// The pinch button drives two mirrored contacts.
    Pinch,
}

/// The gesture synthesis state machine.
///
/// Owns the persistent contact records for the lifetime of the app: one
/// single-point record and one pinch pair. The records are mutated in place
/// every frame, never reallocated, which is what keeps each sample's delta
/// anchored to the previous sample of the same finger.
#[derive(Resource, Debug, Clone, Default)]
#[cfg_attr(feature = "bevy_reflect", derive(Reflect), reflect(Default))]
pub struct TouchEmulation {
    single: TouchSample,
    pinch: [TouchSample; 2],
    active: EmulatedGesture,
    /// Cursor positions are unavailable while the pointer is outside the
    /// window; the last known position keeps a held gesture sampling.
    last_cursor: Vec2,
}

impl TouchEmulation {
    /// The gesture produced this frame.
    pub fn gesture(&self) -> EmulatedGesture {
        self.active
    }

    /// This frame's synthetic samples: empty, the single contact, or the
    /// mirrored pair.
    pub fn samples(&self) -> &[TouchSample] {
        match self.active {
            EmulatedGesture::None => &[],
            EmulatedGesture::Single => core::slice::from_ref(&self.single),
            EmulatedGesture::Pinch => &self.pinch,
        }
    }

    /// Current state of the single-point record, whether or not it sampled
    /// this frame. Indexed touch lookups fall back to this record alone.
    pub fn single_point(&self) -> TouchSample {
        self.single
    }

    /// Runs one frame of the transition table. The first matching transition
    /// wins; primary button transitions take priority over pinch transitions.
    fn step(
        &mut self,
        mouse: &ButtonInput<MouseButton>,
        settings: &TouchEmulationSettings,
        cursor: Vec2,
        center: Vec2,
    ) {
        let primary = settings.primary_button;
        let pinch = settings.pinch_button;
        self.active = if mouse.just_pressed(primary) {
            log::trace!("touch emulation began at {cursor}");
            self.single.begin(0, cursor);
            EmulatedGesture::Single
        } else if mouse.just_released(primary) {
            self.single.advance(TouchPhase::Ended, cursor);
            EmulatedGesture::Single
        } else if mouse.pressed(primary) {
            self.single.advance(TouchPhase::Moved, cursor);
            EmulatedGesture::Single
        } else if mouse.just_pressed(pinch) {
            log::trace!("pinch emulation began at {cursor}, mirrored through {center}");
            self.pinch[0].begin(0, cursor);
            self.pinch[1].begin(1, mirror(cursor, center));
            EmulatedGesture::Pinch
        } else if mouse.just_released(pinch) {
            self.pinch[0].advance(TouchPhase::Ended, cursor);
            self.pinch[1].advance(TouchPhase::Ended, mirror(cursor, center));
            EmulatedGesture::Pinch
        } else if mouse.pressed(pinch) {
            self.pinch[0].advance(TouchPhase::Moved, cursor);
            self.pinch[1].advance(TouchPhase::Moved, mirror(cursor, center));
            EmulatedGesture::Pinch
        } else {
            EmulatedGesture::None
        };
    }
}

/// Point-reflects `point` through `center`.
///
/// Self-inverse, and fixes `center`.
pub fn mirror(point: Vec2, center: Vec2) -> Vec2 {
    center + (center - point)
}

/// Advances the gesture state machine from the mouse oracle.
///
/// Runs exactly once per frame in `PreUpdate`, after the engine's input
/// systems; every query made later in the frame observes the same samples.
/// The machine keeps stepping while touch queries are suppressed so delta
/// baselines stay one frame wide and suppression-bypassing reads see live
/// samples.
pub fn touch_emulation_system(
    settings: Res<TouchEmulationSettings>,
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut emulation: ResMut<TouchEmulation>,
) {
    if settings.native_multi_touch {
        emulation.active = EmulatedGesture::None;
        return;
    }
    let Some(window) = windows.iter().next() else {
        emulation.active = EmulatedGesture::None;
        return;
    };
    if let Some(cursor) = window.cursor_position() {
        emulation.last_cursor = cursor;
    }
    let cursor = emulation.last_cursor;
    let center = Vec2::new(window.width(), window.height()) * 0.5;
    emulation.step(&mouse, &settings, cursor, center);
}
