//! Touch phases, samples, and the frame-coherent touch stores.
//!
//! [`TouchSample`] is the unit every consumer reads: a snapshot of one contact
//! point with its phase, position, and per-frame delta. Samples come from two
//! places that this module keeps coherent within a frame:
//!
//! * [`HardwareTouches`], an ordered store folded from the engine's raw
//!   [`TouchInput`] events once per frame, and
//! * [`TouchEmulation`](crate::emulation::TouchEmulation), the mouse-driven
//!   synthesis for hosts without a touch screen.
//!
//! [`TouchQuery`] is the read surface over both, and the only place touch
//! suppression is applied.

use bevy_ecs::prelude::*;
use bevy_ecs::system::SystemParam;
use bevy_input::touch::{TouchInput, TouchPhase as RawTouchPhase};
use bevy_math::Vec2;
use bevy_window::{PrimaryWindow, Window};

#[cfg(feature = "bevy_reflect")]
use bevy_reflect::{Reflect, std_traits::ReflectDefault};

use crate::emulation::{EmulatedGesture, TouchEmulation};
use crate::suppression::TouchSuppression;

/// A phase of one touch contact's lifecycle.
///
/// A contact always begins with [`Began`](TouchPhase::Began) and terminates
/// with [`Ended`](TouchPhase::Ended) or [`Canceled`](TouchPhase::Canceled);
/// every frame in between reports [`Moved`](TouchPhase::Moved) or
/// [`Stationary`](TouchPhase::Stationary). Phases are never skipped across
/// frames.
#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "bevy_reflect", derive(Reflect))]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum TouchPhase {
    /// The contact started this frame.
    Began,
    /// The contact changed position this frame.
    Moved,
    /// The contact is held down but reported no movement this frame.
    Stationary,
    /// The contact lifted this frame; the sample carries the final position.
    Ended,
    /// The platform stopped tracking the contact.
    Canceled,
}

/// One contact point's current sample.
///
/// Samples are snapshots of persistent records that are overwritten in place
/// every frame rather than reallocated. [`delta`](TouchSample::delta) always
/// measures against the immediately preceding sample of the same
/// [`finger_id`](TouchSample::finger_id), and is only reset to zero when a
/// contact begins.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "bevy_reflect", derive(Reflect), reflect(Default))]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct TouchSample {
    /// Stable identity of the contact for its lifetime. The primary point is
    /// 0; the mirrored pinch point is 1.
    pub finger_id: u8,
    /// Lifecycle phase of the contact this frame.
    pub phase: TouchPhase,
    /// Current screen-space position in logical pixels.
    pub position: Vec2,
    /// `position` minus the previous sample's position.
    pub delta: Vec2,
    /// Number of taps registered for the contact. Pass-through metadata, not
    /// computed here.
    pub tap_count: u8,
    /// Seconds since the previous sample. Pass-through metadata, not computed
    /// here.
    pub delta_time: f32,
}

impl Default for TouchSample {
    fn default() -> Self {
        Self {
            finger_id: 0,
            phase: TouchPhase::Canceled,
            position: Vec2::ZERO,
            delta: Vec2::ZERO,
            tap_count: 0,
            delta_time: 0.0,
        }
    }
}

impl TouchSample {
    /// Restarts the record for a new contact at `position`.
    pub(crate) fn begin(&mut self, finger_id: u8, position: Vec2) {
        self.finger_id = finger_id;
        self.phase = TouchPhase::Began;
        self.position = position;
        self.delta = Vec2::ZERO;
        self.tap_count = 1;
    }

    /// Takes the next sample of an ongoing contact. The delta is measured
    /// against the position still stored in the record, so it must be computed
    /// before the position is overwritten.
    pub(crate) fn advance(&mut self, phase: TouchPhase, position: Vec2) {
        self.delta = position - self.position;
        self.position = position;
        self.phase = phase;
    }
}

#[derive(Debug, Clone)]
struct HardwareContact {
    /// Platform-reported touch id, unique per contact.
    id: u64,
    /// Position at the start of the current frame, the baseline for this
    /// frame's delta even when several events coalesce.
    previous_position: Vec2,
    sample: TouchSample,
}

/// Ordered, frame-coherent view of the hardware touch screen.
///
/// [`hardware_touch_system`] folds each frame's [`TouchInput`] events into
/// this store. Contacts keep their insertion order and their
/// [`finger_id`](TouchSample::finger_id) slot for as long as they live;
/// contacts that end stay visible for exactly the frame they terminate in.
#[derive(Resource, Debug, Clone, Default)]
pub struct HardwareTouches {
    contacts: Vec<HardwareContact>,
}

impl HardwareTouches {
    /// Number of contacts reported this frame, including those that ended.
    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    /// Returns `true` if the hardware reports no contact this frame.
    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// The contact at `index`, in contact order.
    pub fn get(&self, index: usize) -> Option<&TouchSample> {
        self.contacts.get(index).map(|contact| &contact.sample)
    }

    /// Iterates this frame's samples in contact order.
    pub fn iter(&self) -> impl Iterator<Item = &TouchSample> {
        self.contacts.iter().map(|contact| &contact.sample)
    }

    fn begin_frame(&mut self) {
        self.contacts.retain(|contact| {
            !matches!(
                contact.sample.phase,
                TouchPhase::Ended | TouchPhase::Canceled
            )
        });
        for contact in &mut self.contacts {
            contact.previous_position = contact.sample.position;
            contact.sample.phase = TouchPhase::Stationary;
            contact.sample.delta = Vec2::ZERO;
        }
    }

    fn apply(&mut self, event: &TouchInput) {
        match event.phase {
            RawTouchPhase::Started => {
                let finger_id = self.free_slot();
                let mut sample = TouchSample::default();
                sample.begin(finger_id, event.position);
                self.contacts.push(HardwareContact {
                    id: event.id,
                    previous_position: event.position,
                    sample,
                });
            }
            RawTouchPhase::Moved => self.sample_to(event, TouchPhase::Moved),
            RawTouchPhase::Ended => self.sample_to(event, TouchPhase::Ended),
            RawTouchPhase::Canceled => self.sample_to(event, TouchPhase::Canceled),
        }
    }

    fn sample_to(&mut self, event: &TouchInput, phase: TouchPhase) {
        // Events for ids that started before this store existed are dropped.
        let Some(contact) = self.contacts.iter_mut().find(|c| c.id == event.id) else {
            return;
        };
        contact.sample.delta = event.position - contact.previous_position;
        contact.sample.position = event.position;
        // A move folded into the contact's first frame keeps the Began phase
        // so consumers always observe it.
        if !(contact.sample.phase == TouchPhase::Began && phase == TouchPhase::Moved) {
            contact.sample.phase = phase;
        }
    }

    /// Smallest finger id not held by a live contact.
    fn free_slot(&self) -> u8 {
        let mut slot = 0;
        while self.contacts.iter().any(|c| c.sample.finger_id == slot) {
            slot += 1;
        }
        slot
    }
}

/// Folds the frame's [`TouchInput`] events into [`HardwareTouches`].
pub fn hardware_touch_system(
    mut events: EventReader<TouchInput>,
    mut hardware: ResMut<HardwareTouches>,
) {
    hardware.begin_frame();
    for event in events.read() {
        hardware.apply(event);
    }
}

/// Read access to the current frame's touch set.
///
/// This is the drop-in substitute for a native touch query API: hardware
/// contacts pass through unchanged, and on mouse-only hosts the emulated
/// gesture supplies the samples instead. Both the bulk and the indexed query
/// honor [`TouchSuppression`]; the indexed query can optionally bypass it to
/// read raw state while UI-level consumption is suppressed.
#[derive(SystemParam)]
pub struct TouchQuery<'w, 's> {
    hardware: Res<'w, HardwareTouches>,
    emulation: Res<'w, TouchEmulation>,
    suppression: Res<'w, TouchSuppression>,
    windows: Query<'w, 's, &'static Window, With<PrimaryWindow>>,
}

impl TouchQuery<'_, '_> {
    /// All touch samples for the current frame.
    ///
    /// Returns an empty set while suppression is active; the frame's touches
    /// are dropped entirely, not flagged. Otherwise returns the emulated
    /// gesture's one or two samples if the mouse drives one this frame, or the
    /// hardware contacts verbatim.
    pub fn all(&self) -> Vec<TouchSample> {
        if self.suppression.is_active() {
            return Vec::new();
        }
        match self.emulation.gesture() {
            EmulatedGesture::None => self.hardware.iter().copied().collect(),
            _ => self.emulation.samples().to_vec(),
        }
    }

    /// The touch at `index`, if the hardware reports at least `index + 1`
    /// contacts this frame.
    ///
    /// With `ignore_suppression` set, the lookup reads through an active
    /// suppression instead of reporting `None`. For `index` 0 the lookup falls
    /// back to the emulated single-point record while a mouse gesture is
    /// active; the mirrored pinch point is only ever reported through
    /// [`all`](Self::all). Absence of a touch is a normal frame state, not an
    /// error.
    pub fn get(&self, index: usize, ignore_suppression: bool) -> Option<TouchSample> {
        if !ignore_suppression && self.suppression.is_active() {
            return None;
        }
        if let Some(sample) = self.hardware.get(index) {
            return Some(*sample);
        }
        if index == 0 && self.emulation.gesture() != EmulatedGesture::None {
            return Some(self.emulation.single_point());
        }
        None
    }

    /// Whether the bulk query would report any sample this frame.
    pub fn any(&self) -> bool {
        if self.suppression.is_active() {
            return false;
        }
        self.emulation.gesture() != EmulatedGesture::None || !self.hardware.is_empty()
    }

    /// The position hit-test backends should probe: the first hardware
    /// contact if any exist this frame, otherwise the window cursor.
    pub fn pointer_position(&self) -> Option<Vec2> {
        if let Some(sample) = self.hardware.get(0) {
            return Some(sample.position);
        }
        self.windows.iter().next().and_then(Window::cursor_position)
    }
}

#[cfg(test)]
mod tests {
    use bevy_ecs::entity::Entity;
    use bevy_input::touch::TouchPhase as RawTouchPhase;

    use super::*;

    fn touch_event(id: u64, phase: RawTouchPhase, x: f32, y: f32) -> TouchInput {
        TouchInput {
            phase,
            position: Vec2::new(x, y),
            window: Entity::PLACEHOLDER,
            force: None,
            id,
        }
    }

    #[test]
    fn advancing_measures_delta_against_previous_sample() {
        let mut sample = TouchSample::default();
        sample.begin(0, Vec2::new(2.0, 2.0));
        assert_eq!(sample.phase, TouchPhase::Began);
        assert_eq!(sample.delta, Vec2::ZERO);
        assert_eq!(sample.tap_count, 1);

        sample.advance(TouchPhase::Moved, Vec2::new(5.0, 1.0));
        assert_eq!(sample.position, Vec2::new(5.0, 1.0));
        assert_eq!(sample.delta, Vec2::new(3.0, -1.0));
    }

    #[test]
    fn contact_lifecycle_phases() {
        let mut hardware = HardwareTouches::default();

        hardware.begin_frame();
        hardware.apply(&touch_event(7, RawTouchPhase::Started, 10.0, 10.0));
        assert_eq!(hardware.len(), 1);
        assert_eq!(hardware.get(0).unwrap().phase, TouchPhase::Began);
        assert_eq!(hardware.get(0).unwrap().finger_id, 0);

        // No event: the contact is held in place.
        hardware.begin_frame();
        assert_eq!(hardware.get(0).unwrap().phase, TouchPhase::Stationary);
        assert_eq!(hardware.get(0).unwrap().delta, Vec2::ZERO);

        hardware.begin_frame();
        hardware.apply(&touch_event(7, RawTouchPhase::Moved, 15.0, 12.0));
        assert_eq!(hardware.get(0).unwrap().phase, TouchPhase::Moved);
        assert_eq!(hardware.get(0).unwrap().delta, Vec2::new(5.0, 2.0));

        hardware.begin_frame();
        hardware.apply(&touch_event(7, RawTouchPhase::Ended, 16.0, 12.0));
        assert_eq!(hardware.len(), 1);
        assert_eq!(hardware.get(0).unwrap().phase, TouchPhase::Ended);
        assert_eq!(hardware.get(0).unwrap().delta, Vec2::new(1.0, 0.0));

        // Ended contacts are visible for exactly one frame.
        hardware.begin_frame();
        assert!(hardware.is_empty());
    }

    #[test]
    fn coalesced_moves_report_the_frame_delta() {
        let mut hardware = HardwareTouches::default();
        hardware.begin_frame();
        hardware.apply(&touch_event(1, RawTouchPhase::Started, 0.0, 0.0));

        hardware.begin_frame();
        hardware.apply(&touch_event(1, RawTouchPhase::Moved, 3.0, 0.0));
        hardware.apply(&touch_event(1, RawTouchPhase::Moved, 7.0, 2.0));
        assert_eq!(hardware.get(0).unwrap().position, Vec2::new(7.0, 2.0));
        assert_eq!(hardware.get(0).unwrap().delta, Vec2::new(7.0, 2.0));
    }

    #[test]
    fn a_move_on_the_first_frame_keeps_began() {
        let mut hardware = HardwareTouches::default();
        hardware.begin_frame();
        hardware.apply(&touch_event(1, RawTouchPhase::Started, 0.0, 0.0));
        hardware.apply(&touch_event(1, RawTouchPhase::Moved, 5.0, 5.0));
        assert_eq!(hardware.get(0).unwrap().phase, TouchPhase::Began);
        assert_eq!(hardware.get(0).unwrap().position, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn finger_slots_are_reused_after_release() {
        let mut hardware = HardwareTouches::default();
        hardware.begin_frame();
        hardware.apply(&touch_event(1, RawTouchPhase::Started, 0.0, 0.0));
        hardware.apply(&touch_event(2, RawTouchPhase::Started, 9.0, 9.0));
        assert_eq!(hardware.get(0).unwrap().finger_id, 0);
        assert_eq!(hardware.get(1).unwrap().finger_id, 1);

        hardware.begin_frame();
        hardware.apply(&touch_event(1, RawTouchPhase::Ended, 0.0, 0.0));

        hardware.begin_frame();
        hardware.apply(&touch_event(3, RawTouchPhase::Started, 4.0, 4.0));
        assert_eq!(hardware.len(), 2);
        // The surviving contact keeps its slot; the new one takes the free one.
        assert_eq!(hardware.get(0).unwrap().finger_id, 1);
        assert_eq!(hardware.get(1).unwrap().finger_id, 0);
    }

    #[test]
    fn events_for_unknown_ids_are_dropped() {
        let mut hardware = HardwareTouches::default();
        hardware.begin_frame();
        hardware.apply(&touch_event(9, RawTouchPhase::Moved, 1.0, 1.0));
        hardware.apply(&touch_event(9, RawTouchPhase::Ended, 1.0, 1.0));
        assert!(hardware.is_empty());
    }

    #[test]
    fn cancellation_is_terminal() {
        let mut hardware = HardwareTouches::default();
        hardware.begin_frame();
        hardware.apply(&touch_event(5, RawTouchPhase::Started, 2.0, 2.0));

        hardware.begin_frame();
        hardware.apply(&touch_event(5, RawTouchPhase::Canceled, 2.0, 2.0));
        assert_eq!(hardware.get(0).unwrap().phase, TouchPhase::Canceled);

        hardware.begin_frame();
        assert!(hardware.is_empty());
    }
}
