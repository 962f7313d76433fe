//! Logical control vocabulary shared by the device and dispatch sides.

/// A normalized input channel with a continuous or ternary value.
///
/// The hat axes are synthesized from d-pad buttons and only ever
/// report -1, 0 or 1. The remaining axes carry raw device values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisCode {
    LeftX,
    LeftY,
    RightX,
    RightY,
    LeftTrigger,
    RightTrigger,
    HatX,
    HatY,
}

impl AxisCode {
    /// Axes whose values are coalesced in the cache instead of queued.
    pub const CACHED: [Self; 6] = [
        Self::LeftX,
        Self::LeftY,
        Self::RightX,
        Self::RightY,
        Self::LeftTrigger,
        Self::RightTrigger,
    ];

    pub(crate) fn cache_slot(self) -> Option<usize> {
        match self {
            Self::LeftX => Some(0),
            Self::LeftY => Some(1),
            Self::RightX => Some(2),
            Self::RightY => Some(3),
            Self::LeftTrigger => Some(4),
            Self::RightTrigger => Some(5),
            Self::HatX | Self::HatY => None,
        }
    }

    /// Maps a raw device value into [-1.0, 1.0].
    ///
    /// Sticks are signed 16-bit, triggers report 0..=32767 and the
    /// hat axes are already ternary.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn normalized(self, raw: i32) -> f32 {
        match self {
            Self::LeftX | Self::LeftY | Self::RightX | Self::RightY => raw as f32 / 32768.0,
            Self::LeftTrigger | Self::RightTrigger => raw as f32 / 32767.0,
            Self::HatX | Self::HatY => raw as f32,
        }
    }
}

/// A momentary control with press and release edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonCode {
    A,
    B,
    X,
    Y,
    Back,
    Start,
    Guide,
    LeftStick,
    RightStick,
    LeftShoulder,
    RightShoulder,
}

/// Key a binding table is addressed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlId {
    Axis(AxisCode),
    Button(ButtonCode),
}

/// An event as seen by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogicalEvent {
    Axis { axis: AxisCode, value: i32 },
    Button { button: ButtonCode, pressed: bool },
    /// The controller went away and came back.
    Reconnected,
}

impl LogicalEvent {
    /// The control this event addresses, if any.
    #[must_use]
    pub fn control_id(&self) -> Option<ControlId> {
        match *self {
            Self::Axis { axis, .. } => Some(ControlId::Axis(axis)),
            Self::Button { button, .. } => Some(ControlId::Button(button)),
            Self::Reconnected => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_stick_extremes() {
        assert!((AxisCode::LeftX.normalized(-32768) - -1.0).abs() < f32::EPSILON);
        assert!((AxisCode::LeftY.normalized(16384) - 0.5).abs() < 1e-4);
        assert!(AxisCode::RightX.normalized(0).abs() < f32::EPSILON);
    }

    #[test]
    fn normalizes_trigger_range() {
        assert!((AxisCode::LeftTrigger.normalized(32767) - 1.0).abs() < f32::EPSILON);
        assert!(AxisCode::RightTrigger.normalized(0).abs() < f32::EPSILON);
    }

    #[test]
    fn hat_values_pass_through() {
        assert!((AxisCode::HatX.normalized(-1) - -1.0).abs() < f32::EPSILON);
        assert!((AxisCode::HatY.normalized(1) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn cached_axes_have_distinct_slots() {
        let mut seen = [false; AxisCode::CACHED.len()];
        for axis in AxisCode::CACHED {
            let slot = axis.cache_slot().expect("cached axis without a slot");
            assert!(!seen[slot], "slot {slot} reused");
            seen[slot] = true;
        }
        assert!(AxisCode::HatX.cache_slot().is_none());
        assert!(AxisCode::HatY.cache_slot().is_none());
    }

    #[test]
    fn reconnect_has_no_control_id() {
        assert_eq!(LogicalEvent::Reconnected.control_id(), None);
        let event = LogicalEvent::Button { button: ButtonCode::A, pressed: true };
        assert_eq!(event.control_id(), Some(ControlId::Button(ButtonCode::A)));
    }
}
