use smallvec::SmallVec;

/// Continuous controller axes reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    LeftX,
    LeftY,
    RightX,
    RightY,
    LeftTrigger,
    RightTrigger,
}

/// Digital controller buttons reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    A,
    B,
    X,
    Y,
    Back,
    Guide,
    Start,
    LeftStick,
    RightStick,
    LeftShoulder,
    RightShoulder,
    DPadUp,
    DPadDown,
    DPadLeft,
    DPadRight,
}

/// One raw sample from the device. Sticks report the full i16 range,
/// triggers report 0..=32767.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawSample {
    Axis { axis: Axis, value: i16 },
    Button { button: Button, pressed: bool },
}

/// Batch of samples collected by one pump pass.
pub type SampleBatch = SmallVec<[RawSample; 16]>;
