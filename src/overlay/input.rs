//! Per-tick input sampling
//!
//! The window layer accumulates events into a [`RawInput`]; the
//! [`InputSampler`] turns consecutive raw samples into a [`FrameInput`]
//! with movement and button transitions resolved.

/// Cursor position used when the platform cannot report one
pub const OFF_SCREEN_CURSOR: (i32, i32) = (-10_000, -10_000);

/// Mouse buttons tracked by the overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
}

impl MouseButton {
    /// Every tracked button
    pub const ALL: [MouseButton; 5] = [
        MouseButton::Left,
        MouseButton::Right,
        MouseButton::Middle,
        MouseButton::Back,
        MouseButton::Forward,
    ];

    fn bit(self) -> u8 {
        match self {
            MouseButton::Left => 1 << 0,
            MouseButton::Right => 1 << 1,
            MouseButton::Middle => 1 << 2,
            MouseButton::Back => 1 << 3,
            MouseButton::Forward => 1 << 4,
        }
    }
}

/// Small set of mouse buttons
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonSet(u8);

impl ButtonSet {
    pub const EMPTY: Self = Self(0);

    pub fn insert(&mut self, button: MouseButton) {
        self.0 |= button.bit();
    }

    pub fn remove(&mut self, button: MouseButton) {
        self.0 &= !button.bit();
    }

    pub fn contains(self, button: MouseButton) -> bool {
        self.0 & button.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Buttons in `self` but not in `other`
    pub fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Iterate the buttons in the set
    pub fn iter(self) -> impl Iterator<Item = MouseButton> {
        MouseButton::ALL.into_iter().filter(move |b| self.contains(*b))
    }
}

impl FromIterator<MouseButton> for ButtonSet {
    fn from_iter<I: IntoIterator<Item = MouseButton>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for button in iter {
            set.insert(button);
        }
        set
    }
}

/// Input gathered by the window layer since the previous tick
#[derive(Debug, Clone, PartialEq)]
pub struct RawInput {
    /// Cursor in window-local logical pixels
    pub cursor: (i32, i32),

    /// Buttons currently held
    pub held: ButtonSet,

    /// Buttons that went down since the previous tick
    pub pressed: ButtonSet,

    /// Buttons that went up since the previous tick
    pub released: ButtonSet,

    /// Termination was requested (Escape)
    pub quit: bool,
}

impl Default for RawInput {
    fn default() -> Self {
        Self {
            cursor: OFF_SCREEN_CURSOR,
            held: ButtonSet::EMPTY,
            pressed: ButtonSet::EMPTY,
            released: ButtonSet::EMPTY,
            quit: false,
        }
    }
}

/// Resolved input for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInput {
    pub cursor: (i32, i32),
    pub moved: bool,
    pub held: ButtonSet,
    pub just_pressed: ButtonSet,
    pub just_released: ButtonSet,
}

impl FrameInput {
    /// Whether any button went down or up this tick
    pub fn any_transition(&self) -> bool {
        !self.just_pressed.is_empty() || !self.just_released.is_empty()
    }

    /// Whether the canvas has to be rebuilt this tick
    pub fn changed(&self) -> bool {
        self.moved || self.any_transition()
    }

    pub fn is_pressed(&self, button: MouseButton) -> bool {
        self.just_pressed.contains(button)
    }

    pub fn is_released(&self, button: MouseButton) -> bool {
        self.just_released.contains(button)
    }

    pub fn is_held(&self, button: MouseButton) -> bool {
        self.held.contains(button)
    }
}

/// Tracks the previous sample to derive movement and transitions
#[derive(Debug)]
pub struct InputSampler {
    last_cursor: (i32, i32),
    last_held: ButtonSet,
}

impl InputSampler {
    pub fn new() -> Self {
        Self {
            // Never a real cursor position, so the first sample counts as a move
            last_cursor: (-1, -1),
            last_held: ButtonSet::EMPTY,
        }
    }

    /// Resolve one tick of input
    ///
    /// Transitions are the union of the events the window layer saw and
    /// the difference between consecutive held sets, so a press and
    /// release inside one tick still register.
    pub fn sample(&mut self, raw: &RawInput) -> FrameInput {
        let frame = FrameInput {
            cursor: raw.cursor,
            moved: raw.cursor != self.last_cursor,
            held: raw.held,
            just_pressed: raw.pressed.union(raw.held.difference(self.last_held)),
            just_released: raw.released.union(self.last_held.difference(raw.held)),
        };

        self.last_cursor = raw.cursor;
        self.last_held = raw.held;

        frame
    }
}

impl Default for InputSampler {
    fn default() -> Self {
        Self::new()
    }
}
