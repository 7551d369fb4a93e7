//! Animation classes - css class names for show/hide transitions.
//!
//! Maps the current and previous visibility to one of four phases and
//! returns the class string for that phase:
//!
//! | visible now | visible before | phase      | classes           |
//! |-------------|----------------|------------|-------------------|
//! | false       | false          | `Hidden`   | `base`            |
//! | true        | false          | `Entering` | `progress`        |
//! | true        | true           | `Entered`  | `progress ended`  |
//! | false       | true           | `Leaving`  | `reverse`         |
//!
//! The caller owns the visibility history; [`VisibilityTracker`] is there
//! for callers that don't want to keep it themselves.
//!
//! # Example
//!
//! ```ignore
//! use reactive_elements::state::animation_class;
//!
//! let classes = ["drawer", "drawer-open", "drawer-opened", "drawer-close"];
//! assert_eq!(animation_class(true, true, classes), "drawer-open drawer-opened");
//! ```

/// Transition phase derived from two visibility samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationPhase {
    Hidden,
    Entering,
    Entered,
    Leaving,
}

impl AnimationPhase {
    pub fn from_visibility(is_visible: bool, was_visible: bool) -> Self {
        match (is_visible, was_visible) {
            (false, false) => Self::Hidden,
            (true, false) => Self::Entering,
            (true, true) => Self::Entered,
            (false, true) => Self::Leaving,
        }
    }

    /// Class string for this phase from `[base, progress, ended, reverse]`.
    pub fn class_name(self, classes: [&str; 4]) -> String {
        let [base, progress, ended, reverse] = classes;
        match self {
            Self::Hidden => base.to_string(),
            Self::Entering => progress.to_string(),
            Self::Entered => format!("{progress} {ended}"),
            Self::Leaving => reverse.to_string(),
        }
    }
}

/// Class string for the current transition state.
///
/// `classes` is `[base, progress, ended, reverse]`.
pub fn animation_class(is_visible: bool, was_visible: bool, classes: [&str; 4]) -> String {
    AnimationPhase::from_visibility(is_visible, was_visible).class_name(classes)
}

/// Remembers the previous visibility between renders.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VisibilityTracker {
    was_visible: bool,
}

impl VisibilityTracker {
    pub fn new(initially_visible: bool) -> Self {
        Self {
            was_visible: initially_visible,
        }
    }

    pub fn was_visible(&self) -> bool {
        self.was_visible
    }

    /// Phase for `is_visible`, then record it as the previous visibility.
    pub fn advance(&mut self, is_visible: bool) -> AnimationPhase {
        let phase = AnimationPhase::from_visibility(is_visible, self.was_visible);
        self.was_visible = is_visible;
        phase
    }

    /// Class string for `is_visible`, then record it.
    pub fn class_for(&mut self, is_visible: bool, classes: [&str; 4]) -> String {
        self.advance(is_visible).class_name(classes)
    }
}
