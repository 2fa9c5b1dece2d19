//! Mode transitions

use super::machine::DisplayMode;

/// A change of display mode between two frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Transition {
    /// An alert took over the display
    AlertShown { from: DisplayMode },
    /// The alert was cleared or expired
    AlertEnded { to: DisplayMode },
    /// A message rotation started from the clock
    RotationStarted,
    /// All messages scrolled past, or the last one was disabled
    RotationFinished,
}

impl Transition {
    /// Transition between the modes of two consecutive frames
    pub fn between(prev: DisplayMode, next: DisplayMode) -> Option<Self> {
        use DisplayMode::*;

        match (prev, next) {
            (a, b) if a == b => None,
            (from, Alert) => Some(Transition::AlertShown { from }),
            (Alert, to) => Some(Transition::AlertEnded { to }),
            (Clock, MessageRotation) => Some(Transition::RotationStarted),
            (MessageRotation, Clock) => Some(Transition::RotationFinished),
            _ => None,
        }
    }

}
