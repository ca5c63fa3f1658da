//! Input events delivered by the host front end.
//!
//! Game-agnostic. Each game maps keys and click ids onto its own actions.

/// All possible input events, normalized from keyboard, mouse, and touch sources.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A key press from keyboard.
    Key(char),
    /// A click/tap on a button, identified by a semantic action ID.
    /// Each game defines its own action ID constants.
    Click(u16),
}
