// Video events - the system events the display layer reacts to

/// Keys the video layer cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Return,
    Escape,
    Other,
}

/// A system event that may affect the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoEvent {
    /// A key was pressed; `alt` is set when an Alt modifier was held
    KeyDown { key: Key, alt: bool },

    /// The window was resized by the user
    Resize { width: u32, height: u32 },

    /// The window contents must be redrawn
    Expose,
}

impl VideoEvent {
    /// Alt+Enter
    pub fn is_fullscreen_toggle(&self) -> bool {
        matches!(
            self,
            VideoEvent::KeyDown {
                key: Key::Return,
                alt: true
            }
        )
    }
}
