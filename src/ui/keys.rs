//! Toolkit-independent key identifiers.

/// A physical key as reported by the input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Space,
    Enter,
    Escape,
    Left,
    Right,
    Up,
    Down,
    /// A character key, as typed.
    Char(char),
}

impl Key {
    /// Whether this is the character key `c`, ignoring ASCII case.
    #[must_use]
    pub fn is_char(self, c: char) -> bool {
        matches!(self, Key::Char(typed) if typed.eq_ignore_ascii_case(&c))
    }
}
