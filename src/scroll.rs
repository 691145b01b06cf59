/// Characters that fit on the first line of a 128x40 GameSense OLED
pub const DEFAULT_DISPLAY_WIDTH: usize = 16;

/// Inserted between the end of a scrolling title and its wrapped-around start
pub const SCROLL_SEPARATOR: &str = "  | ";

/// Horizontal marquee for titles wider than the display
///
/// Each call to [`ScrollEngine::next`] renders one frame and moves the cursor
/// on by one character. There is no timer: the text moves once per publish.
/// Lengths and offsets count `char`s, so multi-byte titles never split.
#[derive(Debug, Clone)]
pub struct ScrollEngine {
    cursor: usize,
    display_width: usize,
    reset_on_track_change: bool,
    last_title: Option<String>,
}

impl Default for ScrollEngine {
    fn default() -> Self {
        Self::new(DEFAULT_DISPLAY_WIDTH)
    }
}

impl ScrollEngine {
    /// Create a scroller for a screen `display_width` characters wide
    pub fn new(display_width: usize) -> Self {
        Self {
            cursor: 0,
            display_width,
            reset_on_track_change: false,
            last_title: None,
        }
    }

    /// Start every new title from its first character.
    ///
    /// Off by default, in which case the cursor carries over from the
    /// previous title.
    pub fn with_reset_on_track_change(mut self, reset: bool) -> Self {
        self.reset_on_track_change = reset;
        self
    }

    /// Current scroll offset, in characters
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Widest title shown without scrolling
    pub fn display_width(&self) -> usize {
        self.display_width
    }

    /// Move the cursor back to the start of the title
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Render the next frame of `title` and advance the cursor.
    ///
    /// Titles that fit are returned unchanged and leave the cursor alone.
    /// Longer titles come back rotated: the tail from the cursor, the
    /// separator, then the head up to the cursor. The cursor wraps to 0 once
    /// it passes the end of the title.
    pub fn next(&mut self, title: &str) -> String {
        if self.reset_on_track_change && self.last_title.as_deref() != Some(title) {
            self.cursor = 0;
        }
        if self.last_title.as_deref() != Some(title) {
            self.last_title = Some(title.to_string());
        }

        let chars: Vec<char> = title.chars().collect();
        let len = chars.len();
        if len <= self.display_width {
            return title.to_string();
        }

        // A cursor left over from a longer title renders as if at the end.
        let at = self.cursor.min(len);
        let mut frame = String::with_capacity(title.len() + SCROLL_SEPARATOR.len());
        frame.extend(&chars[at..]);
        frame.push_str(SCROLL_SEPARATOR);
        frame.extend(&chars[..at]);

        self.cursor += 1;
        if self.cursor > len {
            self.cursor = 0;
        }

        frame
    }
}
