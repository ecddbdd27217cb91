use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

/// Single-line text field shared by the Entry and Add Task screens.
#[derive(Default, Clone)]
pub(crate) struct TextInput {
    pub(crate) value: String,
    placeholder: &'static str,
}

impl TextInput {
    pub(crate) fn with_placeholder(placeholder: &'static str) -> Self {
        Self {
            value: String::new(),
            placeholder,
        }
    }

    /// Append a character, ignoring control characters.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.value.push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) -> bool {
        self.value.pop().is_some()
    }

    pub(crate) fn trimmed(&self) -> &str {
        self.value.trim()
    }

    /// Whitespace-only input counts as blank.
    pub(crate) fn is_blank(&self) -> bool {
        self.trimmed().is_empty()
    }

    pub(crate) fn value_len(&self) -> usize {
        self.value.chars().count()
    }

    /// Render the field contents, falling back to the dimmed placeholder.
    pub(crate) fn build_line(&self, icon: &str, focused: bool) -> Line<'static> {
        let (display, style) = if self.value.is_empty() {
            (
                self.placeholder.to_string(),
                Style::default().fg(Color::DarkGray),
            )
        } else if focused {
            (self.value.clone(), Style::default().fg(Color::Yellow))
        } else {
            (self.value.clone(), Style::default())
        };

        Line::from(vec![Span::raw(format!("{icon} ")), Span::styled(display, style)])
    }
}

#[cfg(test)]
mod tests {
    use super::TextInput;

    #[test]
    fn blank_tracks_trimmed_value() {
        let mut input = TextInput::with_placeholder("Enter your name");
        assert!(input.is_blank());

        input.push_char(' ');
        input.push_char(' ');
        assert!(input.is_blank());

        input.push_char('A');
        assert!(!input.is_blank());
        assert_eq!(input.trimmed(), "A");

        input.backspace();
        assert!(input.is_blank());
    }

    #[test]
    fn control_characters_are_rejected() {
        let mut input = TextInput::default();
        assert!(!input.push_char('\n'));
        assert!(input.push_char('é'));
        assert_eq!(input.value_len(), 1);
    }
}
