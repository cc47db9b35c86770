use inksac::prelude::*;

use crate::input::parser::{BACKGROUND_MARKER, PIPE_MARKER};

#[derive(Debug, Clone, Copy)]
pub struct SyntaxHighlighter {
    color_support: ColorSupport,
}

impl SyntaxHighlighter {
    /// Probes the terminal; `wanted == false` forces plain output.
    pub fn new(wanted: bool) -> Self {
        if !wanted {
            return Self::plain();
        }
        Self {
            color_support: check_color_support().unwrap_or(ColorSupport::NoColor),
        }
    }

    pub fn plain() -> Self {
        Self {
            color_support: ColorSupport::NoColor,
        }
    }

    pub fn enabled(&self) -> bool {
        !matches!(self.color_support, ColorSupport::NoColor)
    }

    /// Colours each token in place, keeping the original separators so the
    /// cursor position in the editor stays valid.
    pub fn highlight_command(&self, input: &str) -> String {
        if !self.enabled() {
            return input.to_string();
        }

        let mut out = String::with_capacity(input.len() * 2);
        let mut first_word = true;
        let mut rest = input;

        while !rest.is_empty() {
            let gap = rest.len() - rest.trim_start_matches([' ', '\t']).len();
            out.push_str(&rest[..gap]);
            rest = &rest[gap..];
            if rest.is_empty() {
                break;
            }

            let end = rest.find([' ', '\t']).unwrap_or(rest.len());
            let token = &rest[..end];
            out.push_str(&self.highlight_token(token, first_word));
            first_word = token == PIPE_MARKER;
            rest = &rest[end..];
        }

        out
    }

    fn highlight_token(&self, token: &str, command_position: bool) -> String {
        let style = if token == PIPE_MARKER || token == BACKGROUND_MARKER {
            Style::builder().foreground(Color::Magenta).bold().build()
        } else if command_position {
            Style::builder().foreground(Color::Cyan).bold().build()
        } else if token.starts_with('-') {
            Style::builder().foreground(Color::Yellow).build()
        } else {
            return token.to_string();
        };
        token.style(style).to_string()
    }

    pub fn highlight_error(&self, error: &str) -> String {
        if !self.enabled() {
            return error.to_string();
        }

        let error_style = Style::builder().foreground(Color::Red).bold().build();
        error.style(error_style).to_string()
    }
}
