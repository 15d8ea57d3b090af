//! Terminal rendering for the markdown produced by `asxcel-core`.
//!
//! Rich output goes through termimad so headers, bold route names and the
//! routes table are styled; plain output prints the markdown unchanged.
//! The routes table has twelve columns and is often wider than the
//! terminal. termimad would squeeze it into unreadable cells, so text
//! containing a table wider than the terminal is printed unwrapped.

use anyhow::Result;
use termimad::{crossterm::style::Color, terminal_size, FmtText, MadSkin};

/// Width assumed when the terminal size cannot be read.
const FALLBACK_WIDTH: usize = 100;

/// Renders markdown either styled or as plain text.
pub struct TerminalRenderer {
    rich_enabled: bool,
    width: Option<usize>,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();
        skin.set_headers_fg(Color::Blue);
        // Scheduled routes are printed in bold.
        skin.bold.set_fg(Color::Green);
        skin.italic.set_fg(Color::Magenta);

        Self {
            rich_enabled,
            width: None,
            skin,
        }
    }

    /// Fixes the output width instead of asking the terminal.
    #[cfg(test)]
    fn with_width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    pub fn render(&self, markdown: &str) -> Result<()> {
        print!("{}", self.format(markdown));
        Ok(())
    }

    fn format(&self, markdown: &str) -> String {
        if !self.rich_enabled {
            return markdown.to_string();
        }
        let wrap = self.wrap_width(markdown);
        FmtText::from(&self.skin, markdown, wrap).to_string()
    }

    /// Terminal width to wrap at, or `None` when a table would not fit.
    fn wrap_width(&self, markdown: &str) -> Option<usize> {
        let width = self.width.unwrap_or_else(|| match terminal_size() {
            (0, _) => FALLBACK_WIDTH,
            (columns, _) => usize::from(columns),
        });
        if table_width(markdown) > width {
            None
        } else {
            Some(width)
        }
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Display width of the widest table row in `markdown`, 0 without a table.
fn table_width(markdown: &str) -> usize {
    markdown
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with('|'))
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0)
}
