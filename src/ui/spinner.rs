//! Refining indicator: a small spinner + label rendered at the right edge
//! of a given area while a remote ranking is outstanding.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

/// Braille-dot spinner frames.  Cycles through these on each tick.
const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Frames per spinner step (the loop runs at ~60 fps).
const FRAMES_PER_STEP: u64 = 5;

/// A small "Refining…" indicator with a spinning icon.
///
/// It picks its own position (top-right of `area`) and is invisible when
/// `visible` is false.
pub struct RefineIndicator {
    pub visible: bool,
    /// Monotonically increasing frame counter (drives the spinner frame).
    pub tick: u64,
}

impl Widget for RefineIndicator {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.visible || area.width < 16 || area.height == 0 {
            return;
        }

        let step = (self.tick / FRAMES_PER_STEP) as usize;
        let frame = SPINNER_FRAMES[step % SPINNER_FRAMES.len()];
        let label = format!(" {frame} Refining… ");

        let label_width = label.chars().count() as u16;
        // Leave 1 col for the border char.
        let x = area.x + area.width.saturating_sub(label_width + 1);

        let line = Line::from(Span::styled(
            label,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));

        buf.set_line(x, area.y, &line, label_width);
    }
}
