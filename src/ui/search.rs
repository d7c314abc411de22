//! Search hero widget (title, query input, and the top suggestions).

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::core::search::{CandidateKind, SearchCandidate};
use crate::ui::layout::HeroLayout;
use crate::ui::spinner::RefineIndicator;
use crate::ui::theme::Theme;

const PLACEHOLDER: &str = "Type Anything...";

/// Renders into the hero's whole box; see [`HeroLayout`].
pub struct HeroWidget<'a> {
    pub title: &'a str,
    pub query: &'a str,
    pub suggestions: &'a [&'a SearchCandidate],
    pub highlight: usize,
    pub has_focus: bool,
    pub refining: bool,
    pub tick: u64,
}

impl<'a> Widget for HeroWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let layout = HeroLayout::new(area);

        Paragraph::new(Line::from(Span::styled(self.title, Theme::heading_style(1.0))))
            .centered()
            .render(layout.title, buf);

        let border = if self.has_focus {
            Theme::focused_border_style()
        } else {
            Theme::border_style(1.0)
        };
        let input_block = Block::default().borders(Borders::ALL).border_style(border);
        let inner = input_block.inner(layout.input);
        input_block.render(layout.input, buf);

        let input_line = if self.query.is_empty() {
            Line::from(Span::styled(PLACEHOLDER, Theme::placeholder_style()))
        } else {
            let mut spans = vec![Span::styled(self.query, Theme::text_style(1.0))];
            if self.has_focus {
                spans.push(Span::styled("▏", Theme::accent_style(1.0)));
            }
            Line::from(spans)
        };
        Paragraph::new(input_line).render(inner, buf);

        RefineIndicator {
            visible: self.refining,
            tick: self.tick,
        }
        .render(layout.input, buf);

        if self.suggestions.is_empty() {
            return;
        }
        let list = layout.suggestions;
        let outer = Rect::new(
            list.x.saturating_sub(1),
            list.y.saturating_sub(1),
            list.width + 2,
            list.height + 2,
        );
        let rows = self.suggestions.len() as u16;
        Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border_style(0.6))
            .render(Rect { height: rows.min(list.height) + 2, ..outer }, buf);

        for (row_idx, candidate) in self.suggestions.iter().take(list.height as usize).enumerate() {
            let selected = row_idx == self.highlight;
            let marker = if selected { "> " } else { "  " };
            let name_style = if selected {
                Theme::selected_style()
            } else {
                Theme::text_style(1.0)
            };
            let line = Line::from(vec![
                Span::styled(marker, name_style),
                Span::styled(format!("{} ", icon_glyph(candidate)), Theme::accent_style(1.0)),
                Span::styled(candidate.name.as_str(), name_style),
                Span::raw("  "),
                Span::styled(
                    candidate.secondary_label.as_str(),
                    Theme::muted_style(1.0).add_modifier(Modifier::ITALIC),
                ),
            ]);
            let row = Rect::new(list.x, list.y + row_idx as u16, list.width, 1);
            let style = if selected {
                Theme::selected_style()
            } else {
                Style::default()
            };
            Paragraph::new(line).style(style).render(row, buf);
        }
    }
}

/// Short tag standing in for the candidate's icon.
fn icon_glyph(candidate: &SearchCandidate) -> &'static str {
    match (candidate.kind, candidate.icon_key.as_str()) {
        (CandidateKind::Project, _) => "▣",
        (_, "github") => "◆",
        (_, "twitter") | (_, "x") => "✕",
        (_, "telegram") => "✈",
        (_, "instagram") => "◎",
        _ => "•",
    }
}
