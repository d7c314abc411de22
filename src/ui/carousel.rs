//! Projects carousel widget: one bordered card per project, stacked at the
//! positioner's offsets and clipped to the stage.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::core::animate::Visual;
use crate::core::catalog::Project;
use crate::ui::blit;
use crate::ui::layout::px_to_rows;
use crate::ui::theme::Theme;

/// Renders into the stage's on-screen rect.
pub struct CarouselWidget<'a> {
    pub projects: &'a [Project],
    /// Card offsets in px relative to the stage top, already eased.
    pub offsets: &'a [f64],
    pub item_height: f64,
    /// Stage visual (opacity/translate of the whole column).
    pub visual: Visual,
    /// Highlight the cards while the pointer is over them.
    pub hovered: bool,
}

impl Widget for CarouselWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.visual.opacity <= 0.02 || area.width < 4 || area.height == 0 {
            return;
        }
        let card_rows = px_to_rows(self.item_height).clamp(3, i32::from(u16::MAX)) as u16;
        let shift = px_to_rows(self.visual.translate_y);

        for (project, &offset) in self.projects.iter().zip(self.offsets) {
            let top = px_to_rows(offset) + shift;
            if top >= i32::from(area.height) || top + i32::from(card_rows) <= 0 {
                continue;
            }
            let mut card = Buffer::empty(Rect::new(0, 0, area.width, card_rows));
            ProjectCard {
                project,
                opacity: self.visual.opacity,
                hovered: self.hovered,
            }
            .render(card.area, &mut card);
            blit(&card, buf, area, i32::from(area.y) + top);
        }
    }
}

struct ProjectCard<'a> {
    project: &'a Project,
    opacity: f64,
    hovered: bool,
}

impl Widget for ProjectCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border = if self.hovered {
            Theme::accent_style(self.opacity)
        } else {
            Theme::border_style(self.opacity)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(Span::styled(
                format!(" {} ", self.project.name),
                Theme::heading_style(self.opacity),
            ));

        let mut lines = Vec::new();
        if let Some(image) = &self.project.image {
            lines.push(Line::from(Span::styled(
                format!("▧ {image}"),
                Theme::muted_style(self.opacity * 0.7),
            )));
        }
        if let Some(description) = &self.project.description {
            lines.push(Line::from(Span::styled(
                description.as_str(),
                Theme::text_style(self.opacity),
            )));
        }
        if !self.project.tech.is_empty() {
            lines.push(Line::default());
            let tags: Vec<Span> = self
                .project
                .tech
                .iter()
                .flat_map(|t| {
                    [
                        Span::styled(format!("[{t}]"), Theme::accent_style(self.opacity)),
                        Span::raw(" "),
                    ]
                })
                .collect();
            lines.push(Line::from(tags));
        }
        lines.push(Line::from(Span::styled(
            self.project.url.as_str(),
            Theme::muted_style(self.opacity),
        )));

        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(block)
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(name: &str) -> Project {
        Project {
            name: name.into(),
            description: Some(format!("{name} description")),
            image: None,
            url: format!("https://example.com/{name}"),
            tech: vec!["Rust".into()],
        }
    }

    fn rows_containing(buf: &Buffer, needle: &str) -> Vec<u16> {
        (0..buf.area.height)
            .filter(|&y| {
                let row: String = (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect();
                row.contains(needle)
            })
            .collect()
    }

    #[test]
    fn cards_follow_offsets_and_clip() {
        let projects = vec![project("Alpha"), project("Beta"), project("Gamma")];
        let stage = Rect::new(0, 0, 40, 20);
        let mut buf = Buffer::empty(stage);
        CarouselWidget {
            projects: &projects,
            offsets: &[0.0, 160.0, 640.0],
            item_height: 128.0,
            visual: Visual { opacity: 1.0, translate_y: 0.0 },
            hovered: false,
        }
        .render(stage, &mut buf);
        assert_eq!(rows_containing(&buf, " Alpha "), vec![0]);
        assert_eq!(rows_containing(&buf, " Beta "), vec![10]);
        assert!(rows_containing(&buf, "Gamma").is_empty());
    }

    #[test]
    fn hidden_stage_draws_nothing() {
        let projects = vec![project("Alpha")];
        let stage = Rect::new(0, 0, 40, 20);
        let mut buf = Buffer::empty(stage);
        CarouselWidget {
            projects: &projects,
            offsets: &[0.0],
            item_height: 128.0,
            visual: Visual { opacity: 0.0, translate_y: -135.0 },
            hovered: false,
        }
        .render(stage, &mut buf);
        assert!(rows_containing(&buf, "Alpha").is_empty());
    }
}
