//! Scroll-driven text sections: the content reveal, the name/intro block and
//! the projects headline.
//!
//! Every widget renders into its section's whole box and applies its own
//! [`Visual`]: opacity as brightness, translate as a row offset.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::core::animate::{Curve, CurveTuning, LetterReveal, Visual};
use crate::core::catalog::Profile;
use crate::core::progress::SectionProgress;
use crate::ui::layout::{self, px_to_rows, ContentLayout, ProjectsLayout};
use crate::ui::theme::Theme;

/// Shift `rect` by a px translate, clipped to `bounds`.
pub fn translated(rect: Rect, translate_px: f64, bounds: Rect) -> Option<Rect> {
    let y0 = i32::from(rect.y) + px_to_rows(translate_px);
    let y1 = y0 + i32::from(rect.height);
    let top = y0.max(i32::from(bounds.y));
    let bottom = y1.min(i32::from(bounds.bottom()));
    (bottom > top).then(|| Rect {
        y: top as u16,
        height: (bottom - top) as u16,
        ..rect
    })
}

/// Opacity below which a block is not drawn at all.
const INVISIBLE: f64 = 0.02;

// ───────────────────────────────────────── content ───────────

pub struct ContentSection<'a> {
    pub profile: &'a Profile,
    pub curves: &'a CurveTuning,
    pub progress: SectionProgress,
}

impl ContentSection<'_> {
    pub fn phrase_visual(&self) -> Visual {
        Curve::exit_only(self.curves).visual(self.progress.raw)
    }

    pub fn aside_visual(&self) -> Visual {
        Curve::fade_in(self.curves).visual(self.progress.raw)
    }
}

impl Widget for ContentSection<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let layout = ContentLayout::new(area);

        let phrase = self.phrase_visual();
        if phrase.opacity > INVISIBLE {
            if let Some(rect) = translated(layout.phrase, phrase.translate_y, area) {
                let words = LetterReveal::new(self.curves).words(&self.profile.phrase, self.progress.extended);
                let mut spans = Vec::new();
                for (i, word) in words.iter().enumerate() {
                    if i > 0 {
                        spans.push(Span::raw(" "));
                    }
                    for &(ch, shown) in word {
                        let style = if shown {
                            Theme::heading_style(phrase.opacity)
                        } else {
                            Theme::ghost_style()
                        };
                        spans.push(Span::styled(ch.to_string(), style));
                    }
                }
                Paragraph::new(Line::from(spans))
                    .wrap(Wrap { trim: true })
                    .render(rect, buf);
            }
        }

        let aside = self.aside_visual();
        if aside.opacity > INVISIBLE {
            if let Some(rect) = translated(layout.aside, aside.translate_y, area) {
                let block = Block::default()
                    .borders(Borders::ALL)
                    .border_style(Theme::border_style(aside.opacity))
                    .title(Span::styled(
                        format!(" {} ", self.profile.name),
                        Theme::accent_style(aside.opacity),
                    ));
                Paragraph::new(Line::from(Span::styled(
                    self.profile.tags.as_str(),
                    Theme::muted_style(aside.opacity),
                )))
                .wrap(Wrap { trim: true })
                .block(block)
                .render(rect, buf);
            }
        }
    }
}

// ───────────────────────────────────────── name / intro ──────

pub struct NameSection<'a> {
    pub profile: &'a Profile,
    pub curves: &'a CurveTuning,
    pub progress: SectionProgress,
}

impl Widget for NameSection<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let visual = Curve::flip(self.curves).visual(self.progress.raw);
        if visual.opacity <= INVISIBLE {
            return;
        }
        let Some(rect) = translated(layout::name_block(area), visual.translate_y, area) else {
            return;
        };
        let spaced: String = self
            .profile
            .name
            .chars()
            .map(|c| c.to_uppercase().collect::<String>())
            .collect::<Vec<_>>()
            .join(" ");
        let lines = vec![
            Line::from(Span::styled(
                self.profile.greeting.as_str(),
                Theme::muted_style(visual.opacity),
            )),
            Line::default(),
            Line::from(Span::styled(spaced, Theme::heading_style(visual.opacity))),
            Line::default(),
            Line::from(Span::styled(
                self.profile.tags.as_str(),
                Theme::muted_style(visual.opacity),
            )),
        ];
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(rect, buf);
    }
}

// ───────────────────────────────────────── projects headline ─

/// Translate of the headline while the stage plays its boundary exit.
const HEADLINE_EXIT_PX: f64 = -30.0;

pub struct ProjectsHeading<'a> {
    pub lines: &'a [String],
    pub curves: &'a CurveTuning,
    pub progress: SectionProgress,
    pub exiting: bool,
}

impl ProjectsHeading<'_> {
    pub fn visual(&self) -> Visual {
        let base = Curve::flip(self.curves).visual(self.progress.raw);
        if self.exiting {
            return Visual {
                opacity: 0.0,
                translate_y: base.translate_y + HEADLINE_EXIT_PX,
            };
        }
        base
    }
}

impl Widget for ProjectsHeading<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let visual = self.visual();
        if visual.opacity <= INVISIBLE {
            return;
        }
        let heading = ProjectsLayout::new(area).heading;
        let Some(rect) = translated(heading, visual.translate_y, area) else {
            return;
        };
        let lines: Vec<Line> = self
            .lines
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let style = if i == 0 {
                    Theme::accent_style(visual.opacity)
                } else {
                    Theme::heading_style(visual.opacity)
                };
                Line::from(Span::styled(text.as_str(), style))
            })
            .collect();
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(rect, buf);
    }
}
