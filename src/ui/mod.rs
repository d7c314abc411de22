//! UI / rendering layer: everything that touches Ratatui widgets.
//!
//! This layer reads the frame snapshot in `AppState` and turns it into
//! cells.  Each section is drawn into its own viewport-sized layer which is
//! then composited onto the page at the section's box offset.

pub mod backdrop;
pub mod carousel;
pub mod layout;
pub mod search;
pub mod sections;
pub mod smooth_scroll;
pub mod spinner;
pub mod theme;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Color,
    widgets::Widget,
};

use crate::app::state::AppState;
use crate::core::carousel::CarouselMode;
use backdrop::Backdrop;
use carousel::CarouselWidget;
use layout::ProjectsLayout;
use search::HeroWidget;
use sections::{ContentSection, NameSection, ProjectsHeading};

/// Copy `src` onto `dst` with its first row at screen row `top` and its
/// first column at `clip.x`, limited to `clip`.  Blank cells are skipped and
/// unset backgrounds keep whatever is underneath.
pub fn blit(src: &Buffer, dst: &mut Buffer, clip: Rect, top: i32) {
    let area = src.area;
    for sy in 0..area.height {
        let y = top + i32::from(sy);
        if y < i32::from(clip.y) || y >= i32::from(clip.bottom()) {
            continue;
        }
        for sx in 0..area.width.min(clip.width) {
            let Some(cell) = src.cell((area.x + sx, area.y + sy)) else {
                continue;
            };
            if cell.symbol() == " " && cell.bg == Color::Reset {
                continue;
            }
            if let Some(target) = dst.cell_mut((clip.x + sx, y as u16)) {
                let under = target.bg;
                *target = cell.clone();
                if cell.bg == Color::Reset {
                    target.bg = under;
                }
            }
        }
    }
}

/// Draw one viewport-sized layer and composite it at `top` rows.
fn compose(buf: &mut Buffer, page: Rect, top: i32, draw: impl FnOnce(Rect, &mut Buffer)) {
    let height = i32::from(page.height);
    if top >= height || top + height <= 0 {
        return;
    }
    let local = layout::local(page);
    let mut layer = Buffer::empty(local);
    draw(local, &mut layer);
    blit(&layer, buf, page, i32::from(page.y) + top);
}

/// The whole page for the current frame.
pub struct PageView<'a> {
    pub state: &'a AppState,
    /// Whether the projects column is playing its boundary exit.
    pub exiting: bool,
}

impl Widget for PageView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let s = self.state;
        let snap = &s.snapshot;
        let progress = snap.progress;

        Backdrop {
            tick: s.tick,
            pointer: s.pointer,
        }
        .render(area, buf);

        compose(buf, area, snap.tops.content, |local, layer| {
            ContentSection {
                profile: &s.profile,
                curves: &s.config.curves,
                progress: progress.content,
            }
            .render(local, layer);
        });

        compose(buf, area, snap.tops.name, |local, layer| {
            NameSection {
                profile: &s.profile,
                curves: &s.config.curves,
                progress: progress.name,
            }
            .render(local, layer);
        });

        compose(buf, area, snap.tops.projects, |local, layer| {
            ProjectsHeading {
                lines: &s.profile.headline,
                curves: &s.config.curves,
                progress: progress.projects,
                exiting: self.exiting,
            }
            .render(local, layer);

            let displacement = s.carousel_ease.displacement();
            let looping = matches!(s.carousel.mode(), CarouselMode::Loop { .. });
            let offsets: Vec<f64> = s
                .carousel
                .positions()
                .into_iter()
                .map(|y| {
                    if looping {
                        s.carousel.wrap(y + displacement)
                    } else {
                        y + displacement
                    }
                })
                .collect();
            CarouselWidget {
                projects: &s.projects,
                offsets: &offsets,
                item_height: s.carousel.layout().item_height,
                visual: s.stage.visual(progress.projects.extended, self.exiting),
                hovered: s.pointer_over_stage(),
            }
            .render(ProjectsLayout::new(local).stage, layer);
        });

        compose(buf, area, snap.tops.hero, |local, layer| {
            let suggestions = s.search.visible();
            HeroWidget {
                title: &s.profile.name,
                query: s.search.query(),
                suggestions: &suggestions,
                highlight: s.search.highlight(),
                has_focus: s.search.is_focused(),
                refining: s.search.is_refining(),
                tick: s.tick,
            }
            .render(local, layer);
        });
    }
}
