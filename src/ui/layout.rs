//! Layout helpers: split the terminal into the page and the status bar, and
//! place each section's viewport-sized box on screen.
//!
//! Section layouts are computed in box-local coordinates (origin `0,0`, same
//! size as the page area) and moved on screen with [`place`].

use ratatui::layout::{Constraint, Direction, Flex, Layout, Rect};

/// Virtual pixels per terminal row.
pub const ROW_PX: f64 = 16.0;

pub fn px_to_rows(px: f64) -> i32 {
    (px / ROW_PX).round() as i32
}

pub fn rows_to_px(rows: u16) -> f64 {
    f64::from(rows) * ROW_PX
}

/// Primary screen layout with the page and a bottom status bar.
pub struct AppLayout {
    pub page_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // page (takes all remaining space)
                Constraint::Length(1), // status bar
            ])
            .split(area);

        Self {
            page_area: chunks[0],
            status_area: chunks[1],
        }
    }
}

/// Box-local rect covering the whole page area.
pub fn local(page: Rect) -> Rect {
    Rect::new(0, 0, page.width, page.height)
}

/// Move a box-local rect onto the screen for a box whose top sits `top`
/// rows below the page top, clipped to the page.  `None` when nothing of it
/// is visible.
pub fn place(page: Rect, local: Rect, top: i32) -> Option<Rect> {
    let y0 = i32::from(page.y) + top + i32::from(local.y);
    let y1 = y0 + i32::from(local.height);
    let clip_top = y0.max(i32::from(page.y));
    let clip_bottom = y1.min(i32::from(page.bottom()));
    if clip_bottom <= clip_top || local.width == 0 {
        return None;
    }
    Some(Rect::new(
        page.x + local.x,
        clip_top as u16,
        local.width.min(page.width.saturating_sub(local.x)),
        (clip_bottom - clip_top) as u16,
    ))
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    rect
}

// ───────────────────────────────────────── sections ──────────

/// Hero: title, bordered input and the suggestion list under it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeroLayout {
    pub title: Rect,
    pub input: Rect,
    /// Inner rows of the suggestion list (one row per suggestion).
    pub suggestions: Rect,
}

impl HeroLayout {
    pub const SUGGESTION_ROWS: u16 = 5;

    pub fn new(area: Rect) -> Self {
        let width = area.width.saturating_sub(4).min(64);
        let block = centered(area, width, 2 + 3 + Self::SUGGESTION_ROWS + 2);
        let [title, _, input, list] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(Self::SUGGESTION_ROWS + 2),
        ])
        .areas(block);
        let suggestions = Rect::new(
            list.x + 1,
            list.y + 1,
            list.width.saturating_sub(2),
            list.height.saturating_sub(2),
        );
        Self {
            title,
            input,
            suggestions,
        }
    }

    /// Index of the suggestion row under `(col, row)` in box-local
    /// coordinates.
    pub fn suggestion_at(&self, col: u16, row: u16) -> Option<usize> {
        let s = self.suggestions;
        (col >= s.x && col < s.right() && row >= s.y && row < s.bottom())
            .then(|| usize::from(row - s.y))
    }
}

/// Content: letter-revealed phrase on the left, profile card on the right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentLayout {
    pub phrase: Rect,
    pub aside: Rect,
}

impl ContentLayout {
    pub fn new(area: Rect) -> Self {
        let [phrase, aside] =
            Layout::horizontal([Constraint::Percentage(58), Constraint::Percentage(42)])
                .margin(2)
                .areas(area);
        Self {
            phrase: centered(phrase, phrase.width, 8),
            aside: centered(aside, aside.width.min(36), 10),
        }
    }
}

/// Name/intro: a centered block.
pub fn name_block(area: Rect) -> Rect {
    centered(area, area.width.saturating_sub(4).min(72), 9)
}

/// Projects: headline on the left, carousel stage on the right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectsLayout {
    pub heading: Rect,
    pub stage: Rect,
}

impl ProjectsLayout {
    /// Stage height cap in rows.
    const STAGE_ROWS: u16 = 28;

    pub fn new(area: Rect) -> Self {
        let [heading, stage] =
            Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)])
                .margin(1)
                .areas(area);
        Self {
            heading: centered(heading, heading.width, 4),
            stage: centered(stage, stage.width.min(56), Self::STAGE_ROWS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn place_clips_to_page() {
        let page = Rect::new(0, 0, 80, 20);
        let r = Rect::new(2, 5, 10, 4);
        assert_eq!(place(page, r, 0), Some(Rect::new(2, 5, 10, 4)));
        assert_eq!(place(page, r, -7), Some(Rect::new(2, 0, 10, 2)));
        assert_eq!(place(page, r, 13), Some(Rect::new(2, 18, 10, 2)));
        assert_eq!(place(page, r, -9), None);
        assert_eq!(place(page, r, 15), None);
    }

    #[test]
    fn hero_rows_map_to_suggestions() {
        let hero = HeroLayout::new(Rect::new(0, 0, 80, 30));
        let s = hero.suggestions;
        assert_eq!(s.height, HeroLayout::SUGGESTION_ROWS);
        assert_eq!(hero.suggestion_at(s.x, s.y + 2), Some(2));
        assert_eq!(hero.suggestion_at(s.x, s.bottom()), None);
        assert_eq!(hero.suggestion_at(0, s.y), None);
    }

    #[test]
    fn stage_fits_small_terminals() {
        let p = ProjectsLayout::new(Rect::new(0, 0, 60, 12));
        assert!(p.stage.bottom() <= 12);
        assert!(p.stage.height > 0);
    }

    #[test]
    fn px_round_trip() {
        assert_eq!(px_to_rows(40.0), 3);
        assert_eq!(px_to_rows(-40.0), -3);
        assert_eq!(rows_to_px(10), 160.0);
    }
}
