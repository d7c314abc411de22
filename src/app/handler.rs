//! Input handling: maps key/mouse events to state mutations.
//!
//! Nothing here moves the page or the carousel directly; movement is queued
//! in `state.pending` and applied by the next frame.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::config::Action;
use crate::ui::layout::rows_to_px;

use super::state::AppState;

/// Process a key event.
pub fn handle_key(state: &mut AppState, key: KeyEvent, now: Instant) {
    // Ctrl+c always quits, even while typing.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    if state.search.is_focused() {
        handle_search_key(state, key, now);
        return;
    }

    let Some(action) = state.config.match_key(key) else {
        return;
    };
    let step = state.config.scroll_step_px;
    let page = state.viewport_height() * 0.9;
    match action {
        Action::ScrollUp => state.pending.scroll_px -= step,
        Action::ScrollDown => state.pending.scroll_px += step,
        Action::PageUp => state.pending.scroll_px -= page,
        Action::PageDown => state.pending.scroll_px += page,
        Action::JumpTop => jump(state, 0.0),
        Action::JumpBottom => jump(state, state.geometry.max_scroll()),
        Action::FocusSearch => {
            jump(state, 0.0);
            state.search.focus();
        }
        Action::CarouselUp => state.pending.carousel_notches -= 1,
        Action::CarouselDown => state.pending.carousel_notches += 1,
        Action::Quit => state.should_quit = true,
    }
}

fn jump(state: &mut AppState, offset: f64) {
    state.pending.jump_to = Some(offset);
    state.pending.scroll_px = 0.0;
    state.pending.wheel_notches = 0;
}

// ── Search input (fixed keys) ───────────────────────────────────

fn handle_search_key(state: &mut AppState, key: KeyEvent, now: Instant) {
    if key.code == KeyCode::Enter {
        commit(state, None);
        return;
    }
    let search = &mut state.search;
    match key.code {
        KeyCode::Esc => search.dismiss(),
        KeyCode::Down | KeyCode::Tab => search.highlight_next(),
        KeyCode::Up | KeyCode::BackTab => search.highlight_prev(),
        KeyCode::Backspace => search.backspace(now),
        KeyCode::Char(c)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            search.input_char(c, now);
        }
        _ => {}
    }
}

/// Commit the highlighted suggestion, or the one at `row`.
fn commit(state: &mut AppState, row: Option<usize>) {
    let chosen = match row {
        Some(row) => state.search.commit_visible(row),
        None => state.search.commit(),
    };
    if let Some(candidate) = chosen {
        state.status_message = Some(format!("{} → {} (opens on exit)", candidate.name, candidate.url));
    }
}

// ── Mouse ───────────────────────────────────────────────────────

pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    state.pointer = Some((mouse.column, mouse.row));

    match mouse.kind {
        MouseEventKind::ScrollDown => scroll_wheel(state, 1),
        MouseEventKind::ScrollUp => scroll_wheel(state, -1),
        MouseEventKind::Down(MouseButton::Left) => {
            state.drag_row = None;
            if let Some((col, row)) = state.hero_local(mouse.column, mouse.row) {
                let hero = state.hero_layout();
                if state.search.is_open() {
                    if let Some(idx) = hero.suggestion_at(col, row) {
                        commit(state, Some(idx));
                        return;
                    }
                }
                let input = hero.input;
                if col >= input.x && col < input.right() && row >= input.y && row < input.bottom() {
                    state.search.focus();
                    return;
                }
            }
            if state.search.is_focused() {
                state.search.dismiss();
            }
            if state.pointer_over_stage() {
                state.drag_row = Some(mouse.row);
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            if let Some(prev) = state.drag_row {
                let rows = i32::from(mouse.row) - i32::from(prev);
                state.pending.drag_px += f64::from(rows) * rows_to_px(1);
                state.drag_row = Some(mouse.row);
            }
        }
        MouseEventKind::Up(MouseButton::Left) => state.drag_row = None,
        _ => {}
    }
}

fn scroll_wheel(state: &mut AppState, notches: i32) {
    if state.wheel_targets_carousel() {
        state.pending.wheel_notches += notches;
    } else {
        state.pending.scroll_px += f64::from(notches) * state.config.scroll_step_px;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use ratatui::layout::Rect;

    use super::*;
    use crate::config::AppConfig;
    use crate::core::catalog::Catalog;

    fn state() -> AppState {
        let mut s = AppState::new(AppConfig::default(), Catalog::load(None), false);
        s.set_page_area(Rect::new(0, 0, 100, 40));
        s.advance_frame(Instant::now());
        s
    }

    fn press(s: &mut AppState, code: KeyCode) {
        handle_key(s, KeyEvent::new(code, KeyModifiers::NONE), Instant::now());
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn ctrl_c_quits_while_typing() {
        let mut s = state();
        s.search.focus();
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        handle_key(&mut s, key, Instant::now());
        assert!(s.should_quit);
    }

    #[test]
    fn focused_search_swallows_page_keys() {
        let mut s = state();
        press(&mut s, KeyCode::Char('/'));
        assert!(s.search.is_focused());
        press(&mut s, KeyCode::Char('q'));
        press(&mut s, KeyCode::Char('j'));
        assert!(!s.should_quit);
        assert_eq!(s.search.query(), "qj");
        assert_eq!(s.pending.scroll_px, 0.0);
    }

    #[test]
    fn type_wait_and_commit_with_enter() {
        let mut s = state();
        press(&mut s, KeyCode::Char('/'));
        let t0 = Instant::now();
        for c in "git".chars() {
            handle_key(&mut s, KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE), t0);
        }
        s.advance_frame(t0 + Duration::from_millis(400));
        press(&mut s, KeyCode::Enter);
        assert_eq!(s.search.selected().map(|c| c.id.as_str()), Some("github"));
        assert_eq!(s.search.committed_url(), Some("https://github.com/stvlynn"));
        assert!(s.status_message.is_some());
    }

    #[test]
    fn escape_blurs_search() {
        let mut s = state();
        press(&mut s, KeyCode::Char('/'));
        press(&mut s, KeyCode::Esc);
        assert!(!s.search.is_focused());
        press(&mut s, KeyCode::Char('q'));
        assert!(s.should_quit);
    }

    #[test]
    fn page_keys_queue_scroll() {
        let mut s = state();
        press(&mut s, KeyCode::Char('j'));
        press(&mut s, KeyCode::Char('j'));
        assert_eq!(s.pending.scroll_px, 2.0 * s.config.scroll_step_px);
        press(&mut s, KeyCode::End);
        assert_eq!(s.pending.jump_to, Some(s.geometry.max_scroll()));
        assert_eq!(s.pending.scroll_px, 0.0);
    }

    #[test]
    fn wheel_on_hero_scrolls_page() {
        let mut s = state();
        handle_mouse(&mut s, mouse(MouseEventKind::ScrollDown, 10, 10));
        handle_mouse(&mut s, mouse(MouseEventKind::ScrollDown, 10, 10));
        assert_eq!(s.pending.wheel_notches, 0);
        s.advance_frame(Instant::now());
        assert_eq!(s.scroll, 2.0 * s.config.scroll_step_px);
    }

    #[test]
    fn wheel_on_pinned_projects_reaches_carousel() {
        let mut s = state();
        s.pending.jump_to = Some(s.geometry.projects_top);
        s.advance_frame(Instant::now());
        handle_mouse(&mut s, mouse(MouseEventKind::ScrollDown, 10, 10));
        assert_eq!(s.pending.wheel_notches, 1);
        assert_eq!(s.pending.scroll_px, 0.0);
    }

    #[test]
    fn drag_over_stage_accumulates() {
        let mut s = state();
        s.pending.jump_to = Some(s.geometry.projects_top);
        s.advance_frame(Instant::now());
        let stage = s.stage_on_screen().unwrap();
        let (col, row) = (stage.x + 2, stage.y + 5);
        handle_mouse(&mut s, mouse(MouseEventKind::Down(MouseButton::Left), col, row));
        handle_mouse(&mut s, mouse(MouseEventKind::Drag(MouseButton::Left), col, row + 2));
        handle_mouse(&mut s, mouse(MouseEventKind::Drag(MouseButton::Left), col, row + 3));
        assert_eq!(s.pending.drag_px, 3.0 * rows_to_px(1));
        handle_mouse(&mut s, mouse(MouseEventKind::Up(MouseButton::Left), col, row + 3));
        assert!(s.drag_row.is_none());
    }

    #[test]
    fn clicking_a_suggestion_commits_it() {
        let mut s = state();
        press(&mut s, KeyCode::Char('/'));
        s.advance_frame(Instant::now());
        let rows = s.hero_layout().suggestions;
        handle_mouse(
            &mut s,
            mouse(MouseEventKind::Down(MouseButton::Left), rows.x + 1, rows.y + 1),
        );
        let second = s.search.candidates()[1].id.clone();
        assert_eq!(s.search.selected().map(|c| c.id.clone()), Some(second));
        assert!(!s.search.is_open());
    }

    #[test]
    fn clicking_elsewhere_blurs() {
        let mut s = state();
        press(&mut s, KeyCode::Char('/'));
        handle_mouse(&mut s, mouse(MouseEventKind::Down(MouseButton::Left), 0, 0));
        assert!(!s.search.is_focused());
    }
}
