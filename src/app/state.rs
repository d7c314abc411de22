//! Central application state.
//!
//! All mutable state lives here.  Input handlers only queue deltas in
//! [`PendingInput`]; [`AppState::advance_frame`] applies them once per
//! rendered frame and stores a [`FrameSnapshot`] that rendering and hit
//! testing read from.

use std::time::{Duration, Instant};

use ratatui::layout::Rect;

use crate::app::search::{RankJob, SearchSession};
use crate::config::AppConfig;
use crate::core::{
    animate::StageTuning,
    carousel::{Autoplay, Boundary, Carousel, CarouselMode, GestureOutcome, GestureSource},
    catalog::{Catalog, Profile, Project},
    progress::{self, PageGeometry, PageProgress, ScrollState, SectionId},
};
use crate::ui::layout::{self, px_to_rows, rows_to_px, HeroLayout, ProjectsLayout, ROW_PX};
use crate::ui::smooth_scroll::SmoothScroll;

/// How long the projects column stays hidden after a carousel boundary.
pub const EXIT_HOLD: Duration = Duration::from_millis(800);

/// Carousel input of one wheel notch, in px.
pub const WHEEL_NOTCH_PX: f64 = ROW_PX;

/// Input collected between two frames.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingInput {
    /// Page scroll delta in px.
    pub scroll_px: f64,
    /// Absolute page offset requested by a jump key.
    pub jump_to: Option<f64>,
    /// Wheel notches that reach the carousel first (positive = down).
    pub wheel_notches: i32,
    /// Notches from carousel keys; these never scroll the page.
    pub carousel_notches: i32,
    /// Pointer drag over the stage, in px (positive = down).
    pub drag_px: f64,
}

/// Row offset of every section box relative to the page top.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoxTops {
    pub hero: i32,
    pub content: i32,
    pub name: i32,
    pub projects: i32,
}

/// State of one rendered frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameSnapshot {
    pub scroll: f64,
    pub progress: PageProgress,
    pub tops: BoxTops,
}

/// Top-level application state.
pub struct AppState {
    pub config: AppConfig,
    pub profile: Profile,
    pub projects: Vec<Project>,
    pub stage: StageTuning,
    pub search: SearchSession,
    pub carousel: Carousel,
    pub carousel_ease: SmoothScroll,
    pub geometry: PageGeometry,
    /// Screen area the page is drawn into.
    pub page_area: Rect,
    /// Page offset in px.
    pub scroll: f64,
    pub pending: PendingInput,
    pub snapshot: FrameSnapshot,
    /// Last pointer position (column, row).
    pub pointer: Option<(u16, u16)>,
    /// Row of the last drag event while dragging the stage.
    pub drag_row: Option<u16>,
    /// Set while the projects column plays its boundary exit.
    pub exiting_until: Option<Instant>,
    /// Whether a remote re-ranker is configured.
    pub remote_ranking: bool,
    /// Remote ranking the main loop should start.
    pub pending_rank_job: Option<RankJob>,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// Frame counter (drives the spinner and the backdrop).
    pub tick: u64,
}

impl AppState {
    pub fn new(config: AppConfig, catalog: Catalog, remote_ranking: bool) -> Self {
        let mode = if config.loop_carousel {
            let autoplay = (config.autoplay_speed != 0.0).then_some(Autoplay {
                speed: config.autoplay_speed,
                pause_on_hover: true,
            });
            CarouselMode::Loop { autoplay }
        } else {
            CarouselMode::Clamped
        };
        let carousel = Carousel::new(
            catalog.projects.len(),
            catalog.cards.item_height,
            catalog.cards.gap,
            mode,
            config.interaction,
        );
        let search = SearchSession::new(
            catalog.candidates(),
            Duration::from_millis(config.debounce_ms),
        );
        let geometry = PageGeometry::new(0.0, &config.progress);

        Self {
            config,
            profile: catalog.profile,
            projects: catalog.projects,
            stage: catalog.stage,
            search,
            carousel,
            carousel_ease: SmoothScroll::new(0.2),
            geometry,
            page_area: Rect::default(),
            scroll: 0.0,
            pending: PendingInput::default(),
            snapshot: FrameSnapshot::default(),
            pointer: None,
            drag_row: None,
            exiting_until: None,
            remote_ranking,
            pending_rank_job: None,
            status_message: None,
            should_quit: false,
            tick: 0,
        }
    }

    pub fn viewport_height(&self) -> f64 {
        self.geometry.viewport_height
    }

    /// Re-measure after a resize.  Card offsets are left alone; only the
    /// carousel's cached stage height changes.
    pub fn set_page_area(&mut self, area: Rect) {
        if area == self.page_area {
            return;
        }
        self.page_area = area;
        self.geometry = PageGeometry::new(rows_to_px(area.height), &self.config.progress);
        self.scroll = self.scroll.clamp(0.0, self.geometry.max_scroll());
        let stage = ProjectsLayout::new(layout::local(area)).stage;
        self.carousel.set_viewport_height(rows_to_px(stage.height));
    }

    pub fn is_exiting(&self, now: Instant) -> bool {
        self.exiting_until.is_some_and(|until| now < until)
    }

    /// Apply everything queued since the last frame.  Called once per
    /// rendered frame.
    pub fn advance_frame(&mut self, now: Instant) {
        let pending = std::mem::take(&mut self.pending);
        let mut page_delta = pending.scroll_px;

        if pending.wheel_notches != 0 {
            let delta = f64::from(pending.wheel_notches) * WHEEL_NOTCH_PX;
            if !self.carousel_gesture(GestureSource::Wheel, delta, now) {
                page_delta += f64::from(pending.wheel_notches) * self.config.scroll_step_px;
            }
        }
        if pending.carousel_notches != 0 {
            let delta = f64::from(pending.carousel_notches) * WHEEL_NOTCH_PX;
            self.carousel_gesture(GestureSource::Wheel, delta, now);
        }
        if pending.drag_px != 0.0 {
            self.carousel_gesture(GestureSource::Drag, pending.drag_px, now);
        }

        let target = pending.jump_to.unwrap_or(self.scroll) + page_delta;
        self.scroll = target.clamp(0.0, self.geometry.max_scroll());

        let progress = progress::compute(
            ScrollState {
                offset: self.scroll,
                viewport_height: self.viewport_height(),
            },
            &self.geometry.anchors(),
            &self.config.progress,
        );

        if self.config.drive_carousel {
            let moved = self.carousel.drive(progress.projects.raw);
            if moved != 0.0 {
                self.carousel_ease.shift(moved);
            }
        }
        let hovered = self.stage_on_screen().is_some_and(|stage| self.pointer_in(stage));
        self.carousel.set_hovered(hovered);
        self.carousel.tick();
        self.carousel_ease.tick();

        if self.exiting_until.is_some_and(|until| now >= until) {
            self.exiting_until = None;
        }

        if self.search.due(now) {
            if let Some(job) = self.search.evaluate(self.remote_ranking) {
                tracing::debug!(generation = job.generation, "remote ranking requested");
                self.pending_rank_job = Some(job);
            }
        }

        self.snapshot = FrameSnapshot {
            scroll: self.scroll,
            progress,
            tops: self.box_tops(&progress),
        };
        self.tick = self.tick.wrapping_add(1);
    }

    /// Returns `true` when the carousel consumed the gesture.
    fn carousel_gesture(&mut self, source: GestureSource, delta: f64, now: Instant) -> bool {
        match self.carousel.gesture(source, delta) {
            GestureOutcome::Moved { distance } => {
                self.carousel_ease.shift(distance);
                true
            }
            GestureOutcome::PassThrough { boundary } => {
                if let Some(boundary) = boundary {
                    self.start_exit(boundary, now);
                }
                false
            }
        }
    }

    fn start_exit(&mut self, boundary: Boundary, now: Instant) {
        tracing::info!("reached {} boundary, playing exit", boundary.as_str());
        self.exiting_until = Some(now + EXIT_HOLD);
    }

    fn box_tops(&self, progress: &PageProgress) -> BoxTops {
        let top = |id: SectionId| {
            let sticky = progress.get(id).sticky;
            px_to_rows(self.geometry.box_offset(id, self.scroll, sticky))
        };
        BoxTops {
            hero: px_to_rows(-self.scroll),
            content: top(SectionId::Content),
            name: top(SectionId::Name),
            projects: top(SectionId::Projects),
        }
    }

    // ── hit testing (against the last frame) ────────────────────

    fn pointer_in(&self, rect: Rect) -> bool {
        self.pointer.is_some_and(|(col, row)| {
            col >= rect.x && col < rect.right() && row >= rect.y && row < rect.bottom()
        })
    }

    pub fn hero_layout(&self) -> HeroLayout {
        HeroLayout::new(layout::local(self.page_area))
    }

    /// Screen rect of the carousel stage, if visible.
    pub fn stage_on_screen(&self) -> Option<Rect> {
        let stage = ProjectsLayout::new(layout::local(self.page_area)).stage;
        layout::place(self.page_area, stage, self.snapshot.tops.projects)
    }

    /// Whether the pointer is over the visible stage.
    pub fn pointer_over_stage(&self) -> bool {
        self.stage_on_screen().is_some_and(|stage| self.pointer_in(stage))
    }

    /// Whether wheel input should reach the carousel first.  A clamped
    /// carousel listens on its whole pinned section; a looping one only
    /// under the pointer, since it never lets the page scroll on.
    pub fn wheel_targets_carousel(&self) -> bool {
        if self.carousel.is_empty() || !self.snapshot.progress.projects.sticky {
            return false;
        }
        match self.carousel.mode() {
            CarouselMode::Clamped => true,
            CarouselMode::Loop { .. } => self.pointer_over_stage(),
        }
    }

    /// Map a screen position onto the hero's box-local coordinates.
    pub fn hero_local(&self, col: u16, row: u16) -> Option<(u16, u16)> {
        let page = self.page_area;
        let local_row = i32::from(row) - i32::from(page.y) - self.snapshot.tops.hero;
        if col < page.x || local_row < 0 || local_row >= i32::from(page.height) {
            return None;
        }
        Some((col - page.x, local_row as u16))
    }
}
