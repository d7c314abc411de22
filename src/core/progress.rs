//! Scroll position → per-section progress and pin flags.
//!
//! Everything here is a pure function of the current [`ScrollState`] and the
//! static section anchors, so it can run on every frame without carrying
//! state from one call to the next.  Values are *not* clamped: `raw` goes
//! negative above a section and past `1.0` below it.  Consumers decide.

/// Sections whose visual state is driven by scroll progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionId {
    /// Image card + letter-revealed phrase.
    Content,
    /// Greeting and name.
    Name,
    /// Projects carousel.
    Projects,
}

/// Raw page scroll input, in px.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollState {
    pub offset: f64,
    pub viewport_height: f64,
}

/// Progress of one section.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SectionProgress {
    pub raw: f64,
    /// `max(0, raw)`.
    pub extended: f64,
    pub sticky: bool,
}

impl SectionProgress {
    fn new(raw: f64, sticky: bool) -> Self {
        Self {
            raw,
            extended: raw.max(0.0),
            sticky,
        }
    }
}

/// Tunable constants of the progress mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressTuning {
    /// Span of the content section in viewport heights (`K`).
    pub content_span: f64,
    /// Progress past full reveal at which a pinned section releases.
    pub release_threshold: f64,
    /// Span of the following sections in viewport heights.
    pub follow_span: f64,
    /// How far (in viewport heights) before its top a following section
    /// starts counting progress.
    pub follow_lead: f64,
    /// Following sections pin once `raw` exceeds this.
    pub pin_lead: f64,
}

impl Default for ProgressTuning {
    fn default() -> Self {
        Self {
            content_span: 1.5,
            release_threshold: 1.35,
            follow_span: 0.9,
            follow_lead: 0.2,
            pin_lead: -0.15,
        }
    }
}

/// Page offsets (px from the page top) of the sections after the content
/// section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionAnchors {
    pub name_top: f64,
    pub projects_top: f64,
}

/// One progress snapshot for the whole page.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PageProgress {
    pub content: SectionProgress,
    pub name: SectionProgress,
    pub projects: SectionProgress,
}

impl PageProgress {
    pub fn get(&self, id: SectionId) -> SectionProgress {
        match id {
            SectionId::Content => self.content,
            SectionId::Name => self.name,
            SectionId::Projects => self.projects,
        }
    }
}

/// Map the current scroll position onto every tracked section.
pub fn compute(scroll: ScrollState, anchors: &SectionAnchors, tuning: &ProgressTuning) -> PageProgress {
    PageProgress {
        content: content_progress(scroll, tuning),
        name: follow_progress(scroll, anchors.name_top, tuning),
        projects: follow_progress(scroll, anchors.projects_top, tuning),
    }
}

fn content_progress(scroll: ScrollState, tuning: &ProgressTuning) -> SectionProgress {
    let vh = scroll.viewport_height;
    if vh <= 0.0 {
        return SectionProgress::default();
    }
    let raw = (scroll.offset - vh) / (vh * tuning.content_span);
    let past_first_screen = scroll.offset > vh * 0.5;
    SectionProgress::new(raw, past_first_screen && raw < tuning.release_threshold)
}

fn follow_progress(scroll: ScrollState, section_top: f64, tuning: &ProgressTuning) -> SectionProgress {
    let vh = scroll.viewport_height;
    if vh <= 0.0 {
        return SectionProgress::default();
    }
    let raw = (scroll.offset - (section_top - vh * tuning.follow_lead)) / (vh * tuning.follow_span);
    let near = scroll.offset > section_top - vh * 0.6;
    let sticky = near && raw < tuning.release_threshold && raw > tuning.pin_lead;
    SectionProgress::new(raw, sticky)
}

// ───────────────────────────────────────── page geometry ─────

/// Vertical extent of every section on the virtual page, derived from the
/// viewport height so that each pinned section releases exactly when its
/// box reaches the bottom of its section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub viewport_height: f64,
    pub content_top: f64,
    pub content_height: f64,
    pub name_top: f64,
    pub name_height: f64,
    pub projects_top: f64,
    pub projects_height: f64,
}

impl PageGeometry {
    pub fn new(viewport_height: f64, tuning: &ProgressTuning) -> Self {
        let vh = viewport_height.max(0.0);
        let content_top = vh;
        let content_height = vh * (1.0 + tuning.content_span * tuning.release_threshold);
        let follow_height =
            vh * (1.0 - tuning.follow_lead + tuning.follow_span * tuning.release_threshold).max(1.0);
        let name_top = content_top + content_height;
        let projects_top = name_top + follow_height;
        Self {
            viewport_height: vh,
            content_top,
            content_height,
            name_top,
            name_height: follow_height,
            projects_top,
            projects_height: follow_height,
        }
    }

    pub fn anchors(&self) -> SectionAnchors {
        SectionAnchors {
            name_top: self.name_top,
            projects_top: self.projects_top,
        }
    }

    /// `(top, height)` of a tracked section.
    pub fn extent(&self, id: SectionId) -> (f64, f64) {
        match id {
            SectionId::Content => (self.content_top, self.content_height),
            SectionId::Name => (self.name_top, self.name_height),
            SectionId::Projects => (self.projects_top, self.projects_height),
        }
    }

    pub fn page_height(&self) -> f64 {
        self.projects_top + self.projects_height
    }

    pub fn max_scroll(&self) -> f64 {
        (self.page_height() - self.viewport_height).max(0.0)
    }

    /// Where a section's viewport-sized box sits relative to the viewport
    /// top (px), following CSS sticky semantics: pinned at `0` while
    /// `sticky`, otherwise resting at the top or bottom of its section.
    pub fn box_offset(&self, id: SectionId, scroll_offset: f64, sticky: bool) -> f64 {
        if sticky {
            return 0.0;
        }
        let (top, height) = self.extent(id);
        let last_pinned = top + height - self.viewport_height;
        if scroll_offset < top {
            top - scroll_offset
        } else if scroll_offset > last_pinned {
            last_pinned - scroll_offset
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VH: f64 = 800.0;

    fn anchors() -> SectionAnchors {
        SectionAnchors {
            name_top: 4000.0,
            projects_top: 6000.0,
        }
    }

    #[test]
    fn content_starts_pinned_at_one_viewport() {
        let p = compute(
            ScrollState { offset: VH, viewport_height: VH },
            &anchors(),
            &ProgressTuning::default(),
        );
        assert_eq!(p.content.raw, 0.0);
        assert_eq!(p.content.extended, 0.0);
        assert!(p.content.sticky);
    }

    #[test]
    fn content_progress_is_unclamped() {
        let tuning = ProgressTuning::default();
        let above = compute(ScrollState { offset: 0.0, viewport_height: VH }, &anchors(), &tuning);
        assert!(above.content.raw < 0.0);
        assert_eq!(above.content.extended, 0.0);
        assert!(!above.content.sticky);

        let past = compute(
            ScrollState { offset: VH + VH * 1.5 * 2.0, viewport_height: VH },
            &anchors(),
            &tuning,
        );
        assert!((past.content.raw - 2.0).abs() < 1e-9);
        assert!((past.content.extended - 2.0).abs() < 1e-9);
        assert!(!past.content.sticky, "released past the threshold");
    }

    #[test]
    fn content_stays_pinned_through_release_leeway() {
        let tuning = ProgressTuning::default();
        let at = |raw: f64| {
            compute(
                ScrollState { offset: VH + raw * VH * tuning.content_span, viewport_height: VH },
                &anchors(),
                &tuning,
            )
            .content
        };
        assert!(at(1.0).sticky);
        assert!(at(1.3).sticky);
        assert!(!at(1.36).sticky);
    }

    #[test]
    fn following_section_pins_slightly_before_entering() {
        let tuning = ProgressTuning::default();
        let a = anchors();
        let lead_in = a.name_top - VH * tuning.follow_lead;
        let at = |offset: f64| {
            compute(ScrollState { offset, viewport_height: VH }, &a, &tuning).name
        };

        let exact = at(lead_in);
        assert_eq!(exact.raw, 0.0);
        assert!(exact.sticky);

        // raw = -0.1: still pinned (flip-in window).
        let early = at(lead_in - 0.1 * VH * tuning.follow_span);
        assert!((early.raw + 0.1).abs() < 1e-9);
        assert!(early.sticky);
        assert_eq!(early.extended, 0.0);

        // raw = -0.2: not yet pinned.
        let too_early = at(lead_in - 0.2 * VH * tuning.follow_span);
        assert!(!too_early.sticky);
    }

    #[test]
    fn zero_viewport_yields_neutral_progress() {
        let p = compute(
            ScrollState { offset: 500.0, viewport_height: 0.0 },
            &anchors(),
            &ProgressTuning::default(),
        );
        assert_eq!(p, PageProgress::default());
    }

    #[test]
    fn geometry_releases_when_box_reaches_section_bottom() {
        let tuning = ProgressTuning::default();
        let geo = PageGeometry::new(VH, &tuning);
        let (top, height) = geo.extent(SectionId::Content);
        let release_offset = top + height - VH;
        let p = compute(
            ScrollState { offset: release_offset, viewport_height: VH },
            &geo.anchors(),
            &tuning,
        );
        assert!((p.content.raw - tuning.release_threshold).abs() < 1e-9);

        let p = compute(
            ScrollState { offset: geo.name_top + geo.name_height - VH, viewport_height: VH },
            &geo.anchors(),
            &tuning,
        );
        assert!((p.name.raw - tuning.release_threshold).abs() < 1e-9);
    }

    #[test]
    fn box_offset_follows_sticky_semantics() {
        let geo = PageGeometry::new(VH, &ProgressTuning::default());
        assert_eq!(geo.box_offset(SectionId::Name, 0.0, false), geo.name_top);
        assert_eq!(geo.box_offset(SectionId::Name, 123.0, true), 0.0);
        let past = geo.name_top + geo.name_height;
        assert_eq!(geo.box_offset(SectionId::Name, past, false), -VH);
    }
}
