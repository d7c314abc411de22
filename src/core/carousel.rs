//! Carousel positioner: vertical offsets for a fixed set of cards.
//!
//! Two modes, fixed at construction:
//!
//! * **Loop**: each card owns its own offset, wrapped into
//!   `[-total_height, total_height)` after every move.  Optional autoplay
//!   advances all cards by a constant amount per frame.
//! * **Clamped**: one shared `base_offset`; card `i` sits at
//!   `base_offset + i * (item_height + gap)`.  Moves are clamped, and a
//!   gesture pushing against a bound is *not* consumed, so the page can keep
//!   scrolling and react to the [`Boundary`] signal instead.
//!
//! Everything is in px.  Easing of the visible position is the renderer's
//! job; this module only produces targets.

/// Edge of a clamped carousel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    Top,
    Bottom,
}

impl Boundary {
    pub fn as_str(self) -> &'static str {
        match self {
            Boundary::Top => "top",
            Boundary::Bottom => "bottom",
        }
    }
}

/// Where a gesture delta came from.  Wheel deltas are negated so that
/// scrolling down moves the cards up; drag deltas pass through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureSource {
    Wheel,
    Drag,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Autoplay {
    /// Signed px per frame; positive moves cards down.
    pub speed: f64,
    pub pause_on_hover: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CarouselMode {
    Loop { autoplay: Option<Autoplay> },
    Clamped,
}

/// Gesture and external-drive scaling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionTuning {
    pub wheel_multiplier: f64,
    pub drag_multiplier: f64,
    /// px moved per unit of external progress change.
    pub drive_px_per_unit: f64,
    /// Direction of the external drive (`-1` inverts).
    pub drive_factor: f64,
}

impl Default for InteractionTuning {
    fn default() -> Self {
        Self {
            wheel_multiplier: 6.0,
            drag_multiplier: 3.0,
            drive_px_per_unit: 240.0,
            drive_factor: -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarouselLayout {
    pub item_height: f64,
    pub gap: f64,
    pub total_height: f64,
    pub base_offset: f64,
}

impl CarouselLayout {
    /// Distance between the tops of neighbouring cards.
    pub fn step(&self) -> f64 {
        self.item_height + self.gap
    }
}

/// Result of feeding one gesture to the carousel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureOutcome {
    /// Offsets changed by `distance`; the gesture is consumed.
    Moved { distance: f64 },
    /// Nothing moved; the gesture belongs to the page.  `boundary` is set
    /// the first time a bound is pushed in a given direction.
    PassThrough { boundary: Option<Boundary> },
}

impl GestureOutcome {
    pub fn intercepted(&self) -> bool {
        matches!(self, GestureOutcome::Moved { .. })
    }
}

#[derive(Debug, Clone)]
pub struct Carousel {
    mode: CarouselMode,
    layout: CarouselLayout,
    tuning: InteractionTuning,
    /// Per-card offsets (loop mode only).
    offsets: Vec<f64>,
    count: usize,
    viewport_height: f64,
    prev_drive: Option<f64>,
    /// Bound last reported, cleared once the carousel moves again.
    reported: Option<Boundary>,
    hovered: bool,
}

impl Carousel {
    pub fn new(
        count: usize,
        item_height: f64,
        gap: f64,
        mode: CarouselMode,
        tuning: InteractionTuning,
    ) -> Self {
        let total_height = if count == 0 {
            0.0
        } else {
            item_height * count as f64 + gap * (count as f64 - 1.0)
        };
        let layout = CarouselLayout {
            item_height,
            gap,
            total_height,
            base_offset: 0.0,
        };
        let mut carousel = Self {
            mode,
            layout,
            tuning,
            offsets: Vec::new(),
            count,
            viewport_height: 0.0,
            prev_drive: None,
            reported: None,
            hovered: false,
        };
        if matches!(mode, CarouselMode::Loop { .. }) {
            carousel.offsets = (0..count)
                .map(|i| carousel.wrap(i as f64 * layout.step()))
                .collect();
        }
        carousel
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn mode(&self) -> CarouselMode {
        self.mode
    }

    pub fn layout(&self) -> CarouselLayout {
        self.layout
    }

    /// Re-measure the visible window.  Only the clamp's upper bound depends
    /// on it; card offsets are left alone.
    pub fn set_viewport_height(&mut self, height: f64) {
        self.viewport_height = height.max(0.0);
    }

    pub fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
    }

    pub fn upper_bound(&self) -> f64 {
        let half = if self.viewport_height > 0.0 {
            self.viewport_height / 2.0
        } else {
            self.layout.item_height
        };
        half.min(self.layout.item_height)
    }

    pub fn lower_bound(&self) -> f64 {
        -self.layout.total_height + self.layout.item_height
    }

    /// Wrap an offset into `[-total_height, total_height)`.
    pub fn wrap(&self, y: f64) -> f64 {
        let total = self.layout.total_height;
        if total <= 0.0 {
            return y;
        }
        -total + (y + total).rem_euclid(2.0 * total)
    }

    /// Target offset of every card, in card order.
    pub fn positions(&self) -> Vec<f64> {
        match self.mode {
            CarouselMode::Loop { .. } => self.offsets.clone(),
            CarouselMode::Clamped => (0..self.count)
                .map(|i| self.layout.base_offset + i as f64 * self.layout.step())
                .collect(),
        }
    }

    /// Feed a pointer/wheel delta (`delta_y` follows the browser convention:
    /// positive means the wheel scrolled down or the pointer moved down).
    pub fn gesture(&mut self, source: GestureSource, delta_y: f64) -> GestureOutcome {
        if self.is_empty() {
            return GestureOutcome::PassThrough { boundary: None };
        }
        let distance = match source {
            GestureSource::Wheel => -delta_y * self.tuning.wheel_multiplier,
            GestureSource::Drag => delta_y * self.tuning.drag_multiplier,
        };

        match self.mode {
            CarouselMode::Loop { .. } => {
                self.shift_all(distance);
                GestureOutcome::Moved { distance }
            }
            CarouselMode::Clamped => {
                let current = self.layout.base_offset;
                let clamped = self.clamp(current + distance);
                if clamped == current {
                    let boundary = if distance > 0.0 {
                        Some(Boundary::Top)
                    } else if distance < 0.0 {
                        Some(Boundary::Bottom)
                    } else {
                        None
                    };
                    let fresh = boundary.filter(|b| self.reported != Some(*b));
                    if fresh.is_some() {
                        self.reported = fresh;
                    }
                    return GestureOutcome::PassThrough { boundary: fresh };
                }
                self.layout.base_offset = clamped;
                self.reported = None;
                GestureOutcome::Moved {
                    distance: clamped - current,
                }
            }
        }
    }

    /// Follow an external progress value.  The first value only sets the
    /// baseline.  Returns the distance actually applied.
    pub fn drive(&mut self, progress: f64) -> f64 {
        let Some(prev) = self.prev_drive.replace(progress) else {
            return 0.0;
        };
        if self.is_empty() {
            return 0.0;
        }
        let delta = progress - prev;
        if delta == 0.0 {
            return 0.0;
        }
        let distance = delta * self.tuning.drive_px_per_unit * self.tuning.drive_factor;
        match self.mode {
            CarouselMode::Loop { .. } => {
                self.shift_all(distance);
                distance
            }
            CarouselMode::Clamped => {
                let current = self.layout.base_offset;
                let clamped = self.clamp(current + distance);
                if clamped != current {
                    self.layout.base_offset = clamped;
                    self.reported = None;
                }
                clamped - current
            }
        }
    }

    /// Advance one animation frame.  Only loop mode with autoplay moves.
    pub fn tick(&mut self) -> f64 {
        let CarouselMode::Loop {
            autoplay: Some(autoplay),
        } = self.mode
        else {
            return 0.0;
        };
        if self.is_empty() || (autoplay.pause_on_hover && self.hovered) {
            return 0.0;
        }
        self.shift_all(autoplay.speed);
        autoplay.speed
    }

    fn clamp(&self, value: f64) -> f64 {
        value.max(self.lower_bound()).min(self.upper_bound())
    }

    fn shift_all(&mut self, distance: f64) {
        let shifted: Vec<f64> = self.offsets.iter().map(|y| self.wrap(y + distance)).collect();
        self.offsets = shifted;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clamped(count: usize) -> Carousel {
        let mut c = Carousel::new(
            count,
            180.0,
            45.0,
            CarouselMode::Clamped,
            InteractionTuning {
                wheel_multiplier: 1.0,
                drag_multiplier: 1.0,
                ..InteractionTuning::default()
            },
        );
        c.set_viewport_height(800.0);
        c
    }

    #[test]
    fn clamped_push_past_top_then_signal() {
        let mut c = clamped(5);
        assert_eq!(c.upper_bound(), 180.0);

        let first = c.gesture(GestureSource::Drag, 500.0);
        assert_eq!(first, GestureOutcome::Moved { distance: 180.0 });
        assert_eq!(c.layout().base_offset, 180.0);

        let second = c.gesture(GestureSource::Drag, 500.0);
        assert_eq!(
            second,
            GestureOutcome::PassThrough {
                boundary: Some(Boundary::Top)
            }
        );
        assert!(!second.intercepted());
        assert_eq!(c.layout().base_offset, 180.0);

        // Same direction again: still passes through, no repeat signal.
        let third = c.gesture(GestureSource::Drag, 10.0);
        assert_eq!(third, GestureOutcome::PassThrough { boundary: None });
    }

    #[test]
    fn clamped_bottom_signal_after_reaching_lower_bound() {
        let mut c = clamped(5);
        let lower = c.lower_bound();
        assert_eq!(lower, -(180.0 * 5.0 + 45.0 * 4.0) + 180.0);

        // Wheel scrolled down → negative distance.
        assert!(c.gesture(GestureSource::Wheel, 5000.0).intercepted());
        assert_eq!(c.layout().base_offset, lower);
        assert_eq!(
            c.gesture(GestureSource::Wheel, 1.0),
            GestureOutcome::PassThrough {
                boundary: Some(Boundary::Bottom)
            }
        );

        // Moving away re-arms the signal.
        assert!(c.gesture(GestureSource::Wheel, -1.0).intercepted());
        assert!(c.gesture(GestureSource::Wheel, 100.0).intercepted());
        assert_eq!(
            c.gesture(GestureSource::Wheel, 1.0),
            GestureOutcome::PassThrough {
                boundary: Some(Boundary::Bottom)
            }
        );
    }

    #[test]
    fn clamped_offset_never_leaves_bounds() {
        let mut c = clamped(4);
        let deltas = [300.0, -50.0, -900.0, -2000.0, 1.5, 77.0, 640.0, -13.0, 9999.0, -9999.0];
        for d in deltas.iter().cycle().take(200) {
            c.gesture(GestureSource::Drag, *d);
            let base = c.layout().base_offset;
            assert!(base <= c.upper_bound() && base >= c.lower_bound(), "base={base}");
        }
    }

    #[test]
    fn clamped_positions_follow_base_offset() {
        let mut c = clamped(3);
        c.gesture(GestureSource::Drag, -100.0);
        assert_eq!(c.positions(), vec![-100.0, 125.0, 350.0]);
    }

    #[test]
    fn upper_bound_uses_half_viewport_when_smaller() {
        let mut c = clamped(5);
        c.set_viewport_height(200.0);
        assert_eq!(c.upper_bound(), 100.0);
        c.set_viewport_height(0.0);
        assert_eq!(c.upper_bound(), 180.0);
    }

    #[test]
    fn wrap_is_idempotent() {
        let c = Carousel::new(
            5,
            180.0,
            45.0,
            CarouselMode::Loop { autoplay: None },
            InteractionTuning::default(),
        );
        let total = c.layout().total_height;
        for x in [-5000.0, -total, -1.0, 0.0, 10.5, total - 0.5, total, 3.0 * total + 7.0] {
            let once = c.wrap(x);
            assert!(once >= -total && once < total, "x={x} wrapped={once}");
            assert_eq!(c.wrap(once), once);
        }
    }

    #[test]
    fn loop_gestures_always_move_and_stay_wrapped() {
        let mut c = Carousel::new(
            3,
            100.0,
            0.0,
            CarouselMode::Loop { autoplay: None },
            InteractionTuning::default(),
        );
        let total = c.layout().total_height;
        for _ in 0..50 {
            assert!(c.gesture(GestureSource::Wheel, -37.0).intercepted());
        }
        for y in c.positions() {
            assert!(y >= -total && y < total);
        }
    }

    #[test]
    fn autoplay_pauses_on_hover() {
        let mut c = Carousel::new(
            2,
            100.0,
            0.0,
            CarouselMode::Loop {
                autoplay: Some(Autoplay {
                    speed: 0.5,
                    pause_on_hover: true,
                }),
            },
            InteractionTuning::default(),
        );
        let before = c.positions();
        assert_eq!(c.tick(), 0.5);
        assert_eq!(c.positions()[0], before[0] + 0.5);

        c.set_hovered(true);
        let held = c.positions();
        assert_eq!(c.tick(), 0.0);
        assert_eq!(c.positions(), held);
    }

    #[test]
    fn clamped_mode_never_autoplays() {
        let mut c = clamped(3);
        assert_eq!(c.tick(), 0.0);
    }

    #[test]
    fn drive_first_value_only_sets_baseline() {
        let mut c = clamped(5);
        assert_eq!(c.drive(0.25), 0.0);
        assert_eq!(c.layout().base_offset, 0.0);

        // +0.25 progress → 0.25 * 240 * -1 = -60 px.
        assert_eq!(c.drive(0.5), -60.0);
        assert_eq!(c.layout().base_offset, -60.0);

        // Large reverse push clamps at the upper bound.
        c.drive(-10.0);
        assert_eq!(c.layout().base_offset, c.upper_bound());
    }

    #[test]
    fn empty_carousel_ignores_input() {
        let mut c = clamped(0);
        assert!(c.is_empty());
        assert!(c.positions().is_empty());
        assert_eq!(
            c.gesture(GestureSource::Wheel, 3.0),
            GestureOutcome::PassThrough { boundary: None }
        );
        assert_eq!(c.drive(1.0), 0.0);
        assert_eq!(c.drive(2.0), 0.0);
    }
}
