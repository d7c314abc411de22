//! Progress → opacity/translate curves for the scroll-driven sections.
//!
//! A [`Curve`] has three regimes: an entrance, a fully visible plateau and
//! an exit that slides the block up while it fades.  Translate values are in
//! px; negative moves content up.

/// How a section comes into view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Entrance {
    /// Fade in and rise into place between two progress marks.
    Fade { start: f64, end: f64 },
    /// Slide down from above while `progress <= 0`; the mirror of the exit
    /// curve for sections reached by scrolling back up.
    Flip { window: f64 },
    /// Fully visible as soon as the exit has not started.
    Immediate,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Curve {
    pub entrance: Entrance,
    pub exit_start: f64,
    pub exit_window: f64,
    pub max_distance: f64,
}

/// Resolved visual state for one block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Visual {
    pub opacity: f64,
    pub translate_y: f64,
}

pub fn clamp01(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}

/// Progress marks shared by every section curve.  Overridable from the
/// config file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveTuning {
    pub exit_start: f64,
    pub exit_window: f64,
    /// Largest translate, in px, of an entrance or exit.
    pub max_translate: f64,
    /// Progress window of the flip entrance above a section.
    pub reverse_window: f64,
    pub fade_start: f64,
    pub fade_end: f64,
    pub reveal_start: f64,
    pub reveal_span: f64,
}

impl CurveTuning {
    pub const EXIT_START: f64 = 1.2;
    pub const EXIT_WINDOW: f64 = 0.25;
    pub const MAX_TRANSLATE: f64 = 40.0;
}

impl Default for CurveTuning {
    fn default() -> Self {
        Self {
            exit_start: Self::EXIT_START,
            exit_window: Self::EXIT_WINDOW,
            max_translate: Self::MAX_TRANSLATE,
            reverse_window: 0.2,
            fade_start: 0.05,
            fade_end: 0.40,
            reveal_start: 0.05,
            reveal_span: 0.9,
        }
    }
}

impl Curve {
    fn with_entrance(entrance: Entrance, tuning: &CurveTuning) -> Self {
        Self {
            entrance,
            exit_start: tuning.exit_start,
            exit_window: tuning.exit_window,
            max_distance: tuning.max_translate,
        }
    }

    /// Image column of the content section.
    pub fn fade_in(tuning: &CurveTuning) -> Self {
        let entrance = Entrance::Fade {
            start: tuning.fade_start,
            end: tuning.fade_end,
        };
        Self::with_entrance(entrance, tuning)
    }

    /// Blocks that only animate on the way out.
    pub fn exit_only(tuning: &CurveTuning) -> Self {
        Self::with_entrance(Entrance::Immediate, tuning)
    }

    /// Name and projects containers, which can be entered from either side.
    pub fn flip(tuning: &CurveTuning) -> Self {
        let entrance = Entrance::Flip {
            window: tuning.reverse_window,
        };
        Self::with_entrance(entrance, tuning)
    }

    fn exit_fraction(&self, progress: f64) -> f64 {
        if self.exit_window <= 0.0 {
            return f64::INFINITY;
        }
        (progress - self.exit_start) / self.exit_window
    }

    pub fn opacity_for(&self, progress: f64) -> f64 {
        if progress > self.exit_start {
            return clamp01(1.0 - self.exit_fraction(progress));
        }
        match self.entrance {
            Entrance::Fade { start, end } if progress < end => {
                if end <= start {
                    return if progress >= start { 1.0 } else { 0.0 };
                }
                clamp01((progress - start) / (end - start))
            }
            Entrance::Flip { window } if progress <= 0.0 => {
                if window <= 0.0 {
                    return 1.0;
                }
                clamp01(1.0 + progress / window)
            }
            _ => 1.0,
        }
    }

    pub fn translate_for(&self, progress: f64) -> f64 {
        if progress > self.exit_start {
            let fraction = self.exit_fraction(progress);
            if !fraction.is_finite() {
                return -self.max_distance;
            }
            return -fraction * self.max_distance;
        }
        match self.entrance {
            Entrance::Fade { end, .. } if progress < end => {
                (1.0 - self.opacity_for(progress)) * self.max_distance
            }
            Entrance::Flip { window } if progress <= 0.0 && window > 0.0 => {
                window.min(-progress) / window * self.max_distance
            }
            _ => 0.0,
        }
    }

    pub fn visual(&self, progress: f64) -> Visual {
        Visual {
            opacity: self.opacity_for(progress),
            translate_y: self.translate_for(progress),
        }
    }
}

// ───────────────────────────────────────── letter reveal ─────

/// Left-to-right reveal of a phrase's letters, ignoring word boundaries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LetterReveal {
    pub start: f64,
    pub span: f64,
    /// Past this the phrase counts as fully revealed, so it never re-hides
    /// while the whole block fades out.
    pub exit_start: f64,
}

impl LetterReveal {
    pub fn new(tuning: &CurveTuning) -> Self {
        Self {
            start: tuning.reveal_start,
            span: tuning.reveal_span,
            exit_start: tuning.exit_start,
        }
    }

    pub fn total_letters(phrase: &str) -> usize {
        phrase.chars().filter(|c| !c.is_whitespace()).count()
    }

    pub fn visible_count(&self, phrase: &str, progress: f64) -> usize {
        let total = Self::total_letters(phrase);
        if progress > self.exit_start {
            return total;
        }
        let t = if self.span > 0.0 {
            clamp01((progress - self.start) / self.span)
        } else if progress >= self.start {
            1.0
        } else {
            0.0
        };
        ((t * total as f64).floor() as usize).min(total)
    }

    /// Split `phrase` into words of `(char, revealed)` pairs.
    pub fn words(&self, phrase: &str, progress: f64) -> Vec<Vec<(char, bool)>> {
        let visible = self.visible_count(phrase, progress);
        let mut index = 0;
        phrase
            .split_whitespace()
            .map(|word| {
                word.chars()
                    .map(|ch| {
                        let shown = index < visible;
                        index += 1;
                        (ch, shown)
                    })
                    .collect()
            })
            .collect()
    }
}

// ───────────────────────────────────────── projects stage ────

/// Fade/move-out constants for the projects column, read from the data
/// feed's `ui` sub-document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageTuning {
    pub base_opacity: f64,
    pub base_translate: f64,
    /// Translate applied while the column plays its boundary exit.
    pub exit_translate: f64,
    pub fade_out_start: f64,
    pub fade_out_window: f64,
    pub move_out_px: f64,
}

impl StageTuning {
    pub fn with_gap(gap: f64) -> Self {
        Self {
            base_opacity: 1.0,
            base_translate: 0.0,
            exit_translate: -(gap * 3.0),
            fade_out_start: CurveTuning::EXIT_START,
            fade_out_window: CurveTuning::EXIT_WINDOW,
            move_out_px: CurveTuning::MAX_TRANSLATE,
        }
    }

    pub fn visual(&self, progress: f64, exiting: bool) -> Visual {
        if exiting {
            return Visual {
                opacity: 0.0,
                translate_y: self.exit_translate,
            };
        }
        if progress <= self.fade_out_start || self.fade_out_window <= 0.0 {
            return Visual {
                opacity: self.base_opacity,
                translate_y: self.base_translate,
            };
        }
        let fraction = (progress - self.fade_out_start) / self.fade_out_window;
        Visual {
            opacity: (self.base_opacity - fraction).max(0.0),
            translate_y: -fraction * self.move_out_px + self.base_translate,
        }
    }
}
