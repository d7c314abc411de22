//! Eased carousel motion with exponential ease-out.
//!
//! When the carousel's target offset jumps, the opposite displacement is
//! injected so the cards stay where they were drawn.  Each tick the
//! displacement decays toward zero and the cards slide into place over a
//! few frames.

/// Displacement animator, in px.
#[derive(Debug, Clone)]
pub struct SmoothScroll {
    /// Distance between where the cards are drawn and their target.
    displacement: f64,
    /// Damping: `displacement *= (1 - speed)` each tick.
    speed: f64,
}

impl SmoothScroll {
    pub fn new(speed: f64) -> Self {
        Self {
            displacement: 0.0,
            speed: speed.clamp(0.05, 0.95),
        }
    }

    /// The target moved by `distance`; keep the drawn position and ease.
    pub fn shift(&mut self, distance: f64) {
        self.displacement -= distance;
    }

    /// Decay the displacement toward zero.  Call once per frame.
    pub fn tick(&mut self) {
        self.displacement *= 1.0 - self.speed;
        // Below a quarter row nothing visibly moves.
        if self.displacement.abs() < 4.0 {
            self.displacement = 0.0;
        }
    }

    pub fn displacement(&self) -> f64 {
        self.displacement
    }
}
