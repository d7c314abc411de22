//! Animated ordered-dither background.
//!
//! A slow two-axis wave field quantised to four colour levels with a 4×4
//! Bayer matrix, brightened around the pointer.  Only cell backgrounds are
//! painted, so text drawn afterwards keeps its own foreground.

use std::f64::consts::TAU;

use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

use crate::ui::theme::Theme;

const WAVE_SPEED: f64 = 0.05;
const WAVE_FREQUENCY: f64 = 3.0;
const WAVE_AMPLITUDE: f64 = 0.3;
/// Pointer influence radius as a fraction of the viewport.
const MOUSE_RADIUS: f64 = 0.3;

const BAYER_4X4: [[u8; 4]; 4] = [[0, 8, 2, 10], [12, 4, 14, 6], [3, 11, 1, 9], [15, 7, 13, 5]];

pub struct Backdrop {
    /// Frame counter.
    pub tick: u64,
    /// Pointer position in screen cells.
    pub pointer: Option<(u16, u16)>,
}

impl Backdrop {
    /// Field intensity at normalised coordinates, roughly `[0, 1]`.
    fn intensity(u: f64, v: f64, time: f64) -> f64 {
        let wave = (u * WAVE_FREQUENCY * TAU + time).sin() * 0.5
            + (v * WAVE_FREQUENCY * TAU * 0.7 - time * 1.3).cos() * 0.5;
        0.5 + WAVE_AMPLITUDE * wave
    }

    /// Extra brightness from the pointer at `(u, v)`.
    fn glow(u: f64, v: f64, pointer: Option<(f64, f64)>) -> f64 {
        let Some((pu, pv)) = pointer else {
            return 0.0;
        };
        let d = ((u - pu).powi(2) + (v - pv).powi(2)).sqrt();
        if d >= MOUSE_RADIUS {
            0.0
        } else {
            (1.0 - d / MOUSE_RADIUS) * 0.5
        }
    }

    /// Colour level for an intensity at cell `(x, y)`.
    fn level(value: f64, x: u16, y: u16) -> usize {
        let levels = Theme::BACKDROP.len();
        let threshold = f64::from(BAYER_4X4[usize::from(y % 4)][usize::from(x % 4)]) / 16.0 - 0.5;
        let scaled = value * (levels - 1) as f64 + threshold;
        scaled.round().clamp(0.0, (levels - 1) as f64) as usize
    }
}

impl Widget for Backdrop {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let time = self.tick as f64 * WAVE_SPEED;
        let (w, h) = (f64::from(area.width), f64::from(area.height));
        let pointer = self
            .pointer
            .filter(|&(x, y)| x >= area.x && x < area.right() && y >= area.y && y < area.bottom())
            .map(|(x, y)| (f64::from(x - area.x) / w, f64::from(y - area.y) / h));

        for y in 0..area.height {
            for x in 0..area.width {
                let (u, v) = (f64::from(x) / w, f64::from(y) / h);
                let value = Self::intensity(u, v, time) * 0.55 + Self::glow(u, v, pointer);
                let color = Theme::rgb(Theme::BACKDROP[Self::level(value, x, y)]);
                if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
                    cell.set_bg(color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_stay_in_range() {
        for &value in &[-3.0, 0.0, 0.5, 1.0, 4.0] {
            for y in 0..4 {
                for x in 0..4 {
                    assert!(Backdrop::level(value, x, y) < Theme::BACKDROP.len());
                }
            }
        }
        assert_eq!(Backdrop::level(-3.0, 0, 0), 0);
        assert_eq!(Backdrop::level(4.0, 3, 3), Theme::BACKDROP.len() - 1);
    }

    #[test]
    fn glow_only_inside_radius() {
        assert_eq!(Backdrop::glow(0.5, 0.5, None), 0.0);
        assert_eq!(Backdrop::glow(0.5, 0.5, Some((0.5, 0.5))), 0.5);
        assert_eq!(Backdrop::glow(0.0, 0.0, Some((0.5, 0.5))), 0.0);
    }

    #[test]
    fn pointer_brightens_its_neighbourhood() {
        let area = Rect::new(0, 0, 40, 20);
        let brightness = |buf: &Buffer| -> usize {
            (15..25)
                .flat_map(|x| (7..13).map(move |y| (x, y)))
                .map(|(x, y)| {
                    let bg = buf[(x, y)].bg;
                    Theme::BACKDROP.iter().position(|&c| Theme::rgb(c) == bg).unwrap_or(0)
                })
                .sum()
        };

        let mut dark = Buffer::empty(area);
        Backdrop { tick: 0, pointer: None }.render(area, &mut dark);
        let mut lit = Buffer::empty(area);
        Backdrop { tick: 0, pointer: Some((20, 10)) }.render(area, &mut lit);
        assert!(brightness(&lit) > brightness(&dark));
    }
}
