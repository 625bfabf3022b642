//! Free-mode geometry rules: sizes, positions and sizing policies.
//!
//! # Invariants
//! - Stored sizes always lie within `MIN_SIZE..=MAX_SIZE`.
//! - Stored positions always lie on the `DRAG_GRID` lattice.

use rand::Rng;
use serde::{Deserialize, Serialize};

pub const DEFAULT_WIDTH: f64 = 300.0;
pub const DEFAULT_HEIGHT: f64 = 200.0;

/// Smallest size a note can be resized to.
pub const MIN_SIZE: Size = Size {
    width: 200.0,
    height: 150.0,
};

/// Largest size a note can be resized to.
pub const MAX_SIZE: Size = Size {
    width: 800.0,
    height: 600.0,
};

/// Drag step in pixels along both axes.
pub const DRAG_GRID: f64 = 10.0;

/// Upper bound of the random jitter applied by [`SizingPolicy::FitContent`].
pub const SIZE_JITTER: f64 = 20.0;

const FIT_CHARS_CAP: usize = 600;
const FIT_PX_PER_CHAR: f64 = 0.5;
const FIT_PX_PER_LINE: f64 = 18.0;

/// Free-mode coordinates of a note's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };

    /// Rounds both coordinates to the nearest drag grid step.
    pub fn snapped(self) -> Self {
        Self {
            x: snap(self.x),
            y: snap(self.y),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Default for Size {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl Size {
    /// Clamps into the resize bounds. Non-finite values fall back to defaults.
    pub fn clamped(self) -> Self {
        let width = if self.width.is_finite() {
            self.width
        } else {
            DEFAULT_WIDTH
        };
        let height = if self.height.is_finite() {
            self.height
        } else {
            DEFAULT_HEIGHT
        };
        Self {
            width: width.clamp(MIN_SIZE.width, MAX_SIZE.width),
            height: height.clamp(MIN_SIZE.height, MAX_SIZE.height),
        }
    }
}

/// How a freshly created note picks its initial size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizingPolicy {
    /// Always `DEFAULT_WIDTH x DEFAULT_HEIGHT`.
    #[default]
    Fixed,
    /// Grows with content length and line count, plus bounded jitter.
    FitContent,
}

impl SizingPolicy {
    pub fn size_for(self, content: &str) -> Size {
        match self {
            Self::Fixed => Size::default(),
            Self::FitContent => {
                let mut rng = rand::thread_rng();
                let jitter_w = rng.gen_range(-SIZE_JITTER..=SIZE_JITTER);
                let jitter_h = rng.gen_range(-SIZE_JITTER..=SIZE_JITTER);
                fit_content_size(content, jitter_w, jitter_h)
            }
        }
    }
}

/// Deterministic part of content-fitted sizing; jitter is supplied by caller.
pub fn fit_content_size(content: &str, jitter_w: f64, jitter_h: f64) -> Size {
    let chars = content.chars().count().min(FIT_CHARS_CAP);
    let lines = content.lines().count().max(1);
    Size {
        width: MIN_SIZE.width + chars as f64 * FIT_PX_PER_CHAR + jitter_w,
        height: MIN_SIZE.height + lines as f64 * FIT_PX_PER_LINE + jitter_h,
    }
    .clamped()
}

fn snap(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value / DRAG_GRID).round() * DRAG_GRID
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_respects_both_bounds() {
        let small = Size {
            width: 10.0,
            height: 10.0,
        }
        .clamped();
        assert_eq!(small, MIN_SIZE);

        let big = Size {
            width: 5000.0,
            height: 5000.0,
        }
        .clamped();
        assert_eq!(big, MAX_SIZE);
    }

    #[test]
    fn snap_rounds_to_grid() {
        let pos = Position { x: 14.0, y: 26.0 }.snapped();
        assert_eq!(pos, Position { x: 10.0, y: 30.0 });
    }

    #[test]
    fn fit_content_stays_in_bounds_for_any_jitter() {
        let long = "x".repeat(10_000);
        for jitter in [-SIZE_JITTER, 0.0, SIZE_JITTER] {
            let size = fit_content_size(&long, jitter, jitter);
            assert!(size.width >= MIN_SIZE.width && size.width <= MAX_SIZE.width);
            assert!(size.height >= MIN_SIZE.height && size.height <= MAX_SIZE.height);
        }
    }

    #[test]
    fn fit_content_grows_with_length() {
        let short = fit_content_size("hi", 0.0, 0.0);
        let longer = fit_content_size(&"word ".repeat(80), 0.0, 0.0);
        assert!(longer.width > short.width);
    }
}
