//! Day/night sky palette blended by the sky level.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Lerp trait
// ---------------------------------------------------------------------------

/// Trait for types that can be linearly interpolated.
pub trait Lerp: Clone {
    fn lerp(&self, other: &Self, t: f64) -> Self;
}

impl Lerp for [f32; 3] {
    #[inline]
    fn lerp(&self, other: &Self, t: f64) -> Self {
        let t = t as f32;
        [
            self[0] + (other[0] - self[0]) * t,
            self[1] + (other[1] - self[1]) * t,
            self[2] + (other[2] - self[2]) * t,
        ]
    }
}

// ---------------------------------------------------------------------------
// SkyPalette
// ---------------------------------------------------------------------------

/// Gradient stop colors (sRGB, 0-1) for the day and night skies.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SkyPalette {
    pub day_top_color: [f32; 3],
    pub day_bottom_color: [f32; 3],
    pub night_top_color: [f32; 3],
    pub night_bottom_color: [f32; 3],
}

impl Default for SkyPalette {
    fn default() -> Self {
        Self {
            day_top_color: rgb8(0x15, 0x5a, 0xc7),
            day_bottom_color: rgb8(0x29, 0xab, 0xe2),
            night_top_color: rgb8(0x03, 0x03, 0x05),
            night_bottom_color: rgb8(0x32, 0x30, 0x52),
        }
    }
}

/// Sky gradient for one frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SkyGradient {
    pub top: [f32; 3],
    pub bottom: [f32; 3],
}

impl SkyPalette {
    /// Blend night toward day by `sky_blend` (0 = night, 1 = day).
    pub fn gradient(&self, sky_blend: f64) -> SkyGradient {
        let t = sky_blend.clamp(0.0, 1.0);
        SkyGradient {
            top: self.night_top_color.lerp(&self.day_top_color, t),
            bottom: self.night_bottom_color.lerp(&self.day_bottom_color, t),
        }
    }
}

fn rgb8(r: u8, g: u8, b: u8) -> [f32; 3] {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0]
}
