// Copyright 2025 the Rasterline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Straight-alpha 8-bit colors.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use peniko::Color;

/// An 8-bit per channel RGBA color with straight (not premultiplied) alpha.
///
/// This is the in-memory pixel format of a
/// [`RenderingBuffer`](crate::RenderingBuffer). Conversions to and from
/// [`peniko::Color`] are provided for callers that already use Peniko.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel, 255 being opaque.
    pub a: u8,
}

impl Rgba8 {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);

    /// Create a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// The same color with a different alpha.
    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Channels in R, G, B, A order.
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Pack into a `u32` as `0xRRGGBBAA`.
    pub const fn to_u32(self) -> u32 {
        u32::from_be_bytes(self.to_array())
    }

    /// Build a color from channel values on the 0..=255 scale given as
    /// floats, rounding and clamping each one.
    ///
    /// This matches how binding layers usually hand colors over.
    pub fn from_f32_channels(channels: [f32; 4]) -> Self {
        let [r, g, b, a] = channels.map(channel_from_f32);
        Self::new(r, g, b, a)
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "channel values are clamped to [0, 255] before casting"
)]
fn channel_from_f32(v: f32) -> u8 {
    if v.is_nan() {
        0
    } else {
        v.round().clamp(0.0, 255.0) as u8
    }
}

impl From<[u8; 4]> for Rgba8 {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}

impl From<Rgba8> for [u8; 4] {
    fn from(c: Rgba8) -> Self {
        c.to_array()
    }
}

impl From<Color> for Rgba8 {
    fn from(color: Color) -> Self {
        let c = color.to_rgba8();
        Self::new(c.r, c.g, c.b, c.a)
    }
}

impl From<Rgba8> for Color {
    fn from(c: Rgba8) -> Self {
        Self::from_rgba8(c.r, c.g, c.b, c.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_most_significant_first() {
        assert_eq!(Rgba8::new(0x11, 0x22, 0x33, 0x44).to_u32(), 0x1122_3344);
    }

    #[test]
    fn float_channels_round_and_clamp() {
        assert_eq!(
            Rgba8::from_f32_channels([12.4, 300.0, -5.0, f32::NAN]),
            Rgba8::new(12, 255, 0, 0)
        );
    }

    #[test]
    fn peniko_round_trip() {
        let c = Rgba8::new(10, 20, 30, 40);
        assert_eq!(Rgba8::from(Color::from(c)), c);
    }
}
