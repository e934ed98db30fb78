// Copyright 2025 the Rasterline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Blend operators.

use core::fmt;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use peniko::{BlendMode, Compose, Mix};

use crate::color::Rgba8;

/// How a source color is combined with the destination pixel.
///
/// The Porter-Duff operators and the separable blend modes follow the
/// SVG 1.2 compositing definitions, evaluated on premultiplied colors.
/// `Contrast`, `Invert` and `InvertRgb` are the non-standard extras found in
/// map renderers.
///
/// Operators are named in lowercase with hyphens (`src-over`). Underscore
/// spellings are accepted as aliases, and [`CompOp::from_name`] resolves
/// unknown names to [`CompOp::Src`].
///
/// ```
/// use rasterline_raster::CompOp;
///
/// assert_eq!(CompOp::from_name("color-dodge"), CompOp::ColorDodge);
/// assert_eq!(CompOp::from_name("dst_over"), CompOp::DstOver);
/// assert_eq!(CompOp::from_name("bogus-mode"), CompOp::Src);
/// assert_eq!(CompOp::try_from_name("bogus-mode"), None);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CompOp {
    /// Remove the destination.
    Clear,
    /// Replace the destination.
    Src,
    /// Keep the destination.
    Dst,
    /// Source over destination.
    #[default]
    SrcOver,
    /// Destination over source.
    DstOver,
    /// Source where the destination is.
    SrcIn,
    /// Destination where the source is.
    DstIn,
    /// Source where the destination is not.
    SrcOut,
    /// Destination where the source is not.
    DstOut,
    /// Source over destination, only where the destination is.
    SrcAtop,
    /// Destination over source, only where the source is.
    DstAtop,
    /// Source and destination where the other is not.
    Xor,
    /// Sum, saturating.
    Plus,
    /// Destination minus source, saturating.
    Minus,
    /// Product of the colors.
    Multiply,
    /// Inverse product of the inverted colors.
    Screen,
    /// Multiply or screen, depending on the destination.
    Overlay,
    /// The darker of the two colors.
    Darken,
    /// The lighter of the two colors.
    Lighten,
    /// Brighten the destination towards the source.
    ColorDodge,
    /// Darken the destination towards the source.
    ColorBurn,
    /// Multiply or screen, depending on the source.
    HardLight,
    /// A softer hard light.
    SoftLight,
    /// Absolute difference.
    Difference,
    /// Like difference, with lower contrast.
    Exclusion,
    /// Scale destination contrast around mid-grey by the source.
    Contrast,
    /// Invert the destination, weighted by source alpha.
    Invert,
    /// Invert the destination, weighted per channel by the source color.
    InvertRgb,
}

impl CompOp {
    /// Every operator, in name-table order.
    pub const ALL: [Self; 28] = [
        Self::Clear,
        Self::Src,
        Self::Dst,
        Self::SrcOver,
        Self::DstOver,
        Self::SrcIn,
        Self::DstIn,
        Self::SrcOut,
        Self::DstOut,
        Self::SrcAtop,
        Self::DstAtop,
        Self::Xor,
        Self::Plus,
        Self::Minus,
        Self::Multiply,
        Self::Screen,
        Self::Overlay,
        Self::Darken,
        Self::Lighten,
        Self::ColorDodge,
        Self::ColorBurn,
        Self::HardLight,
        Self::SoftLight,
        Self::Difference,
        Self::Exclusion,
        Self::Contrast,
        Self::Invert,
        Self::InvertRgb,
    ];

    /// The canonical hyphenated name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Src => "src",
            Self::Dst => "dst",
            Self::SrcOver => "src-over",
            Self::DstOver => "dst-over",
            Self::SrcIn => "src-in",
            Self::DstIn => "dst-in",
            Self::SrcOut => "src-out",
            Self::DstOut => "dst-out",
            Self::SrcAtop => "src-atop",
            Self::DstAtop => "dst-atop",
            Self::Xor => "xor",
            Self::Plus => "plus",
            Self::Minus => "minus",
            Self::Multiply => "multiply",
            Self::Screen => "screen",
            Self::Overlay => "overlay",
            Self::Darken => "darken",
            Self::Lighten => "lighten",
            Self::ColorDodge => "color-dodge",
            Self::ColorBurn => "color-burn",
            Self::HardLight => "hard-light",
            Self::SoftLight => "soft-light",
            Self::Difference => "difference",
            Self::Exclusion => "exclusion",
            Self::Contrast => "contrast",
            Self::Invert => "invert",
            Self::InvertRgb => "invert-rgb",
        }
    }

    /// Look up an operator by name, falling back to [`CompOp::Src`].
    pub fn from_name(name: &str) -> Self {
        Self::try_from_name(name).unwrap_or(Self::Src)
    }

    /// Look up an operator by name.
    pub fn try_from_name(name: &str) -> Option<Self> {
        if let Some(op) = Self::lookup(name) {
            return Some(op);
        }
        if name.contains('_') {
            return Self::lookup(&name.replace('_', "-"));
        }
        None
    }

    fn lookup(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }

    /// The operator equivalent to a Peniko blend mode, if there is one.
    ///
    /// Non-separable mixes (hue, saturation, color, luminosity) and mixes
    /// combined with anything but source-over composition have no
    /// counterpart.
    pub fn from_blend_mode(mode: BlendMode) -> Option<Self> {
        match (mode.mix, mode.compose) {
            (Mix::Normal, compose) => match compose {
                Compose::Clear => Some(Self::Clear),
                Compose::Copy => Some(Self::Src),
                Compose::Dest => Some(Self::Dst),
                Compose::SrcOver => Some(Self::SrcOver),
                Compose::DestOver => Some(Self::DstOver),
                Compose::SrcIn => Some(Self::SrcIn),
                Compose::DestIn => Some(Self::DstIn),
                Compose::SrcOut => Some(Self::SrcOut),
                Compose::DestOut => Some(Self::DstOut),
                Compose::SrcAtop => Some(Self::SrcAtop),
                Compose::DestAtop => Some(Self::DstAtop),
                Compose::Xor => Some(Self::Xor),
                Compose::Plus => Some(Self::Plus),
                _ => None,
            },
            (mix, Compose::SrcOver) => match mix {
                Mix::Multiply => Some(Self::Multiply),
                Mix::Screen => Some(Self::Screen),
                Mix::Overlay => Some(Self::Overlay),
                Mix::Darken => Some(Self::Darken),
                Mix::Lighten => Some(Self::Lighten),
                Mix::ColorDodge => Some(Self::ColorDodge),
                Mix::ColorBurn => Some(Self::ColorBurn),
                Mix::HardLight => Some(Self::HardLight),
                Mix::SoftLight => Some(Self::SoftLight),
                Mix::Difference => Some(Self::Difference),
                Mix::Exclusion => Some(Self::Exclusion),
                _ => None,
            },
            _ => None,
        }
    }

    /// Blend `src` into `dst` with `cover` in `0..=255` scaling the source.
    ///
    /// Both colors are straight alpha, as is the result.
    pub fn blend(self, dst: Rgba8, src: Rgba8, cover: u8) -> Rgba8 {
        if self == Self::Dst || cover == 0 {
            return dst;
        }
        let c = f64::from(cover) / 255.0;
        let d = Premul::from(dst);
        let s = Premul::from(src);
        self.blend_premul(d, s, c).clip().into()
    }

    fn blend_premul(self, d: Premul, s: Premul, c: f64) -> Premul {
        if self.is_bounded() {
            // These ops only change the destination where the source is, so
            // partial coverage interpolates towards the fully covered result.
            let full = self.apply(d, s);
            return d.scale(1.0 - c).add(full.scale(c));
        }
        self.apply(d, s.scale(c))
    }

    /// Whether the operator is interpolated by coverage rather than applied
    /// with a coverage-scaled source.
    fn is_bounded(self) -> bool {
        matches!(
            self,
            Self::Clear
                | Self::Src
                | Self::SrcIn
                | Self::DstIn
                | Self::SrcOut
                | Self::DstOut
                | Self::DstAtop
        )
    }

    fn apply(self, d: Premul, s: Premul) -> Premul {
        let sa = s.a;
        let da = d.a;
        let s1a = 1.0 - sa;
        let d1a = 1.0 - da;
        let union_alpha = sa + da - sa * da;
        match self {
            Self::Clear => Premul::ZERO,
            Self::Src => s,
            Self::Dst => d,
            Self::SrcOver => s.add(d.scale(s1a)),
            Self::DstOver => d.add(s.scale(d1a)),
            Self::SrcIn => s.scale(da),
            Self::DstIn => d.scale(sa),
            Self::SrcOut => s.scale(d1a),
            Self::DstOut => d.scale(s1a),
            Self::SrcAtop => Premul {
                a: da,
                ..s.scale(da).add(d.scale(s1a))
            },
            Self::DstAtop => Premul {
                a: sa,
                ..d.scale(sa).add(s.scale(d1a))
            },
            Self::Xor => Premul {
                a: sa + da - 2.0 * sa * da,
                ..s.scale(d1a).add(d.scale(s1a))
            },
            Self::Plus => {
                let a = (sa + da).min(1.0);
                d.zip(s, union_alpha, |dc, sc| (dc + sc).min(a)).with_alpha(a)
            }
            Self::Minus => d.zip(s, union_alpha, |dc, sc| (dc - sc).max(0.0)),
            Self::Multiply => d.zip(s, union_alpha, |dc, sc| sc * dc + sc * d1a + dc * s1a),
            Self::Screen => d.zip(s, union_alpha, |dc, sc| sc + dc - sc * dc),
            Self::Overlay => d.zip(s, union_alpha, |dc, sc| {
                if 2.0 * dc <= da {
                    2.0 * sc * dc + sc * d1a + dc * s1a
                } else {
                    sa * da - 2.0 * (da - dc) * (sa - sc) + sc * d1a + dc * s1a
                }
            }),
            Self::Darken => d.zip(s, union_alpha, |dc, sc| {
                (sc * da).min(dc * sa) + sc * d1a + dc * s1a
            }),
            Self::Lighten => d.zip(s, union_alpha, |dc, sc| {
                (sc * da).max(dc * sa) + sc * d1a + dc * s1a
            }),
            Self::ColorDodge if da <= 0.0 => s,
            Self::ColorDodge => d.zip(s, union_alpha, |dc, sc| {
                if sc < sa {
                    sa * da * (dc / da * sa / (sa - sc)).min(1.0) + sc * d1a + dc * s1a
                } else if dc > 0.0 {
                    sa * da + sc * d1a + dc * s1a
                } else {
                    sc * d1a
                }
            }),
            Self::ColorBurn if da <= 0.0 => s,
            Self::ColorBurn => d.zip(s, union_alpha, |dc, sc| {
                if sc > 0.0 {
                    sa * da * (1.0 - ((1.0 - dc / da) * sa / sc).min(1.0)) + sc * d1a + dc * s1a
                } else if dc > da {
                    sa * da + dc * s1a
                } else {
                    dc * s1a
                }
            }),
            Self::HardLight => d.zip(s, union_alpha, |dc, sc| {
                if 2.0 * sc < sa {
                    2.0 * sc * dc + sc * d1a + dc * s1a
                } else {
                    sa * da - 2.0 * (da - dc) * (sa - sc) + sc * d1a + dc * s1a
                }
            }),
            Self::SoftLight if da <= 0.0 => s,
            Self::SoftLight => d.zip(s, union_alpha, |dc, sc| soft_light(dc, sc, da, sa)),
            Self::Difference => d.zip(s, union_alpha, |dc, sc| {
                sc + dc - 2.0 * (sc * da).min(dc * sa)
            }),
            Self::Exclusion => d.zip(s, union_alpha, |dc, sc| {
                sc * da + dc * sa - 2.0 * sc * dc + sc * d1a + dc * s1a
            }),
            Self::Contrast => d.zip(s, da, |dc, sc| {
                ((dc - da * 0.5) * ((sc - sa * 0.5) * 2.0 + 1.0) + da * 0.5).clamp(0.0, da)
            }),
            Self::Invert => d.zip(s, union_alpha, |dc, _| (da - dc) * sa + dc * s1a),
            Self::InvertRgb => d.zip(s, union_alpha, |dc, sc| (da - dc) * sc + dc * s1a),
        }
    }
}

impl fmt::Display for CompOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn soft_light(dc: f64, sc: f64, da: f64, sa: f64) -> f64 {
    let m = dc / da;
    let rest = sc * (1.0 - da) + dc * (1.0 - sa);
    if 2.0 * sc <= sa {
        dc * (sa + (2.0 * sc - sa) * (1.0 - m)) + rest
    } else if 4.0 * dc <= da {
        let g = ((16.0 * m - 12.0) * m + 4.0) * m;
        dc * sa + da * (2.0 * sc - sa) * (g - m) + rest
    } else {
        dc * sa + da * (2.0 * sc - sa) * (m.sqrt() - m) + rest
    }
}

/// A premultiplied color with channels in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Premul {
    r: f64,
    g: f64,
    b: f64,
    a: f64,
}

impl Premul {
    const ZERO: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    fn scale(self, k: f64) -> Self {
        Self {
            r: self.r * k,
            g: self.g * k,
            b: self.b * k,
            a: self.a * k,
        }
    }

    fn add(self, o: Self) -> Self {
        Self {
            r: self.r + o.r,
            g: self.g + o.g,
            b: self.b + o.b,
            a: self.a + o.a,
        }
    }

    /// Combine the color channels with `f(dst, src)`, setting alpha to `a`.
    fn zip(self, s: Self, a: f64, f: impl Fn(f64, f64) -> f64) -> Self {
        Self {
            r: f(self.r, s.r),
            g: f(self.g, s.g),
            b: f(self.b, s.b),
            a,
        }
    }

    fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    /// Clamp alpha to `0..=1` and every channel to `0..=alpha`.
    fn clip(self) -> Self {
        let a = clamp_unit(self.a);
        let c = |v: f64| if v.is_nan() { 0.0 } else { v.clamp(0.0, a) };
        Self {
            r: c(self.r),
            g: c(self.g),
            b: c(self.b),
            a,
        }
    }
}

fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

impl From<Rgba8> for Premul {
    fn from(c: Rgba8) -> Self {
        let a = f64::from(c.a) / 255.0;
        Self {
            r: f64::from(c.r) / 255.0 * a,
            g: f64::from(c.g) / 255.0 * a,
            b: f64::from(c.b) / 255.0 * a,
            a,
        }
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "values are clamped to 0..=255 before the cast"
)]
fn to_channel(v: f64) -> u8 {
    (clamp_unit(v) * 255.0).round() as u8
}

impl From<Premul> for Rgba8 {
    fn from(p: Premul) -> Self {
        let a = to_channel(p.a);
        if a == 0 {
            return Self::TRANSPARENT;
        }
        Self::new(
            to_channel(p.r / p.a),
            to_channel(p.g / p.a),
            to_channel(p.b / p.a),
            a,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    const RED: Rgba8 = Rgba8::new(255, 0, 0, 255);
    const BLUE: Rgba8 = Rgba8::new(0, 0, 255, 255);
    const HALF_BLUE: Rgba8 = Rgba8::new(0, 0, 255, 128);

    #[test]
    fn names_round_trip() {
        for op in CompOp::ALL {
            assert_eq!(CompOp::try_from_name(op.name()), Some(op));
            assert_eq!(op.to_string(), op.name());
        }
        assert_eq!(CompOp::from_name("invert_rgb"), CompOp::InvertRgb);
        assert_eq!(CompOp::from_name("SRC-OVER"), CompOp::Src, "case-sensitive");
        assert_eq!(CompOp::from_name(""), CompOp::Src);
    }

    #[test]
    fn dst_and_zero_cover_leave_destination() {
        for op in CompOp::ALL {
            assert_eq!(op.blend(HALF_BLUE, RED, 0), HALF_BLUE, "{op}");
        }
        assert_eq!(CompOp::Dst.blend(HALF_BLUE, RED, 255), HALF_BLUE);
    }

    #[test]
    fn clear_zeroes_covered_pixels() {
        assert_eq!(CompOp::Clear.blend(BLUE, RED, 255), Rgba8::TRANSPARENT);
        let half = CompOp::Clear.blend(BLUE, RED, 128);
        assert_eq!((half.b, half.a), (255, 127));
    }

    #[test]
    fn opaque_src_over_replaces() {
        assert_eq!(CompOp::SrcOver.blend(BLUE, RED, 255), RED);
        assert_eq!(CompOp::Src.blend(BLUE, HALF_BLUE, 255), HALF_BLUE);
        assert_eq!(CompOp::DstOver.blend(BLUE, RED, 255), BLUE);
    }

    #[test]
    fn src_over_mixes_by_alpha_and_cover() {
        let out = CompOp::SrcOver.blend(Rgba8::WHITE, Rgba8::BLACK, 128);
        assert_eq!(out.a, 255);
        assert_eq!((out.r, out.g, out.b), (127, 127, 127));
    }

    #[test]
    fn porter_duff_in_and_out() {
        assert_eq!(CompOp::SrcIn.blend(Rgba8::TRANSPARENT, RED, 255), Rgba8::TRANSPARENT);
        assert_eq!(CompOp::SrcIn.blend(BLUE, RED, 255), RED);
        assert_eq!(CompOp::SrcOut.blend(BLUE, RED, 255), Rgba8::TRANSPARENT);
        assert_eq!(CompOp::DstOut.blend(BLUE, RED, 255), Rgba8::TRANSPARENT);
        assert_eq!(CompOp::Xor.blend(BLUE, RED, 255), Rgba8::TRANSPARENT);
        assert_eq!(CompOp::SrcAtop.blend(Rgba8::TRANSPARENT, RED, 255), Rgba8::TRANSPARENT);
    }

    #[test]
    fn separable_modes_on_opaque_colors() {
        let grey = Rgba8::rgb(128, 128, 128);
        assert_eq!(CompOp::Multiply.blend(Rgba8::WHITE, grey, 255), grey);
        assert_eq!(CompOp::Screen.blend(Rgba8::BLACK, grey, 255), grey);
        assert_eq!(CompOp::Darken.blend(RED, BLUE, 255), Rgba8::BLACK);
        assert_eq!(CompOp::Lighten.blend(RED, BLUE, 255), Rgba8::rgb(255, 0, 255));
        assert_eq!(CompOp::Difference.blend(Rgba8::WHITE, RED, 255), Rgba8::rgb(0, 255, 255));
        assert_eq!(CompOp::Plus.blend(RED, BLUE, 255), Rgba8::rgb(255, 0, 255));
        assert_eq!(CompOp::Minus.blend(Rgba8::WHITE, RED, 255), Rgba8::rgb(0, 255, 255));
    }

    #[test]
    fn invert_flips_the_destination() {
        assert_eq!(CompOp::Invert.blend(RED, Rgba8::WHITE, 255), Rgba8::rgb(0, 255, 255));
        assert_eq!(CompOp::InvertRgb.blend(Rgba8::BLACK, RED, 255), RED);
        assert_eq!(CompOp::InvertRgb.blend(Rgba8::WHITE, RED, 255), Rgba8::BLACK);
    }

    fn grey(v: u8) -> Rgba8 {
        Rgba8::rgb(v, v, v)
    }

    #[test]
    fn overlay_branches_on_the_destination() {
        // Dark destination multiplies, light destination screens.
        assert_eq!(CompOp::Overlay.blend(grey(64), grey(200), 255), grey(100));
        assert_eq!(CompOp::Overlay.blend(grey(192), grey(64), 255), grey(161));
        assert_eq!(
            CompOp::Overlay.blend(Rgba8::new(255, 0, 128, 255), grey(128), 255),
            Rgba8::new(255, 0, 128, 255),
            "mid grey keeps the destination"
        );
        let src = Rgba8::rgb(200, 100, 50);
        assert_eq!(CompOp::Overlay.blend(Rgba8::TRANSPARENT, src, 255), src);
    }

    #[test]
    fn color_dodge_brightens() {
        assert_eq!(CompOp::ColorDodge.blend(grey(128), grey(128), 255), Rgba8::WHITE);
        // A white source saturates every channel the destination has.
        assert_eq!(
            CompOp::ColorDodge.blend(Rgba8::rgb(128, 0, 0), Rgba8::WHITE, 255),
            Rgba8::rgb(255, 0, 0)
        );
        assert_eq!(
            CompOp::ColorDodge.blend(Rgba8::new(100, 0, 0, 128), RED, 255),
            RED
        );
        let src = Rgba8::new(10, 20, 30, 200);
        assert_eq!(
            CompOp::ColorDodge.blend(Rgba8::TRANSPARENT, src, 255),
            src,
            "an empty destination takes the source"
        );
    }

    #[test]
    fn color_burn_darkens() {
        assert_eq!(CompOp::ColorBurn.blend(grey(128), grey(128), 255), grey(2));
        assert_eq!(
            CompOp::ColorBurn.blend(Rgba8::rgb(128, 255, 0), Rgba8::BLACK, 255),
            Rgba8::BLACK
        );
        assert_eq!(
            CompOp::ColorBurn.blend(grey(200), Rgba8::new(0, 0, 0, 128), 255),
            grey(100),
            "a black source only dims by its alpha"
        );
        let src = Rgba8::new(10, 20, 30, 200);
        assert_eq!(CompOp::ColorBurn.blend(Rgba8::TRANSPARENT, src, 255), src);
    }

    #[test]
    fn hard_light_branches_on_the_source() {
        assert_eq!(CompOp::HardLight.blend(grey(64), grey(200), 255), grey(173));
        assert_eq!(CompOp::HardLight.blend(grey(192), grey(64), 255), grey(96));
    }

    #[test]
    fn soft_light_covers_all_three_curves() {
        assert_eq!(CompOp::SoftLight.blend(grey(128), grey(64), 255), grey(96));
        // Dark destination under a light source uses the polynomial.
        assert_eq!(CompOp::SoftLight.blend(grey(32), grey(192), 255), grey(60));
        assert_eq!(CompOp::SoftLight.blend(grey(128), grey(192), 255), grey(155));
        let src = Rgba8::new(10, 20, 30, 200);
        assert_eq!(CompOp::SoftLight.blend(Rgba8::TRANSPARENT, src, 255), src);
    }

    #[test]
    fn exclusion_is_a_softer_difference() {
        assert_eq!(
            CompOp::Exclusion.blend(Rgba8::rgb(255, 128, 0), grey(128), 255),
            Rgba8::rgb(127, 127, 128)
        );
        assert_eq!(
            CompOp::Exclusion.blend(Rgba8::WHITE, RED, 255),
            Rgba8::rgb(0, 255, 255)
        );
    }

    #[test]
    fn contrast_scales_around_mid_grey() {
        let dst = Rgba8::rgb(60, 140, 200);
        assert_eq!(CompOp::Contrast.blend(dst, grey(192), 255), Rgba8::rgb(26, 146, 237));
        let white = CompOp::Contrast.blend(dst, Rgba8::WHITE, 255);
        assert_eq!((white.r, white.b), (0, 255), "clamped to the destination");
        assert_eq!(
            CompOp::Contrast.blend(dst, Rgba8::BLACK, 255),
            grey(128),
            "a black source flattens to mid grey"
        );
    }

    #[test]
    fn contrast_keeps_destination_alpha() {
        let out = CompOp::Contrast.blend(HALF_BLUE, Rgba8::WHITE, 255);
        assert_eq!(out, HALF_BLUE);
    }

    #[test]
    fn every_op_stays_in_range() {
        let colors = [RED, HALF_BLUE, Rgba8::TRANSPARENT, Rgba8::new(10, 200, 30, 77)];
        for op in CompOp::ALL {
            for &d in &colors {
                for &s in &colors {
                    for cover in [1, 77, 255] {
                        // Fully transparent results carry no color.
                        let out = op.blend(d, s, cover);
                        if out.a == 0 {
                            assert_eq!(out, Rgba8::TRANSPARENT, "{op}");
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn peniko_modes_map_onto_operators() {
        assert_eq!(
            CompOp::from_blend_mode(BlendMode::new(Mix::Normal, Compose::SrcOver)),
            Some(CompOp::SrcOver)
        );
        assert_eq!(
            CompOp::from_blend_mode(BlendMode::new(Mix::Normal, Compose::Copy)),
            Some(CompOp::Src)
        );
        assert_eq!(
            CompOp::from_blend_mode(BlendMode::new(Mix::Screen, Compose::SrcOver)),
            Some(CompOp::Screen)
        );
        assert_eq!(
            CompOp::from_blend_mode(BlendMode::new(Mix::Hue, Compose::SrcOver)),
            None
        );
        assert_eq!(
            CompOp::from_blend_mode(BlendMode::new(Mix::Multiply, Compose::Xor)),
            None
        );
    }
}
