//! RGBA colors and the packed pixel codec
//!
//! A `PixelFormat` describes where each channel lives inside a packed integer
//! (bit offset + bit length), the same way a Linux framebuffer reports its
//! `fb_var_screeninfo` bitfields. One pack/unpack pair serves every 16/24/32-bit layout.

use serde::{Serialize, Deserialize};

use crate::math::Vec4;

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color8 {
    pub const BLACK: Color8 = Color8 { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color8 = Color8 { r: 255, g: 255, b: 255, a: 255 };
    pub const RED: Color8 = Color8 { r: 255, g: 0, b: 0, a: 255 };
    pub const GREEN: Color8 = Color8 { r: 0, g: 255, b: 0, a: 255 };
    pub const BLUE: Color8 = Color8 { r: 0, g: 0, b: 255, a: 255 };
    pub const TRANSPARENT: Color8 = Color8 { r: 0, g: 0, b: 0, a: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Convert normalized float RGBA (clamped to 0.0-1.0)
    pub fn from_unit(c: Vec4) -> Self {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self {
            r: q(c.x),
            g: q(c.y),
            b: q(c.z),
            a: q(c.w),
        }
    }

    pub fn to_unit(self) -> Vec4 {
        Vec4::new(
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        )
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn from_array(c: [u8; 4]) -> Self {
        Self::with_alpha(c[0], c[1], c[2], c[3])
    }

    /// Largest per-channel absolute difference
    pub fn max_channel_diff(self, other: Color8) -> u8 {
        self.to_array()
            .iter()
            .zip(other.to_array().iter())
            .map(|(a, b)| a.abs_diff(*b))
            .max()
            .unwrap_or(0)
    }
}

/// Position of one channel inside a packed pixel. A length of 0 means the channel is absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelLayout {
    pub offset: u32,
    pub length: u32,
}

impl ChannelLayout {
    pub const ABSENT: ChannelLayout = ChannelLayout { offset: 0, length: 0 };

    pub const fn new(offset: u32, length: u32) -> Self {
        Self { offset, length }
    }

    pub fn is_present(&self) -> bool {
        self.length > 0
    }
}

/// Bytes per pixel plus the bitfield of each channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelFormat {
    pub bytes_per_pixel: u32,
    pub red: ChannelLayout,
    pub green: ChannelLayout,
    pub blue: ChannelLayout,
    pub alpha: ChannelLayout,
}

impl PixelFormat {
    /// 16-bit 5:6:5, no alpha
    pub const RGB565: PixelFormat = PixelFormat {
        bytes_per_pixel: 2,
        red: ChannelLayout::new(11, 5),
        green: ChannelLayout::new(5, 6),
        blue: ChannelLayout::new(0, 5),
        alpha: ChannelLayout::ABSENT,
    };

    /// 24-bit packed, blue in the lowest byte
    pub const RGB888: PixelFormat = PixelFormat {
        bytes_per_pixel: 3,
        red: ChannelLayout::new(16, 8),
        green: ChannelLayout::new(8, 8),
        blue: ChannelLayout::new(0, 8),
        alpha: ChannelLayout::ABSENT,
    };

    /// 32-bit with an unused top byte (the common fbdev layout)
    pub const XRGB8888: PixelFormat = PixelFormat {
        bytes_per_pixel: 4,
        red: ChannelLayout::new(16, 8),
        green: ChannelLayout::new(8, 8),
        blue: ChannelLayout::new(0, 8),
        alpha: ChannelLayout::ABSENT,
    };

    /// 32-bit with alpha in the top byte
    pub const ARGB8888: PixelFormat = PixelFormat {
        bytes_per_pixel: 4,
        red: ChannelLayout::new(16, 8),
        green: ChannelLayout::new(8, 8),
        blue: ChannelLayout::new(0, 8),
        alpha: ChannelLayout::new(24, 8),
    };

    /// Only 2, 3 and 4 bytes per pixel can be read and written
    pub fn is_supported(&self) -> bool {
        matches!(self.bytes_per_pixel, 2..=4)
    }

    pub fn bits_per_pixel(&self) -> u32 {
        self.bytes_per_pixel * 8
    }

    pub fn pack(&self, color: Color8) -> u32 {
        pack(color, self.red, self.green, self.blue, self.alpha)
    }

    pub fn unpack(&self, value: u32) -> Color8 {
        unpack(value, self.red, self.green, self.blue, self.alpha)
    }
}

impl Default for PixelFormat {
    fn default() -> Self {
        PixelFormat::ARGB8888
    }
}

#[inline]
fn field_max(length: u32) -> u64 {
    (1u64 << length.min(32)) - 1
}

/// Scale an 8-bit value into an N-bit field, rounding to nearest
pub fn scale_channel(value: u8, length: u32) -> u32 {
    if length == 0 {
        return 0;
    }
    let max = field_max(length);
    ((2 * value as u64 * max + 255) / 510) as u32
}

/// Expand an N-bit field back to 8 bits, rounding to nearest
pub fn expand_channel(value: u32, length: u32) -> u8 {
    if length == 0 {
        return 0;
    }
    let max = field_max(length);
    let v = (value as u64).min(max);
    ((2 * v * 255 + max) / (2 * max)) as u8
}

/// `length` bits of `value` starting at bit `offset`
pub fn extract_bits(value: u32, offset: u32, length: u32) -> u32 {
    if length == 0 || offset >= 32 {
        return 0;
    }
    ((value as u64 >> offset) & field_max(length)) as u32
}

/// Pack a color into one integer using per-channel bitfields
pub fn pack(
    color: Color8,
    red: ChannelLayout,
    green: ChannelLayout,
    blue: ChannelLayout,
    alpha: ChannelLayout,
) -> u32 {
    [(color.r, red), (color.g, green), (color.b, blue), (color.a, alpha)]
        .into_iter()
        .filter(|(_, ch)| ch.is_present() && ch.offset < 32)
        .fold(0u32, |acc, (v, ch)| acc | (scale_channel(v, ch.length) << ch.offset))
}

/// Inverse of [`pack`]; absent channels unpack to 0
pub fn unpack(
    value: u32,
    red: ChannelLayout,
    green: ChannelLayout,
    blue: ChannelLayout,
    alpha: ChannelLayout,
) -> Color8 {
    let ch = |c: ChannelLayout| expand_channel(extract_bits(value, c.offset, c.length), c.length);
    Color8::with_alpha(ch(red), ch(green), ch(blue), ch(alpha))
}
