//! Deterministic per-sender coloring.
//!
//! A sender's display name hashes to one of eight palette buckets so the same
//! name always renders in the same color, across runs and across clients that
//! share the fold below.

/// Number of sender-color buckets in a palette.
pub const BUCKET_COUNT: usize = 8;

/// Index into an externally owned eight-slot sender palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorBucket(u8);

impl ColorBucket {
    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

/// Maps a display name to its palette bucket.
///
/// The fold is `hash = hash * 31 + code` over the name's UTF-16 code units,
/// in 32-bit two's-complement arithmetic, then `|hash| mod 8`. The wraparound
/// behavior is part of the contract: identical names must land in identical
/// buckets everywhere. An empty name maps straight to bucket 0.
pub fn color_bucket(name: &str) -> ColorBucket {
    if name.is_empty() {
        return ColorBucket(0);
    }
    let mut hash: i32 = 0;
    for code in name.encode_utf16() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(code));
    }
    ColorBucket((hash.unsigned_abs() % 8) as u8)
}

/// Packed ARGB color value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub u32);

impl Color {
    pub const fn argb(self) -> u32 {
        self.0
    }
}

/// Semantic palette slots the dispatcher selects; the palette itself is
/// owned by the embedding application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorToken {
    /// Sender-name color for the given bucket.
    Username(ColorBucket),
    /// Body color for a delivered message.
    MessageSent,
    /// Body color for a message that is still pending or has failed.
    MessageSending,
    /// Muted body color for notices.
    NoticeText,
}

/// Externally owned palette lookup.
pub trait ColorProvider: Send + Sync {
    fn color(&self, token: ColorToken) -> Color;
}
