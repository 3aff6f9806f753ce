//! Stable colour per user name. Cosmetic only.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    Blue,
    Green,
    Purple,
    Red,
    Yellow,
    Indigo,
    Pink,
    Teal,
    Orange,
    Cyan,
}

pub const PALETTE: [Palette; 10] = [
    Palette::Blue,
    Palette::Green,
    Palette::Purple,
    Palette::Red,
    Palette::Yellow,
    Palette::Indigo,
    Palette::Pink,
    Palette::Teal,
    Palette::Orange,
    Palette::Cyan,
];

impl Palette {
    pub fn hex(&self) -> &'static str {
        match self {
            Palette::Blue => "#3b82f6",
            Palette::Green => "#10b981",
            Palette::Purple => "#8b5cf6",
            Palette::Red => "#ef4444",
            Palette::Yellow => "#eab308",
            Palette::Indigo => "#6366f1",
            Palette::Pink => "#ec4899",
            Palette::Teal => "#14b8a6",
            Palette::Orange => "#f97316",
            Palette::Cyan => "#06b6d4",
        }
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        let hex = &self.hex()[1..];
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0);
        (channel(0), channel(2), channel(4))
    }
}

/// Rolling `hash = code + ((hash << 5) - hash)` over UTF-16 units.
///
/// The shift sees only the low 32 bits of the running value while the
/// subtraction uses all of it; i64 holds the sum for any realistic name.
pub fn name_hash(name: &str) -> i64 {
    name.encode_utf16().fold(0i64, |hash, unit| {
        let shifted = (hash as i32).wrapping_shl(5) as i64;
        unit as i64 + (shifted - hash)
    })
}

pub fn palette_index(name: &str) -> usize {
    (name_hash(name).unsigned_abs() % PALETTE.len() as u64) as usize
}

pub fn color_for(name: &str) -> Palette {
    PALETTE[palette_index(name)]
}
