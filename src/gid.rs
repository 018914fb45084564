/// Bit flag for a horizontally flipped tile (bit 31).
pub const FLIP_H: u32 = 0x8000_0000;
/// Bit flag for a vertically flipped tile (bit 30).
pub const FLIP_V: u32 = 0x4000_0000;
/// Bit flag for a diagonally flipped tile (bit 29).
pub const FLIP_D: u32 = 0x2000_0000;
/// Mask keeping the lower 29 bits of a GID (bit 28 is unused).
pub const GID_MASK: u32 = 0x1FFF_FFFF;

/// A global tile ID as stored in layer data: the lower 29 bits index into
/// the map's tilesets, the top 3 bits carry flip flags.
///
/// GID 0 is the empty tile and never reaches tileset lookup; the flag bits
/// must be masked off (`clean`) before resolving and are reapplied only at
/// draw time as a quad transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Gid(pub u32);

impl Gid {
    /// The raw value including flag bits.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    /// The GID with flag bits masked off.
    #[inline]
    pub fn clean(self) -> u32 {
        self.0 & GID_MASK
    }

    /// Whether the horizontal flip flag is set.
    #[inline]
    pub fn flip_h(self) -> bool {
        (self.0 & FLIP_H) != 0
    }

    /// Whether the vertical flip flag is set.
    #[inline]
    pub fn flip_v(self) -> bool {
        (self.0 & FLIP_V) != 0
    }

    /// Whether the diagonal flip flag is set.
    #[inline]
    pub fn flip_d(self) -> bool {
        (self.0 & FLIP_D) != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_strips_exactly_the_top_three_bits() {
        let gid = Gid(42 | FLIP_H | FLIP_V | FLIP_D);
        assert_eq!(gid.clean(), 42);
        assert!(gid.flip_h());
        assert!(gid.flip_v());
        assert!(gid.flip_d());

        let plain = Gid(42);
        assert_eq!(plain.clean(), 42);
        assert!(!plain.flip_h() && !plain.flip_v() && !plain.flip_d());
    }
}
