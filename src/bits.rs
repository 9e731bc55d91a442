//! Table-driven bit-field unpacking.
//!
//! Many calibration fields straddle a word boundary: the high bits come from
//! the low end of one word and the low bits from the top of the next (or the
//! reverse). Every such field is described as a list of [`Piece`]s, each
//! taking `width` bits at `shift` from one word of a fixed-size window and
//! placing them at bit `at` of the result. Decoders read the window first and
//! then unpack every field from it, so each field's schedule can be checked
//! on its own.

/// A contiguous run of bits taken from a single word of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Piece {
    pub(crate) word: usize,
    pub(crate) shift: u32,
    pub(crate) width: u32,
    pub(crate) at: u32,
}

impl Piece {
    /// `width` bits starting at bit `shift` of window word `word`.
    pub(crate) const fn new(word: usize, shift: u32, width: u32) -> Self {
        Self {
            word,
            shift,
            width,
            at: 0,
        }
    }

    /// Places the piece at bit `at` of the assembled field.
    pub(crate) const fn at(self, at: u32) -> Self {
        Self { at, ..self }
    }

    const fn mask(self) -> u16 {
        ((1u32 << self.width) - 1) as u16
    }

    fn extract(self, words: &[u16]) -> u16 {
        ((words[self.word] >> self.shift) & self.mask()) << self.at
    }
}

/// A field assembled from one or more pieces.
pub(crate) type Field = &'static [Piece];

/// Assembles `field` from the window `words`.
pub(crate) fn unpack(words: &[u16], field: &[Piece]) -> u16 {
    field
        .iter()
        .fold(0, |value, piece| value | piece.extract(words))
}

/// Assembles a field of at most 8 bits.
pub(crate) fn unpack_u8(words: &[u16], field: &[Piece]) -> u8 {
    lo8(unpack(words, field)) as u8
}

/// `width` bits of `word` starting at bit `shift`.
pub(crate) fn take(word: u16, shift: u32, width: u32) -> u16 {
    (word >> shift) & Piece::new(0, shift, width).mask()
}

/// Bit `bit` of `word`.
pub(crate) fn flag(word: u16, bit: u32) -> bool {
    (word >> bit) & 1 != 0
}

/// Interprets the low byte of `value` as a twos-complement byte.
pub(crate) fn signed_byte(value: u16) -> i8 {
    lo8(value) as u8 as i8
}

pub(crate) fn lo8(x: u16) -> u16 {
    x & 0xff
}

pub(crate) fn hi8(x: u16) -> u16 {
    x >> 8
}

/// Writes `value` into the window so that [`unpack`] returns it.
#[cfg(test)]
pub(crate) fn pack(words: &mut [u16], field: &[Piece], value: u16) {
    for piece in field {
        let bits = (value >> piece.at) & piece.mask();
        words[piece.word] &= !(piece.mask() << piece.shift);
        words[piece.word] |= bits << piece.shift;
    }
}

/// Total width of a field in bits.
#[cfg(test)]
pub(crate) fn width(field: &[Piece]) -> u32 {
    field.iter().map(|piece| piece.width).sum()
}

/// Asserts that `fields` fit in a window of `len` words without sharing bits.
#[cfg(test)]
pub(crate) fn assert_disjoint(len: usize, fields: &[&[Piece]]) {
    let mut used = std::vec![0u16; len];
    for field in fields {
        let mut placed = 0u32;
        for piece in field.iter() {
            assert!(piece.word < len, "piece {:?} outside {} words", piece, len);
            assert!(piece.shift + piece.width <= 16, "piece {:?} overflows word", piece);
            let bits = piece.mask() << piece.shift;
            assert_eq!(used[piece.word] & bits, 0, "piece {:?} overlaps", piece);
            used[piece.word] |= bits;
            let dest = (((1u32 << piece.width) - 1) << piece.at) as u16;
            assert_eq!(placed as u16 & dest, 0, "piece {:?} reuses result bits", piece);
            placed |= u32::from(dest);
        }
    }
}
