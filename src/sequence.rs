/// A DNA base
pub type Base = u8;
/// A biological sequence
pub type Sequence = Vec<u8>;

/// Watson-Crick complement of a base. IUPAC ambiguity codes map to
/// their complementary code; anything else is returned unchanged.
pub fn complement(base: Base) -> Base {
    match base {
        b'A' => b'T',
        b'a' => b't',
        b'C' => b'G',
        b'c' => b'g',
        b'G' => b'C',
        b'g' => b'c',
        b'T' | b'U' => b'A',
        b't' | b'u' => b'a',
        b'R' => b'Y',
        b'r' => b'y',
        b'Y' => b'R',
        b'y' => b'r',
        b'K' => b'M',
        b'k' => b'm',
        b'M' => b'K',
        b'm' => b'k',
        b'B' => b'V',
        b'b' => b'v',
        b'V' => b'B',
        b'v' => b'b',
        b'D' => b'H',
        b'd' => b'h',
        b'H' => b'D',
        b'h' => b'd',
        other => other,
    }
}

/// Reverse complement of a sequence, as read on the minus side.
pub fn revcomp(seq: &[Base]) -> Sequence {
    seq.iter().rev().map(|&b| complement(b)).collect()
}
