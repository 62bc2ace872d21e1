// Path: crates/state/src/tree/iavl/encode.rs

//! The binary wire primitives that form node hash preimages.
//!
//! Every IAVL implementation that wants to verify our proofs must produce these
//! exact bytes: a one-byte `int8`, the signed varint (a size byte followed by a
//! big-endian magnitude, with `0xF0` added to the size byte for negatives),
//! a big-endian `uint64`, and byte strings prefixed with their varint length.

/// Number of big-endian bytes needed for the magnitude `v`; zero needs none.
#[inline]
fn uvarint_size(v: u64) -> u8 {
    // Bounded by 8, so the narrowing is lossless.
    ((64 - v.leading_zeros() + 7) / 8) as u8
}

#[inline]
pub(super) fn write_int8(buf: &mut Vec<u8>, value: i8) {
    buf.extend_from_slice(&value.to_be_bytes());
}

#[inline]
pub(super) fn write_uint64(buf: &mut Vec<u8>, value: u64) {
    buf.extend_from_slice(&value.to_be_bytes());
}

pub(super) fn write_varint(buf: &mut Vec<u8>, value: i64) {
    let magnitude = value.unsigned_abs();
    let size = uvarint_size(magnitude);
    buf.push(if value < 0 { size + 0xF0 } else { size });
    let be = magnitude.to_be_bytes();
    buf.extend(be.iter().skip(be.len() - usize::from(size)));
}

pub(super) fn write_byte_slice(buf: &mut Vec<u8>, bytes: &[u8]) {
    // A slice longer than i64::MAX bytes cannot exist in memory.
    write_varint(buf, bytes.len() as i64);
    buf.extend_from_slice(bytes);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn varint(v: i64) -> Vec<u8> {
        let mut buf = Vec::new();
        write_varint(&mut buf, v);
        buf
    }

    #[test]
    fn test_varint_layout() {
        assert_eq!(varint(0), vec![0x00]);
        assert_eq!(varint(1), vec![0x01, 0x01]);
        assert_eq!(varint(20), vec![0x01, 0x14]);
        assert_eq!(varint(255), vec![0x01, 0xFF]);
        assert_eq!(varint(256), vec![0x02, 0x01, 0x00]);
        assert_eq!(varint(-1), vec![0xF1, 0x01]);
        assert_eq!(varint(-300), vec![0xF2, 0x01, 0x2C]);
        assert_eq!(
            varint(i64::MIN),
            vec![0xF8, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn test_fixed_width_fields() {
        let mut buf = Vec::new();
        write_int8(&mut buf, -2);
        write_uint64(&mut buf, 0x0102);
        assert_eq!(buf, vec![0xFE, 0, 0, 0, 0, 0, 0, 0x01, 0x02]);
    }

    #[test]
    fn test_byte_slice_is_length_prefixed() {
        let mut buf = Vec::new();
        write_byte_slice(&mut buf, b"abc");
        assert_eq!(buf, vec![0x01, 0x03, b'a', b'b', b'c']);

        let mut empty = Vec::new();
        write_byte_slice(&mut empty, b"");
        assert_eq!(empty, vec![0x00]);
    }
}
