//! LEB128 variable-length integers.
//!
//! Both decoders are pure functions over a byte slice and return the value
//! together with the number of bytes it occupied. `bits` is the target width
//! (32 or 64). Redundant padding bytes are accepted as long as the encoding
//! stays within `ceil(bits / 7)` bytes and the unused bits of the last byte
//! are a plain zero/sign extension.

use crate::error::Reason;

const CONTINUE: u8 = 0x80;
const PAYLOAD: u8 = 0x7f;
const SIGN: u8 = 0x40;

pub fn decode_unsigned(bytes: &[u8], bits: u32) -> Result<(u64, usize), Reason> {
    debug_assert!(bits > 7 && bits <= 64);

    let last = (bits / 7) as usize;
    let mut result = 0u64;
    for (i, &b) in bytes.iter().enumerate() {
        if i == last {
            if b & CONTINUE != 0 {
                return Err(Reason::IntTooLong);
            }
            if u32::from(b) >> (bits - 7 * i as u32) != 0 {
                return Err(Reason::IntTooLarge);
            }
        }
        result |= u64::from(b & PAYLOAD) << (7 * i);
        if b & CONTINUE == 0 {
            return Ok((result, i + 1));
        }
    }
    Err(Reason::UnexpectedEnd)
}

pub fn decode_signed(bytes: &[u8], bits: u32) -> Result<(i64, usize), Reason> {
    debug_assert!(bits > 7 && bits <= 64);

    let last = (bits / 7) as usize;
    let mut result = 0i64;
    for (i, &b) in bytes.iter().enumerate() {
        if i == last {
            if b & CONTINUE != 0 {
                return Err(Reason::IntTooLong);
            }
            // bits above the target width must replicate the sign bit
            let unused = bits - 7 * i as u32 - 1;
            let extends = if b & SIGN == 0 {
                b >> unused == 0
            } else {
                ((b | CONTINUE) as i8) >> unused == -1
            };
            if !extends {
                return Err(Reason::IntTooLarge);
            }
        }
        result |= i64::from(b & PAYLOAD) << (7 * i);
        if b & CONTINUE == 0 {
            let shift = 7 * (i + 1);
            if shift < 64 && b & SIGN != 0 {
                result |= -1i64 << shift;
            }
            return Ok((result, i + 1));
        }
    }
    Err(Reason::UnexpectedEnd)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsigned_examples() {
        assert_eq!(decode_unsigned(&[0x00], 32), Ok((0, 1)));
        assert_eq!(decode_unsigned(&[0xE5, 0x8E, 0x26], 32), Ok((624485, 3)));
        assert_eq!(decode_unsigned(&[0xE5, 0x8E, 0x26, 0xAA], 64), Ok((624485, 3)));
        assert_eq!(decode_unsigned(&[0xff, 0xff, 0xff, 0xff, 0x0f], 32), Ok((::std::u32::MAX as u64, 5)));
    }

    #[test]
    fn unsigned_failures() {
        assert_eq!(decode_unsigned(&[], 32), Err(Reason::UnexpectedEnd));
        assert_eq!(decode_unsigned(&[0x80, 0x80], 32), Err(Reason::UnexpectedEnd));
        assert_eq!(decode_unsigned(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x00], 32), Err(Reason::IntTooLong));
        assert_eq!(decode_unsigned(&[0x80, 0x80, 0x80, 0x80, 0x10], 32), Err(Reason::IntTooLarge));
        assert_eq!(
            decode_unsigned(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x02], 64),
            Err(Reason::IntTooLarge)
        );
    }

    #[test]
    fn signed_examples() {
        assert_eq!(decode_signed(&[0x7f], 32), Ok((-1, 1)));
        assert_eq!(decode_signed(&[0x3f], 32), Ok((63, 1)));
        assert_eq!(decode_signed(&[0x40], 32), Ok((-64, 1)));
        assert_eq!(decode_signed(&[0xC0, 0xBB, 0x78], 32), Ok((-123456, 3)));
        assert_eq!(
            decode_signed(&[0x80, 0x80, 0x80, 0x80, 0x78], 32),
            Ok((::std::i32::MIN as i64, 5))
        );
        assert_eq!(
            decode_signed(&[0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x7f], 64),
            Ok((-1, 10))
        );
        assert_eq!(
            decode_signed(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x7f], 64),
            Ok((::std::i64::MIN, 10))
        );
    }

    #[test]
    fn signed_failures() {
        assert_eq!(decode_signed(&[0xff], 32), Err(Reason::UnexpectedEnd));
        assert_eq!(decode_signed(&[0xff, 0xff, 0xff, 0xff, 0x4f], 32), Err(Reason::IntTooLarge));
        assert_eq!(decode_signed(&[0x80, 0x80, 0x80, 0x80, 0x08], 32), Err(Reason::IntTooLarge));
        assert_eq!(decode_signed(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x00], 32), Err(Reason::IntTooLong));
        assert_eq!(
            decode_signed(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x01], 64),
            Err(Reason::IntTooLarge)
        );
    }
}
