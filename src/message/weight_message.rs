use crate::error::DecodeError;

/// Number of trailing manufacturer data bytes which carry the reading
pub(crate) const PAYLOAD_LEN: usize = 5;

/// Bit of the first payload byte which marks a negative reading
const SIGN_BIT: u8 = 0x08;

/// Only the high nibble of the magnitude bytes is significant
const NIBBLE_MASK: u16 = 0xf0;

/// The weight reading broadcast by the scale in its manufacturer data.
///
/// The reading lives in the last 5 bytes of the buffer. Counting from the end
/// of the buffer as `b0..b4`, the layout is:
///
/// Byte | Bits    | Meaning
/// b4   | 3       | Sign, set for a negative reading
/// b3   | 7..4    | Magnitude bits 15..12
/// b2   | 7..4    | Magnitude bits 11..8
/// b1   | 7..4    | Magnitude bits 7..4
/// b0   | 7..4    | Magnitude bits 3..0
///
/// Everything before the last 5 bytes (company id, vendor prefix) is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightMessage([u8; PAYLOAD_LEN]);

impl WeightMessage {
    pub fn new(data: &[u8]) -> Result<Self, DecodeError> {
        let tail = data
            .last_chunk::<PAYLOAD_LEN>()
            .ok_or(DecodeError::InvalidPayload { len: data.len() })?;
        Ok(Self(*tail))
    }

    pub fn is_negative(&self) -> bool {
        self.0[0] & SIGN_BIT != 0
    }

    pub fn magnitude(&self) -> u16 {
        let [_, b3, b2, b1, b0] = self.0.map(u16::from);
        ((b3 & NIBBLE_MASK) << 8) | ((b2 & NIBBLE_MASK) << 4) | (b1 & NIBBLE_MASK) | (b0 >> 4)
    }

    /// The signed reading in grams
    pub fn weight_g(&self) -> i32 {
        let magnitude = i32::from(self.magnitude());
        if self.is_negative() {
            -magnitude
        } else {
            magnitude
        }
    }
}

/// Decode the weight in grams from a raw manufacturer data buffer.
pub fn decode(data: &[u8]) -> Result<i32, DecodeError> {
    WeightMessage::new(data).map(|msg| msg.weight_g())
}

#[test]
fn test_decode_positive() {
    let data = hex::decode("0000100020").unwrap();
    assert_eq!(decode(&data), Ok(258));
}

#[test]
fn test_decode_negative() {
    let data = hex::decode("0800100020").unwrap();
    assert_eq!(decode(&data), Ok(-258));
}

#[test]
fn test_decode_ignores_prefix() {
    // company id followed by vendor bytes
    let data = hex::decode("a0ac4b3c0000100020").unwrap();
    assert_eq!(decode(&data), Ok(258));
}

#[test]
fn test_decode_ignores_low_nibbles() {
    let data = hex::decode("f75f5f5f5f").unwrap();
    let msg = WeightMessage::new(&data).unwrap();
    assert!(!msg.is_negative());
    assert_eq!(msg.magnitude(), 0x5555);
    assert_eq!(msg.weight_g(), 0x5555);
}

#[test]
fn test_decode_max_magnitude() {
    let data = hex::decode("08f0f0f0f0").unwrap();
    assert_eq!(decode(&data), Ok(-0xffff));
}

#[test]
fn test_decode_negative_zero() {
    let data = hex::decode("0800000000").unwrap();
    assert_eq!(decode(&data), Ok(0));
}

#[test]
fn test_decode_too_short() {
    for len in 0..PAYLOAD_LEN {
        let data = vec![0xff; len];
        assert_eq!(decode(&data), Err(DecodeError::InvalidPayload { len }));
    }
}
