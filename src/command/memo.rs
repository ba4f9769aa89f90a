//! User command memo codec
//!
//! A memo travels as Base58Check with version byte `0x14`. Once the checksum
//! is verified the bytes are laid out as
//!
//! - byte 0: version byte `0x14`
//! - byte 1: memo tag, `0x01` for user-supplied bytes
//! - byte 2: message length `L`
//! - bytes 3 to 3 + L: message, 0-right-padded to [MEMO_LEN] bytes

use crate::constants::{MEMO_BYTES_TAG, USER_COMMAND_MEMO_VERSION};
use log::{debug, trace};

pub const MEMO_LEN: usize = 32;

/// Offset of the message length byte, version byte included
pub const MEMO_LENGTH_OFFSET: usize = 2;

#[derive(Debug, thiserror::Error)]
pub enum MemoError {
    #[error("invalid base58check memo: {0}")]
    Base58(#[from] bs58::decode::Error),

    #[error("memo too short: {0} bytes")]
    TooShort(usize),

    #[error("memo length byte {length} exceeds the {available} available bytes")]
    LengthOutOfRange { length: usize, available: usize },

    #[error("memo message is not valid UTF-8")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("memo message longer than 32 bytes: {0}")]
    MessageTooLong(usize),
}

/// Decode a Base58Check memo into its UTF-8 message.
///
/// Never fails: any checksum, version, length or UTF-8 problem yields the
/// empty string, which no vote parser accepts.
pub fn decode_memo(memo: &str) -> String {
    match try_decode_memo(memo) {
        Ok(message) => message,
        Err(e) => {
            debug!("Error decoding memo {memo:?}: {e}");
            String::new()
        }
    }
}

/// Decode a Base58Check memo, reporting why it was rejected
pub fn try_decode_memo(memo: &str) -> Result<String, MemoError> {
    let decoded = bs58::decode(memo)
        .with_check(Some(USER_COMMAND_MEMO_VERSION))
        .into_vec()?;
    trace!("Base58Check decoded memo: {}", hex::encode(&decoded));

    let length = *decoded
        .get(MEMO_LENGTH_OFFSET)
        .ok_or(MemoError::TooShort(decoded.len()))? as usize;
    let start = MEMO_LENGTH_OFFSET + 1;
    let message = decoded
        .get(start..start + length)
        .ok_or(MemoError::LengthOutOfRange {
            length,
            available: decoded.len() - start,
        })?;

    Ok(std::str::from_utf8(message)?.to_string())
}

/// Encode a message as a Base58Check user command memo
pub fn encode_memo(message: &str) -> Result<String, MemoError> {
    let bytes = message.as_bytes();
    if bytes.len() > MEMO_LEN {
        return Err(MemoError::MessageTooLong(bytes.len()));
    }

    let mut payload = Vec::with_capacity(MEMO_LEN + 2);
    payload.push(MEMO_BYTES_TAG);
    payload.push(bytes.len() as u8);
    payload.extend_from_slice(bytes);
    payload.resize(MEMO_LEN + 2, 0);

    Ok(bs58::encode(payload)
        .with_check_version(USER_COMMAND_MEMO_VERSION)
        .into_string())
}
