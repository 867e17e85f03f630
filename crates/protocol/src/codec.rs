use std::io::{self, Read, Write};

use bincode::config;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

/// Upper bound on a single frame's payload. A peer announcing a larger
/// frame is treated as misbehaving rather than trusted with the
/// allocation.
pub const MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("connection i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("frame length {len} exceeds the maximum frame size")]
    FrameTooLarge { len: usize },
    #[error("malformed frame payload: {0}")]
    Decode(#[from] bincode::error::DecodeError),
    #[error("failed to encode message: {0}")]
    Encode(#[from] bincode::error::EncodeError),
}

/// Read one message from `reader`.
///
/// Wire format:
///   - 4-byte big-endian length (u32)
///   - that many bytes of bincode payload
pub fn read_message<R, T>(reader: &mut R) -> Result<T, CodecError>
where
    R: Read,
    T: DeserializeOwned,
{
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf)?;
    let len = u32::from_be_bytes(len_buf) as usize;
    if len > MAX_FRAME_LEN {
        return Err(CodecError::FrameTooLarge { len });
    }

    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload)?;

    let (msg, _bytes_read): (T, usize) =
        bincode::serde::decode_from_slice(&payload, config::standard())?;
    Ok(msg)
}

/// Write one length-prefixed message to `writer` and flush it.
pub fn write_message<W, T>(writer: &mut W, msg: &T) -> Result<(), CodecError>
where
    W: Write,
    T: Serialize,
{
    let payload = bincode::serde::encode_to_vec(msg, config::standard())?;
    if payload.len() > MAX_FRAME_LEN {
        return Err(CodecError::FrameTooLarge { len: payload.len() });
    }

    let len = payload.len() as u32;
    writer.write_all(&len.to_be_bytes())?;
    writer.write_all(&payload)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
#[path = "codec_tests.rs"]
mod tests;
