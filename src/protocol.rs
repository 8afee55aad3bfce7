//! Wire protocol between the coordinator and its workers.
//!
//! Four message kinds cover the whole session: a worker joins, the
//! coordinator broadcasts one assignment after the quorum, and from then on
//! every frame is a ready/advance exchange. Messages are framed as a
//! big-endian `u32` length prefix followed by a bincode payload, over any
//! reliable, ordered byte stream.

use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Upper bound on a single frame. The assignment carries the full global
/// field, so the cap is sized for large walls rather than chat traffic.
pub const MAX_FRAME_LEN: u32 = 64 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Message {
    /// Worker requests admission to the session.
    Join,
    /// One-shot partitioned-state broadcast, sent when the quorum is met.
    Assignment {
        equation: String,
        width: usize,
        height: usize,
        initial: Array2<f64>,
    },
    /// Worker finished rendering its local frame.
    Ready,
    /// Barrier release: every worker advances one step.
    Advance,
}

pub fn write_message<W: Write>(writer: &mut W, message: &Message) -> Result<()> {
    let payload = bincode::serialize(message).map_err(|e| Error::frame(&e.to_string()))?;
    if payload.len() as u64 > MAX_FRAME_LEN as u64 {
        return Err(Error::Frame(format!(
            "frame of {} bytes exceeds the {} byte cap",
            payload.len(),
            MAX_FRAME_LEN
        )));
    }
    writer.write_u32::<BigEndian>(payload.len() as u32)?;
    writer.write_all(&payload)?;
    writer.flush()?;
    Ok(())
}

pub fn read_message<R: Read>(reader: &mut R) -> Result<Message> {
    let len = reader.read_u32::<BigEndian>()?;
    if len > MAX_FRAME_LEN {
        return Err(Error::Frame(format!(
            "peer announced a {} byte frame, cap is {}",
            len, MAX_FRAME_LEN
        )));
    }
    let mut payload = vec![0u8; len as usize];
    reader.read_exact(&mut payload)?;
    bincode::deserialize(&payload).map_err(|e| Error::frame(&e.to_string()))
}
