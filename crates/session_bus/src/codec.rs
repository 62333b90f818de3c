use crate::error::BusError;
use crate::message::BusMessage;
use bytes::{Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder, LengthDelimitedCodec};

/// Largest accepted frame.
pub const MAX_FRAME_LENGTH: usize = 8 * 1024 * 1024;

/// Frames bus messages as a 4-byte big-endian length followed by JSON.
#[derive(Debug)]
pub struct BusCodec {
    frames: LengthDelimitedCodec,
}

impl BusCodec {
    pub fn new() -> Self {
        Self {
            frames: LengthDelimitedCodec::builder()
                .length_field_length(4)
                .max_frame_length(MAX_FRAME_LENGTH)
                .new_codec(),
        }
    }
}

impl Default for BusCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for BusCodec {
    type Item = BusMessage;
    type Error = BusError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<BusMessage>, BusError> {
        match self.frames.decode(src)? {
            Some(frame) => Ok(Some(serde_json::from_slice(&frame)?)),
            None => Ok(None),
        }
    }
}

impl Encoder<BusMessage> for BusCodec {
    type Error = BusError;

    fn encode(&mut self, message: BusMessage, dst: &mut BytesMut) -> Result<(), BusError> {
        let body = serde_json::to_vec(&message)?;
        self.frames.encode(Bytes::from(body), dst)?;
        Ok(())
    }
}
