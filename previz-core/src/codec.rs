//! Framing codec for the bridge wire protocol.
//!
//! # Wire format
//!
//! All integers and floats are little-endian.
//!
//! ```text
//! message id:  u16 (2)
//! id 0:        u32 document length (4), JSON document (length bytes)
//! id 1:        f32 delta time (4)
//! other:      (no body)
//! ```
//!
//! Replies:
//!
//! ```text
//! id 0 / unknown:  u8 acknowledgement (value 0)
//! id 1:            u16 width, u16 height, width*height*3 RGB bytes
//! ```
//!
//! Unknown ids are assumed bodiless: the decoder consumes only the two
//! id bytes and the session acks. A future message kind that does carry
//! a body would desynchronize framing, so extending the protocol means
//! assigning the new kind a length-prefixed envelope first.
//!
//! Decoding is incremental: `decode` returns `Ok(None)` until a whole
//! message is buffered, so a body fragmented across arbitrarily many
//! reads yields the same document as a single-shot delivery.

use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::error::BridgeError;
use crate::message::{MSG_CONTENT_UPDATE, MSG_FRAME_REQUEST, Message, Reply};
use crate::update::ContentUpdate;

/// Upper bound for a single content-update document. A length field
/// beyond this is treated as corrupt framing, not a real document.
pub const MAX_DOCUMENT_SIZE: usize = 64 * 1024 * 1024;

/// Stateless encoder/decoder for bridge messages.
#[derive(Debug, Default)]
pub struct BridgeCodec;

impl Decoder for BridgeCodec {
    type Item = Message;
    type Error = BridgeError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Message>, BridgeError> {
        if src.len() < 2 {
            return Ok(None);
        }
        let id = u16::from_le_bytes([src[0], src[1]]);
        match id {
            MSG_CONTENT_UPDATE => {
                if src.len() < 6 {
                    return Ok(None);
                }
                let len = u32::from_le_bytes([src[2], src[3], src[4], src[5]]) as usize;
                if len > MAX_DOCUMENT_SIZE {
                    return Err(BridgeError::DocumentTooLarge {
                        size: len,
                        max: MAX_DOCUMENT_SIZE,
                    });
                }
                if src.len() < 6 + len {
                    // Grow once for the rest of the body instead of
                    // reallocating as it trickles in.
                    src.reserve(6 + len - src.len());
                    return Ok(None);
                }
                src.advance(6);
                let body = src.split_to(len);
                let document = serde_json::from_slice(&body)?;
                Ok(Some(Message::ContentUpdate(ContentUpdate::new(document))))
            }
            MSG_FRAME_REQUEST => {
                if src.len() < 6 {
                    return Ok(None);
                }
                src.advance(2);
                let dt = f32::from_le_bytes([src[0], src[1], src[2], src[3]]);
                src.advance(4);
                Ok(Some(Message::FrameRequest { dt }))
            }
            id => {
                src.advance(2);
                Ok(Some(Message::Unknown { id }))
            }
        }
    }
}

impl Encoder<Reply> for BridgeCodec {
    type Error = BridgeError;

    fn encode(&mut self, item: Reply, dst: &mut BytesMut) -> Result<(), BridgeError> {
        match item {
            Reply::Ack => dst.put_u8(0),
            Reply::Frame(snapshot) => {
                dst.reserve(4 + snapshot.pixels().len());
                dst.put_u16_le(snapshot.width());
                dst.put_u16_le(snapshot.height());
                dst.extend_from_slice(snapshot.pixels());
            }
        }
        Ok(())
    }
}
