use bytes::BytesMut;
use std::{env, str};
use tokio_util::codec::{Decoder, Encoder};

use crate::Error;

/// Frames the byte stream into text lines. A message is everything up to
/// the next `\n`; a trailing `\r` is stripped so CRLF clients work too.
pub struct LineCodec;

impl LineCodec {
    fn max_line_length() -> usize {
        env::var("MAX_LINE_LENGTH")
            .map(|s| s.parse().expect("MAX_LINE_LENGTH must be a number"))
            .unwrap_or(8 * 1024)
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let Some(position) = src.iter().position(|b| *b == b'\n') else {
            // No full line yet. Cap how much a client may buffer before
            // ever sending a newline.
            if src.len() > LineCodec::max_line_length() {
                return Err("line length exceeds limit".into());
            }
            return Ok(None);
        };

        // Remove the parsed line from the buffer, terminator included.
        let mut line = src.split_to(position + 1);
        line.truncate(position);
        if line.last() == Some(&b'\r') {
            line.truncate(line.len() - 1);
        }

        let line = str::from_utf8(&line)?.to_string();
        Ok(Some(line))
    }
}

impl Encoder<String> for LineCodec {
    type Error = Error;

    fn encode(&mut self, item: String, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.extend_from_slice(item.as_bytes());
        dst.extend_from_slice(b"\n");
        Ok(())
    }
}
