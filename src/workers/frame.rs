//! # Wire frames.
//!
//! One [`Message`] per line, serialized as externally tagged JSON. Blank
//! lines are skipped on read so a worker may interleave plain diagnostics
//! streams elsewhere without breaking the protocol stream.

use std::io::{BufRead, Write};

use crate::error::WorkerError;
use crate::signals::Message;

/// Writes one message frame and flushes.
pub(crate) fn write_frame<W: Write>(writer: &mut W, msg: &Message) -> Result<(), WorkerError> {
    let line = serde_json::to_string(msg).map_err(WorkerError::Frame)?;
    writer.write_all(line.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Reads the next message frame.
///
/// Returns `Ok(None)` on clean end-of-stream.
pub(crate) fn read_frame<R: BufRead>(reader: &mut R) -> Result<Option<Message>, WorkerError> {
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        return serde_json::from_str(trimmed)
            .map(Some)
            .map_err(WorkerError::Frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_frames_round_trip_through_a_stream() {
        let mut buf = Vec::new();
        write_frame(&mut buf, &Message::signal("CHECK")).unwrap();
        write_frame(&mut buf, &Message::payload(7)).unwrap();

        let mut reader = Cursor::new(buf);
        assert_eq!(read_frame(&mut reader).unwrap(), Some(Message::signal("CHECK")));
        assert_eq!(read_frame(&mut reader).unwrap(), Some(Message::payload(7)));
        assert_eq!(read_frame(&mut reader).unwrap(), None);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let mut reader = Cursor::new(b"\n\n{\"kind\":\"signal\",\"body\":\"DONE\"}\n".to_vec());
        assert_eq!(read_frame(&mut reader).unwrap(), Some(Message::signal("DONE")));
    }

    #[test]
    fn test_garbage_line_is_an_error() {
        let mut reader = Cursor::new(b"not json\n".to_vec());
        let err = read_frame(&mut reader).unwrap_err();
        assert_eq!(err.as_label(), "worker_bad_frame");
    }
}
