//! Length-prefixed framing for streams and capture files holding several
//! records back to back.
//!
//! ```text
//! +----------------+-----------------+
//! | length (4 LE)  |  record bytes   |
//! +----------------+-----------------+
//! ```
//!
//! Brokers that already delimit messages do not need this; it exists for
//! pipes, sockets and files.

use std::io::{ErrorKind, Read, Write};

use crate::MAX_FRAME_SIZE;
use crate::codec::{self, Record, RecordKind};
use crate::error::{ProtocolError, ProtocolResult};

/// Encodes a record as one frame.
pub fn encode_frame(record: &Record) -> ProtocolResult<Vec<u8>> {
    frame_bytes(&codec::encode(record))
}

/// Decodes a single complete frame holding a record of the given kind.
pub fn decode_frame(kind: RecordKind, data: &[u8]) -> ProtocolResult<Record> {
    if data.len() < 4 {
        return Err(ProtocolError::TruncatedInput {
            field: "frame.length",
            needed: 4,
            remaining: data.len(),
        });
    }

    let mut len_bytes = [0u8; 4];
    len_bytes.copy_from_slice(&data[..4]);
    let len = checked_len(u32::from_le_bytes(len_bytes))?;

    let body = &data[4..];
    if body.len() < len {
        return Err(ProtocolError::TruncatedInput {
            field: "frame",
            needed: len,
            remaining: body.len(),
        });
    }
    if body.len() > len {
        return Err(ProtocolError::MalformedEncoding {
            field: "frame",
            reason: format!("{} trailing bytes after frame", body.len() - len),
        });
    }

    codec::decode(kind, body)
}

fn frame_bytes(payload: &[u8]) -> ProtocolResult<Vec<u8>> {
    let len = u32::try_from(payload.len()).unwrap_or(u32::MAX);
    if len > MAX_FRAME_SIZE {
        return Err(ProtocolError::FrameTooLarge {
            size: len,
            max: MAX_FRAME_SIZE,
        });
    }

    let mut buffer = Vec::with_capacity(4 + payload.len());
    buffer.extend_from_slice(&len.to_le_bytes());
    buffer.extend_from_slice(payload);
    Ok(buffer)
}

fn checked_len(len: u32) -> ProtocolResult<usize> {
    if len > MAX_FRAME_SIZE {
        return Err(ProtocolError::FrameTooLarge {
            size: len,
            max: MAX_FRAME_SIZE,
        });
    }
    if len == 0 {
        return Err(ProtocolError::EmptyFrame);
    }
    Ok(len as usize)
}

/// Reads framed records from a byte stream.
pub struct FrameReader<R> {
    reader: R,
}

impl<R: Read> FrameReader<R> {
    /// Creates a new FrameReader wrapping the given reader.
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Reads the body of the next frame.
    ///
    /// Returns `Ok(None)` on a clean end of stream between frames. A stream
    /// that stops inside a frame is `TruncatedInput`.
    pub fn read_frame(&mut self) -> ProtocolResult<Option<Vec<u8>>> {
        let mut len_buf = [0u8; 4];
        match self.fill(&mut len_buf)? {
            0 => return Ok(None),
            4 => {}
            got => {
                return Err(ProtocolError::TruncatedInput {
                    field: "frame.length",
                    needed: 4,
                    remaining: got,
                });
            }
        }

        let len = checked_len(u32::from_le_bytes(len_buf))?;

        let mut payload = vec![0u8; len];
        let got = self.fill(&mut payload)?;
        if got < len {
            return Err(ProtocolError::TruncatedInput {
                field: "frame",
                needed: len,
                remaining: got,
            });
        }

        Ok(Some(payload))
    }

    /// Reads and decodes the next record.
    pub fn read_record(&mut self, kind: RecordKind) -> ProtocolResult<Option<Record>> {
        match self.read_frame()? {
            Some(payload) => codec::decode(kind, &payload).map(Some),
            None => Ok(None),
        }
    }

    /// Reads until `buf` is full or the stream ends, returning the byte count.
    fn fill(&mut self, buf: &mut [u8]) -> ProtocolResult<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(filled)
    }

    /// Returns a reference to the underlying reader.
    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Unwraps this FrameReader, returning the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

/// Writes framed records to a byte stream.
pub struct FrameWriter<W> {
    writer: W,
}

impl<W: Write> FrameWriter<W> {
    /// Creates a new FrameWriter wrapping the given writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Writes already-encoded record bytes as one frame.
    pub fn write_frame(&mut self, payload: &[u8]) -> ProtocolResult<()> {
        let data = frame_bytes(payload)?;
        self.writer.write_all(&data)?;
        Ok(())
    }

    /// Encodes and writes a single record.
    pub fn write_record(&mut self, record: &Record) -> ProtocolResult<()> {
        self.write_frame(&codec::encode(record))
    }

    /// Flushes the underlying writer.
    pub fn flush(&mut self) -> ProtocolResult<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Returns a reference to the underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Unwraps this FrameWriter, returning the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::log::Log;
    use crate::message::{Message, Subject};
    use crate::types::Coordinate;

    fn log(code: i32, text: &str) -> Record {
        Log::from_raw(code, text, "2024-01-01T00:00:00Z").unwrap().into()
    }

    #[test]
    fn encode_decode_roundtrip() {
        let record = log(3, "taxi 1 reconnected");
        let bytes = encode_frame(&record).unwrap();

        let len = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        assert_eq!(len as usize, bytes.len() - 4);

        assert_eq!(decode_frame(RecordKind::Log, &bytes).unwrap(), record);
    }

    #[test]
    fn decode_incomplete_length() {
        let result = decode_frame(RecordKind::Log, &[0, 0]);
        assert!(matches!(
            result,
            Err(ProtocolError::TruncatedInput { needed: 4, .. })
        ));
    }

    #[test]
    fn decode_incomplete_payload() {
        let mut data = 100u32.to_le_bytes().to_vec();
        data.extend_from_slice(&[0u8; 10]);
        assert!(matches!(
            decode_frame(RecordKind::Map, &data),
            Err(ProtocolError::TruncatedInput { .. })
        ));
    }

    #[test]
    fn frame_too_large() {
        let data = (MAX_FRAME_SIZE + 1).to_le_bytes();
        assert!(matches!(
            decode_frame(RecordKind::Map, &data),
            Err(ProtocolError::FrameTooLarge { .. })
        ));
    }

    #[test]
    fn frame_reader_empty_stream() {
        let mut reader = FrameReader::new(Cursor::new(Vec::new()));
        assert!(reader.read_record(RecordKind::Log).unwrap().is_none());
    }

    #[test]
    fn frame_reader_writer_roundtrip() {
        let records = vec![
            log(0, "server started"),
            log(101, "unknown taxi 9"),
            log(205, "taxi disconnected"),
        ];

        let mut buffer = Vec::new();
        {
            let mut writer = FrameWriter::new(&mut buffer);
            for record in &records {
                writer.write_record(record).unwrap();
            }
            writer.flush().unwrap();
        }

        let mut reader = FrameReader::new(Cursor::new(buffer));
        for expected in &records {
            let actual = reader.read_record(RecordKind::Log).unwrap().unwrap();
            assert_eq!(&actual, expected);
        }
        assert!(reader.read_record(RecordKind::Log).unwrap().is_none());
    }

    #[test]
    fn frame_reader_mixed_kinds_need_caller_kind() {
        let message: Record = Message::builder()
            .subject(Subject::GoTo)
            .taxi_id(1)
            .coord(Coordinate::new(2, 2))
            .build()
            .unwrap()
            .into();

        let mut buffer = Vec::new();
        FrameWriter::new(&mut buffer).write_record(&message).unwrap();

        let mut reader = FrameReader::new(Cursor::new(buffer));
        assert_eq!(
            reader.read_record(RecordKind::Message).unwrap(),
            Some(message)
        );
    }

    #[test]
    fn frame_reader_empty_frame_error() {
        let buffer = 0u32.to_le_bytes().to_vec();
        let mut reader = FrameReader::new(Cursor::new(buffer));
        assert!(matches!(
            reader.read_frame(),
            Err(ProtocolError::EmptyFrame)
        ));
    }

    #[test]
    fn frame_reader_stream_cut_mid_frame() {
        let bytes = encode_frame(&log(1, "map loaded")).unwrap();

        let mut reader = FrameReader::new(Cursor::new(bytes[..2].to_vec()));
        assert!(reader.read_frame().unwrap_err().is_truncation());

        let mut reader = FrameReader::new(Cursor::new(bytes[..bytes.len() - 1].to_vec()));
        assert!(reader.read_frame().unwrap_err().is_truncation());
    }
}
