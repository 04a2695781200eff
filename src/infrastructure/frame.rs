// Frame encoding - Wraps the dashboard document for the serial viewer
//
// Frame format:
// - PREFIX: `/*`
// - BODY: the JSON document, compact or indented
// - SUFFIX: `*/\r\n\r\n` (compact) or `\n*/\r\n\r\n` (pretty)
// - TERMINATOR: one `0` byte, not counted in the frame length
use serde::Serialize;
use std::io::{self, Cursor, Write};
use thiserror::Error;

pub const FRAME_PREFIX: &[u8] = b"/*";

pub const FRAME_END: &[u8] = b"*/";

pub const FRAME_TERMINATOR: u8 = 0;

/// Body rendering mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameMode {
    #[default]
    Compact,
    /// Two-space indentation; typically 3-4x the compact size
    Pretty,
}

impl FrameMode {
    pub fn from_pretty(pretty: bool) -> Self {
        if pretty {
            FrameMode::Pretty
        } else {
            FrameMode::Compact
        }
    }

    /// Bytes written after the body, excluding the terminator.
    pub fn suffix(self) -> &'static [u8] {
        match self {
            FrameMode::Compact => b"*/\r\n\r\n",
            FrameMode::Pretty => b"\n*/\r\n\r\n",
        }
    }

    /// Prefix, suffix and terminator together
    pub fn overhead(self) -> usize {
        FRAME_PREFIX.len() + self.suffix().len() + 1
    }
}

/// Errors that can occur during frame encoding
#[derive(Debug, Error)]
pub enum FrameError {
    /// The framed output does not fit the supplied buffer
    #[error("buffer too small for frame")]
    BufferTooSmall,

    #[error("failed to encode dashboard document: {0}")]
    Encode(#[source] serde_json::Error),
}

impl From<serde_json::Error> for FrameError {
    fn from(err: serde_json::Error) -> Self {
        // The only writers used here fail with `WriteZero` when full.
        if err.is_io() {
            FrameError::BufferTooSmall
        } else {
            FrameError::Encode(err)
        }
    }
}

/// Encode `value` as a frame into `buffer`.
///
/// Returns the number of bytes written, excluding the terminator. On error
/// the buffer contents are unspecified and nothing past its end is touched.
pub fn encode_frame<T: Serialize>(
    value: &T,
    buffer: &mut [u8],
    mode: FrameMode,
) -> Result<usize, FrameError> {
    let suffix = mode.suffix();
    if buffer.len() < mode.overhead() {
        return Err(FrameError::BufferTooSmall);
    }

    // Suffix and terminator are reserved before the body is rendered.
    let body_room = buffer.len() - mode.overhead();
    let body_start = FRAME_PREFIX.len();

    buffer[..body_start].copy_from_slice(FRAME_PREFIX);
    let body_len = write_body(value, &mut buffer[body_start..body_start + body_room], mode)?;
    if body_len == 0 {
        return Err(FrameError::BufferTooSmall);
    }

    let suffix_start = body_start + body_len;
    let end = suffix_start + suffix.len();
    buffer[suffix_start..end].copy_from_slice(suffix);
    buffer[end] = FRAME_TERMINATOR;

    Ok(end)
}

/// Exact buffer size `encode_frame` needs for `value`, terminator included.
pub fn measure_frame<T: Serialize>(value: &T, mode: FrameMode) -> Result<usize, FrameError> {
    let mut counter = ByteCounter::default();
    match mode {
        FrameMode::Compact => serde_json::to_writer(&mut counter, value)?,
        FrameMode::Pretty => serde_json::to_writer_pretty(&mut counter, value)?,
    }
    Ok(counter.0 + mode.overhead())
}

/// Locate the body of the first frame in `bytes`.
///
/// The body runs from the first `/*` to the last `*/`, so string values
/// containing the end delimiter do not cut the body short.
pub fn frame_body(bytes: &[u8]) -> Option<&[u8]> {
    let start = find(bytes, FRAME_PREFIX)? + FRAME_PREFIX.len();
    let end = rfind(&bytes[start..], FRAME_END)?;
    Some(&bytes[start..start + end])
}

fn write_body<T: Serialize>(
    value: &T,
    region: &mut [u8],
    mode: FrameMode,
) -> Result<usize, FrameError> {
    let mut cursor = Cursor::new(region);
    match mode {
        FrameMode::Compact => serde_json::to_writer(&mut cursor, value)?,
        FrameMode::Pretty => serde_json::to_writer_pretty(&mut cursor, value)?,
    }
    Ok(cursor.position() as usize)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).rposition(|w| w == needle)
}

/// `io::Write` sink that only counts bytes
#[derive(Debug, Default)]
struct ByteCounter(usize);

impl Write for ByteCounter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0 += buf.len();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
