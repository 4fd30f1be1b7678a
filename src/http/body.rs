//! Response bodies: in-memory bytes or a lazily read stream.

use bytes::Bytes;
use parking_lot::Mutex;
use std::fmt;
use std::io::{self, Read, Seek, SeekFrom};
use std::sync::Arc;

/// A readable byte source backing a streamed [`Body`].
pub trait BodyStream: Read + Send {
    /// Total length in bytes, if known up front.
    fn size(&self) -> Option<u64> {
        None
    }

    /// Seek back to the first byte. Returns `Ok(false)` for streams that
    /// cannot seek; they are emitted from their current position.
    fn rewind(&mut self) -> io::Result<bool> {
        Ok(false)
    }
}

/// Forward-only reader with an optional declared length.
struct ForwardStream<R> {
    reader: R,
    len: Option<u64>,
}

impl<R: Read> Read for ForwardStream<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl<R: Read + Send> BodyStream for ForwardStream<R> {
    fn size(&self) -> Option<u64> {
        self.len
    }
}

/// Seekable reader; its length is measured once when it is wrapped.
struct SeekableStream<R> {
    reader: R,
    len: u64,
}

impl<R: Read> Read for SeekableStream<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl<R: Read + Seek + Send> BodyStream for SeekableStream<R> {
    fn size(&self) -> Option<u64> {
        Some(self.len)
    }

    fn rewind(&mut self) -> io::Result<bool> {
        self.reader.seek(SeekFrom::Start(0))?;
        Ok(true)
    }
}

/// Stream handle shared between response values.
///
/// `with_*` transformations copy the response but not the stream, so every
/// copy reads from the same underlying position.
pub type SharedStream = Arc<Mutex<Box<dyn BodyStream>>>;

/// HTTP message body.
#[derive(Clone, Default)]
pub enum Body {
    /// No bytes. Has a known length of zero.
    #[default]
    Empty,
    /// Fully buffered bytes.
    Full(Bytes),
    /// Lazily read stream.
    Stream(SharedStream),
}

impl Body {
    /// Wrap a forward-only reader. `len` is reported as the body size when given.
    pub fn from_reader<R>(reader: R, len: Option<u64>) -> Self
    where
        R: Read + Send + 'static,
    {
        Self::from_stream(ForwardStream { reader, len })
    }

    /// Wrap a seekable reader such as a `File`.
    ///
    /// The length is measured by seeking to the end; the reader is then
    /// positioned back where it was.
    pub fn from_seekable<R>(mut reader: R) -> io::Result<Self>
    where
        R: Read + Seek + Send + 'static,
    {
        let current = reader.stream_position()?;
        let len = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(current))?;
        Ok(Self::from_stream(SeekableStream { reader, len }))
    }

    pub fn from_stream<S: BodyStream + 'static>(stream: S) -> Self {
        Body::Stream(Arc::new(Mutex::new(Box::new(stream))))
    }

    /// Length in bytes when it can be known without reading the body.
    #[must_use]
    pub fn size(&self) -> Option<u64> {
        match self {
            Body::Empty => Some(0),
            Body::Full(bytes) => Some(bytes.len() as u64),
            Body::Stream(stream) => stream.lock().size(),
        }
    }

    #[must_use]
    pub fn is_stream(&self) -> bool {
        matches!(self, Body::Stream(_))
    }

    /// Buffered bytes, if this body is not a stream.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Body::Empty => Some(&[]),
            Body::Full(bytes) => Some(bytes.as_ref()),
            Body::Stream(_) => None,
        }
    }

    /// Read the whole body into memory.
    ///
    /// Streams are rewound first when they support it.
    pub fn read_all(&self) -> io::Result<Vec<u8>> {
        match self {
            Body::Empty => Ok(Vec::new()),
            Body::Full(bytes) => Ok(bytes.to_vec()),
            Body::Stream(stream) => {
                let mut guard = stream.lock();
                guard.rewind()?;
                let mut out = Vec::new();
                guard.read_to_end(&mut out)?;
                Ok(out)
            }
        }
    }

    /// Read the whole body as UTF-8 text, replacing invalid sequences.
    pub fn to_text(&self) -> io::Result<String> {
        self.read_all()
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }

    /// A reader over the body, positioned where emission should start.
    pub(crate) fn reader(&self) -> io::Result<BodyReader> {
        match self {
            Body::Empty => Ok(BodyReader::Buffered(io::Cursor::new(Bytes::new()))),
            Body::Full(bytes) => Ok(BodyReader::Buffered(io::Cursor::new(bytes.clone()))),
            Body::Stream(stream) => {
                stream.lock().rewind()?;
                Ok(BodyReader::Shared(Arc::clone(stream)))
            }
        }
    }
}

/// Reader handed to the finalizer while emitting a body.
pub(crate) enum BodyReader {
    Buffered(io::Cursor<Bytes>),
    Shared(SharedStream),
}

impl Read for BodyReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            BodyReader::Buffered(cursor) => cursor.read(buf),
            BodyReader::Shared(stream) => stream.lock().read(buf),
        }
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Empty => f.write_str("Body::Empty"),
            Body::Full(bytes) => f.debug_tuple("Body::Full").field(&bytes.len()).finish(),
            Body::Stream(stream) => f
                .debug_struct("Body::Stream")
                .field("size", &stream.lock().size())
                .finish(),
        }
    }
}

impl From<String> for Body {
    fn from(s: String) -> Self {
        if s.is_empty() {
            Body::Empty
        } else {
            Body::Full(Bytes::from(s))
        }
    }
}

impl From<&str> for Body {
    fn from(s: &str) -> Self {
        Body::from(s.to_string())
    }
}

impl From<Vec<u8>> for Body {
    fn from(v: Vec<u8>) -> Self {
        if v.is_empty() {
            Body::Empty
        } else {
            Body::Full(Bytes::from(v))
        }
    }
}

impl From<Bytes> for Body {
    fn from(b: Bytes) -> Self {
        Body::Full(b)
    }
}
