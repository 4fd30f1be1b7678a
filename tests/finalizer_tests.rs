use brrtmvc::finalizer::{BufferSink, OutputSink, ResponseFinalizer, WriterSink, DEFAULT_CHUNK_SIZE};
use brrtmvc::http::{Body, Response};
use std::io::{self, Cursor, Read};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Stream that counts how many bytes were pulled from it.
struct Counting {
    inner: Cursor<Vec<u8>>,
    pulled: Arc<AtomicUsize>,
}

impl Read for Counting {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.pulled.fetch_add(n, Ordering::SeqCst);
        Ok(n)
    }
}

#[test]
fn test_empty_statuses_lose_body_headers() {
    let finalizer = ResponseFinalizer::new();
    for status in [204u16, 205, 304] {
        let res = Response::html("should not be sent")
            .with_status(status)
            .with_header("Content-Length", "18");
        let mut sink = BufferSink::new();
        let res = finalizer.send(res, &mut sink).unwrap();

        assert!(res.header("Content-Type").is_none());
        assert!(res.header("Content-Length").is_none());
        assert!(sink.header_values("Content-Type").is_empty());
        assert!(sink.header_values("Content-Length").is_empty());
        assert!(sink.body().is_empty());
        assert!(sink.chunk_sizes().is_empty());
    }
}

#[test]
fn test_content_length_is_written_once() {
    let res = Response::html("hello")
        .with_added_header("Content-Length", "1")
        .with_added_header("Content-Length", "2");
    let mut sink = BufferSink::new();
    ResponseFinalizer::new().send(res, &mut sink).unwrap();
    assert_eq!(sink.header_values("Content-Length"), ["5"]);
    assert_eq!(sink.status_line(), Some("HTTP/1.1 200 OK"));
}

#[test]
fn test_large_body_is_chunked() {
    let payload = vec![b'a'; 2500];
    let mut sink = BufferSink::new();
    let report = ResponseFinalizer::new()
        .emit(&Response::html(payload.clone()), &mut sink)
        .unwrap();
    assert_eq!(sink.chunk_sizes(), [DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_SIZE, 452]);
    assert_eq!(sink.body(), payload.as_slice());
    assert_eq!(report.chunks, 3);
    assert_eq!(report.bytes_written, 2500);
}

#[test]
fn test_disconnect_stops_reading_the_stream() {
    let pulled = Arc::new(AtomicUsize::new(0));
    let stream = Counting {
        inner: Cursor::new(vec![b'z'; 10 * 1024]),
        pulled: Arc::clone(&pulled),
    };
    let res = Response::default().with_body(Body::from_reader(stream, Some(10 * 1024)));

    let mut sink = BufferSink::new().disconnect_after_chunks(2);
    let res = ResponseFinalizer::new().send(res, &mut sink).unwrap();

    assert_eq!(res.header("Content-Length"), Some("10240"));
    assert_eq!(sink.chunk_sizes(), [1024, 1024]);
    assert_eq!(sink.body().len(), 2048);
    assert_eq!(pulled.load(Ordering::SeqCst), 2048);
}

#[test]
fn test_emit_report_flags_abort() {
    let res = Response::html(vec![0u8; 4096]);
    let mut sink = BufferSink::new().disconnect_after_chunks(1);
    let report = ResponseFinalizer::new().emit(&res, &mut sink).unwrap();
    assert!(report.aborted);
    assert!(report.headers_written);
    assert_eq!(report.chunks, 1);
}

#[test]
fn test_second_emit_does_not_repeat_headers() {
    let finalizer = ResponseFinalizer::new();
    let res = finalizer.finalize(Response::html("once"));
    let mut sink = BufferSink::new();

    let first = finalizer.emit(&res, &mut sink).unwrap();
    let second = finalizer.emit(&res, &mut sink).unwrap();

    assert!(first.headers_written);
    assert!(!second.headers_written);
    assert_eq!(sink.status_lines_written(), 1);
    assert_eq!(sink.header_values("Content-Type"), ["text/html"]);
    assert_eq!(sink.body(), b"onceonce");
}

#[test]
fn test_seekable_stream_is_sent_from_the_start() {
    let mut cursor = Cursor::new(b"0123456789".to_vec());
    cursor.set_position(4);
    let body = Body::from_seekable(cursor).unwrap();
    assert_eq!(body.size(), Some(10));

    let mut sink = BufferSink::new();
    let res = ResponseFinalizer::new()
        .send(Response::default().with_body(body), &mut sink)
        .unwrap();
    assert_eq!(res.header("Content-Length"), Some("10"));
    assert_eq!(sink.body(), b"0123456789");
}

#[test]
fn test_writer_sink_produces_http_message() {
    let res = Response::new(201)
        .with_protocol_version("1.0")
        .with_header("X-Id", "7")
        .with_body("made");
    let mut sink = WriterSink::new(Vec::new());
    ResponseFinalizer::new().send(res, &mut sink).unwrap();
    assert!(sink.headers_sent());

    let wire = String::from_utf8(sink.into_inner()).unwrap();
    assert!(wire.starts_with("HTTP/1.0 201 Created\r\n"));
    assert!(wire.contains("X-Id: 7\r\n"));
    assert!(wire.contains("Content-Length: 4\r\n"));
    assert!(wire.ends_with("\r\n\r\nmade"));
}
