//! Destinations for the `print` and `printerr` builtins.
//!
//! Embedders print to the console, capture into a buffer (tests, previews),
//! or discard output entirely (sandboxed evaluation).

use std::sync::Arc;

use parking_lot::Mutex;

/// Which stream a line is written to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Stream {
    /// `print`.
    Out,
    /// `printerr`.
    Err,
}

/// Captures both streams into separate buffers.
#[derive(Default)]
pub struct BufferPrintHandler {
    out: Mutex<String>,
    err: Mutex<String>,
}

impl BufferPrintHandler {
    pub fn new() -> Self {
        Self::default()
    }

    fn buffer(&self, stream: Stream) -> &Mutex<String> {
        match stream {
            Stream::Out => &self.out,
            Stream::Err => &self.err,
        }
    }

    pub fn println(&self, stream: Stream, msg: &str) {
        let mut buf = self.buffer(stream).lock();
        buf.push_str(msg);
        buf.push('\n');
    }

    /// Everything written to `stream` so far.
    pub fn output(&self, stream: Stream) -> String {
        self.buffer(stream).lock().clone()
    }

    pub fn clear(&self) {
        self.out.lock().clear();
        self.err.lock().clear();
    }
}

/// Print destination, dispatched by enum rather than trait object.
pub enum PrintHandler {
    /// `print` to stdout, `printerr` to stderr.
    Console,
    Buffer(BufferPrintHandler),
    /// Discards everything.
    Silent,
}

impl PrintHandler {
    /// Write `msg` followed by a newline.
    pub fn println(&self, stream: Stream, msg: &str) {
        match self {
            Self::Console => match stream {
                Stream::Out => println!("{msg}"),
                Stream::Err => eprintln!("{msg}"),
            },
            Self::Buffer(h) => h.println(stream, msg),
            Self::Silent => {}
        }
    }

    /// Captured output for `stream`. Empty for handlers that don't capture.
    pub fn output(&self, stream: Stream) -> String {
        match self {
            Self::Buffer(h) => h.output(stream),
            Self::Console | Self::Silent => String::new(),
        }
    }

    pub fn clear(&self) {
        if let Self::Buffer(h) = self {
            h.clear();
        }
    }
}

/// Print handler shared between an embedder and its interpreters.
pub type SharedPrintHandler = Arc<PrintHandler>;

pub fn console_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::Console)
}

pub fn buffer_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::Buffer(BufferPrintHandler::new()))
}

pub fn silent_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::Silent)
}
