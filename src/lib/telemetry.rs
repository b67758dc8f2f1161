//! Tracing setup for the browser. Events are formatted by `tracing-subscriber`
//! and written line by line to the developer console; timestamps and ANSI
//! colors are disabled because the console supplies both.

use std::io;
use tracing_subscriber::{EnvFilter, fmt};

/// Filter used when the configured directive does not parse.
const FALLBACK_FILTER: &str = "info";

/// Installs the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init(level: &str) {
    let subscriber = fmt()
        .with_env_filter(build_filter(level))
        .with_writer(ConsoleWriter::default)
        .with_ansi(false)
        .without_time()
        .with_target(true)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level.trim()).unwrap_or_else(|_| EnvFilter::new(FALLBACK_FILTER))
}

/// Buffers one formatted event and flushes it to the console on drop.
#[derive(Default)]
struct ConsoleWriter {
    buffer: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let line = String::from_utf8_lossy(&self.buffer);
        emit(line.trim_end());
        self.buffer.clear();
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let _ = io::Write::flush(self);
    }
}

#[cfg(target_arch = "wasm32")]
fn emit(line: &str) {
    web_sys::console::log_1(&wasm_bindgen::JsValue::from_str(line));
}

#[cfg(not(target_arch = "wasm32"))]
fn emit(line: &str) {
    eprintln!("{line}");
}

#[cfg(test)]
mod tests {
    use super::{ConsoleWriter, build_filter};
    use std::io::Write;

    #[test]
    fn build_filter_falls_back_on_garbage() {
        let filter = build_filter("authdash=notalevel");
        assert_eq!(filter.to_string(), "info");
    }

    #[test]
    fn build_filter_keeps_valid_directive() {
        let filter = build_filter(" debug ");
        assert_eq!(filter.to_string(), "debug");
    }

    #[test]
    fn console_writer_clears_buffer_on_flush() {
        let mut writer = ConsoleWriter::default();
        writer.write_all(b"hello\n").unwrap();
        assert_eq!(writer.buffer.len(), 6);
        writer.flush().unwrap();
        assert!(writer.buffer.is_empty());
    }
}
