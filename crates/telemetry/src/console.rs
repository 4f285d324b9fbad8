//! Browser console output for `wasm32` hosts.

use crate::init_with_writer;
use pointradius_core::config::LoggingConfig;
use std::io;
use tracing_subscriber::fmt::MakeWriter;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console, js_name = log)]
    fn console_log(line: &str);
}

/// Hands each formatted event to `console.log`.
struct ConsoleWriter;

/// Buffers one event and writes it when dropped.
struct ConsoleLine(Vec<u8>);

impl io::Write for ConsoleLine {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleLine {
    fn drop(&mut self) {
        let line = String::from_utf8_lossy(&self.0);
        let line = line.trim_end();
        if !line.is_empty() {
            console_log(line);
        }
    }
}

impl<'a> MakeWriter<'a> for ConsoleWriter {
    type Writer = ConsoleLine;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleLine(Vec::new())
    }
}

/// Initialize browser console logging from the `[logging]` configuration section
///
/// Timestamps are left to the console, which has no access to a wall clock
/// from `wasm32-unknown-unknown` anyway.
pub fn init_console(config: &LoggingConfig) -> anyhow::Result<()> {
    init_with_writer(config, ConsoleWriter, true)
}
