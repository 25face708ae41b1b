//! Incremental parser for Server-Sent Events, as emitted by `streamGenerateContent?alt=sse`.
//!
//! Events are separated by a blank line. Only `data:` fields matter here; the
//! service does not send `event:` names, and `id:` / `retry:` / comments are
//! dropped.

/// Buffers partial frames across network chunk boundaries. Bytes stay raw
/// until a frame is complete, so a character split between chunks survives.
#[derive(Debug, Default)]
pub struct SseParser {
    buffer: Vec<u8>,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes. Returns the data payload of every frame completed by them.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        // CR never occurs inside a multi-byte sequence, so dropping it here is safe.
        self.buffer.extend(chunk.iter().copied().filter(|&b| b != b'\r'));

        let mut payloads = Vec::new();
        while let Some(boundary) = find_boundary(&self.buffer) {
            let frame: Vec<u8> = self.buffer.drain(..boundary + 2).collect();
            if let Some(data) = frame_data(&String::from_utf8_lossy(&frame)) {
                payloads.push(data);
            }
        }
        payloads
    }

    /// Flush a trailing frame that was not terminated by a blank line.
    pub fn finish(&mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.buffer);
        frame_data(&String::from_utf8_lossy(&rest))
    }
}

fn find_boundary(buffer: &[u8]) -> Option<usize> {
    buffer.windows(2).position(|pair| pair == b"\n\n")
}

fn frame_data(frame: &str) -> Option<String> {
    let lines: Vec<&str> = frame
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|val| val.strip_prefix(' ').unwrap_or(val))
        .collect();
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}
