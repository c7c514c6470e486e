//! Line reassembly for RTT reads.

/// Splits a byte stream into lines. A line cut off at the end of one read
/// is held until the rest arrives.
#[derive(Debug, Default)]
pub struct LineSplitter {
    partial: String,
}

impl LineSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `chunk` and return every line it completes, without line
    /// endings.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.partial.push_str(&String::from_utf8_lossy(chunk));

        let mut lines = Vec::new();
        while let Some(end) = self.partial.find('\n') {
            let line: String = self.partial.drain(..=end).collect();
            lines.push(line.trim_end_matches(['\n', '\r']).to_string());
        }
        lines
    }

    /// Text received after the last newline.
    pub fn pending(&self) -> &str {
        &self.partial
    }
}
