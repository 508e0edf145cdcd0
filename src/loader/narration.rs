use tracing::{info, warn};

/// Human-readable log of one load, kept for troubleshooting displays.
#[derive(Debug, Default)]
pub(crate) struct Narration {
    lines: Vec<String>,
}

impl Narration {
    pub(crate) fn info(&mut self, line: impl Into<String>) {
        let line = line.into();
        info!("{}", line);
        self.lines.push(line);
    }

    pub(crate) fn warn(&mut self, line: impl Into<String>) {
        let line = line.into();
        warn!("{}", line);
        self.lines.push(line);
    }

    pub(crate) fn into_lines(self) -> Vec<String> {
        self.lines
    }
}
