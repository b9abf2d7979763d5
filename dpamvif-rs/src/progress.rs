//! Progress reporting for VIF generation.
//!
//! The generator reports completion percentages at fixed checkpoints
//! (0/10/30/50/80/100). Callers inject a [`ProgressSink`]; the default is a
//! textual bar on stdout.

use std::io::Write;

/// Receives completion values from the generator.
pub trait ProgressSink {
    /// Called with the current completion value, 0 through the total.
    fn set_value(&mut self, value: u32);
}

/// Any closure over a completion value is a sink.
impl<F: FnMut(u32)> ProgressSink for F {
    fn set_value(&mut self, value: u32) {
        self(value)
    }
}

/// A sink that discards progress.
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn set_value(&mut self, _value: u32) {}
}

/// Renders a terminal progress bar, redrawn in place with a carriage
/// return and closed out with a newline once the total is reached.
pub struct TextProgressBar {
    total: u32,
    prefix: String,
    suffix: String,
    decimals: usize,
    length: usize,
    fill: char,
}

impl Default for TextProgressBar {
    fn default() -> Self {
        Self::new(100)
    }
}

impl TextProgressBar {
    /// Creates a bar that completes at `total`.
    pub fn new(total: u32) -> Self {
        TextProgressBar {
            total: total.max(1),
            prefix: String::new(),
            suffix: String::new(),
            decimals: 1,
            length: 100,
            fill: '+',
        }
    }

    /// Sets the text printed before the bar.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Sets the text printed after the percentage.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Sets the character length of the bar.
    pub fn with_length(mut self, length: usize) -> Self {
        self.length = length.max(1);
        self
    }

    /// Renders one frame of the bar.
    fn render(&self, value: u32) -> String {
        let percent = 100.0 * f64::from(value) / f64::from(self.total);
        let filled = (self.length as u64 * u64::from(value) / u64::from(self.total))
            .min(self.length as u64) as usize;
        let bar: String = std::iter::repeat(self.fill)
            .take(filled)
            .chain(std::iter::repeat('-').take(self.length - filled))
            .collect();
        format!(
            "\r{} |{}| {:.*}% {}",
            self.prefix, bar, self.decimals, percent, self.suffix
        )
    }
}

impl ProgressSink for TextProgressBar {
    fn set_value(&mut self, value: u32) {
        let mut stdout = std::io::stdout();
        let _ = stdout.write_all(self.render(value).as_bytes());
        let _ = stdout.flush();
        if value >= self.total {
            let _ = stdout.write_all(b"\n");
        }
    }
}
