use indicatif::ProgressBar;

/// A live progress display that also offers a line-output channel which does
/// not tear its rendering.
pub trait ProgressLine: Send {
    fn write_line(&self, line: &str);

    /// Move the indicator forward by one unit.
    fn advance(&self);
}

impl ProgressLine for ProgressBar {
    fn write_line(&self, line: &str) {
        self.println(line);
    }

    fn advance(&self) {
        self.inc(1);
    }
}
