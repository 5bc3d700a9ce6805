/// Receives upload progress as a fraction in `[0.0, 1.0]`.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, fraction: f64);
}

impl<F> ProgressReporter for F
where
    F: Fn(f64) + Send + Sync,
{
    fn report(&self, fraction: f64) {
        self(fraction)
    }
}

// ---------------------------------------------------------------------------
// ProgressTracker
// ---------------------------------------------------------------------------

/// Accumulates processed bytes for one upload and forwards the ratio.
///
/// Reported values never decrease, and `1.0` is reported exactly when the
/// processed count reaches the total.
pub struct ProgressTracker<'a> {
    reporter: &'a dyn ProgressReporter,
    total: u64,
    processed: u64,
    last: f64,
}

impl<'a> ProgressTracker<'a> {
    /// Creates a tracker for `total` bytes.
    pub fn new(reporter: &'a dyn ProgressReporter, total: u64) -> Self {
        Self {
            reporter,
            total,
            processed: 0,
            last: 0.0,
        }
    }

    /// Records `bytes` more processed bytes and reports the new ratio.
    pub fn advance(&mut self, bytes: u64) -> f64 {
        self.processed = self.processed.saturating_add(bytes).min(self.total);
        self.emit()
    }

    /// Reports completion of an upload that had nothing to transfer.
    pub fn complete_empty(&mut self) -> f64 {
        self.emit()
    }

    /// Bytes processed so far.
    pub fn processed(&self) -> u64 {
        self.processed
    }

    fn emit(&mut self) -> f64 {
        let fraction = if self.total == 0 {
            1.0
        } else {
            self.processed as f64 / self.total as f64
        };
        let fraction = fraction.max(self.last);
        self.last = fraction;
        self.reporter.report(fraction);
        fraction
    }
}
