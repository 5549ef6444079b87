/// Loss observed at the start of one epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochRecord {
    pub epoch: usize,
    pub loss: f64,
}

/// Append-only sequence of epoch records, one per epoch run.
#[derive(Debug, Clone, Default)]
pub struct LossHistory {
    records: Vec<EpochRecord>,
}

impl LossHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        LossHistory {
            records: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, epoch: usize, loss: f64) {
        self.records.push(EpochRecord { epoch, loss });
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&EpochRecord> {
        self.records.last()
    }

    pub fn records(&self) -> &[EpochRecord] {
        &self.records
    }

    /// `(epoch, loss)` pairs for plotting.
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.records
            .iter()
            .map(|r| (r.epoch as f64, r.loss))
            .collect()
    }

    /// Mean loss of each consecutive, non-overlapping window of `window`
    /// epochs. A trailing partial window is included.
    pub fn window_means(&self, window: usize) -> Vec<f64> {
        if window == 0 {
            return Vec::new();
        }
        self.records
            .chunks(window)
            .map(|c| c.iter().map(|r| r.loss).sum::<f64>() / c.len() as f64)
            .collect()
    }
}
