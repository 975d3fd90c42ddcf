//! Progress events published by the worker while bytes move.

use tgup_transfer::{TransferEstimate, estimate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferDirection {
    Upload,
    Download,
}

impl std::fmt::Display for TransferDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransferDirection::Upload => write!(f, "upload"),
            TransferDirection::Download => write!(f, "download"),
        }
    }
}

/// One progress sample.
///
/// Published on a latest-value channel: the producer reads the most recent
/// sample on its own tick, intermediate samples are overwritten rather
/// than queued.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEvent {
    pub direction: TransferDirection,
    pub file_name: String,
    pub bytes_done: u64,
    pub bytes_total: u64,
    /// Seconds since the transfer started.
    pub elapsed_secs: f64,
}

impl ProgressEvent {
    /// Percent, speed and ETA derived from this sample.
    pub fn estimate(&self) -> TransferEstimate {
        estimate(self.bytes_done, self.bytes_total, self.elapsed_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_uses_sample_fields() {
        let event = ProgressEvent {
            direction: TransferDirection::Upload,
            file_name: "movie.mkv".into(),
            bytes_done: 500,
            bytes_total: 1000,
            elapsed_secs: 2.0,
        };
        let est = event.estimate();
        assert_eq!(est.percent, 50.0);
        assert_eq!(est.speed_bps, 250.0);
        assert_eq!(est.eta_secs, Some(2.0));
    }

    #[test]
    fn direction_display() {
        assert_eq!(TransferDirection::Upload.to_string(), "upload");
        assert_eq!(TransferDirection::Download.to_string(), "download");
    }
}
