//! Progress estimation.
//!
//! Pure arithmetic over `(bytes_done, bytes_total, elapsed)`; no clock is
//! read here. Guaranteed never to divide by zero.

/// Derived figures for one progress sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransferEstimate {
    /// 0–100. Zero when `bytes_total` is zero.
    pub percent: f64,
    /// Bytes per second. Zero when no time has elapsed.
    pub speed_bps: f64,
    /// Seconds remaining, `None` while speed is unknown.
    pub eta_secs: Option<f64>,
}

/// Computes percentage, speed and ETA for a transfer sample.
pub fn estimate(bytes_done: u64, bytes_total: u64, elapsed_secs: f64) -> TransferEstimate {
    let percent = if bytes_total == 0 {
        0.0
    } else {
        bytes_done as f64 / bytes_total as f64 * 100.0
    };

    let speed_bps = if elapsed_secs <= 0.0 {
        0.0
    } else {
        bytes_done as f64 / elapsed_secs
    };

    let eta_secs = if speed_bps > 0.0 {
        Some(bytes_total.saturating_sub(bytes_done) as f64 / speed_bps)
    } else {
        None
    };

    TransferEstimate {
        percent,
        speed_bps,
        eta_secs,
    }
}

/// Renders a speed in the unit a status bar expects: `MB/s` at or above
/// one megabyte per second, `KB/s` below.
pub fn format_speed(speed_bps: f64) -> String {
    let mbps = speed_bps / (1024.0 * 1024.0);
    if mbps >= 1.0 {
        format!("{mbps:.1} MB/s")
    } else if speed_bps > 0.0 {
        format!("{:.1} KB/s", speed_bps / 1024.0)
    } else {
        "0 KB/s".into()
    }
}

/// Renders an ETA in hours, minutes or seconds.
pub fn format_eta(eta_secs: Option<f64>) -> String {
    match eta_secs {
        None => "unknown".into(),
        Some(secs) if secs > 3600.0 => format!("{:.1} hr", secs / 3600.0),
        Some(secs) if secs > 60.0 => format!("{:.1} min", secs / 60.0),
        Some(secs) if secs > 0.0 => format!("{secs:.1} s"),
        Some(_) => "done".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn halfway_sample() {
        let e = estimate(500, 1000, 2.0);
        assert!((e.percent - 50.0).abs() < f64::EPSILON);
        assert!((e.speed_bps - 250.0).abs() < f64::EPSILON);
        assert!((e.eta_secs.unwrap() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_total_is_zero_percent() {
        let e = estimate(123, 0, 5.0);
        assert_eq!(e.percent, 0.0);
    }

    #[test]
    fn zero_elapsed_is_zero_speed_unknown_eta() {
        let e = estimate(100, 200, 0.0);
        assert_eq!(e.speed_bps, 0.0);
        assert!(e.eta_secs.is_none());

        let e = estimate(100, 200, -1.0);
        assert_eq!(e.speed_bps, 0.0);
    }

    #[test]
    fn percent_stays_in_range() {
        for done in [0u64, 1, 499, 500, 1000] {
            let e = estimate(done, 1000, 1.0);
            assert!((0.0..=100.0).contains(&e.percent), "done={done}");
        }
    }

    #[test]
    fn completed_sample_has_zero_eta() {
        let e = estimate(1000, 1000, 4.0);
        assert!((e.percent - 100.0).abs() < f64::EPSILON);
        assert_eq!(e.eta_secs.unwrap(), 0.0);
    }

    #[test]
    fn speed_formatting_units() {
        assert_eq!(format_speed(0.0), "0 KB/s");
        assert_eq!(format_speed(2048.0), "2.0 KB/s");
        assert_eq!(format_speed(3.5 * 1024.0 * 1024.0), "3.5 MB/s");
    }

    #[test]
    fn eta_formatting_buckets() {
        assert_eq!(format_eta(None), "unknown");
        assert_eq!(format_eta(Some(7200.0)), "2.0 hr");
        assert_eq!(format_eta(Some(90.0)), "1.5 min");
        assert_eq!(format_eta(Some(12.0)), "12.0 s");
        assert_eq!(format_eta(Some(0.0)), "done");
    }
}
