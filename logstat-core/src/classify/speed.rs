/// Upper bounds (exclusive) of the sub-second buckets, with their labels.
const THRESHOLDS: &[(f64, &str)] = &[
    (0.02, "0.02"),
    (0.04, "0.04"),
    (0.06, "0.06"),
    (0.08, "0.08"),
    (0.1, "0.1"),
    (0.2, "0.2"),
    (0.4, "0.4"),
    (0.6, "0.6"),
    (0.8, "0.8"),
    (1.0, "1.0"),
];

const WHOLE_SECONDS: &[&str] = &["1.0", "2.0", "3.0", "4.0"];

pub const SPEED_NONE: &str = "0.00";
pub const SPEED_OVERFLOW: &str = "5.0+";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeedBucket {
    pub label: &'static str,
    /// Requests between one and five seconds also land in the slow-request log.
    pub slow: bool,
}

impl SpeedBucket {
    const fn fast(label: &'static str) -> Self {
        Self { label, slow: false }
    }
}

pub fn speed_bucket(speed: Option<f64>) -> SpeedBucket {
    let speed = match speed {
        Some(s) if s != 0.0 => s,
        _ => return SpeedBucket::fast(SPEED_NONE),
    };

    if let Some((_, label)) = THRESHOLDS.iter().find(|(bound, _)| speed < *bound) {
        return SpeedBucket::fast(*label);
    }

    if speed < 5.0 {
        let whole = (speed.floor() as usize).clamp(1, WHOLE_SECONDS.len());
        return SpeedBucket {
            label: WHOLE_SECONDS[whole - 1],
            slow: true,
        };
    }

    SpeedBucket::fast(SPEED_OVERFLOW)
}
