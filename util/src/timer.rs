use std::time::{Duration, SystemTime, SystemTimeError};

/// Utility for keeping track of the time it took to perform some operation.
pub struct Timer {
    start_time: SystemTime,
}

impl Timer {
    /// Create a new `Timer`.
    pub fn now() -> Self {
        Self {
            start_time: SystemTime::now(),
        }
    }

    /// Time elapsed since the timer was created.
    pub fn elapsed(&self) -> Result<Duration, SystemTimeError> {
        self.start_time.elapsed()
    }
}

/// Format a duration the way task completion messages show it,
/// e.g. `412 ms` or `1.73 s`.
pub fn format_duration(d: Duration) -> String {
    if d.as_secs() == 0 {
        format!("{} ms", d.as_millis())
    } else {
        format!("{:.2} s", d.as_secs_f64())
    }
}

#[cfg(test)]
mod test {
    use super::format_duration;
    use std::time::Duration;

    #[test]
    fn test_format_duration() {
        assert_eq!("0 ms", format_duration(Duration::from_micros(20)));
        assert_eq!("412 ms", format_duration(Duration::from_millis(412)));
        assert_eq!("1.75 s", format_duration(Duration::from_millis(1750)));
    }
}
