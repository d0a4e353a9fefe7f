/// Round half away from zero to a fixed number of decimals
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Render a duration in seconds as `m:ss`
pub fn format_duration(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let minutes = (seconds / 60.0).floor() as u64;
    let rest = (seconds % 60.0).floor() as u64;
    format!("{minutes}:{rest:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(5.714, 1), 5.7);
        assert_eq!(round_to(0.7, 2), 0.7);
        assert_eq!(round_to(0.125, 2), 0.13);
        assert_eq!(round_to(10.0, 1), 10.0);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(137.0), "2:17");
        assert_eq!(format_duration(60.0), "1:00");
        assert_eq!(format_duration(5.9), "0:05");
        assert_eq!(format_duration(3605.0), "60:05");
    }
}
