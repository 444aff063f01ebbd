//! Static sample messages and timestamps used across harnesses.

/// A flat JSON message.
pub const SAMPLE_FLAT: &str = r#"{"level":"INFO","message":"Server started","port":8080}"#;

/// A nested JSON message exercising key and list separators.
pub const SAMPLE_NESTED: &str =
    r#"{"http":{"method":"POST","status":201},"tags":["api","payments"],"user":"alice"}"#;

/// Start of the histogram used by the annotation harness (epoch seconds).
pub const HISTOGRAM_START: i64 = 1_456_833_600;

/// Alert trigger times inside the histogram window.
pub const ALERT_AT_1: &str = "2016-03-01T12:05:00.000Z";
pub const ALERT_AT_2: &str = "2016-03-01T12:30:00.000Z";

/// `ALERT_AT_1` / `ALERT_AT_2` as epoch seconds.
pub const ALERT_EPOCH_1: i64 = 1_456_833_900;
pub const ALERT_EPOCH_2: i64 = 1_456_835_400;
