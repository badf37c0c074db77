use crate::number::parse_number;
use voxdrive_core::Unit;

pub const INCHES_PER_FOOT: i64 = 12;

/// Numeric argument found in a normalized command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argument {
    /// Parsed value, already converted to inches when feet were spoken.
    /// Zero when the command carried no number.
    pub value: i64,
    /// Whether a number phrase was present at all.
    pub parsed: bool,
    /// `Some(Inches)` after a feet conversion; otherwise the matched command
    /// decides what the value means.
    pub unit: Option<Unit>,
}

pub fn extract(normalized: &str) -> Argument {
    let parsed = parse_number(normalized);
    let mut value = parsed.unwrap_or(0);
    let mut unit = None;

    if normalized.contains("feet") {
        value = value.saturating_mul(INCHES_PER_FOOT);
        unit = Some(Unit::Inches);
    }

    Argument {
        value,
        parsed: parsed.is_some(),
        unit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feet_convert_to_inches() {
        let arg = extract("move forward twelve feet");
        assert_eq!(arg.value, 144);
        assert!(arg.parsed);
        assert_eq!(arg.unit, Some(Unit::Inches));
    }

    #[test]
    fn test_no_number_defaults_to_zero() {
        let arg = extract("stop");
        assert_eq!(arg.value, 0);
        assert!(!arg.parsed);
        assert_eq!(arg.unit, None);
    }

    #[test]
    fn test_plain_number_keeps_unit_open() {
        let arg = extract("turn right ninety");
        assert_eq!(arg.value, 90);
        assert_eq!(arg.unit, None);
    }

    #[test]
    fn test_feet_without_number_is_zero() {
        assert_eq!(extract("forward some feet").value, 0);
    }

    #[test]
    fn test_feet_is_a_substring_check() {
        // "feeter" still counts as feet.
        assert_eq!(extract("forward two feeter").value, 24);
    }

    #[test]
    fn test_feet_conversion_saturates() {
        assert_eq!(extract("forward 99999999999999999999 feet").value, i64::MAX);
    }
}
