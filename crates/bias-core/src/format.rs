/// Compact human-readable number (e.g. `12K`, `3.40M`) used in rationale strings.
pub fn format_compact(x: f64) -> String {
    if !x.is_finite() {
        return x.to_string();
    }
    let abs = x.abs();
    if abs >= 1e9 {
        format!("{:.2}B", x / 1e9)
    } else if abs >= 1e6 {
        format!("{:.2}M", x / 1e6)
    } else if abs >= 1e3 {
        format!("{:.0}K", x / 1e3)
    } else {
        format!("{:.0}", x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_compact_scales() {
        assert_eq!(format_compact(950.0), "950");
        assert_eq!(format_compact(12_400.0), "12K");
        assert_eq!(format_compact(-3_400_000.0), "-3.40M");
        assert_eq!(format_compact(2_500_000_000.0), "2.50B");
    }
}
