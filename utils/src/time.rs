//! Block-time formatting helpers.

/// Wall-clock estimate for `blocks` at `block_time_secs` per block,
/// formatted with [`format_duration`].
pub fn format_blocks(blocks: u64, block_time_secs: u64) -> String {
    format_duration(blocks.saturating_mul(block_time_secs))
}

/// Format a duration in seconds to a human-readable string.
pub fn format_duration(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_each_magnitude() {
        assert_eq!(format_duration(42), "42s");
        assert_eq!(format_duration(125), "2m 5s");
        assert_eq!(format_duration(7_260), "2h 1m");
        assert_eq!(format_duration(90_000), "1d 1h");
    }

    #[test]
    fn blocks_scale_by_block_time() {
        // Two weeks of 15s blocks.
        assert_eq!(format_blocks(80_640, 15), "14d 0h");
        assert_eq!(format_blocks(u64::MAX, 15), format_duration(u64::MAX));
    }
}
