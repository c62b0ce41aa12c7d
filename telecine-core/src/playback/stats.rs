//! Playback counters

use core::fmt;

/// Running totals since playback started
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PlaybackStats {
    /// Frames that reached the panel
    pub frames_shown: u64,
    /// Frames abandoned on a bus failure
    pub frames_dropped: u64,
    /// Times a finite source was rewound
    pub rewinds: u32,
    /// Sessions opened from scratch
    pub connects: u32,
    /// Entries into the source error state
    pub source_errors: u32,
}

impl PlaybackStats {
    /// Frames pulled from the decoder and pushed to the sink
    pub fn frames_attempted(&self) -> u64 {
        self.frames_shown + self.frames_dropped
    }

    /// Check if a periodic summary is due after the latest frame
    pub fn summary_due(&self, interval: u32) -> bool {
        interval != 0 && self.frames_attempted() % u64::from(interval) == 0
    }
}

impl fmt::Display for PlaybackStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} shown, {} dropped, {} rewinds, {} connects, {} source errors",
            self.frames_shown, self.frames_dropped, self.rewinds, self.connects, self.source_errors
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_due() {
        let mut stats = PlaybackStats::default();
        stats.frames_shown = 899;
        assert!(!stats.summary_due(900));
        stats.frames_dropped = 1;
        assert!(stats.summary_due(900));
        assert!(!stats.summary_due(0));
    }

    #[test]
    fn test_display() {
        let stats = PlaybackStats {
            frames_shown: 10,
            frames_dropped: 1,
            rewinds: 2,
            connects: 3,
            source_errors: 4,
        };
        assert_eq!(
            stats.to_string(),
            "10 shown, 1 dropped, 2 rewinds, 3 connects, 4 source errors"
        );
    }
}
