/// Trailing candidates at or below this length are detector rounding, not music.
const TRAILING_EPSILON: f64 = 0.1;

/// A closed-open time span `[start, end)` in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub start: f64,
    pub end: f64,
}

impl Interval {
    pub fn new(start: f64, end: f64) -> Self {
        Interval { start, end }
    }

    pub fn length(&self) -> f64 {
        self.end - self.start
    }
}

/// Turns detected silences into the song spans between them.
///
/// `silences` must be ascending and non-overlapping, and `total_duration` must
/// not be smaller than the last silence end. Neither is checked: malformed
/// input only produces candidates that fail the length filter.
///
/// An empty silence list yields no songs. Whether the whole recording counts
/// as a song in that case is decided by [`plan_song_segments`].
pub fn derive_song_segments(
    silences: &[Interval],
    total_duration: f64,
    min_song_length: f64,
) -> Vec<Interval> {
    let mut songs = Vec::new();

    let (first, last) = match (silences.first(), silences.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return songs,
    };

    let leading = Interval::new(0.0, first.start);
    if leading.length() >= min_song_length {
        songs.push(leading);
    }

    for pair in silences.windows(2) {
        let candidate = Interval::new(pair[0].end, pair[1].start);
        if candidate.length() >= min_song_length {
            songs.push(candidate);
        }
    }

    // Only the tail gets the epsilon guard.
    let trailing = Interval::new(last.end, total_duration);
    if trailing.length() > TRAILING_EPSILON && trailing.length() >= min_song_length {
        songs.push(trailing);
    }

    songs
}

/// Picks the songs to export, treating a recording without any silence as a
/// single song when it is long enough.
pub fn plan_song_segments(
    silences: &[Interval],
    total_duration: f64,
    min_song_length: f64,
) -> Vec<Interval> {
    if silences.is_empty() {
        if total_duration >= min_song_length {
            return vec![Interval::new(0.0, total_duration)];
        }
        return Vec::new();
    }

    derive_song_segments(silences, total_duration, min_song_length)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(pairs: &[(f64, f64)]) -> Vec<Interval> {
        pairs.iter().map(|&(s, e)| Interval::new(s, e)).collect()
    }

    #[test]
    fn no_silence_yields_no_segments() {
        assert!(derive_song_segments(&[], 300.0, 10.0).is_empty());
        assert!(derive_song_segments(&[], 300.0, 0.0).is_empty());
        assert!(derive_song_segments(&[], 0.0, 1000.0).is_empty());
    }

    #[test]
    fn single_silence_splits_in_two() {
        let songs = derive_song_segments(&spans(&[(180.0, 190.0)]), 300.0, 10.0);
        assert_eq!(songs, spans(&[(0.0, 180.0), (190.0, 300.0)]));
    }

    #[test]
    fn silence_at_start_drops_empty_leading_segment() {
        let silences = spans(&[(0.0, 10.0), (200.0, 210.0)]);
        let songs = derive_song_segments(&silences, 300.0, 10.0);
        assert_eq!(songs, spans(&[(10.0, 200.0), (210.0, 300.0)]));
    }

    #[test]
    fn two_silences_give_three_songs() {
        let silences = spans(&[(100.0, 110.0), (200.0, 210.0)]);
        let songs = derive_song_segments(&silences, 300.0, 10.0);
        assert_eq!(songs, spans(&[(0.0, 100.0), (110.0, 200.0), (210.0, 300.0)]));
    }

    #[test]
    fn short_leading_and_trailing_candidates_are_filtered() {
        let silences = spans(&[(40.0, 50.0), (100.0, 110.0)]);
        let songs = derive_song_segments(&silences, 120.0, 50.0);
        assert_eq!(songs, spans(&[(50.0, 100.0)]));
    }

    #[test]
    fn silence_touching_end_drops_trailing_segment() {
        let silences = spans(&[(100.0, 110.0), (290.0, 300.0)]);
        let songs = derive_song_segments(&silences, 300.0, 10.0);
        assert_eq!(songs, spans(&[(0.0, 100.0), (110.0, 290.0)]));
    }

    #[test]
    fn candidate_of_exactly_min_length_is_kept() {
        let silences = spans(&[(10.0, 20.0), (30.0, 40.0)]);
        let songs = derive_song_segments(&silences, 50.0, 10.0);
        assert_eq!(songs, spans(&[(0.0, 10.0), (20.0, 30.0), (40.0, 50.0)]));
    }

    #[test]
    fn trailing_sliver_of_exactly_epsilon_is_rejected() {
        let silences = spans(&[(0.0, 0.0)]);
        let songs = derive_song_segments(&silences, 0.1, 0.05);
        assert!(songs.is_empty());
    }

    #[test]
    fn trailing_sliver_just_above_epsilon_is_kept() {
        let silences = spans(&[(0.0, 0.0)]);
        let songs = derive_song_segments(&silences, 0.1000001, 0.0);
        // The zero-length leading candidate passes a zero minimum too.
        assert_eq!(songs, spans(&[(0.0, 0.0), (0.0, 0.1000001)]));
    }

    #[test]
    fn epsilon_does_not_apply_to_leading_or_middle_segments() {
        let silences = spans(&[(0.05, 1.0), (1.05, 10.0)]);
        let songs = derive_song_segments(&silences, 10.05, 0.0);
        assert_eq!(songs.len(), 2);
        assert_eq!(songs[0], Interval::new(0.0, 0.05));
        assert_eq!(songs[1], Interval::new(1.0, 1.05));
    }

    #[test]
    fn total_before_last_silence_end_is_not_an_error() {
        let silences = spans(&[(100.0, 110.0)]);
        let songs = derive_song_segments(&silences, 105.0, 0.0);
        assert_eq!(songs, spans(&[(0.0, 100.0)]));
    }

    #[test]
    fn overlapping_silences_produce_no_middle_segment() {
        let silences = spans(&[(50.0, 120.0), (100.0, 150.0)]);
        let songs = derive_song_segments(&silences, 300.0, 0.0);
        assert_eq!(songs, spans(&[(0.0, 50.0), (150.0, 300.0)]));
    }

    #[test]
    fn output_is_ordered_bounded_and_long_enough() {
        let silences = spans(&[
            (12.5, 14.0),
            (30.0, 33.0),
            (33.0, 35.0),
            (90.2, 95.0),
            (180.0, 181.5),
            (250.0, 259.95),
        ]);
        for min in [0.0, 1.0, 16.0, 55.2, 80.0, 500.0] {
            let songs = derive_song_segments(&silences, 260.0, min);
            assert!(songs.len() <= silences.len() + 1);
            assert!(songs.iter().all(|s| s.length() >= min));
            assert!(songs.windows(2).all(|w| w[0].end <= w[1].start));
            if let Some(last) = songs.last() {
                if last.start == 259.95 {
                    assert!(last.length() > TRAILING_EPSILON);
                }
            }
        }
    }

    #[test]
    fn derivation_is_repeatable() {
        let silences = spans(&[(3.0, 5.0), (61.7, 64.2), (200.0, 201.0)]);
        let first = derive_song_segments(&silences, 240.0, 30.0);
        let second = derive_song_segments(&silences, 240.0, 30.0);
        assert_eq!(first, second);
    }

    #[test]
    fn plan_treats_silent_free_recording_as_one_song() {
        assert_eq!(plan_song_segments(&[], 300.0, 200.0), spans(&[(0.0, 300.0)]));
        assert_eq!(plan_song_segments(&[], 200.0, 200.0), spans(&[(0.0, 200.0)]));
    }

    #[test]
    fn plan_drops_short_silent_free_recording() {
        assert!(plan_song_segments(&[], 150.0, 200.0).is_empty());
    }

    #[test]
    fn plan_delegates_when_silence_was_found() {
        let silences = spans(&[(180.0, 190.0)]);
        assert_eq!(
            plan_song_segments(&silences, 300.0, 10.0),
            derive_song_segments(&silences, 300.0, 10.0)
        );
    }
}
