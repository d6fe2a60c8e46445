//! Equal tempered note table for naming detected frequencies.
//!
//! The table covers the 88 keys of a piano, A0 to C8, tuned to A4 = 440 Hz. Each
//! note owns the frequencies up to halfway (in Hz) to its neighbours; the lowest and
//! highest keys are open-ended.
//!
//! ```
//! use harmonic_pitch::notes::find_note;
//!
//! let note = find_note(445.0).unwrap();
//! assert_eq!(note.name, "A4");
//! ```

use once_cell::sync::Lazy;

#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    /// Note name, e.g. "A4" or "C#3".
    pub name: String,
    /// Piano key number, 1 (A0) to 88 (C8).
    pub key_number: u8,
    pub frequency: f64,
    /// Midpoint to the key below, `None` for A0.
    pub lower_bound: Option<f64>,
    /// Midpoint to the key above, `None` for C8.
    pub upper_bound: Option<f64>,
}

impl Note {
    pub fn contains(&self, frequency: f64) -> bool {
        self.lower_bound.map_or(true, |lb| frequency >= lb)
            && self.upper_bound.map_or(true, |ub| frequency < ub)
    }
}

const KEY_COUNT: usize = 88;

static NOTES: Lazy<Vec<Note>> = Lazy::new(|| {
    const NOTE_NAMES: [&str; 12] = [
        "A", "A#", "B", "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#",
    ];
    // A4 is key 49, i.e. 48 semitones above A0.
    let frequency = |i: usize| 440.0 * 2f64.powf((i as f64 - 48.0) / 12.0);

    (0..KEY_COUNT)
        .map(|i| {
            let f = frequency(i);
            // Octave numbers change at C, three keys above each A.
            let octave = (i + 9) / 12;
            Note {
                name: format!("{}{}", NOTE_NAMES[i % 12], octave),
                key_number: (i + 1) as u8,
                frequency: f,
                lower_bound: (i > 0).then(|| f + 0.5 * (frequency(i - 1) - f)),
                upper_bound: (i + 1 < KEY_COUNT).then(|| f + 0.5 * (frequency(i + 1) - f)),
            }
        })
        .collect()
});

/// All 88 notes in increasing frequency.
pub fn notes() -> &'static [Note] {
    &NOTES
}

/// The note whose bounds contain `frequency`, if the frequency is a positive number.
pub fn find_note(frequency: f64) -> Option<&'static Note> {
    if !(frequency.is_finite() && frequency > 0.0) {
        return None;
    }
    let index = NOTES.partition_point(|n| n.upper_bound.map_or(false, |ub| ub <= frequency));
    NOTES.get(index)
}

/// The note closest to `frequency` in pitch, i.e. on a logarithmic scale.
pub fn nearest_note(frequency: f64) -> &'static Note {
    NOTES
        .iter()
        .min_by(|a, b| {
            let diff_a = cents_offset(frequency, a).abs();
            let diff_b = cents_offset(frequency, b).abs();
            diff_a
                .partial_cmp(&diff_b)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .unwrap_or(&NOTES[48])
}

/// Deviation of `frequency` from `note` in cents, positive when sharp.
pub fn cents_offset(frequency: f64, note: &Note) -> f64 {
    1200.0 * (frequency / note.frequency).log2()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_spans_the_piano() {
        let notes = notes();
        assert_eq!(notes.len(), 88);
        assert_eq!(notes[0].name, "A0");
        assert!((notes[0].frequency - 27.5).abs() < 1e-9);
        assert_eq!(notes[48].name, "A4");
        assert_eq!(notes[48].key_number, 49);
        assert_eq!(notes[48].frequency, 440.0);
        assert_eq!(notes[39].name, "C4");
        assert_eq!(notes[87].name, "C8");
        assert!((notes[87].frequency - 4186.009).abs() < 1e-3);
    }

    #[test]
    fn bounds_are_midpoints_between_neighbours() {
        let notes = notes();
        assert_eq!(notes[0].lower_bound, None);
        assert_eq!(notes[87].upper_bound, None);
        for pair in notes.windows(2) {
            let midpoint = 0.5 * (pair[0].frequency + pair[1].frequency);
            assert!((pair[0].upper_bound.unwrap() - midpoint).abs() < 1e-9);
            assert!((pair[1].lower_bound.unwrap() - midpoint).abs() < 1e-9);
        }
    }

    #[test]
    fn frequencies_map_to_their_notes() {
        assert_eq!(find_note(440.0).unwrap().name, "A4");
        assert_eq!(find_note(452.0).unwrap().name, "A4");
        assert_eq!(find_note(455.0).unwrap().name, "A#4");
        assert_eq!(find_note(261.6).unwrap().name, "C4");
        assert_eq!(find_note(10.0).unwrap().name, "A0");
        assert_eq!(find_note(20000.0).unwrap().name, "C8");
        assert!(find_note(0.0).is_none());
        assert!(find_note(f64::NAN).is_none());

        for note in notes() {
            assert_eq!(find_note(note.frequency), Some(note));
            assert!(note.contains(note.frequency));
        }
    }

    #[test]
    fn cents() {
        let a4 = nearest_note(446.0);
        assert_eq!(a4.name, "A4");
        assert!((cents_offset(880.0, a4) - 1200.0).abs() < 1e-9);
        assert!(cents_offset(446.0, a4) > 0.0);
        assert!(cents_offset(435.0, a4) < 0.0);
    }
}
