//! Genre and mood lookup tables: drum patterns, bass roots, scales,
//! melody and chord frequencies.

use serde::{Deserialize, Serialize};

/// Number of steps in one bar (sixteenth notes)
pub const STEPS_PER_BAR: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Genre {
    HipHop,
    Trap,
    LoFi,
    House,
    Techno,
    DrumAndBass,
    Rnb,
    Pop,
}

impl Genre {
    pub const ALL: [Genre; 8] = [
        Genre::HipHop,
        Genre::Trap,
        Genre::LoFi,
        Genre::House,
        Genre::Techno,
        Genre::DrumAndBass,
        Genre::Rnb,
        Genre::Pop,
    ];

    /// Lenient parse of a user-supplied genre; unknown names fall back to hip-hop
    pub fn from_name(name: &str) -> Self {
        let key: String = name
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '&')
            .collect();

        match key.as_str() {
            "trap" => Genre::Trap,
            "lofi" | "lofihiphop" | "chillhop" => Genre::LoFi,
            "house" | "deephouse" => Genre::House,
            "techno" | "electronic" | "edm" => Genre::Techno,
            "drumandbass" | "drumnbass" | "dnb" | "jungle" => Genre::DrumAndBass,
            "rnb" | "r&b" | "randb" | "soul" => Genre::Rnb,
            "pop" => Genre::Pop,
            _ => Genre::HipHop,
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Genre::HipHop => "hip-hop",
            Genre::Trap => "trap",
            Genre::LoFi => "lo-fi",
            Genre::House => "house",
            Genre::Techno => "techno",
            Genre::DrumAndBass => "drum-and-bass",
            Genre::Rnb => "rnb",
            Genre::Pop => "pop",
        }
    }

    pub fn drum_pattern(self) -> &'static DrumPattern {
        match self {
            Genre::HipHop => &HIP_HOP,
            Genre::Trap => &TRAP,
            Genre::LoFi => &LO_FI,
            Genre::House => &HOUSE,
            Genre::Techno => &TECHNO,
            Genre::DrumAndBass => &DRUM_AND_BASS,
            Genre::Rnb => &RNB,
            Genre::Pop => &POP,
        }
    }

    /// Bass root frequency in Hz
    pub fn bass_root(self) -> f64 {
        match self {
            Genre::HipHop | Genre::House => 55.0,
            Genre::Trap | Genre::Techno => 49.0,
            Genre::LoFi | Genre::Pop => 65.41,
            Genre::DrumAndBass => 43.65,
            Genre::Rnb => 58.27,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Chill,
    Happy,
    Sad,
    Energetic,
    Dark,
    Dreamy,
}

impl Mood {
    /// Lenient parse; unknown moods fall back to chill
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "happy" | "uplifting" | "joyful" | "upbeat" => Mood::Happy,
            "sad" | "melancholic" | "melancholy" => Mood::Sad,
            "energetic" | "hype" | "aggressive" | "excited" => Mood::Energetic,
            "dark" | "moody" | "ominous" => Mood::Dark,
            "dreamy" | "ethereal" | "romantic" => Mood::Dreamy,
            _ => Mood::Chill,
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Mood::Chill => "chill",
            Mood::Happy => "happy",
            Mood::Sad => "sad",
            Mood::Energetic => "energetic",
            Mood::Dark => "dark",
            Mood::Dreamy => "dreamy",
        }
    }

    /// Scale as semitone offsets from the root
    pub fn scale(self) -> &'static [i32] {
        match self {
            Mood::Happy | Mood::Energetic => &[0, 2, 4, 5, 7, 9, 11],
            Mood::Sad | Mood::Dark => &[0, 2, 3, 5, 7, 8, 10],
            Mood::Chill => &[0, 3, 5, 7, 10],
            Mood::Dreamy => &[0, 2, 4, 6, 7, 9, 11],
        }
    }

    /// Melody note table in Hz
    pub fn melody_frequencies(self) -> &'static [f64] {
        match self {
            Mood::Happy => &[523.25, 587.33, 659.25, 783.99, 880.00],
            Mood::Sad => &[440.00, 493.88, 523.25, 587.33, 659.25],
            Mood::Chill => &[392.00, 440.00, 523.25, 587.33, 659.25],
            Mood::Energetic => &[659.25, 783.99, 880.00, 987.77, 1046.50],
            Mood::Dark => &[293.66, 311.13, 349.23, 392.00, 415.30],
            Mood::Dreamy => &[523.25, 587.33, 739.99, 783.99, 987.77],
        }
    }

    /// Two alternating triads, one per bar
    pub fn chords(self) -> &'static [[f64; 3]; 2] {
        match self {
            Mood::Happy => &[[261.63, 329.63, 392.00], [349.23, 440.00, 523.25]],
            Mood::Sad => &[[220.00, 261.63, 329.63], [174.61, 220.00, 261.63]],
            Mood::Chill => &[[246.94, 293.66, 369.99], [220.00, 277.18, 329.63]],
            Mood::Energetic => &[[293.66, 369.99, 440.00], [329.63, 415.30, 493.88]],
            Mood::Dark => &[[146.83, 174.61, 220.00], [155.56, 196.00, 233.08]],
            Mood::Dreamy => &[[261.63, 329.63, 493.88], [293.66, 369.99, 554.37]],
        }
    }
}

/// One bar of kick/snare/hat hits, 1 = hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrumPattern {
    pub kick: [u8; STEPS_PER_BAR],
    pub snare: [u8; STEPS_PER_BAR],
    pub hat: [u8; STEPS_PER_BAR],
}

const BACKBEAT: [u8; 16] = [0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0];
const EIGHTHS: [u8; 16] = [1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0];
const OFFBEATS: [u8; 16] = [0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 1, 0];
const FOUR_ON_FLOOR: [u8; 16] = [1, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0];

static HIP_HOP: DrumPattern = DrumPattern {
    kick: [1, 0, 0, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 0, 0],
    snare: BACKBEAT,
    hat: EIGHTHS,
};

static TRAP: DrumPattern = DrumPattern {
    kick: [1, 0, 0, 0, 0, 0, 0, 1, 0, 0, 1, 0, 0, 0, 0, 0],
    snare: [0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0],
    hat: [1; 16],
};

static LO_FI: DrumPattern = DrumPattern {
    kick: [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0],
    snare: BACKBEAT,
    hat: EIGHTHS,
};

static HOUSE: DrumPattern = DrumPattern {
    kick: FOUR_ON_FLOOR,
    snare: BACKBEAT,
    hat: OFFBEATS,
};

static TECHNO: DrumPattern = DrumPattern {
    kick: FOUR_ON_FLOOR,
    snare: [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0],
    hat: OFFBEATS,
};

static DRUM_AND_BASS: DrumPattern = DrumPattern {
    kick: [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0],
    snare: BACKBEAT,
    hat: EIGHTHS,
};

static RNB: DrumPattern = DrumPattern {
    kick: [1, 0, 0, 1, 0, 0, 0, 0, 1, 0, 1, 0, 0, 0, 0, 0],
    snare: BACKBEAT,
    hat: EIGHTHS,
};

static POP: DrumPattern = DrumPattern {
    kick: [1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0],
    snare: BACKBEAT,
    hat: EIGHTHS,
};
