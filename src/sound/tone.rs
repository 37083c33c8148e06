//! Synthesized fallback tones.
//!
//! Used when no system sound file is available for a cue. Tones are generated
//! on the fly with rodio's sine source, so nothing is embedded in the binary.

use rodio::source::{SineWave, Source};
use std::time::Duration;

use super::SoundCue;

/// Output gain applied to synthesized tones.
const TONE_AMPLITUDE: f32 = 0.2;

/// Frequency and length of a synthesized tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToneSpec {
    /// Pitch in hertz
    pub frequency_hz: u32,
    /// Length in milliseconds
    pub duration_ms: u64,
}

/// Returns the fallback tone for a cue.
///
/// The tick is a short high click, the alarm a longer lower beep.
#[must_use]
pub const fn tone_for_cue(cue: SoundCue) -> ToneSpec {
    match cue {
        SoundCue::Tick => ToneSpec {
            frequency_hz: 1200,
            duration_ms: 40,
        },
        SoundCue::Alarm => ToneSpec {
            frequency_hz: 880,
            duration_ms: 800,
        },
    }
}

/// Builds a playable source for a tone.
pub fn synthesize(spec: ToneSpec) -> impl Source<Item = f32> + Send + 'static {
    SineWave::new(spec.frequency_hz as f32)
        .take_duration(Duration::from_millis(spec.duration_ms))
        .amplify(TONE_AMPLITUDE)
}
