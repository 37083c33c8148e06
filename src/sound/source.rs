//! Sound source management.
//!
//! Each cue is resolved once to either a system sound file or a synthesized
//! tone. System sounds are searched in the macOS and freedesktop sound
//! directories.

use std::path::{Path, PathBuf};

use super::error::SoundError;
use super::tone::{tone_for_cue, ToneSpec};
use super::SoundCue;

/// Represents the source of a sound to be played.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundSource {
    /// A sound file from one of the system sound directories.
    System {
        /// The name of the sound (e.g., "Glass").
        name: String,
        /// The full path to the sound file.
        path: PathBuf,
    },
    /// A sine tone generated at playback time.
    Tone {
        /// The name of the tone (e.g., "tick").
        name: String,
        /// Pitch and length
        spec: ToneSpec,
    },
}

impl SoundSource {
    /// Creates a new system sound source.
    ///
    /// This constructor does not validate the path. Use `system_validated` for
    /// path validation against allowed directories.
    #[must_use]
    pub fn system(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::System {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Creates a new system sound source with path validation.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::InvalidPath` if the path is outside the system
    /// sound directories.
    pub fn system_validated(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Result<Self, SoundError> {
        let path = path.into();
        validate_system_sound_path(&path)?;
        Ok(Self::System {
            name: name.into(),
            path,
        })
    }

    /// Creates a synthesized tone source.
    #[must_use]
    pub fn tone(name: impl Into<String>, spec: ToneSpec) -> Self {
        Self::Tone {
            name: name.into(),
            spec,
        }
    }

    /// Returns the name of the sound source.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::System { name, .. } | Self::Tone { name, .. } => name,
        }
    }

    /// Returns true if this is a system sound.
    #[must_use]
    pub fn is_system(&self) -> bool {
        matches!(self, Self::System { .. })
    }

    /// Returns true if this is a synthesized tone.
    #[must_use]
    pub fn is_tone(&self) -> bool {
        matches!(self, Self::Tone { .. })
    }

    /// Returns the file path if this is a system sound.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::System { path, .. } => Some(path),
            Self::Tone { .. } => None,
        }
    }
}

/// Directories to search for system sounds, in order of priority.
const SYSTEM_SOUND_DIRS: &[&str] = &[
    "/System/Library/Sounds",
    "/Library/Sounds",
    "/usr/share/sounds/freedesktop/stereo",
];

fn validate_system_sound_path(path: &Path) -> Result<(), SoundError> {
    let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

    for allowed_dir in SYSTEM_SOUND_DIRS {
        let allowed_path = PathBuf::from(allowed_dir);
        if let Ok(canonical_allowed) = allowed_path.canonicalize() {
            if canonical.starts_with(&canonical_allowed) {
                return Ok(());
            }
        }
        if canonical.starts_with(allowed_dir) && !has_parent_component(&canonical) {
            return Ok(());
        }
    }

    Err(SoundError::InvalidPath(format!(
        "'{}' はシステムサウンドのディレクトリ外です",
        path.display()
    )))
}

fn has_parent_component(path: &Path) -> bool {
    path.components()
        .any(|c| matches!(c, std::path::Component::ParentDir))
}

/// Supported audio file extensions.
const SUPPORTED_EXTENSIONS: &[&str] = &["aiff", "wav", "mp3", "flac", "ogg", "oga"];

/// Preferred sound names per cue, in order of preference.
fn preferred_names(cue: SoundCue) -> &'static [&'static str] {
    match cue {
        SoundCue::Tick => &["Tink", "Pop", "audio-volume-change"],
        SoundCue::Alarm => &["Glass", "Ping", "alarm-clock-elapsed", "bell"],
    }
}

/// Discovers available system sounds.
///
/// Returns an empty vector if no sound directory exists.
#[must_use]
pub fn discover_system_sounds() -> Vec<SoundSource> {
    let mut sounds = Vec::new();

    for dir in SYSTEM_SOUND_DIRS {
        let path = PathBuf::from(dir);
        if !path.exists() {
            continue;
        }

        if let Ok(entries) = std::fs::read_dir(&path) {
            for entry in entries.flatten() {
                let file_path = entry.path();
                let Some(ext) = file_path.extension() else {
                    continue;
                };
                let ext_str = ext.to_string_lossy().to_lowercase();
                if !SUPPORTED_EXTENSIONS.contains(&ext_str.as_str()) {
                    continue;
                }
                if let Some(stem) = file_path.file_stem() {
                    sounds.push(SoundSource::System {
                        name: stem.to_string_lossy().into_owned(),
                        path: file_path,
                    });
                }
            }
        }
    }

    // Sort by name for consistent ordering
    sounds.sort_by(|a, b| a.name().cmp(b.name()));
    sounds
}

/// Picks the sound for `cue` out of `available`.
///
/// Falls back to the cue's synthesized tone when none of the preferred
/// sounds is present.
#[must_use]
pub fn select_cue_sound(cue: SoundCue, available: &[SoundSource]) -> SoundSource {
    preferred_names(cue)
        .iter()
        .find_map(|preferred| available.iter().find(|s| s.name() == *preferred))
        .cloned()
        .unwrap_or_else(|| SoundSource::tone(cue.as_str(), tone_for_cue(cue)))
}

// ============================================================================
// CueSounds
// ============================================================================

/// The resolved source for every cue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CueSounds {
    tick: SoundSource,
    alarm: SoundSource,
}

impl CueSounds {
    /// Resolves the cues against the system sound directories.
    #[must_use]
    pub fn discover() -> Self {
        let available = discover_system_sounds();
        let sounds = Self {
            tick: select_cue_sound(SoundCue::Tick, &available),
            alarm: select_cue_sound(SoundCue::Alarm, &available),
        };
        tracing::debug!(
            "Cue sounds: tick={}, alarm={}",
            sounds.tick.name(),
            sounds.alarm.name()
        );
        sounds
    }

    /// Uses synthesized tones for every cue.
    #[must_use]
    pub fn tones() -> Self {
        Self {
            tick: select_cue_sound(SoundCue::Tick, &[]),
            alarm: select_cue_sound(SoundCue::Alarm, &[]),
        }
    }

    /// Replaces the source for `cue`.
    #[must_use]
    pub fn with_source(mut self, cue: SoundCue, source: SoundSource) -> Self {
        match cue {
            SoundCue::Tick => self.tick = source,
            SoundCue::Alarm => self.alarm = source,
        }
        self
    }

    /// Returns the source for `cue`.
    #[must_use]
    pub fn get(&self, cue: SoundCue) -> &SoundSource {
        match cue {
            SoundCue::Tick => &self.tick,
            SoundCue::Alarm => &self.alarm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod sound_source_tests {
        use super::*;

        #[test]
        fn test_sound_source_system() {
            let source = SoundSource::system("Glass", "/System/Library/Sounds/Glass.aiff");
            assert!(source.is_system());
            assert!(!source.is_tone());
            assert_eq!(source.name(), "Glass");
            assert!(source.path().is_some());
        }

        #[test]
        fn test_sound_source_tone() {
            let source = SoundSource::tone("tick", tone_for_cue(SoundCue::Tick));
            assert!(source.is_tone());
            assert_eq!(source.name(), "tick");
            assert!(source.path().is_none());
        }

        #[test]
        fn test_system_validated_accepts_valid_paths() {
            assert!(
                SoundSource::system_validated("Glass", "/System/Library/Sounds/Glass.aiff").is_ok()
            );
            assert!(SoundSource::system_validated(
                "bell",
                "/usr/share/sounds/freedesktop/stereo/bell.oga"
            )
            .is_ok());
        }

        #[test]
        fn test_system_validated_rejects_invalid_paths() {
            let result = SoundSource::system_validated("evil", "/tmp/evil.wav");
            match result {
                Err(SoundError::InvalidPath(msg)) => assert!(msg.contains("/tmp/evil.wav")),
                other => panic!("Expected InvalidPath error, got {:?}", other),
            }

            assert!(SoundSource::system_validated("etc", "/etc/passwd").is_err());
        }

        #[test]
        fn test_system_validated_rejects_path_traversal() {
            let result = SoundSource::system_validated(
                "traversal",
                "/System/Library/Sounds/../../../etc/passwd",
            );
            assert!(result.is_err());
        }
    }

    mod cue_selection_tests {
        use super::*;

        #[test]
        fn test_select_preferred_sound() {
            let available = vec![
                SoundSource::system("Basso", "/System/Library/Sounds/Basso.aiff"),
                SoundSource::system("Ping", "/System/Library/Sounds/Ping.aiff"),
                SoundSource::system("Glass", "/System/Library/Sounds/Glass.aiff"),
            ];
            assert_eq!(select_cue_sound(SoundCue::Alarm, &available).name(), "Glass");
        }

        #[test]
        fn test_select_falls_back_to_tone() {
            let available = vec![SoundSource::system(
                "Basso",
                "/System/Library/Sounds/Basso.aiff",
            )];
            let source = select_cue_sound(SoundCue::Tick, &available);
            assert!(source.is_tone());
            assert_eq!(source.name(), "tick");
        }

        #[test]
        fn test_tones() {
            let sounds = CueSounds::tones();
            assert!(sounds.get(SoundCue::Tick).is_tone());
            assert!(sounds.get(SoundCue::Alarm).is_tone());
            assert_ne!(sounds.get(SoundCue::Tick), sounds.get(SoundCue::Alarm));
        }

        #[test]
        fn test_discover_no_panic() {
            // Container environments usually have no sound directories
            let sounds = CueSounds::discover();
            assert!(!sounds.get(SoundCue::Alarm).name().is_empty());
        }
    }
}
