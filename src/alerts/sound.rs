//! Audible alert cue
//!
//! Plays a sound file through a platform audio player process. Playback is
//! spawned and reaped on a helper thread so the caller never waits on audio.

use super::notifier::Notifier;
use crate::domain::Event;
use crate::error::NotifyError;

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

#[cfg(target_os = "macos")]
const DEFAULT_PLAYERS: &[&str] = &["afplay"];
#[cfg(all(unix, not(target_os = "macos")))]
const DEFAULT_PLAYERS: &[&str] = &["paplay", "aplay", "pw-play"];
#[cfg(not(unix))]
const DEFAULT_PLAYERS: &[&str] = &[];

/// Launches an external audio player for a sound file
#[derive(Debug, Clone)]
pub struct SoundPlayer {
    /// Explicit player command; platform defaults are tried when unset
    command: Option<String>,
}

impl SoundPlayer {
    /// Use the platform's default players
    pub fn new() -> Self {
        Self { command: None }
    }

    /// Use a specific player command (e.g. `mpv --no-video`)
    pub fn with_command(command: impl Into<String>) -> Self {
        Self {
            command: Some(command.into()),
        }
    }

    fn candidates(&self) -> Vec<Vec<String>> {
        match &self.command {
            Some(cmd) => vec![cmd.split_whitespace().map(String::from).collect()],
            None => DEFAULT_PLAYERS.iter().map(|p| vec![p.to_string()]).collect(),
        }
    }

    /// Start playing `resource` without waiting for it to finish
    ///
    /// # Errors
    /// `MissingResource` if the file does not exist, `NoBackend` if no player
    /// could be launched.
    pub fn play(&self, resource: &Path) -> Result<(), NotifyError> {
        if !resource.is_file() {
            return Err(NotifyError::MissingResource(resource.display().to_string()));
        }

        for argv in self.candidates() {
            let Some((program, args)) = argv.split_first() else {
                continue;
            };

            let spawned = Command::new(program)
                .args(args)
                .arg(resource)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn();

            match spawned {
                Ok(mut child) => {
                    thread::spawn(move || {
                        let _ = child.wait();
                    });
                    return Ok(());
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(NotifyError::NoBackend)
    }
}

impl Default for SoundPlayer {
    fn default() -> Self {
        Self::new()
    }
}

/// Notifier playing a sound resource for every accepted event
pub struct SoundNotifier {
    player: SoundPlayer,
    resource: PathBuf,
}

impl SoundNotifier {
    pub fn new(player: SoundPlayer, resource: impl Into<PathBuf>) -> Self {
        Self {
            player,
            resource: resource.into(),
        }
    }

    /// Default sound location: `<config_dir>/geoalert/alert.wav`
    pub fn default_resource() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("geoalert")
            .join("alert.wav")
    }
}

impl Notifier for SoundNotifier {
    fn notify(&self, _event: &Event) -> Result<(), NotifyError> {
        self.player.play(&self.resource)
    }

    fn name(&self) -> &str {
        "sound"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_resource() {
        let player = SoundPlayer::new();
        let result = player.play(Path::new("/nonexistent/alert.wav"));
        assert!(matches!(result, Err(NotifyError::MissingResource(_))));
    }

    #[test]
    fn test_unknown_player_is_no_backend() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let player = SoundPlayer::with_command("geoalert-no-such-player-binary");
        assert!(matches!(player.play(file.path()), Err(NotifyError::NoBackend)));
    }

    #[test]
    fn test_command_with_arguments() {
        let player = SoundPlayer::with_command("mpv --no-video");
        assert_eq!(player.candidates(), vec![vec!["mpv", "--no-video"]]);
    }

    #[test]
    fn test_sound_notifier_reports_missing_file() {
        let notifier = SoundNotifier::new(SoundPlayer::new(), "/nonexistent/alert.wav");
        assert!(notifier.notify(&Event::new("a", "t")).is_err());
        assert_eq!(notifier.name(), "sound");
    }

    #[test]
    fn test_default_resource_name() {
        assert!(SoundNotifier::default_resource().ends_with("geoalert/alert.wav"));
    }
}
