//! Audio system for background music and sound effects
//!
//! Audio is optional: without an output device or the asset directory the
//! game runs silently.

use crate::game::GameEvent;
use crate::settings::AudioSettings;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sfx {
    Select,
    LineClear,
    GameOver,
}

impl Sfx {
    fn filename(&self) -> &'static str {
        match self {
            Sfx::Select => "rotate.mp3",
            Sfx::LineClear => "clear.mp3",
            Sfx::GameOver => "game-over.mp3",
        }
    }

    /// Effect triggered by a game event, if any
    pub fn for_event(event: GameEvent) -> Option<Sfx> {
        match event {
            GameEvent::Started | GameEvent::ReturnedToMenu => Some(Sfx::Select),
            GameEvent::LineCleared(_) => Some(Sfx::LineClear),
            GameEvent::GameOver => Some(Sfx::GameOver),
            GameEvent::PieceLocked => None,
        }
    }
}

const BGM_FILE: &str = "music.mp3";

/// What a game event does to the background music
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicCue {
    Restart,
    Stop,
}

impl MusicCue {
    pub fn for_event(event: GameEvent) -> Option<MusicCue> {
        match event {
            GameEvent::Started | GameEvent::ReturnedToMenu => Some(MusicCue::Restart),
            GameEvent::GameOver => Some(MusicCue::Stop),
            GameEvent::LineCleared(_) | GameEvent::PieceLocked => None,
        }
    }
}

/// Audio manager handles all sound playback
pub struct AudioManager {
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    bgm_sink: Option<Sink>,
    assets_path: PathBuf,
    bgm_volume: f32,
    sfx_volume: f32,
}

impl AudioManager {
    /// Create a new audio manager
    pub fn new(settings: &AudioSettings) -> Option<Self> {
        if !settings.enabled {
            return None;
        }

        let (stream, stream_handle) = match OutputStream::try_default() {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!("no audio output, running silent: {}", e);
                return None;
            }
        };
        let Some(assets_path) = Self::find_assets_path() else {
            tracing::warn!("sound assets not found, running silent");
            return None;
        };

        Some(Self {
            _stream: stream,
            stream_handle,
            bgm_sink: None,
            assets_path,
            bgm_volume: volume(settings.bgm_volume),
            sfx_volume: volume(settings.sfx_volume),
        })
    }

    fn find_assets_path() -> Option<PathBuf> {
        let paths = [
            PathBuf::from("sounds"),
            PathBuf::from("assets/sounds"),
            std::env::current_exe().ok()?.parent()?.join("sounds"),
        ];

        paths.into_iter().find(|p| p.join(BGM_FILE).exists())
    }

    /// Play background music from the start (loops indefinitely)
    pub fn play_bgm(&mut self) {
        self.stop_bgm();

        let path = self.assets_path.join(BGM_FILE);
        let Ok(file) = File::open(&path) else { return };
        let Ok(sink) = Sink::try_new(&self.stream_handle) else { return };
        let Ok(decoder) = Decoder::new(BufReader::new(file)) else {
            tracing::warn!(path = %path.display(), "could not decode music");
            return;
        };

        sink.set_volume(self.bgm_volume);
        sink.append(decoder.repeat_infinite());
        self.bgm_sink = Some(sink);
    }

    /// Stop background music
    pub fn stop_bgm(&mut self) {
        if let Some(sink) = self.bgm_sink.take() {
            sink.stop();
        }
    }

    /// Play a sound effect
    pub fn play_sfx(&mut self, sfx: Sfx) {
        if self.sfx_volume <= 0.0 {
            return;
        }

        let path = self.assets_path.join(sfx.filename());
        if let Ok(file) = File::open(&path) {
            if let Ok(decoder) = Decoder::new(BufReader::new(file)) {
                if let Ok(sink) = Sink::try_new(&self.stream_handle) {
                    sink.set_volume(self.sfx_volume);
                    sink.append(decoder);
                    sink.detach(); // Let it play and clean up automatically
                }
            }
        }
    }

    /// React to a game event
    pub fn handle_event(&mut self, event: GameEvent) {
        match MusicCue::for_event(event) {
            Some(MusicCue::Restart) => self.play_bgm(),
            Some(MusicCue::Stop) => self.stop_bgm(),
            None => {}
        }
        if let Some(sfx) = Sfx::for_event(event) {
            self.play_sfx(sfx);
        }
    }
}

/// Convert a 0-100 setting to a sink volume
fn volume(percent: u32) -> f32 {
    percent.min(100) as f32 / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_mapping() {
        assert_eq!(Sfx::for_event(GameEvent::LineCleared(2)), Some(Sfx::LineClear));
        assert_eq!(Sfx::for_event(GameEvent::GameOver), Some(Sfx::GameOver));
        assert_eq!(Sfx::for_event(GameEvent::PieceLocked), None);
    }

    #[test]
    fn test_music_follows_menu_and_game_over() {
        assert_eq!(MusicCue::for_event(GameEvent::Started), Some(MusicCue::Restart));
        assert_eq!(MusicCue::for_event(GameEvent::ReturnedToMenu), Some(MusicCue::Restart));
        assert_eq!(MusicCue::for_event(GameEvent::GameOver), Some(MusicCue::Stop));
        assert_eq!(MusicCue::for_event(GameEvent::LineCleared(1)), None);
    }

    #[test]
    fn test_volume_clamped() {
        assert_eq!(volume(50), 0.5);
        assert_eq!(volume(250), 1.0);
    }

    #[test]
    fn test_disabled_audio() {
        let settings = AudioSettings {
            enabled: false,
            ..AudioSettings::default()
        };
        assert!(AudioManager::new(&settings).is_none());
    }
}
