use std::path::Path;

use anyhow::Result;
use log::{error, info};
use serde::Serialize;

/// Background tracks, relative to the resources directory.
pub const DEFAULT_TRACKS: [&str; 4] = [
    "music/gregorian_chant.wav",
    "music/ave_maria.wav",
    "music/peaceful_hymn.wav",
    "music/meditation.wav",
];

const DEFAULT_VOLUME: f32 = 0.5;

/// Whatever actually makes sound. The player only tracks state and tells the
/// output what to do.
pub trait AudioOutput: Send {
    /// Starts looping `track` from the beginning, replacing anything loaded.
    fn play(&mut self, track: &str) -> Result<()>;
    fn pause(&mut self);
    fn resume(&mut self);
    fn stop(&mut self);
    /// `gain` is already clamped to `0.0..=1.0`.
    fn set_gain(&mut self, gain: f32);
}

/// Output for builds without an audio device. Accepts everything.
#[derive(Debug, Default)]
pub struct SilentOutput;

impl AudioOutput for SilentOutput {
    fn play(&mut self, _track: &str) -> Result<()> {
        Ok(())
    }

    fn pause(&mut self) {}

    fn resume(&mut self) {}

    fn stop(&mut self) {}

    fn set_gain(&mut self, _gain: f32) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicState {
    pub playing: bool,
    pub muted: bool,
    pub volume: f32,
}

/// Receives the player state after every change.
pub trait MusicListener: Send {
    fn on_music_state_changed(&mut self, state: MusicState);
}

impl<F> MusicListener for F
where
    F: FnMut(MusicState) + Send,
{
    fn on_music_state_changed(&mut self, state: MusicState) {
        self(state)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// `music/ave_maria.wav` becomes `ave maria`.
pub fn track_display_name(track: &str) -> String {
    let file_name = Path::new(track)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(track);
    file_name.replace(".wav", "").replace('_', " ")
}

/// Playlist, transport and volume state for background music.
pub struct MusicPlayer {
    output: Box<dyn AudioOutput>,
    tracks: Vec<String>,
    current_index: usize,
    loaded: Option<usize>,
    playing: bool,
    muted: bool,
    volume: f32,
    listeners: Vec<(ListenerId, Box<dyn MusicListener>)>,
    next_listener_id: u64,
}

impl MusicPlayer {
    pub fn new(output: Box<dyn AudioOutput>) -> Self {
        Self::with_tracks(output, DEFAULT_TRACKS.iter().map(|t| t.to_string()).collect())
    }

    pub fn with_tracks(output: Box<dyn AudioOutput>, tracks: Vec<String>) -> Self {
        Self {
            output,
            tracks,
            current_index: 0,
            loaded: None,
            playing: false,
            muted: false,
            volume: DEFAULT_VOLUME,
            listeners: Vec::new(),
            next_listener_id: 0,
        }
    }

    pub fn state(&self) -> MusicState {
        MusicState {
            playing: self.playing,
            muted: self.muted,
            volume: self.volume,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn current_track_index(&self) -> usize {
        self.current_index
    }

    pub fn available_tracks(&self) -> Vec<String> {
        self.tracks.iter().map(|t| track_display_name(t)).collect()
    }

    /// Display name of the loaded track, or `No track`.
    pub fn current_track_name(&self) -> String {
        self.loaded
            .and_then(|index| self.tracks.get(index))
            .map(|track| track_display_name(track))
            .unwrap_or_else(|| "No track".to_string())
    }

    /// Plays the track at `index`. Out-of-range indexes are ignored and
    /// return `false`.
    pub fn play_track(&mut self, index: usize) -> bool {
        let Some(track) = self.tracks.get(index).cloned() else {
            return false;
        };

        self.stop();
        self.current_index = index;

        if let Err(err) = self.output.play(&track) {
            error!("Error playing music {track}: {err:#}");
            return false;
        }

        self.loaded = Some(index);
        self.playing = true;
        self.output.set_gain(self.effective_gain());
        info!("Playing music: {track}");
        self.notify();
        true
    }

    pub fn play_default(&mut self) -> bool {
        self.play_track(0)
    }

    /// Plays the track whose display name equals `name`.
    pub fn select_track(&mut self, name: &str) -> bool {
        match self
            .tracks
            .iter()
            .position(|track| track_display_name(track) == name)
        {
            Some(index) => self.play_track(index),
            None => false,
        }
    }

    pub fn next_track(&mut self) -> bool {
        if self.tracks.is_empty() {
            return false;
        }
        let next = (self.current_index + 1) % self.tracks.len();
        self.play_track(next)
    }

    pub fn previous_track(&mut self) -> bool {
        if self.tracks.is_empty() {
            return false;
        }
        let previous = match self.current_index {
            0 => self.tracks.len() - 1,
            index => index - 1,
        };
        self.play_track(previous)
    }

    pub fn stop(&mut self) {
        if self.playing {
            self.output.stop();
            self.playing = false;
            self.notify();
        }
    }

    pub fn pause(&mut self) {
        if self.playing {
            self.output.pause();
            self.playing = false;
            self.notify();
        }
    }

    pub fn resume(&mut self) {
        if !self.playing && self.loaded.is_some() {
            self.output.resume();
            self.playing = true;
            self.notify();
        }
    }

    /// Pauses, resumes, or starts the first track when nothing was loaded.
    pub fn toggle_play_pause(&mut self) {
        if self.playing {
            self.pause();
        } else if self.loaded.is_none() {
            self.play_default();
        } else {
            self.resume();
        }
    }

    /// Sets the volume, clamped to `0.0..=1.0`. While muted the level is
    /// remembered but not applied. NaN is ignored.
    pub fn set_volume(&mut self, volume: f32) {
        if volume.is_nan() {
            return;
        }
        self.volume = volume.clamp(0.0, 1.0);
        if !self.muted {
            self.output.set_gain(self.volume);
        }
        self.notify();
    }

    pub fn mute(&mut self) {
        self.muted = true;
        self.output.set_gain(0.0);
        self.notify();
    }

    /// Restores the volume that was set before muting.
    pub fn unmute(&mut self) {
        self.muted = false;
        self.set_volume(self.volume);
    }

    pub fn toggle_mute(&mut self) {
        if self.muted {
            self.unmute();
        } else {
            self.mute();
        }
    }

    pub fn add_listener(&mut self, listener: impl MusicListener + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    fn effective_gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.volume
        }
    }

    fn notify(&mut self) {
        let state = self.state();
        for (_, listener) in self.listeners.iter_mut() {
            listener.on_music_state_changed(state);
        }
    }
}

impl Drop for MusicPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Play(String),
        Pause,
        Resume,
        Stop,
        Gain(f32),
    }

    #[derive(Clone, Default)]
    struct RecordingOutput {
        calls: Arc<Mutex<Vec<Call>>>,
        fail_on: Option<String>,
    }

    impl RecordingOutput {
        fn last_gain(&self) -> Option<f32> {
            self.calls.lock().unwrap().iter().rev().find_map(|call| match call {
                Call::Gain(gain) => Some(*gain),
                _ => None,
            })
        }

        fn played(&self) -> Vec<String> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter_map(|call| match call {
                    Call::Play(track) => Some(track.clone()),
                    _ => None,
                })
                .collect()
        }
    }

    impl AudioOutput for RecordingOutput {
        fn play(&mut self, track: &str) -> Result<()> {
            if self.fail_on.as_deref() == Some(track) {
                return Err(anyhow!("unreadable audio"));
            }
            self.calls.lock().unwrap().push(Call::Play(track.to_string()));
            Ok(())
        }

        fn pause(&mut self) {
            self.calls.lock().unwrap().push(Call::Pause);
        }

        fn resume(&mut self) {
            self.calls.lock().unwrap().push(Call::Resume);
        }

        fn stop(&mut self) {
            self.calls.lock().unwrap().push(Call::Stop);
        }

        fn set_gain(&mut self, gain: f32) {
            self.calls.lock().unwrap().push(Call::Gain(gain));
        }
    }

    fn player() -> (MusicPlayer, RecordingOutput) {
        let output = RecordingOutput::default();
        (MusicPlayer::new(Box::new(output.clone())), output)
    }

    #[test]
    fn display_names_come_from_file_names() {
        let (player, _) = player();
        assert_eq!(
            player.available_tracks(),
            vec!["gregorian chant", "ave maria", "peaceful hymn", "meditation"]
        );
        assert_eq!(player.current_track_name(), "No track");
    }

    #[test]
    fn next_and_previous_wrap_around() {
        let (mut player, output) = player();

        assert!(player.previous_track());
        assert_eq!(player.current_track_index(), 3);
        assert_eq!(player.current_track_name(), "meditation");

        assert!(player.next_track());
        assert_eq!(player.current_track_index(), 0);
        assert!(player.next_track());
        assert_eq!(player.current_track_index(), 1);

        assert_eq!(
            output.played(),
            vec![
                "music/meditation.wav",
                "music/gregorian_chant.wav",
                "music/ave_maria.wav"
            ]
        );
        assert!(!player.play_track(4));
        assert_eq!(player.current_track_index(), 1);
    }

    #[test]
    fn select_track_by_display_name() {
        let (mut player, _) = player();
        assert!(player.select_track("peaceful hymn"));
        assert_eq!(player.current_track_index(), 2);
        assert!(player.is_playing());
        assert!(!player.select_track("Peaceful Hymn"));
        assert_eq!(player.current_track_index(), 2);
    }

    #[test]
    fn volume_is_clamped() {
        let (mut player, output) = player();
        assert_eq!(player.volume(), 0.5);

        player.set_volume(1.7);
        assert_eq!(player.volume(), 1.0);
        player.set_volume(-0.3);
        assert_eq!(player.volume(), 0.0);
        player.set_volume(f32::NAN);
        assert_eq!(player.volume(), 0.0);
        player.set_volume(0.25);
        assert_eq!(output.last_gain(), Some(0.25));
    }

    #[test]
    fn unmute_restores_previous_volume() {
        let (mut player, output) = player();
        player.play_default();
        player.set_volume(0.8);

        player.mute();
        assert!(player.is_muted());
        assert_eq!(output.last_gain(), Some(0.0));
        assert_eq!(player.volume(), 0.8);

        player.set_volume(0.6);
        assert_eq!(output.last_gain(), Some(0.0));

        player.toggle_mute();
        assert!(!player.is_muted());
        assert_eq!(output.last_gain(), Some(0.6));
        assert!(player.is_playing());
    }

    #[test]
    fn toggle_play_pause_starts_pauses_and_resumes() {
        let (mut player, output) = player();

        player.toggle_play_pause();
        assert!(player.is_playing());
        assert_eq!(player.current_track_name(), "gregorian chant");

        player.toggle_play_pause();
        assert!(!player.is_playing());
        player.toggle_play_pause();
        assert!(player.is_playing());

        let calls = output.calls.lock().unwrap().clone();
        assert!(calls.ends_with(&[Call::Pause, Call::Resume]));
        assert_eq!(output.played().len(), 1);
    }

    #[test]
    fn failed_playback_leaves_player_idle() {
        let output = RecordingOutput {
            fail_on: Some("music/ave_maria.wav".into()),
            ..RecordingOutput::default()
        };
        let mut player = MusicPlayer::new(Box::new(output));

        assert!(!player.play_track(1));
        assert!(!player.is_playing());
        assert_eq!(player.current_track_name(), "No track");
    }

    #[test]
    fn listeners_see_every_change_until_removed() {
        let (mut player, _) = player();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let id = player.add_listener(move |state: MusicState| sink.lock().unwrap().push(state));

        player.play_default();
        player.mute();
        assert!(player.remove_listener(id));
        assert!(!player.remove_listener(id));
        player.unmute();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen[0].playing && !seen[0].muted);
        assert!(seen[1].muted);
        assert_eq!(seen[1].volume, DEFAULT_VOLUME);
    }
}
