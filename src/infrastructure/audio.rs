//! Fire-and-forget audio and speech cues.
//!
//! Screens push [`AudioCommand`]s into an [`AudioChannel`]; a worker thread
//! hands them to an [`AudioSink`]. Nothing flows back: a missing sound device
//! or a closed channel never affects the game.

use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use tracing::{debug, info, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Sawtooth,
}

/// One oscillator note of a cue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency: f32,
    pub waveform: Waveform,
    /// Seconds
    pub duration: f32,
    /// Seconds after the start of the cue
    pub offset: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Short tick when something is picked or turned over
    Flip,
    /// Rising C-E-G arpeggio
    Match,
    /// Low buzz
    Error,
}

impl Cue {
    pub fn tones(self) -> Vec<Tone> {
        let note = |frequency, waveform, duration, offset| Tone {
            frequency,
            waveform,
            duration,
            offset,
        };
        match self {
            Cue::Flip => vec![note(600.0, Waveform::Sine, 0.1, 0.0)],
            Cue::Match => vec![
                note(523.25, Waveform::Sine, 0.2, 0.0),
                note(659.25, Waveform::Sine, 0.2, 0.1),
                note(783.99, Waveform::Sine, 0.4, 0.2),
            ],
            Cue::Error => vec![note(150.0, Waveform::Sawtooth, 0.3, 0.0)],
        }
    }
}

/// Speech settings for utterances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Voice {
    pub lang: String,
    pub pitch: f32,
    pub rate: f32,
}

impl Default for Voice {
    fn default() -> Self {
        Self {
            lang: "id-ID".to_string(),
            pitch: 1.2,
            rate: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub voice: Voice,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AudioCommand {
    Cue(Cue),
    Speak(Utterance),
    /// Background music on or off
    Music(bool),
}

/// Something that can make the cues audible.
pub trait AudioSink: Send {
    fn play(&mut self, cue: Cue);
    fn speak(&mut self, utterance: &Utterance);
    fn set_music(&mut self, on: bool);
}

/// Rings the terminal bell once per tone.
pub struct TerminalBell<W: Write + Send> {
    out: W,
    music: bool,
}

impl TerminalBell<io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write + Send> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out, music: false }
    }

    pub fn music(&self) -> bool {
        self.music
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> AudioSink for TerminalBell<W> {
    fn play(&mut self, cue: Cue) {
        for tone in cue.tones() {
            trace!(?cue, frequency = tone.frequency, "tone");
            if let Err(err) = self.out.write_all(b"\x07") {
                debug!("bell unavailable: {err}");
                return;
            }
        }
        let _ = self.out.flush();
    }

    fn speak(&mut self, utterance: &Utterance) {
        info!(lang = %utterance.voice.lang, "speak: {}", utterance.text);
    }

    // The bell has no way to loop a track, so only the state is kept
    fn set_music(&mut self, on: bool) {
        if self.music != on {
            info!(on, "background music");
        }
        self.music = on;
    }
}

/// Discards cues and only logs speech.
#[derive(Debug, Default)]
pub struct SilentSink;

impl AudioSink for SilentSink {
    fn play(&mut self, cue: Cue) {
        trace!(?cue, "cue muted");
    }

    fn speak(&mut self, utterance: &Utterance) {
        info!(lang = %utterance.voice.lang, "speak: {}", utterance.text);
    }

    fn set_music(&mut self, on: bool) {
        trace!(on, "music muted");
    }
}

/// Sending side of the audio worker.
#[derive(Debug, Clone)]
pub struct AudioChannel {
    tx: Sender<AudioCommand>,
}

impl AudioChannel {
    /// Creates a channel together with its receiving end.
    pub fn pair() -> (Self, Receiver<AudioCommand>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx }, rx)
    }

    /// A channel nobody listens to; every command is dropped.
    pub fn detached() -> Self {
        Self::pair().0
    }

    pub fn send(&self, command: AudioCommand) {
        if let Err(err) = self.tx.send(command) {
            debug!("audio command dropped: {:?}", err.0);
        }
    }

    pub fn cue(&self, cue: Cue) {
        self.send(AudioCommand::Cue(cue));
    }

    pub fn speak(&self, text: impl Into<String>, voice: Voice) {
        self.send(AudioCommand::Speak(Utterance {
            text: text.into(),
            voice,
        }));
    }

    pub fn music(&self, on: bool) {
        self.send(AudioCommand::Music(on));
    }
}

/// Starts a thread feeding `sink` until every channel clone is dropped.
pub fn spawn_audio_worker<S>(mut sink: S) -> (AudioChannel, JoinHandle<()>)
where
    S: AudioSink + 'static,
{
    let (channel, rx) = AudioChannel::pair();
    let handle = thread::spawn(move || {
        for command in rx {
            match command {
                AudioCommand::Cue(cue) => sink.play(cue),
                AudioCommand::Speak(utterance) => sink.speak(&utterance),
                AudioCommand::Music(on) => sink.set_music(on),
            }
        }
        debug!("audio worker stopped");
    });
    (channel, handle)
}
