// carnatic-notes -- learn the notes of the Carnatic scale by ear
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Easy interface for getting sound to play using a sox subprocess.

use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use log::{debug, warn};

use super::AudioSink;
use crate::wave::AudioBuffer;

/// Location of the sox `play` binary.
pub fn default_player() -> PathBuf {
    // For properly recording the sox dependency on nix:
    if let Some(sox_bin) = option_env!("NIX_SOX_BIN") {
        debug!("using sox from nix store {}", sox_bin);
        Path::new(sox_bin).join("play")
    } else {
        "play".into()
    }
}

/// Streams raw stereo `f64` samples into a `play` process.
///
/// The process is owned by the sink: dropping the sink closes the stream,
/// upon which sox drains its buffer and exits, and the child is reaped.
pub struct SoxSink {
    player: Child,
    audio_stream: Option<ChildStdin>,
    buffer: Vec<u8>,
}

impl SoxSink {
    pub fn new(player: &Path, sample_rate: i32) -> io::Result<Self> {
        let sample_rate_str = format!("{}", sample_rate);
        let mut command = Command::new(player);
        command.args(&[
            "-q",
            "--channels",
            "2",
            "--rate",
            sample_rate_str.as_str(),
            "--type",
            "f64",
            "/dev/stdin",
        ]);
        Self::spawn(command)
    }

    fn spawn(mut command: Command) -> io::Result<Self> {
        let mut player = command
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        let audio_stream = player.stdin.take();
        if audio_stream.is_none() {
            let _ = player.kill();
            let _ = player.wait();
            return Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "sox process has no input stream",
            ));
        }

        Ok(Self {
            player,
            audio_stream,
            buffer: Vec::new(),
        })
    }
}

impl AudioSink for SoxSink {
    fn write(&mut self, buffer: &AudioBuffer) -> io::Result<()> {
        if self.buffer.len() < buffer.byte_len() {
            self.buffer.resize(buffer.byte_len(), 0);
        }
        buffer.copy_bytes_to(&mut self.buffer);

        match self.audio_stream.as_mut() {
            Some(stream) => {
                stream.write_all(&self.buffer[..buffer.byte_len()])?;
                stream.flush()
            }
            None => Err(io::ErrorKind::BrokenPipe.into()),
        }
    }
}

impl Drop for SoxSink {
    fn drop(&mut self) {
        // sox exits on its own once the input stream is closed
        drop(self.audio_stream.take());
        if let Err(err) = self.player.wait() {
            warn!("Failed to wait for sox to exit: {}", err);
        }
    }
}
