use board_proto::{decode_snapshot_json, WireSnapshot};

use crate::color::ColorRegistry;
use crate::config::PaletteConfig;
use crate::error::SpectatorError;
use crate::reducer::{reduce_wire, SpectatorFrame};

/// State held for one spectator connection's lifetime: the color registry
/// and the most recent successfully reduced frame.
#[derive(Debug)]
pub struct SpectatorSession {
    colors: ColorRegistry,
    latest: Option<SpectatorFrame>,
    frames_reduced: u64,
}

impl SpectatorSession {
    pub fn new(palette: PaletteConfig) -> Self {
        Self::with_registry(ColorRegistry::new(palette))
    }

    pub fn with_registry(colors: ColorRegistry) -> Self {
        Self {
            colors,
            latest: None,
            frames_reduced: 0,
        }
    }

    /// Reduce an inbound snapshot and make it the current frame.
    ///
    /// On failure the previously displayed frame is kept as is.
    pub fn on_snapshot(&mut self, wire: &WireSnapshot) -> Result<&SpectatorFrame, SpectatorError> {
        let frame = match reduce_wire(wire, &mut self.colors) {
            Ok(frame) => frame,
            Err(err) => {
                tracing::error!(
                    target: "spectator::session",
                    error = %err,
                    "snapshot.rejected"
                );
                return Err(err);
            }
        };
        self.frames_reduced += 1;
        tracing::trace!(
            target: "spectator::session",
            frame = self.frames_reduced,
            fingerprint = frame.fingerprint,
            owners = frame.leaderboard.len(),
            "snapshot.reduced"
        );
        Ok(&*self.latest.insert(frame))
    }

    /// Decode a JSON text frame, then reduce it.
    pub fn on_message(&mut self, text: &str) -> Result<&SpectatorFrame, SpectatorError> {
        let wire = decode_snapshot_json(text)?;
        self.on_snapshot(&wire)
    }

    pub fn latest(&self) -> Option<&SpectatorFrame> {
        self.latest.as_ref()
    }

    pub fn frames_reduced(&self) -> u64 {
        self.frames_reduced
    }

    pub fn colors(&self) -> &ColorRegistry {
        &self.colors
    }
}
