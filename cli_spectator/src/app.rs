use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use board_proto::WireSnapshot;
use color_eyre::Result;
use crossterm::event::{self, Event, KeyCode};
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::*;
use spectator_core::{SpectatorConfig, SpectatorSession};
use tokio::sync::watch;
use tracing::{info, trace};

use crate::ui::{draw_ui, UiState};

/// Latest-only hand-off from the transport to the UI thread. Each send
/// replaces the previous snapshot.
pub type SnapshotSender = watch::Sender<Option<WireSnapshot>>;
pub type SnapshotReceiver = watch::Receiver<Option<WireSnapshot>>;

pub struct SpectatorApp {
    terminal: Terminal<CrosstermBackend<std::io::Stdout>>,
    ui_state: UiState,
    session: SpectatorSession,
    receiver: SnapshotReceiver,
    shutdown_sender: watch::Sender<bool>,
    log_receiver: Receiver<String>,
}

impl SpectatorApp {
    pub fn new(
        receiver: SnapshotReceiver,
        shutdown_sender: watch::Sender<bool>,
        log_receiver: Receiver<String>,
        config: &SpectatorConfig,
        source: String,
    ) -> Result<Self> {
        let stdout = std::io::stdout();
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        crossterm::terminal::enable_raw_mode()?;
        terminal.clear()?;
        terminal.hide_cursor()?;
        Ok(Self {
            terminal,
            ui_state: UiState::new(source, config.max_logs),
            session: SpectatorSession::new(config.palette.clone()),
            receiver,
            shutdown_sender,
            log_receiver,
        })
    }

    pub fn run(mut self) -> Result<()> {
        let mut last_draw = Instant::now();

        loop {
            // An open alert blocks further snapshots. Newer ones overwrite each
            // other in the channel and only the last is reduced after dismissal.
            if !self.ui_state.alert_open() {
                self.apply_latest_snapshot();
            }

            while let Ok(line) = self.log_receiver.try_recv() {
                self.ui_state.push_log(line);
            }

            if last_draw.elapsed() >= Duration::from_millis(100) {
                self.terminal.draw(|frame| {
                    draw_ui(
                        frame,
                        &self.ui_state,
                        self.session.latest(),
                        self.session.frames_reduced(),
                    )
                })?;
                last_draw = Instant::now();
            }

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    match key.code {
                        KeyCode::Char('q') => break,
                        KeyCode::Enter | KeyCode::Esc if self.ui_state.alert_open() => {
                            self.ui_state.dismiss_alert();
                            info!("Alert dismissed; resuming snapshots");
                        }
                        KeyCode::Esc => break,
                        _ => {}
                    }
                }
            }
        }

        self.terminal.show_cursor()?;
        crossterm::terminal::disable_raw_mode()?;
        let _ = self.shutdown_sender.send(true);
        Ok(())
    }

    fn apply_latest_snapshot(&mut self) {
        let Some(snapshot) = take_latest(&mut self.receiver) else {
            return;
        };
        match self.session.on_snapshot(&snapshot) {
            Ok(frame) => {
                trace!(fingerprint = frame.fingerprint, "frame.ready");
            }
            Err(err) => {
                self.ui_state.raise_alert(err.to_string());
            }
        }
    }
}

pub fn channel() -> (SnapshotSender, SnapshotReceiver) {
    watch::channel(None)
}

/// The newest snapshot not yet seen by this receiver, if any.
pub fn take_latest(receiver: &mut SnapshotReceiver) -> Option<WireSnapshot> {
    match receiver.has_changed() {
        Ok(true) => receiver.borrow_and_update().clone(),
        _ => None,
    }
}
