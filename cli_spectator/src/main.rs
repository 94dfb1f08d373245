use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Sender};
use std::time::Duration;

use board_proto::{decode_snapshot_json, WireSnapshot};
use clap::Parser;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use futures_util::{Stream, StreamExt};
use spectator_core::load_spectator_config;
use tokio::sync::watch;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{info, trace, warn};

mod app;
mod ui;

use app::{channel, SnapshotSender, SpectatorApp};

#[derive(Clone)]
struct ChannelWriter {
    sender: Sender<String>,
}

impl std::io::Write for ChannelWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if let Ok(text) = String::from_utf8(buf.to_vec()) {
            let _ = self.sender.send(text);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Terminal spectator for territory-control matches", long_about = None)]
struct Cli {
    /// WebSocket URL of the game's spectate endpoint. Defaults to the configured endpoint.
    #[arg(long)]
    endpoint: Option<String>,
    /// Spectator config file (JSON). Falls back to SPECTATOR_CONFIG_PATH, then the builtin config.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Replay snapshots from a JSON-lines file instead of connecting.
    #[arg(long)]
    replay: Option<PathBuf>,
    /// Delay between replayed snapshots, in milliseconds.
    #[arg(long)]
    interval_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let (log_tx, log_rx) = mpsc::channel::<String>();
    let log_writer_tx = log_tx.clone();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .compact()
        .with_writer(move || ChannelWriter {
            sender: log_writer_tx.clone(),
        })
        .init();

    let cli = Cli::parse();
    let (config, _metadata) = load_spectator_config(cli.config.as_deref());
    let endpoint = cli.endpoint.clone().unwrap_or_else(|| config.endpoint.clone());
    let source = match &cli.replay {
        Some(path) => format!("replay {}", path.display()),
        None => endpoint.clone(),
    };

    let (sender, receiver) = channel();
    let mut publish = |snapshot: WireSnapshot| publish_latest(&sender, snapshot);
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    let ui_config = config.clone();
    let ui_handle = std::thread::spawn(move || -> color_eyre::Result<()> {
        let app = SpectatorApp::new(receiver, shutdown_tx, log_rx, &ui_config, source)?;
        app.run()
    });

    let feed = async {
        match &cli.replay {
            Some(path) => {
                let interval = Duration::from_millis(
                    cli.interval_ms.unwrap_or(config.replay_interval_ms),
                );
                replay_file(path, interval, &mut publish).await
            }
            None => {
                let delay = Duration::from_millis(config.reconnect_delay_ms);
                follow_endpoint(&endpoint, delay, &mut publish).await
            }
        }
    };

    tokio::select! {
        _ = shutdown_rx.changed() => {
            info!("Spectator requested shutdown");
        }
        result = feed => {
            if let Err(err) = result {
                warn!("Snapshot feed stopped: {}", err);
            }
            // Keep the last frame on screen until the viewer quits.
            let _ = shutdown_rx.changed().await;
        }
    }

    ui_handle
        .join()
        .map_err(|_| eyre!("spectator UI thread panicked"))?
}

/// Replace the snapshot waiting for the UI. Returns false once the UI has
/// gone away.
fn publish_latest(sender: &SnapshotSender, snapshot: WireSnapshot) -> bool {
    sender.send(Some(snapshot)).is_ok()
}

async fn follow_endpoint<P>(endpoint: &str, delay: Duration, publish: &mut P) -> Result<()>
where
    P: FnMut(WireSnapshot) -> bool,
{
    loop {
        info!("Connecting to {}", endpoint);
        match connect_async(endpoint).await {
            Ok((stream, _response)) => {
                info!("Connected. Streaming snapshots. Press q to exit.");
                match pump_snapshots(stream, publish).await {
                    Ok(true) => {}
                    Ok(false) => return Ok(()),
                    Err(err) => warn!("Connection error: {}", err),
                }
                info!("Reconnecting in {} ms...", delay.as_millis());
            }
            Err(err) => {
                warn!("Failed to connect: {}", err);
            }
        }
        tokio::time::sleep(delay).await;
    }
}

/// Forward decoded snapshots until the socket closes (`Ok(true)`) or the UI
/// stops listening (`Ok(false)`).
async fn pump_snapshots<S, P>(mut stream: S, publish: &mut P) -> Result<bool>
where
    S: Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
    P: FnMut(WireSnapshot) -> bool,
{
    while let Some(message) = stream.next().await {
        match message? {
            Message::Text(text) => {
                if !forward(&text, publish) {
                    return Ok(false);
                }
            }
            Message::Close(frame) => {
                info!(?frame, "spectate.closed");
                break;
            }
            _ => {}
        }
    }
    Ok(true)
}

async fn replay_file<P>(path: &Path, interval: Duration, publish: &mut P) -> Result<()>
where
    P: FnMut(WireSnapshot) -> bool,
{
    let contents = tokio::fs::read_to_string(path).await?;
    info!(path = %path.display(), "replay.started");
    for line in contents.lines().filter(|line| !line.trim().is_empty()) {
        if !forward(line, publish) {
            return Ok(());
        }
        tokio::time::sleep(interval).await;
    }
    info!(path = %path.display(), "replay.finished");
    Ok(())
}

/// Decode one text frame and hand it to the UI. Undecodable frames are
/// logged and skipped; returns false once the UI has gone away.
fn forward<P>(text: &str, publish: &mut P) -> bool
where
    P: FnMut(WireSnapshot) -> bool,
{
    match decode_snapshot_json(text) {
        Ok(snapshot) => {
            trace!(cells = snapshot.cell_count(), "snapshot.received");
            publish(snapshot)
        }
        Err(err) => {
            warn!(error = %err, "snapshot.decode_failed");
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;
    use tokio::sync::mpsc::unbounded_channel;

    const BOARD: &str = r#"{"spaces":[[{"type":"PlayerCapital","units":5,"owner":"A"}]]}"#;

    fn match_replay() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("integration_tests")
            .join("tests")
            .join("fixtures")
            .join("match.jsonl")
    }

    #[test]
    fn undecodable_frame_is_dropped() {
        let (tx, mut rx) = unbounded_channel();
        let mut publish = |snapshot: WireSnapshot| tx.send(snapshot).is_ok();

        assert!(forward("not json", &mut publish));
        assert!(forward(r#"{"board": []}"#, &mut publish));
        assert!(rx.try_recv().is_err());

        assert!(forward(BOARD, &mut publish));
        assert_eq!(rx.try_recv().unwrap().cell_count(), 1);
    }

    #[test]
    fn forward_stops_once_the_ui_is_gone() {
        let (tx, rx) = unbounded_channel();
        drop(rx);
        let mut publish = |snapshot: WireSnapshot| tx.send(snapshot).is_ok();
        assert!(!forward(BOARD, &mut publish));

        let (sender, receiver) = channel();
        drop(receiver);
        let mut publish = |snapshot: WireSnapshot| publish_latest(&sender, snapshot);
        assert!(!forward(BOARD, &mut publish));
    }

    #[tokio::test]
    async fn replay_skips_blank_lines_in_file_order() {
        let path = match_replay();
        let (tx, mut rx) = unbounded_channel();
        let mut publish = |snapshot: WireSnapshot| tx.send(snapshot).is_ok();
        replay_file(&path, Duration::ZERO, &mut publish)
            .await
            .expect("replay runs");

        let contents = std::fs::read_to_string(&path).unwrap();
        let expected: Vec<WireSnapshot> = contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| decode_snapshot_json(line).unwrap())
            .collect();

        let mut replayed = Vec::new();
        while let Ok(snapshot) = rx.try_recv() {
            replayed.push(snapshot);
        }
        assert_eq!(replayed.len(), 4);
        assert_eq!(replayed, expected);
    }

    #[tokio::test]
    async fn replay_into_the_ui_channel_keeps_the_last_board() {
        let path = match_replay();
        let (sender, receiver) = channel();
        let mut publish = |snapshot: WireSnapshot| publish_latest(&sender, snapshot);
        replay_file(&path, Duration::ZERO, &mut publish)
            .await
            .expect("replay runs");

        let contents = std::fs::read_to_string(&path).unwrap();
        let last = contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .last()
            .unwrap();
        assert_eq!(
            receiver.borrow().as_ref(),
            Some(&decode_snapshot_json(last).unwrap())
        );
    }

    #[tokio::test]
    async fn socket_text_frames_are_forwarded_until_close() {
        let frames: Vec<Result<Message, tokio_tungstenite::tungstenite::Error>> = vec![
            Ok(Message::Text(BOARD.to_string())),
            Ok(Message::Ping(Vec::new())),
            Ok(Message::Text("garbage".to_string())),
            Ok(Message::Close(None)),
            Ok(Message::Text(BOARD.to_string())),
        ];
        let (tx, mut rx) = unbounded_channel();
        let mut publish = |snapshot: WireSnapshot| tx.send(snapshot).is_ok();

        assert!(pump_snapshots(stream::iter(frames), &mut publish).await.unwrap());
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }
}
