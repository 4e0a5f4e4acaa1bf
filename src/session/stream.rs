//! Blocking WebSocket client for the streaming recognition session

use std::net::TcpStream;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use tracing::{debug, warn};
use tungstenite::client::IntoClientRequest;
use tungstenite::http::header::AUTHORIZATION;
use tungstenite::http::HeaderValue;
use tungstenite::stream::MaybeTlsStream;
use tungstenite::{Error as WsError, Message, WebSocket};

use super::protocol::{ClientMessage, ServerMessage, StreamStart};
use super::RecognitionResult;
use crate::config::{AudioConfig, SessionConfig};
use crate::error::SessionError;

type Socket = WebSocket<MaybeTlsStream<TcpStream>>;

/// How long the pump blocks in a socket read before checking the audio lane
const READ_TIMEOUT: Duration = Duration::from_millis(50);

/// After the stop message, how long to wait for remaining results
const DRAIN_GRACE: Duration = Duration::from_secs(3);

/// An open streaming recognition session.
///
/// `connect` performs the handshake and sends the start message; `spawn`
/// hands the socket to a pump thread that forwards audio chunks from the
/// outbound lane and emits `RecognitionResult`s on the returned channel
/// until the backend ends the stream or the sentinel arrives and the drain
/// grace period runs out.
pub struct StreamingSession {
    socket: Socket,
}

impl StreamingSession {
    /// Open the session and send the stream configuration.
    ///
    /// Fails fast: any error here aborts startup before capture begins.
    pub fn connect(session: &SessionConfig, audio: &AudioConfig) -> Result<Self, SessionError> {
        let mut request = session
            .endpoint
            .as_str()
            .into_client_request()
            .map_err(|e| SessionError::Endpoint(e.to_string()))?;

        if let Some(key) = resolve_api_key(session) {
            let value = HeaderValue::from_str(&format!("Bearer {}", key))
                .map_err(|e| SessionError::Endpoint(e.to_string()))?;
            request.headers_mut().insert(AUTHORIZATION, value);
        }

        let (mut socket, response) =
            tungstenite::connect(request).map_err(|e| SessionError::Connect(e.to_string()))?;
        debug!(status = %response.status(), "recognition session connected");

        set_read_timeout(&mut socket, READ_TIMEOUT)
            .map_err(|e| SessionError::Connect(e.to_string()))?;

        let start = ClientMessage::Start {
            config: StreamStart::new(session, audio),
        };
        let payload =
            serde_json::to_string(&start).map_err(|e| SessionError::Send(e.to_string()))?;
        socket
            .send(Message::text(payload))
            .map_err(|e| SessionError::Send(e.to_string()))?;

        Ok(Self { socket })
    }

    /// Start the pump thread.
    ///
    /// `audio_rx` carries LINEAR16 chunks; a `None` sentinel closes the
    /// outbound stream. The returned receiver yields results until the
    /// session ends, then disconnects.
    pub fn spawn(
        self,
        audio_rx: Receiver<Option<Vec<u8>>>,
    ) -> (Receiver<RecognitionResult>, JoinHandle<()>) {
        let (result_tx, result_rx) = unbounded();
        let handle = thread::spawn(move || pump(self.socket, audio_rx, result_tx));
        (result_rx, handle)
    }
}

/// Single-threaded socket pump: alternates between draining the audio lane
/// and reading server messages with a short timeout. One thread owns the
/// socket, so no locking is needed.
fn pump(mut socket: Socket, audio_rx: Receiver<Option<Vec<u8>>>, result_tx: Sender<RecognitionResult>) {
    let mut closing = false;
    let mut drain_deadline: Option<Instant> = None;

    loop {
        if !closing {
            match forward_audio(&mut socket, &audio_rx) {
                Ok(false) => {}
                Ok(true) => {
                    closing = true;
                    drain_deadline = Some(Instant::now() + DRAIN_GRACE);
                }
                Err(e) => {
                    warn!("failed to send audio to backend: {}", e);
                    break;
                }
            }
        }

        if let Some(deadline) = drain_deadline {
            if Instant::now() >= deadline {
                warn!("backend did not end the stream after stop, dropping the connection");
                break;
            }
        }

        match socket.read() {
            Ok(Message::Text(payload)) => match serde_json::from_str::<ServerMessage>(&payload) {
                Ok(ServerMessage::End) => {
                    debug!("backend ended the stream");
                    break;
                }
                Ok(ServerMessage::Error { message }) => {
                    warn!("backend error: {}", message);
                }
                Ok(msg) => {
                    // A result with no alternatives is a skipped tick.
                    if let Some(result) = msg.into_result() {
                        if result_tx.send(result).is_err() {
                            break;
                        }
                    }
                }
                Err(e) => debug!("ignoring unparseable backend message: {}", e),
            },
            Ok(Message::Close(_)) => {
                debug!("backend closed the socket");
                break;
            }
            Ok(_) => {}
            Err(WsError::Io(e)) if is_timeout(&e) => continue,
            Err(WsError::ConnectionClosed) | Err(WsError::AlreadyClosed) => break,
            Err(e) => {
                warn!("recognition stream error: {}", e);
                break;
            }
        }
    }

    let _ = socket.close(None);
}

/// Drain pending audio onto the socket. Returns `Ok(true)` once the sentinel
/// has been seen and the stop message sent.
fn forward_audio(
    socket: &mut Socket,
    audio_rx: &Receiver<Option<Vec<u8>>>,
) -> Result<bool, WsError> {
    loop {
        match audio_rx.try_recv() {
            Ok(Some(chunk)) => socket.send(Message::binary(chunk))?,
            Ok(None) => {
                send_stop(socket)?;
                return Ok(true);
            }
            Err(TryRecvError::Empty) => return Ok(false),
            Err(TryRecvError::Disconnected) => {
                // Producer dropped without a sentinel; treat it as one.
                send_stop(socket)?;
                return Ok(true);
            }
        }
    }
}

fn send_stop(socket: &mut Socket) -> Result<(), WsError> {
    let payload = serde_json::to_string(&ClientMessage::Stop).unwrap_or_default();
    socket.send(Message::text(payload))
}

fn resolve_api_key(session: &SessionConfig) -> Option<String> {
    session
        .api_key
        .clone()
        .or_else(|| std::env::var("LIVECAP_API_KEY").ok())
}

fn set_read_timeout(socket: &mut Socket, timeout: Duration) -> std::io::Result<()> {
    match socket.get_mut() {
        MaybeTlsStream::Plain(stream) => stream.set_read_timeout(Some(timeout)),
        MaybeTlsStream::NativeTls(stream) => stream.get_ref().set_read_timeout(Some(timeout)),
        _ => Ok(()),
    }
}

fn is_timeout(e: &std::io::Error) -> bool {
    matches!(
        e.kind(),
        std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
    )
}
