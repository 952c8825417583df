//=========================================================================
// Network Session
//=========================================================================
//
// TCP link to a multiplayer server, run on a worker thread.
//
// ```text
//   connect(handle) ─► worker: resolve → connect_timeout ─┬─ ok:  Connected
//                                                        └─ err: Disconnected
//                      worker: watch socket ── EOF/error ──► Disconnected
//   disconnect()    ─► cancel flag + socket shutdown, join worker
// ```
//
// The worker only ever talks to the core through the connection-mode
// `PendingHandle`; the control loop applies its reports at a checkpoint.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::io::{ErrorKind, Read};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, info, warn};
use parking_lot::Mutex;

//=== Internal Dependencies ===============================================

use crate::core::state::{ConnectionMode, PendingHandle};
use crate::core::subsystem::{LifecycleEnv, NetworkSession, Subsystem, SubsystemId};
use crate::error::SubsystemError;

//=== Endpoint ============================================================

#[derive(Debug, Clone, PartialEq, Eq)]
struct Endpoint {
    host: String,
    port: u16,
    timeout: Duration,
    player: String,
}

//=== Worker ==============================================================

struct Worker {
    cancelled: Arc<AtomicBool>,
    socket: Arc<Mutex<Option<TcpStream>>>,
    thread: JoinHandle<()>,
}

//=== TcpNetworkSession ===================================================

#[derive(Default)]
pub struct TcpNetworkSession {
    endpoint: Option<Endpoint>,
    worker: Option<Worker>,
}

impl TcpNetworkSession {
    const POLL_INTERVAL: Duration = Duration::from_millis(100);

    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|worker| !worker.thread.is_finished())
    }

    fn resolve(endpoint: &Endpoint) -> Result<SocketAddr, String> {
        (endpoint.host.as_str(), endpoint.port)
            .to_socket_addrs()
            .map_err(|e| format!("cannot resolve {}: {e}", endpoint.host))?
            .next()
            .ok_or_else(|| format!("no address for {}", endpoint.host))
    }

    fn run_worker(
        endpoint: Endpoint,
        connection: PendingHandle<ConnectionMode>,
        cancelled: Arc<AtomicBool>,
        socket: Arc<Mutex<Option<TcpStream>>>,
    ) {
        let stream = match Self::resolve(&endpoint).and_then(|addr| {
            TcpStream::connect_timeout(&addr, endpoint.timeout).map_err(|e| e.to_string())
        }) {
            Ok(stream) => stream,
            Err(reason) => {
                warn!(target: "network", "Connection to {}:{} failed: {reason}", endpoint.host, endpoint.port);
                if !cancelled.load(Ordering::Acquire) {
                    connection.set_pending(ConnectionMode::Disconnected);
                }
                return;
            }
        };

        if let Err(e) = stream.set_read_timeout(Some(Self::POLL_INTERVAL)) {
            debug!(target: "network", "Read timeout not set: {e}");
        }
        match stream.try_clone() {
            Ok(clone) => *socket.lock() = Some(clone),
            Err(e) => debug!(target: "network", "Socket not shared: {e}"),
        }
        if cancelled.load(Ordering::Acquire) {
            let _ = stream.shutdown(Shutdown::Both);
            return;
        }
        info!(
            target: "network",
            "Connected to {}:{} as {}",
            endpoint.host, endpoint.port, endpoint.player
        );
        connection.set_pending(ConnectionMode::Connected);

        Self::watch(stream, &connection, &cancelled);
    }

    /// Blocks until the socket closes or the session is cancelled.
    fn watch(mut stream: TcpStream, connection: &PendingHandle<ConnectionMode>, cancelled: &AtomicBool) {
        let mut buffer = [0u8; 512];
        loop {
            if cancelled.load(Ordering::Acquire) {
                return;
            }
            match stream.read(&mut buffer) {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {}
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => {
                    debug!(target: "network", "Socket error: {e}");
                    break;
                }
            }
        }
        if !cancelled.load(Ordering::Acquire) {
            warn!(target: "network", "Server closed the connection");
            connection.set_pending(ConnectionMode::Disconnected);
        }
    }
}

impl Subsystem for TcpNetworkSession {
    fn id(&self) -> SubsystemId {
        SubsystemId::Network
    }

    fn create(&mut self, env: &LifecycleEnv<'_>) -> Result<(), SubsystemError> {
        let mp = &env.settings.mp;
        self.endpoint = Some(Endpoint {
            host: mp.server_host.clone(),
            port: mp.server_port,
            timeout: Duration::from_millis(mp.connect_timeout_ms),
            player: mp.player_name.clone(),
        });
        Ok(())
    }

    fn teardown(&mut self) -> Result<(), SubsystemError> {
        self.disconnect();
        self.endpoint = None;
        Ok(())
    }
}

impl NetworkSession for TcpNetworkSession {
    fn connect(&mut self, connection: PendingHandle<ConnectionMode>) -> Result<(), SubsystemError> {
        let endpoint = self
            .endpoint
            .clone()
            .ok_or(SubsystemError::NotCreated(SubsystemId::Network))?;
        if self.worker.is_some() {
            self.disconnect();
        }

        let cancelled = Arc::new(AtomicBool::new(false));
        let socket = Arc::new(Mutex::new(None));
        let thread = thread::Builder::new()
            .name("network".to_string())
            .spawn({
                let cancelled = Arc::clone(&cancelled);
                let socket = Arc::clone(&socket);
                move || Self::run_worker(endpoint, connection, cancelled, socket)
            })
            .map_err(|e| SubsystemError::Network(format!("worker thread: {e}")))?;

        self.worker = Some(Worker {
            cancelled,
            socket,
            thread,
        });
        Ok(())
    }

    fn disconnect(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        worker.cancelled.store(true, Ordering::Release);
        if let Some(socket) = worker.socket.lock().take() {
            let _ = socket.shutdown(Shutdown::Both);
        }
        if worker.thread.join().is_err() {
            warn!(target: "network", "Network worker panicked");
        }
        info!(target: "network", "Disconnected");
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
