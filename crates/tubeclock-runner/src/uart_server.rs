//! UART over TCP.
//!
//! Exposes the clock's serial port on a TCP port so a terminal (`nc`,
//! `telnet`, a host tool) can talk to it. One client is served at a time;
//! the next is accepted after the current one disconnects. Responses written
//! while nobody is connected are dropped, as on a real UART with nothing
//! attached.

use std::io::{self, Write};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use crate::error::{RunnerError, RunnerResult};
use crate::link::SerialLink;

/// Depth of the channels between the TCP task and the poll loop.
const CHANNEL_DEPTH: usize = 256;

/// Serial link served over TCP.
pub struct TcpLink {
    /// Keeps the listener task alive.
    _runtime: Runtime,
    local_addr: SocketAddr,
    /// TCP client -> device RX.
    rx_receiver: mpsc::Receiver<Vec<u8>>,
    /// Device TX -> TCP client.
    tx_sender: mpsc::Sender<Vec<u8>>,
    connected: Arc<AtomicBool>,
    pending: Vec<u8>,
}

impl std::fmt::Debug for TcpLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TcpLink")
            .field("local_addr", &self.local_addr)
            .field("connected", &self.is_client_connected())
            .finish_non_exhaustive()
    }
}

impl TcpLink {
    /// Bind `0.0.0.0:<port>` and start accepting clients. Port 0 picks a
    /// free port; see [`TcpLink::local_addr`].
    pub fn bind(port: u16) -> RunnerResult<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("uart-tcp")
            .enable_io()
            .build()?;

        let listener = runtime
            .block_on(TcpListener::bind(("0.0.0.0", port)))
            .map_err(|source| RunnerError::TcpBind { port, source })?;
        let local_addr = listener.local_addr()?;

        let (tx_sender, tx_receiver) = mpsc::channel::<Vec<u8>>(CHANNEL_DEPTH);
        let (rx_sender, rx_receiver) = mpsc::channel::<Vec<u8>>(CHANNEL_DEPTH);
        let connected = Arc::new(AtomicBool::new(false));

        let task_connected = connected.clone();
        runtime.spawn(async move {
            if let Err(e) =
                run_uart_listener(listener, tx_receiver, rx_sender, task_connected).await
            {
                warn!("UART listener stopped: {}", e);
            }
        });
        info!("UART listening on {}", local_addr);

        Ok(TcpLink {
            _runtime: runtime,
            local_addr,
            rx_receiver,
            tx_sender,
            connected,
            pending: Vec::new(),
        })
    }

    /// The bound address.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Whether a client is attached right now.
    pub fn is_client_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }
}

impl Write for TcpLink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        Ok(buf.len())
    }

    /// Hand buffered bytes to the TCP task. Never blocks: with no client, or
    /// a client too slow to drain the channel, the bytes are dropped.
    fn flush(&mut self) -> io::Result<()> {
        let data = std::mem::take(&mut self.pending);
        if data.is_empty() || !self.is_client_connected() {
            return Ok(());
        }
        match self.tx_sender.try_send(data) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("UART TX buffer full (client connected but slow)");
                Ok(())
            }
            Err(mpsc::error::TrySendError::Closed(_)) => Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "UART listener stopped",
            )),
        }
    }
}

impl SerialLink for TcpLink {
    fn try_recv(&mut self) -> Option<Vec<u8>> {
        self.rx_receiver.try_recv().ok()
    }

    fn is_closed(&self) -> bool {
        self.tx_sender.is_closed()
    }
}

/// Accept clients one after another.
async fn run_uart_listener(
    listener: TcpListener,
    mut tx_receiver: mpsc::Receiver<Vec<u8>>,
    rx_sender: mpsc::Sender<Vec<u8>>,
    connected: Arc<AtomicBool>,
) -> io::Result<()> {
    loop {
        let (stream, peer) = listener.accept().await?;
        info!("UART client connected from {}", peer);

        // Drop anything queued for a previous client.
        while tx_receiver.try_recv().is_ok() {}
        connected.store(true, Ordering::Release);

        let result = handle_uart_connection(stream, &mut tx_receiver, &rx_sender).await;

        connected.store(false, Ordering::Release);
        match result {
            Ok(()) => info!("UART client {} disconnected", peer),
            Err(e) => warn!("UART connection error with {}: {}", peer, e),
        }
        if rx_sender.is_closed() {
            debug!("UART link dropped, stopping listener");
            return Ok(());
        }
    }
}

/// Shuttle bytes between one client and the device channels.
async fn handle_uart_connection(
    mut stream: TcpStream,
    tx_receiver: &mut mpsc::Receiver<Vec<u8>>,
    rx_sender: &mpsc::Sender<Vec<u8>>,
) -> io::Result<()> {
    let (mut reader, mut writer) = stream.split();
    let mut read_buf = [0u8; 1024];

    loop {
        tokio::select! {
            // TCP client -> device RX
            result = reader.read(&mut read_buf) => {
                let n = result?;
                if n == 0 {
                    return Ok(());
                }
                trace!("UART RX {} bytes", n);
                if rx_sender.send(read_buf[..n].to_vec()).await.is_err() {
                    return Ok(());
                }
            }

            // Device TX -> TCP client
            Some(data) = tx_receiver.recv() => {
                writer.write_all(&data).await?;
                writer.flush().await?;
            }
        }
    }
}
