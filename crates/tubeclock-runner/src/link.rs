//! Byte transports standing in for the clock's UART.

use std::io::{self, Read, Write};
use std::thread;

use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use tracing::{debug, trace};

/// A serial link: non-blocking receive, buffered send.
///
/// Responses are written through [`Write`]; a `flush` pushes them out.
pub trait SerialLink: Write {
    /// Next chunk of received bytes, or `None` if nothing is waiting.
    fn try_recv(&mut self) -> Option<Vec<u8>>;

    /// Whether the remote side is gone for good.
    fn is_closed(&self) -> bool;
}

/// One end of an in-process link built from two channels.
#[derive(Debug)]
pub struct ChannelLink {
    rx: Receiver<Vec<u8>>,
    tx: Sender<Vec<u8>>,
    pending: Vec<u8>,
    closed: bool,
}

impl ChannelLink {
    /// Create a connected pair. Bytes flushed on one end arrive on the other.
    pub fn pair() -> (ChannelLink, ChannelLink) {
        let (a_tx, b_rx) = unbounded();
        let (b_tx, a_rx) = unbounded();
        (ChannelLink::new(a_rx, a_tx), ChannelLink::new(b_rx, b_tx))
    }

    fn new(rx: Receiver<Vec<u8>>, tx: Sender<Vec<u8>>) -> Self {
        ChannelLink {
            rx,
            tx,
            pending: Vec::new(),
            closed: false,
        }
    }

    /// Send bytes straight away.
    pub fn send(&self, data: &[u8]) -> io::Result<()> {
        self.tx
            .send(data.to_vec())
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "link peer dropped"))
    }

    /// Everything received so far, concatenated.
    pub fn drain(&mut self) -> Vec<u8> {
        let mut out = Vec::new();
        while let Some(chunk) = self.try_recv() {
            out.extend_from_slice(&chunk);
        }
        out
    }
}

impl Write for ChannelLink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        Ok(buf.len())
    }

    /// Bytes flushed after the peer has gone are dropped.
    fn flush(&mut self) -> io::Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let data = std::mem::take(&mut self.pending);
        if self.tx.send(data).is_err() {
            trace!("ChannelLink: peer gone, dropped response");
        }
        Ok(())
    }
}

impl SerialLink for ChannelLink {
    fn try_recv(&mut self) -> Option<Vec<u8>> {
        match self.rx.try_recv() {
            Ok(data) => Some(data),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.closed = true;
                None
            }
        }
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

/// Commands on stdin, responses on stdout.
///
/// A reader thread blocks on stdin and forwards chunks over a channel so the
/// poll loop never waits for input. End of input closes the link.
#[derive(Debug)]
pub struct StdioLink {
    rx: Receiver<Vec<u8>>,
    stdout: io::Stdout,
    closed: bool,
}

impl StdioLink {
    pub fn spawn() -> io::Result<Self> {
        let (tx, rx) = unbounded();
        thread::Builder::new()
            .name("stdin-reader".to_string())
            .spawn(move || read_stdin(tx))?;
        Ok(StdioLink {
            rx,
            stdout: io::stdout(),
            closed: false,
        })
    }
}

fn read_stdin(tx: Sender<Vec<u8>>) {
    let mut stdin = io::stdin().lock();
    let mut buf = [0u8; 256];
    loop {
        match stdin.read(&mut buf) {
            Ok(0) => {
                debug!("StdioLink: end of input");
                return;
            }
            Ok(n) => {
                trace!("StdioLink: {} bytes in", n);
                if tx.send(buf[..n].to_vec()).is_err() {
                    return;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                debug!("StdioLink: read failed: {}", e);
                return;
            }
        }
    }
}

impl Write for StdioLink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stdout.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }
}

impl SerialLink for StdioLink {
    fn try_recv(&mut self) -> Option<Vec<u8>> {
        match self.rx.try_recv() {
            Ok(data) => Some(data),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.closed = true;
                None
            }
        }
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_pair_is_bidirectional() {
        let (mut device, mut host) = ChannelLink::pair();

        host.send(b"help\n").unwrap();
        assert_eq!(device.try_recv(), Some(b"help\n".to_vec()));
        assert_eq!(device.try_recv(), None);

        device.write_all(b"OK: ").unwrap();
        device.write_all(b"done\r\n").unwrap();
        assert_eq!(host.try_recv(), None);
        device.flush().unwrap();
        assert_eq!(host.drain(), b"OK: done\r\n");
    }

    #[test]
    fn test_channel_link_closes_when_peer_dropped() {
        let (mut device, host) = ChannelLink::pair();
        host.send(b"reboot\n").unwrap();
        drop(host);

        assert!(device.try_recv().is_some());
        assert!(!device.is_closed());
        assert!(device.try_recv().is_none());
        assert!(device.is_closed());
    }
}
