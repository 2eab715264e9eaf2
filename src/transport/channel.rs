// src/transport/channel.rs

//! Port over a blocking byte stream (socket, RFCOMM device, pty). A reader
//! thread splits the incoming stream into lines and hands them over through
//! a channel; the caller waits with a timeout.

use super::TransportPort;
use crate::common::error::LinkError;
use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Line port fed by a background reader thread.
///
/// The link counts as connected until the reader hits end of stream or a read
/// error. Lines already queued at that point can still be received.
///
/// `send` discards every complete line still queued. A line the reader thread
/// has only partly read is out of its reach: the next bytes complete it and it
/// is delivered as the first answer to the new request. Links that may leave
/// a reply half sent should use [`SerialTransport`](super::SerialTransport),
/// which drops partial input on send.
pub struct ChannelTransport<W: Write> {
    writer: W,
    receiver: Receiver<String>,
    connected: Arc<AtomicBool>,
    _thread: thread::JoinHandle<()>,
}

impl<W: Write> ChannelTransport<W> {
    /// Starts the reader thread over `reader`; request bytes go to `writer`.
    pub fn spawn<R>(reader: R, writer: W) -> Self
    where
        R: BufRead + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel();
        let connected = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&connected);

        let thread = thread::spawn(move || {
            read_lines(reader, &sender);
            // Clear the flag before the channel closes.
            flag.store(false, Ordering::SeqCst);
            drop(sender);
        });

        ChannelTransport {
            writer,
            receiver,
            connected,
            _thread: thread,
        }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }
}

/// Reader thread body: forwards non-blank lines until EOF or a read error.
fn read_lines<R: BufRead>(mut reader: R, sender: &Sender<String>) {
    let mut raw = Vec::new();
    loop {
        raw.clear();
        match reader.read_until(b'\n', &mut raw) {
            Ok(0) => break, // EOF
            Ok(_) => {
                let line = String::from_utf8_lossy(&raw);
                let line = line.trim_end_matches(['\r', '\n']);
                if line.is_empty() {
                    continue;
                }
                if sender.send(line.to_owned()).is_err() {
                    break;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                log::warn!("link reader stopped: {}", e);
                break;
            }
        }
    }
}

impl<W: Write> TransportPort for ChannelTransport<W> {
    type Error = io::Error;
    type Instant = Instant;

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn send(&mut self, byte: u8) -> Result<(), LinkError<io::Error>> {
        if !self.is_connected() {
            return Err(LinkError::NotConnected);
        }
        while let Ok(stale) = self.receiver.try_recv() {
            log::trace!("discarding stale line {:?}", stale);
        }
        self.writer.write_all(&[byte]).map_err(LinkError::Io)?;
        self.writer.flush().map_err(LinkError::Io)
    }

    fn await_line(&mut self, timeout: Duration) -> Result<Option<String>, LinkError<io::Error>> {
        match self.receiver.recv_timeout(timeout) {
            Ok(line) => Ok(Some(line)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(LinkError::NotConnected),
        }
    }
}
