//! The MIDI link
//!
//! A [Link] is the one shared connection to an instrument. It owns the
//! transport and the link-wide send timestamps the timing gaps are measured
//! against. It is only ever reached through the sequencer's lock.

use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use super::sequencer::SysExAccumulator;
use super::transport::{MidiTransport, Transport};
use crate::error::TransportError;
use crate::protocol::message::{Composer, DeviceId};

/// An open connection to one instrument.
pub struct Link {
    /// Byte pipe to the device.
    transport: Box<dyn Transport>,
    /// Message builder for the configured device ID.
    composer: Composer,
    /// When the last block dump finished sending.
    last_block_send: Option<Instant>,
    /// When the last real-time parameter change finished sending.
    last_parameter_send: Option<Instant>,
    /// Partial inbound message carried between polls.
    inbound: SysExAccumulator,
}

impl Link {
    /// Wraps an already open transport.
    pub fn new(transport: Box<dyn Transport>, device_id: DeviceId) -> Self {
        Self {
            transport,
            composer: Composer::new(device_id),
            last_block_send: None,
            last_parameter_send: None,
            inbound: SysExAccumulator::new(),
        }
    }

    /// Opens MIDI ports matching `in_port` and `out_port` and links them to
    /// `device_id`.
    pub fn open(
        device_id: DeviceId,
        in_port: Option<&str>,
        out_port: Option<&str>,
    ) -> Result<Self, TransportError> {
        let transport = MidiTransport::open(in_port, out_port)?;
        Ok(Self::new(Box::new(transport), device_id))
    }

    /// Composer for this link's device.
    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    /// Device this link addresses.
    pub fn device_id(&self) -> DeviceId {
        self.composer.device_id()
    }

    /// Sends a block dump no sooner than `gap` after the previous
    /// block send.
    pub(crate) fn send_block(&mut self, bytes: &[u8], gap: Duration) -> Result<(), TransportError> {
        wait_for_gap(self.last_block_send, gap);
        self.transport.send(bytes)?;
        self.last_block_send = Some(Instant::now());
        Ok(())
    }

    /// Sends a parameter change no sooner than `gap` after the previous one
    /// completed.
    pub(crate) fn send_parameter(
        &mut self,
        bytes: &[u8],
        gap: Duration,
    ) -> Result<(), TransportError> {
        wait_for_gap(self.last_parameter_send, gap);
        self.transport.send(bytes)?;
        self.last_parameter_send = Some(Instant::now());
        Ok(())
    }

    /// Sends without any gap. Used for read requests.
    pub(crate) fn send_request(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        self.transport.send(bytes)
    }

    /// Complete messages assembled from everything received so far.
    pub(crate) fn poll_messages(&mut self) -> Vec<Vec<u8>> {
        let mut messages = Vec::new();
        while let Some(chunk) = self.transport.poll_received() {
            messages.extend(self.inbound.push(&chunk));
        }
        messages
    }

    /// Drops whatever arrived before a transfer started.
    pub(crate) fn drain(&mut self) -> usize {
        let mut dropped = self.inbound.pending();
        self.inbound.clear();
        while let Some(chunk) = self.transport.poll_received() {
            dropped += chunk.len();
        }
        if dropped > 0 {
            debug!(bytes = dropped, "discarded stale input");
        }
        dropped
    }

    /// Closes the transport.
    pub fn close(mut self) {
        self.transport.close();
    }
}

impl Drop for Link {
    fn drop(&mut self) {
        self.transport.close();
    }
}

/// Sleeps until `gap` has passed since `last`.
fn wait_for_gap(last: Option<Instant>, gap: Duration) {
    if let Some(last) = last {
        let elapsed = last.elapsed();
        if elapsed < gap {
            thread::sleep(gap - elapsed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Records when each message was sent.
    struct Recorder {
        sent: Arc<Mutex<Vec<Instant>>>,
    }

    impl Transport for Recorder {
        fn send(&mut self, _bytes: &[u8]) -> Result<(), TransportError> {
            self.sent.lock().unwrap().push(Instant::now());
            Ok(())
        }

        fn poll_received(&mut self) -> Option<Vec<u8>> {
            None
        }

        fn close(&mut self) {}
    }

    #[test]
    fn test_block_gap_is_enforced() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let mut link = Link::new(
            Box::new(Recorder {
                sent: Arc::clone(&sent),
            }),
            DeviceId::default(),
        );
        let gap = Duration::from_millis(20);
        link.send_block(&[0xF0, 0xF7], gap).unwrap();
        link.send_block(&[0xF0, 0xF7], gap).unwrap();
        link.send_parameter(&[0xF0, 0xF7], gap).unwrap();

        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 3);
        assert!(sent[1].duration_since(sent[0]) >= gap);
    }
}
