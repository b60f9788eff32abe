//! Transfer sequencer
//!
//! Moves whole patches over the shared link. Every operation takes the link
//! lock for its full duration, so a bulk dump and a real-time parameter
//! change can never interleave on the wire.

use std::fmt;
use std::mem;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::link::Link;
use crate::error::{ProtocolError, TransferError};
use crate::params::{BlockDescriptor, PartKind};
use crate::patch::{BlockValues, Patch};
use crate::protocol::address::Address;
use crate::protocol::message::{DeviceId, EOX, EST};
use crate::protocol::validate::{parse_message, peek_address, validate};

/// Timing constraints of the link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Minimum time between two block sends. The instrument's receive buffer
    /// overflows below this.
    pub block_gap: Duration,
    /// Minimum time between two real-time parameter changes.
    pub parameter_gap: Duration,
    /// How long to wait for each requested block.
    pub receive_timeout: Duration,
    /// Sleep between polls of the transport while waiting.
    pub poll_interval: Duration,
}

impl Timing {
    /// Shortest block gap the instrument tolerates.
    pub const MIN_BLOCK_GAP: Duration = Duration::from_millis(75);
    /// Shortest parameter gap the instrument tolerates.
    pub const MIN_PARAMETER_GAP: Duration = Duration::from_millis(2);
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            block_gap: Self::MIN_BLOCK_GAP,
            parameter_gap: Self::MIN_PARAMETER_GAP,
            receive_timeout: Duration::from_secs(2),
            poll_interval: Duration::from_millis(1),
        }
    }
}

/// Splits an inbound byte stream into complete SysEx messages.
///
/// A new `F0` discards any unterminated message before it. Real-time status
/// bytes may be interleaved anywhere and are dropped.
#[derive(Debug, Default)]
pub struct SysExAccumulator {
    buffer: Vec<u8>,
    in_message: bool,
}

impl SysExAccumulator {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one chunk and returns the messages it completed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Vec<u8>> {
        let mut complete = Vec::new();
        for &byte in chunk {
            match byte {
                EST => {
                    if self.in_message {
                        warn!(bytes = self.buffer.len(), "discarding unterminated SysEx");
                    }
                    self.buffer.clear();
                    self.buffer.push(byte);
                    self.in_message = true;
                }
                0xF8..=0xFF => {}
                EOX if self.in_message => {
                    self.buffer.push(byte);
                    self.in_message = false;
                    complete.push(mem::take(&mut self.buffer));
                }
                _ if self.in_message => self.buffer.push(byte),
                _ => {}
            }
        }
        complete
    }

    /// Bytes of the message currently being assembled.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Forgets any partial message.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.in_message = false;
    }
}

/// One block of a completed send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockReport {
    /// Block label.
    pub label: String,
    /// Block base address.
    pub address: Address,
    /// Bytes written.
    pub bytes: usize,
}

/// Outcome of a successful [TransferSequencer::send_patch].
#[derive(Debug, Clone)]
pub struct TransferReport {
    /// Part that was sent.
    pub part: PartKind,
    /// Blocks in the order they went out.
    pub blocks: Vec<BlockReport>,
    /// Wall time of the whole transfer, gaps included.
    pub elapsed: Duration,
}

impl TransferReport {
    /// Total bytes written.
    pub fn total_bytes(&self) -> usize {
        self.blocks.iter().map(|b| b.bytes).sum()
    }
}

/// Owns the link and serializes every transfer over it.
pub struct TransferSequencer {
    link: Mutex<Option<Link>>,
    timing: Timing,
}

impl TransferSequencer {
    /// Creates a sequencer with no link attached.
    pub fn new(timing: Timing) -> Self {
        Self {
            link: Mutex::new(None),
            timing,
        }
    }

    /// Creates a sequencer driving `link`.
    pub fn with_link(link: Link, timing: Timing) -> Self {
        Self {
            link: Mutex::new(Some(link)),
            timing,
        }
    }

    /// Replaces the current link, closing the old one.
    pub fn connect(&self, link: Link) {
        let previous = self.lock().replace(link);
        if let Some(previous) = previous {
            previous.close();
        }
    }

    /// Closes the link. Later transfers fail with
    /// [ProtocolError::LinkUnavailable].
    pub fn disconnect(&self) {
        if let Some(link) = self.lock().take() {
            link.close();
        }
    }

    /// Check if a link is attached.
    pub fn is_connected(&self) -> bool {
        self.lock().is_some()
    }

    /// Device ID of the attached link.
    pub fn device_id(&self) -> Option<DeviceId> {
        self.lock().as_ref().map(|link| link.device_id())
    }

    /// The timing in force.
    pub fn timing(&self) -> Timing {
        self.timing
    }

    fn lock(&self) -> MutexGuard<'_, Option<Link>> {
        self.link.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sends one real-time parameter change.
    ///
    /// Concurrent callers wait their turn; each send starts at least
    /// [Timing::parameter_gap] after the previous one completed.
    pub fn send_parameter(
        &self,
        address: Address,
        value: u32,
        byte_width: usize,
    ) -> Result<(), ProtocolError> {
        let mut guard = self.lock();
        let link = guard.as_mut().ok_or(ProtocolError::LinkUnavailable)?;
        let message = link
            .composer()
            .compose_parameter_change(address, value, byte_width)?;
        link.send_parameter(&message, self.timing.parameter_gap)?;
        debug!(%address, value, byte_width, "parameter sent");
        Ok(())
    }

    /// Sends every block of `patch` in order and clears its modified flag.
    ///
    /// The device does not acknowledge writes; success means every byte was
    /// handed to the transport.
    pub fn send_patch(&self, patch: &mut Patch) -> Result<TransferReport, TransferError> {
        let started = Instant::now();
        let part = patch.part();
        let mut guard = self.lock();
        let link = guard
            .as_mut()
            .ok_or_else(|| TransferError::new(part.display_name(), ProtocolError::LinkUnavailable))?;

        // Every block is composed before the first byte goes out.
        let composer = *link.composer();
        let mut messages = Vec::with_capacity(patch.blocks().len());
        for (block, values) in patch.iter() {
            let message = composer
                .compose_block_dump(block, values)
                .map_err(|e| TransferError::new(block.label.clone(), e))?;
            messages.push((block.label.to_string(), block.address, message));
        }

        let mut blocks = Vec::with_capacity(messages.len());
        for (label, address, message) in messages {
            link.send_block(&message, self.timing.block_gap)
                .map_err(|e| TransferError::new(label.clone(), e.into()))?;
            debug!(block = %label, %address, bytes = message.len(), "block sent");
            blocks.push(BlockReport {
                label,
                address,
                bytes: message.len(),
            });
        }
        drop(guard);

        patch.mark_synced();
        let report = TransferReport {
            part,
            blocks,
            elapsed: started.elapsed(),
        };
        info!(
            part = %part,
            blocks = report.blocks.len(),
            bytes = report.total_bytes(),
            "patch sent"
        );
        Ok(report)
    }

    /// Requests every block of `part` and decodes the replies into a patch.
    ///
    /// The first block that fails aborts the whole receive; no partial patch
    /// is ever returned.
    pub fn receive_patch(&self, part: PartKind) -> Result<Patch, TransferError> {
        let mut guard = self.lock();
        let link = guard
            .as_mut()
            .ok_or_else(|| TransferError::new(part.display_name(), ProtocolError::LinkUnavailable))?;
        link.drain();

        let blocks = part.blocks();
        let mut values = Vec::with_capacity(blocks.len());
        for block in &blocks {
            let block_values = self.receive_block(link, block).map_err(|e| {
                warn!(block = %block.label, error = %e, "receive aborted");
                TransferError::new(block.label.clone(), e)
            })?;
            values.push(block_values);
        }
        drop(guard);

        info!(part = %part, blocks = blocks.len(), "patch received");
        Patch::from_blocks(part, values).map_err(|e| TransferError::new(part.display_name(), e))
    }

    fn receive_block(
        &self,
        link: &mut Link,
        block: &BlockDescriptor,
    ) -> Result<BlockValues, ProtocolError> {
        let request = link.composer().compose_block_request(block);
        link.send_request(&request)?;
        debug!(block = %block.label, address = %block.address, "block requested");

        let expected = block.expected_length();
        let deadline = Instant::now() + self.timing.receive_timeout;
        loop {
            for message in link.poll_messages() {
                if message.len() != expected {
                    warn!(
                        block = %block.label,
                        expected,
                        observed = message.len(),
                        "discarding message of unexpected length"
                    );
                    continue;
                }
                if peek_address(&message) != Some(block.address) {
                    warn!(block = %block.label, "discarding stale message");
                    continue;
                }
                let payload = validate(&message, block)?;
                return Ok(BlockValues::from_payload(block.layout, payload));
            }

            if Instant::now() >= deadline {
                return Err(ProtocolError::NoResponse {
                    timeout: self.timing.receive_timeout,
                });
            }
            thread::sleep(self.timing.poll_interval);
        }
    }

    /// Applies any unsolicited parameter messages waiting on the link to
    /// `patch`. Returns how many were applied.
    ///
    /// Malformed messages and messages for other parts are logged and
    /// skipped.
    pub fn apply_incoming(&self, patch: &mut Patch) -> Result<usize, ProtocolError> {
        let messages = {
            let mut guard = self.lock();
            let link = guard.as_mut().ok_or(ProtocolError::LinkUnavailable)?;
            link.poll_messages()
        };

        let mut applied = 0;
        for raw in messages {
            let message = match parse_message(&raw) {
                Ok(message) => message,
                Err(e) => {
                    warn!(error = %e, "ignoring inbound message");
                    continue;
                }
            };
            match patch.apply_message(&message) {
                Ok(true) => applied += 1,
                Ok(false) => debug!(address = %message.address, "message for another part"),
                Err(e) => warn!(address = %message.address, error = %e, "ignoring inbound message"),
            }
        }
        Ok(applied)
    }
}

impl fmt::Debug for TransferSequencer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransferSequencer")
            .field("connected", &self.is_connected())
            .field("timing", &self.timing)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::transport::Transport;
    use crate::error::TransportError;
    use crate::protocol::message::{CM_DT1, CM_RQ1};
    use std::collections::{HashMap, VecDeque};
    use std::sync::Arc;

    type SendLog = Arc<Mutex<Vec<(Instant, Vec<u8>)>>>;

    /// Stands in for the instrument: answers block requests from a stored
    /// patch, in small fragments.
    #[derive(Default)]
    struct ScriptedDevice {
        dumps: HashMap<Address, Vec<u8>>,
        corrupt: Option<Address>,
        silent: bool,
        fragment: usize,
        stale: Option<Vec<u8>>,
        outbox: VecDeque<Vec<u8>>,
        log: SendLog,
    }

    impl ScriptedDevice {
        fn serving(patch: &Patch) -> Self {
            let bytes = patch.to_bytes().unwrap();
            let dumps = bytes
                .split_inclusive(|&b| b == EOX)
                .map(|m| (peek_address(m).unwrap(), m.to_vec()))
                .collect();
            Self {
                dumps,
                fragment: 7,
                ..Self::default()
            }
        }

        fn queue(&mut self, bytes: &[u8]) {
            for chunk in bytes.chunks(self.fragment.max(1)) {
                self.outbox.push_back(chunk.to_vec());
            }
        }
    }

    impl Transport for ScriptedDevice {
        fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
            self.log.lock().unwrap().push((Instant::now(), bytes.to_vec()));
            if self.silent || bytes[7] != CM_RQ1 {
                return Ok(());
            }
            let Some(address) = peek_address(bytes) else {
                return Ok(());
            };
            if let Some(stale) = self.stale.take() {
                self.queue(&stale);
            }
            if let Some(mut dump) = self.dumps.get(&address).cloned() {
                if self.corrupt == Some(address) {
                    let at = dump.len() - 2;
                    dump[at] = (dump[at] + 1) & 0x7F;
                }
                self.queue(&dump);
            }
            Ok(())
        }

        fn poll_received(&mut self) -> Option<Vec<u8>> {
            self.outbox.pop_front()
        }

        fn close(&mut self) {}
    }

    fn fast_timing() -> Timing {
        Timing {
            block_gap: Duration::from_millis(5),
            parameter_gap: Duration::from_millis(2),
            receive_timeout: Duration::from_millis(100),
            poll_interval: Duration::from_millis(1),
        }
    }

    fn sequencer(device: ScriptedDevice) -> TransferSequencer {
        let link = Link::new(Box::new(device), DeviceId::default());
        TransferSequencer::with_link(link, fast_timing())
    }

    fn edited_digital() -> Patch {
        let mut patch = Patch::init(PartKind::Digital1);
        let cutoff = patch.find("Partial 2", "Filter Cutoff").unwrap();
        patch.set(cutoff, 33).unwrap();
        let wave = patch.find("Partial 3", "Wave Number").unwrap();
        patch.set(wave, 1234).unwrap();
        patch.set_name(0, "Lead").unwrap();
        patch
    }

    #[test]
    fn test_accumulator_reassembles_fragments() {
        let mut acc = SysExAccumulator::new();
        assert!(acc.push(&[0x01, 0xF0, 0x41]).is_empty());
        assert_eq!(acc.pending(), 2);
        assert!(acc.push(&[0x10, 0xF8]).is_empty());
        let complete = acc.push(&[0x12, 0xF7, 0xF0, 0x41, 0xF7]);
        assert_eq!(complete, vec![vec![0xF0, 0x41, 0x10, 0x12, 0xF7], vec![0xF0, 0x41, 0xF7]]);
        assert_eq!(acc.pending(), 0);
    }

    #[test]
    fn test_accumulator_restarts_on_new_message() {
        let mut acc = SysExAccumulator::new();
        acc.push(&[0xF0, 0x41, 0x10]);
        let complete = acc.push(&[0xF0, 0x42, 0xF7]);
        assert_eq!(complete, vec![vec![0xF0, 0x42, 0xF7]]);
    }

    #[test]
    fn test_receive_fragmented_patch() {
        let source = edited_digital();
        let seq = sequencer(ScriptedDevice::serving(&source));
        let received = seq.receive_patch(PartKind::Digital1).unwrap();

        assert!(!received.is_modified());
        assert_eq!(received.name(), Some("Lead"));
        let cutoff = received.find("Partial 2", "Filter Cutoff").unwrap();
        assert_eq!(received.get(cutoff).unwrap(), 33);
        let wave = received.find("Partial 3", "Wave Number").unwrap();
        assert_eq!(received.get(wave).unwrap(), 1234);
    }

    #[test]
    fn test_receive_discards_stale_input() {
        let source = edited_digital();
        let mut device = ScriptedDevice::serving(&source);
        // Same length as the first block, wrong address, after a torn message.
        let other = Patch::init(PartKind::Digital2).to_bytes().unwrap();
        let first_len = PartKind::Digital2.blocks()[0].expected_length();
        let mut stale = vec![0xF0, 0x41, 0x10, 0x00];
        stale.extend_from_slice(&other[..first_len]);
        device.stale = Some(stale);

        let seq = sequencer(device);
        let received = seq.receive_patch(PartKind::Digital1).unwrap();
        assert_eq!(received.name(), Some("Lead"));
    }

    #[test]
    fn test_corrupt_block_aborts_receive() {
        let source = edited_digital();
        let mut device = ScriptedDevice::serving(&source);
        let third = &PartKind::Digital1.blocks()[2];
        device.corrupt = Some(third.address);
        let log = Arc::clone(&device.log);

        let seq = sequencer(device);
        match seq.receive_patch(PartKind::Digital1) {
            Err(TransferError { block, source }) => {
                assert_eq!(block, "Partial 1");
                assert!(matches!(source, ProtocolError::ChecksumMismatch { .. }));
            }
            Ok(_) => panic!("Expected the receive to fail"),
        }
        // Blocks 4 and 5 were never requested.
        assert_eq!(log.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_silent_device_times_out() {
        let mut device = ScriptedDevice::serving(&Patch::init(PartKind::Analog));
        device.silent = true;
        let seq = sequencer(device);

        let started = Instant::now();
        let err = seq.receive_patch(PartKind::Analog).unwrap_err();
        assert!(started.elapsed() >= fast_timing().receive_timeout);
        assert_eq!(err.block, "Analog Tone");
        assert!(matches!(err.source, ProtocolError::NoResponse { .. }));
    }

    #[test]
    fn test_send_patch_respects_block_gap() {
        let device = ScriptedDevice::default();
        let log = Arc::clone(&device.log);
        let seq = sequencer(device);

        let mut patch = edited_digital();
        assert!(patch.is_modified());
        let report = seq.send_patch(&mut patch).unwrap();
        assert!(!patch.is_modified());

        let labels: Vec<&str> = report.blocks.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, ["Common", "Modify", "Partial 1", "Partial 2", "Partial 3"]);
        assert_eq!(report.total_bytes(), patch.to_bytes().unwrap().len());

        let log = log.lock().unwrap();
        assert_eq!(log.len(), 5);
        for pair in log.windows(2) {
            assert!(pair[1].0.duration_since(pair[0].0) >= fast_timing().block_gap);
            assert_eq!(pair[1].1[7], CM_DT1);
        }
    }

    #[test]
    fn test_send_without_link() {
        let seq = TransferSequencer::new(Timing::default());
        let mut patch = edited_digital();
        let err = seq.send_patch(&mut patch).unwrap_err();
        assert!(matches!(err.source, ProtocolError::LinkUnavailable));
        assert!(patch.is_modified());
        assert!(matches!(
            seq.send_parameter(Address::new(0x19, 0x42, 0x00, 0x21), 1, 1),
            Err(ProtocolError::LinkUnavailable)
        ));
    }

    #[test]
    fn test_back_to_back_parameters_are_spaced() {
        let device = ScriptedDevice::default();
        let log = Arc::clone(&device.log);
        let seq = Arc::new(sequencer(device));

        let handles: Vec<_> = (0..2)
            .map(|t| {
                let seq = Arc::clone(&seq);
                thread::spawn(move || {
                    for i in 0..5 {
                        seq.send_parameter(Address::new(0x19, 0x42, 0x00, 0x21), t * 10 + i, 1)
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let log = log.lock().unwrap();
        assert_eq!(log.len(), 10);
        for pair in log.windows(2) {
            assert!(pair[1].0.duration_since(pair[0].0) >= Duration::from_millis(2));
        }
    }

    #[test]
    fn test_patch_edit_goes_live() {
        let device = ScriptedDevice::default();
        let log = Arc::clone(&device.log);
        let seq = Arc::new(sequencer(device));

        let mut patch = Patch::init(PartKind::Analog);
        patch.attach_link(Arc::clone(&seq));
        let pitch = patch.find("Analog Tone", "OSC Pitch Coarse").unwrap();
        patch.set(pitch, -10).unwrap();
        assert!(patch.set(pitch, 99).is_err());

        let log = log.lock().unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(&log[0].1[8..13], &[0x19, 0x42, 0x00, 0x17, 54]);
    }

    #[test]
    fn test_apply_incoming() {
        let mut device = ScriptedDevice::default();
        let change = crate::protocol::message::Composer::default()
            .compose_parameter_change(Address::new(0x19, 0x42, 0x00, 0x21), 20, 1)
            .unwrap();
        device.fragment = 4;
        device.queue(&change);
        device.queue(&[0xF0, 0x41, 0x10, 0xF7]);
        let seq = sequencer(device);

        let mut patch = Patch::init(PartKind::Analog);
        assert_eq!(seq.apply_incoming(&mut patch).unwrap(), 1);
        let cutoff = patch.find("Analog Tone", "Filter Cutoff").unwrap();
        assert_eq!(patch.get(cutoff).unwrap(), 20);
        assert!(patch.is_modified());
    }
}
