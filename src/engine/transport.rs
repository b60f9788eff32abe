//! MIDI transport
//!
//! The byte pipe under the protocol engine. [Transport] is the seam the
//! sequencer talks to; [MidiTransport] implements it over midir, with inbound
//! chunks handed from the midir callback thread through an rtrb ring buffer.

use midir::{Ignore, MidiInput, MidiInputConnection, MidiOutput, MidiOutputConnection};
use rtrb::{Consumer, RingBuffer};
use tracing::{info, trace, warn};

use crate::error::TransportError;

/// Inbound chunks buffered between polls.
pub const DEFAULT_RECEIVE_BUFFER_SIZE: usize = 512;

/// Port name fragment used when no port is configured.
pub const DEFAULT_PORT_MATCH: &str = "JD-Xi";

/// Client name announced to the MIDI system.
const CLIENT_NAME: &str = "jdxi-sysex";

/// Raw byte transport to the instrument.
pub trait Transport: Send {
    /// Writes one complete message.
    fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError>;

    /// Next received chunk, if any. Never blocks. Chunk boundaries need not
    /// match message boundaries.
    fn poll_received(&mut self) -> Option<Vec<u8>>;

    /// Releases the underlying ports. Later sends fail with
    /// [TransportError::Closed].
    fn close(&mut self);
}

/// Names of the available MIDI ports.
#[derive(Debug, Clone, Default)]
pub struct PortList {
    /// Input port names.
    pub inputs: Vec<String>,
    /// Output port names.
    pub outputs: Vec<String>,
}

/// Lists the MIDI input and output ports currently present.
pub fn list_ports() -> Result<PortList, TransportError> {
    let midi_in = MidiInput::new(CLIENT_NAME).map_err(|e| TransportError::Init(e.to_string()))?;
    let midi_out = MidiOutput::new(CLIENT_NAME).map_err(|e| TransportError::Init(e.to_string()))?;

    let inputs = midi_in
        .ports()
        .iter()
        .map(|p| midi_in.port_name(p).unwrap_or_else(|_| "Unknown".to_string()))
        .collect();
    let outputs = midi_out
        .ports()
        .iter()
        .map(|p| midi_out.port_name(p).unwrap_or_else(|_| "Unknown".to_string()))
        .collect();

    Ok(PortList { inputs, outputs })
}

/// Index of the first port whose name contains `wanted`, ignoring case.
/// Without a wanted name, looks for the instrument's own port.
pub fn find_port(names: &[String], wanted: Option<&str>) -> Result<usize, TransportError> {
    let wanted = wanted.unwrap_or(DEFAULT_PORT_MATCH);
    let needle = wanted.to_lowercase();
    names
        .iter()
        .position(|name| name.to_lowercase().contains(&needle))
        .ok_or_else(|| TransportError::PortNotFound(wanted.to_string()))
}

/// midir-backed transport.
pub struct MidiTransport {
    /// Active input connection; the callback owns the ring buffer producer.
    input: Option<MidiInputConnection<()>>,
    /// Active output connection.
    output: Option<MidiOutputConnection>,
    /// Chunks received by the callback.
    inbound: Consumer<Vec<u8>>,
    /// Connected port names, for logs.
    port_names: (String, String),
}

impl MidiTransport {
    /// Connects to the input and output ports matching the given names.
    pub fn open(in_port: Option<&str>, out_port: Option<&str>) -> Result<Self, TransportError> {
        let mut midi_in =
            MidiInput::new(CLIENT_NAME).map_err(|e| TransportError::Init(e.to_string()))?;
        // SysEx is filtered out by default.
        midi_in.ignore(Ignore::None);
        let midi_out =
            MidiOutput::new(CLIENT_NAME).map_err(|e| TransportError::Init(e.to_string()))?;

        let in_ports = midi_in.ports();
        let in_names: Vec<String> = in_ports
            .iter()
            .map(|p| midi_in.port_name(p).unwrap_or_else(|_| "Unknown".to_string()))
            .collect();
        let in_index = find_port(&in_names, in_port)?;

        let out_ports = midi_out.ports();
        let out_names: Vec<String> = out_ports
            .iter()
            .map(|p| midi_out.port_name(p).unwrap_or_else(|_| "Unknown".to_string()))
            .collect();
        let out_index = find_port(&out_names, out_port)?;

        let (mut producer, consumer) = RingBuffer::new(DEFAULT_RECEIVE_BUFFER_SIZE);
        let input = midi_in
            .connect(
                &in_ports[in_index],
                "jdxi-sysex-in",
                move |_timestamp_us, data, _| {
                    trace!(len = data.len(), "received chunk");
                    if producer.push(data.to_vec()).is_err() {
                        warn!("receive buffer full, dropping {} bytes", data.len());
                    }
                },
                (),
            )
            .map_err(|e| TransportError::Connection(e.to_string()))?;
        let output = midi_out
            .connect(&out_ports[out_index], "jdxi-sysex-out")
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        let port_names = (in_names[in_index].clone(), out_names[out_index].clone());
        info!(input = %port_names.0, output = %port_names.1, "MIDI connected");

        Ok(Self {
            input: Some(input),
            output: Some(output),
            inbound: consumer,
            port_names,
        })
    }

    /// Names of the connected (input, output) ports.
    pub fn port_names(&self) -> (&str, &str) {
        (&self.port_names.0, &self.port_names.1)
    }

    /// Check if both ports are still open.
    pub fn is_connected(&self) -> bool {
        self.input.is_some() && self.output.is_some()
    }
}

impl Transport for MidiTransport {
    fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        let output = self.output.as_mut().ok_or(TransportError::Closed)?;
        trace!(len = bytes.len(), "sending");
        output
            .send(bytes)
            .map_err(|e| TransportError::Send(e.to_string()))
    }

    fn poll_received(&mut self) -> Option<Vec<u8>> {
        self.inbound.pop().ok()
    }

    fn close(&mut self) {
        let was_open = self.is_connected();
        if let Some(input) = self.input.take() {
            input.close();
        }
        if let Some(output) = self.output.take() {
            output.close();
        }
        if was_open {
            info!("MIDI disconnected");
        }
    }
}

impl Drop for MidiTransport {
    fn drop(&mut self) {
        self.close();
    }
}
