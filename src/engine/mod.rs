//! Engine module
//!
//! The live side of the protocol: the MIDI transport, the shared link and
//! the sequencer that times and serializes transfers over it.

pub mod link;
pub mod sequencer;
pub mod transport;

pub use link::Link;
pub use sequencer::{BlockReport, SysExAccumulator, Timing, TransferReport, TransferSequencer};
pub use transport::{list_ports, MidiTransport, PortList, Transport, DEFAULT_RECEIVE_BUFFER_SIZE};
