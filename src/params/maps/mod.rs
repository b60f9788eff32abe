//! Parameter address maps, one module per area of the device.

pub mod analog;
pub mod digital;
pub mod drums;
pub mod program;
