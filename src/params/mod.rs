//! Parameter map
//!
//! Static tables describing, per part and per block, where every parameter
//! lives and how it is encoded.

pub mod block;
pub mod labels;
pub mod maps;
pub mod parameter;
pub mod part;

pub use block::{BlockDescriptor, BlockLayout};
pub use parameter::Parameter;
pub use part::PartKind;
