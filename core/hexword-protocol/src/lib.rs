#![no_std]

extern crate alloc;

// Enable std if the feature is active (for tests/tools)
#[cfg(feature = "std")]
extern crate std;

pub mod hex;
pub mod ids;
pub mod words;

pub use hex::{Direction, HexCoord};
pub use ids::{GroupId, PhraseId};
pub use words::*;

pub mod model;
pub use model::*;
