//! # Fragcode Core
//!
//! A systematic, rateless erasure code for moving a message split into
//! fixed-size fragments across a lossy link, in the style of the LoRaWAN
//! fragmented data block transport.
//!
//! ## Modules
//!
//! - `constants`: Row width limits, generator constants and record layout
//! - `bitvec`: Packed bit-vector primitives
//! - `matrix`: Deterministic parity-row generator
//! - `types`: Core types (CodeParams, ParityRow, CodedFragment, SubmitOutcome)
//! - `encoder`: Coded fragment encoding
//! - `decoder`: Online Gaussian-elimination decoder
//! - `fragment`: Message splitting and reassembly
//! - `fec`: Batch encode/decode traits
//! - `record`: Self-delimiting fragment records
//! - `scanner`: Record recovery from damaged streams

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod bitvec;
pub mod constants;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod fec;
pub mod fragment;
pub mod matrix;
pub mod record;
pub mod scanner;
pub mod types;

// Re-export commonly used types
pub use decoder::FragmentDecoder;
pub use encoder::FragmentEncoder;
pub use error::CodingError;
pub use types::{CodeParams, CodedFragment, ParityRow, SubmitOutcome};

/// Result type alias for Fragcode operations
pub type Result<T> = core::result::Result<T, CodingError>;
