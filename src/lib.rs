//! Oximap: source map v3 codec and composition algebra.
//!
//! The crate provides:
//! - Base64 VLQ primitives (`vlq`)
//! - Decoding a v3 map into an ordered position index, in either
//!   orientation (`decoder`)
//! - Encoding an index back to wire form (`encoder`)
//! - Merging successive-stage maps and inverting an index (`compose`)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```
//! use oximap::{EncodeOptions, RawSourceMap, decode, decode_reverse, encode};
//!
//! let raw = RawSourceMap::from_json(
//!     r#"{
//!         "version": 3,
//!         "sources": ["a.cljs"],
//!         "names": [],
//!         "mappings": "AAAA,CACA;;AACA"
//!     }"#,
//! )
//! .unwrap();
//!
//! // Generated position (0, 1) came from a.cljs line 1.
//! let forward = decode(&raw).unwrap();
//! assert_eq!(forward.lookup(0, 1)[0].line, 1);
//!
//! // Decode the other way around and re-encode.
//! let reverse = decode_reverse(&raw).unwrap();
//! let reencoded = encode(&reverse, &EncodeOptions::default());
//! assert_eq!(reencoded.mappings, raw.mappings);
//! ```

pub mod compose;
pub mod decoder;
pub mod encoder;
pub mod errors;
pub mod paths;
pub mod segment;
pub mod types;
pub mod vlq;

#[cfg(feature = "cli")]
pub mod cli;

pub use compose::{invert, merge};
pub use decoder::{decode, decode_reverse};
pub use encoder::{EncodeOptions, encode, encode_to_string};
pub use errors::{Error, Result};
pub use types::{Association, ForwardIndex, GeneratedPos, OriginalPos, RawSourceMap, ReverseIndex};
