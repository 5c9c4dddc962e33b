//! The TTG document format: line-oriented text setups in which every text
//! payload is stored as character codes, preceded by a length line.
//!
//! A keyword slot spans two adjacent lines:
//!
//! ```text
//! TextLength 7
//! Text 60 84 105 116 108 101 62
//! ```
//!
//! The second line decodes to `<Title>`; the wrapping bracket codes mark it
//! as substitutable. Slots are keyed by the length-header line, one above
//! the encoded line, which is how [`writer`] walks the file.

pub mod codec;
pub mod template;
pub mod writer;
