//! Terminal adapter: raw mode, key decoding, frame drawing and the
//! interactive prompt. Everything here is a thin shell over `crate::core`.

pub mod color;
pub mod events;
pub mod prompt;
pub mod raw;
pub mod render;
