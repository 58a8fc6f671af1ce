//! File formats: WAV audio in and out.

pub mod wav;
