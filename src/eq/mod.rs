//! Band equalizer: mask design and overlap-add filtering.

pub mod band;
pub mod mask;
pub mod overlap_add;
pub mod params;

pub use band::{default_band_specs, Band, BandSpec, GainScale};
pub use mask::{design_mask, FrequencyMask};
pub use overlap_add::{apply_overlap_add, OverlapAddFilter};
pub use params::{hop_from_overlap, EqParams};
