/// Device-pixel-ratio aware surface sizing.
pub mod adapter;
