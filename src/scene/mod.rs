/// Per-frame geometry derived from progress and surface size.
pub mod geometry;
