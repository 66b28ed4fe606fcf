/// Immediate-mode 2D drawing contract.
pub mod context;
/// `vello_cpu` raster surface.
pub mod cpu;
/// Scene drawing from progress.
pub mod frame;
/// Offline rendering of stills and whole playbacks.
pub mod pipeline;
/// Draw-call recording for headless hosts and tests.
pub mod recording;
pub(crate) mod text;
