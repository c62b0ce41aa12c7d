//! Pipeline seam traits
//!
//! These traits define the interface between the playback loop and the
//! things it drives: a video decoder that yields frames, a scaler that
//! fits them to the panel and the panel that shows them.

pub mod display;
pub mod scaler;
pub mod source;

pub use display::FrameSink;
pub use scaler::FrameScaler;
pub use source::{SourceKind, StreamInfo, VideoDecoder, VideoSession};
