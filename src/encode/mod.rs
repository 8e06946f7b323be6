pub mod gif;
pub mod sink;

pub use gif::{GifSink, GifSinkOpts};
pub use sink::{FrameSink, InMemorySink, SinkConfig};
