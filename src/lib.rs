#![forbid(unsafe_code)]

pub mod compose;
pub mod core;
pub mod draw;
pub mod encode;
pub mod error;
pub mod fonts;
pub mod layout;
pub mod pipeline;
pub mod scene;
pub mod timeline;

pub use crate::core::{Canvas, FrameIndex, FrameRgba, Point, Rect, Rgba8, Vec2};
pub use compose::FrameComposer;
pub use encode::{FrameSink, GifSink, GifSinkOpts, InMemorySink, SinkConfig};
pub use error::{ScanreelError, ScanreelResult};
pub use fonts::LabelFont;
pub use pipeline::{RenderStats, RenderToGifOpts, render_frame, render_scene, render_to_gif};
pub use scene::{Scene, Status, Subject};
pub use timeline::{Lerp, RevealPolicy, RevealStage, SubjectState, Timeline};
