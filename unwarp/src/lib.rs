//! Unwarp - landmark, mask and tool-state core for paired-image elastic
//! registration.
//!
//! A session binds a source and a target image. Landmarks are placed in
//! matching pairs, one per image, and each image may carry a mask limiting
//! the pixels that take part in registration. A single active tool decides
//! what canvas input does.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use unwarp::prelude::*;
//!
//! let size = ImageSize::new(512, 512);
//! let mut session = PairSession::new(size, size, &SessionConfig::default())?;
//! session.dispatch(InputEvent::Press {
//!     side: Side::Source,
//!     screen: IVec2::new(11, 11),
//!     modifiers: Modifiers::NONE,
//!     at: Duration::ZERO,
//! });
//! session.landmarks().save_file(Path::new("landmarks.txt"))?;
//! ```

pub mod config;
mod error;
pub mod geometry;
pub mod landmarks;
pub mod mask;
pub mod session;
pub mod tool;

pub mod prelude;

// ============================================================================
// Public API
// ============================================================================

pub use config::{ColorConfig, GestureConfig, SessionConfig};
pub use error::{Error, Result};
pub use geometry::{rescale_between, ImageSize, ParseSizeError};
pub use landmarks::{Landmark, LandmarkColor, LandmarkPairs, LandmarkSet, Side};
pub use mask::{FillMode, MaskRegion, MaskSource};
pub use session::{
    DispatchOutcome, FileAction, FileMenu, InputEvent, Key, Modifiers, PairSession, Repaint,
    RepaintSink, RunFlag, SharedSession, Viewport,
};
pub use tool::{ToolMode, ToolState, Transition};
