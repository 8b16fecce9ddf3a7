//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use unwarp::prelude::*;
//! ```

// Geometry
pub use crate::ImageSize;
pub use glam::IVec2;

// Landmarks and masks
pub use crate::{FillMode, LandmarkPairs, LandmarkSet, MaskRegion, Side};

// Session
pub use crate::{
    DispatchOutcome, InputEvent, Key, Modifiers, PairSession, SessionConfig, ToolMode,
    Transition,
};

pub use crate::{Error, Result};
