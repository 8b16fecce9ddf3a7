//! Interaction tool selection.
//!
//! Exactly one tool is active per session. Selection is gated on whether a
//! registration run is active: while it runs only `Stop` may be selected,
//! and `Stop` may only be selected while it runs.

mod gesture;


use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use crate::mask::FillMode;

pub use gesture::RepeatDetector;

#[derive(
    Debug, Display, EnumIter, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
pub enum ToolMode {
    #[default]
    AddPoint,
    MovePoint,
    RemovePoint,
    PaintMask,
    PaintInvertedMask,
    FileMenu,
    Stop,
    Zoom,
}

/// What a canvas press does in a given tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickAction {
    AddLandmark,
    SelectLandmark,
    RemoveLandmark,
    MaskVertex(FillMode),
    Zoom,
    None,
}

/// Side effect of entering a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryEffect {
    ArmLandmarks,
    /// The next mask press starts a fresh polygon.
    ArmMask(FillMode),
    ArmZoom,
    /// Run the file menu, then fall back to `AddPoint`.
    OpenFileMenu,
    RequestStop,
}

impl ToolMode {
    pub fn click_action(self) -> ClickAction {
        match self {
            ToolMode::AddPoint => ClickAction::AddLandmark,
            ToolMode::MovePoint => ClickAction::SelectLandmark,
            ToolMode::RemovePoint => ClickAction::RemoveLandmark,
            ToolMode::PaintMask => ClickAction::MaskVertex(FillMode::Normal),
            ToolMode::PaintInvertedMask => ClickAction::MaskVertex(FillMode::Inverted),
            ToolMode::Zoom => ClickAction::Zoom,
            ToolMode::FileMenu | ToolMode::Stop => ClickAction::None,
        }
    }

    pub fn entry_effect(self) -> EntryEffect {
        match self {
            ToolMode::AddPoint | ToolMode::MovePoint | ToolMode::RemovePoint => {
                EntryEffect::ArmLandmarks
            }
            ToolMode::PaintMask => EntryEffect::ArmMask(FillMode::Normal),
            ToolMode::PaintInvertedMask => EntryEffect::ArmMask(FillMode::Inverted),
            ToolMode::Zoom => EntryEffect::ArmZoom,
            ToolMode::FileMenu => EntryEffect::OpenFileMenu,
            ToolMode::Stop => EntryEffect::RequestStop,
        }
    }

    pub fn is_mask_tool(self) -> bool {
        matches!(self, ToolMode::PaintMask | ToolMode::PaintInvertedMask)
    }

    /// Whether the tool can be selected given the run state.
    pub fn is_selectable(self, run_active: bool) -> bool {
        (self == ToolMode::Stop) == run_active
    }
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// `Stop` selected with no registration running.
    NoActiveRun,
    /// Any other tool selected while a registration runs.
    RunActive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Rejected(Rejection),
    Entered {
        from: ToolMode,
        to: ToolMode,
        effect: EntryEffect,
    },
    /// `RemovePoint` selected twice in quick succession. The tool is back
    /// to `AddPoint`; the caller clears every landmark.
    ClearAll,
}

#[derive(Debug, Clone)]
pub struct ToolState {
    current: ToolMode,
    selections: RepeatDetector<ToolMode>,
}

impl ToolState {
    pub fn new(initial: ToolMode, clear_all_window: Duration) -> Self {
        Self {
            current: initial,
            selections: RepeatDetector::new(clear_all_window),
        }
    }

    #[inline]
    pub fn current(&self) -> ToolMode {
        self.current
    }

    /// Tool selection from the toolbar at time `at`.
    pub fn select(&mut self, mode: ToolMode, run_active: bool, at: Duration) -> Transition {
        let repeated = self.selections.register(mode, at);

        if !mode.is_selectable(run_active) {
            let rejection = if run_active {
                Rejection::RunActive
            } else {
                Rejection::NoActiveRun
            };
            tracing::debug!("Tool {mode} rejected: {rejection}");
            return Transition::Rejected(rejection);
        }

        if repeated && mode == ToolMode::RemovePoint && self.current == ToolMode::RemovePoint {
            self.current = ToolMode::AddPoint;
            return Transition::ClearAll;
        }

        let from = self.current;
        self.current = mode;
        Transition::Entered {
            from,
            to: mode,
            effect: mode.entry_effect(),
        }
    }

    /// Sets the tool without gating. Used for forced fallbacks to
    /// `AddPoint`: after the file menu, after clear-all, when the last
    /// landmark is removed.
    pub fn force(&mut self, mode: ToolMode) {
        if self.current != mode {
            tracing::debug!("Tool forced {} -> {mode}", self.current);
            self.current = mode;
        }
    }
}

impl Default for ToolState {
    fn default() -> Self {
        Self::new(ToolMode::AddPoint, Duration::from_millis(500))
    }
}
