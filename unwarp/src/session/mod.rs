//! One registration pair: two images, their landmarks and masks, the active
//! tool, and the dispatcher that routes canvas input to them.

pub mod input;
mod run_flag;
pub mod viewport;


use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use common::Shared;
use glam::IVec2;

use crate::config::SessionConfig;
use crate::error::{Error, Result};
use crate::geometry::ImageSize;
use crate::landmarks::file::format_landmark_table;
use crate::landmarks::{LandmarkPairs, Side};
use crate::mask::{FillMode, MaskRegion};
use crate::tool::{ClickAction, EntryEffect, RepeatDetector, ToolMode, ToolState, Transition};

pub use input::{InputEvent, Key, Modifiers};
pub use run_flag::RunFlag;
pub use viewport::{Viewport, ZOOM_LEVELS};

pub type SharedSession = Shared<PairSession>;

/// What needs to be redrawn after a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repaint {
    /// Landmarks changed on both images.
    Landmarks,
    Mask(Side),
    Tool,
    View(Side),
}

/// Display collaborator notified after each visible change.
pub trait RepaintSink: Send {
    fn repaint(&mut self, what: Repaint);
}

#[derive(Debug, Default)]
pub struct NoRepaint;

impl RepaintSink for NoRepaint {
    fn repaint(&mut self, _what: Repaint) {}
}

/// Collects repaint requests into a shared list.
impl RepaintSink for Shared<Vec<Repaint>> {
    fn repaint(&mut self, what: Repaint) {
        self.with(|requests| requests.push(what));
    }
}

/// The file dialog opened by the `FileMenu` tool.
///
/// It runs to completion before the session falls back to `AddPoint`.
pub trait FileMenu: Send {
    fn open(&mut self, session: &mut PairSession) -> Result<()>;
}

/// A file menu that does nothing when opened.
#[derive(Debug, Default)]
pub struct NoFileMenu;

impl FileMenu for NoFileMenu {
    fn open(&mut self, _session: &mut PairSession) -> Result<()> {
        Ok(())
    }
}

/// Actions offered by the file menu.
#[derive(Debug, Clone, PartialEq)]
pub enum FileAction {
    LoadLandmarks(PathBuf),
    SaveLandmarks(PathBuf),
    /// Produces the landmark table as text.
    ShowLandmarks,
    LoadMask { side: Side, path: PathBuf },
    SaveMask { side: Side, path: PathBuf },
    /// Exchanges source and target.
    SwapImages,
}

/// Result of routing one input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DispatchOutcome {
    /// The event had no effect in the current state.
    Ignored,
    /// A registration run is active; canvas editing is suspended.
    RunActive,
    LandmarkAdded(usize),
    LandmarkSelected(usize),
    LandmarkMoved,
    LandmarkRemoved(usize),
    /// Current landmark advanced on both images.
    LandmarkAdvanced,
    MaskVertexAdded,
    MaskClosed(FillMode),
    /// The mask on that image is a fixed raster.
    MaskLocked,
    Zoomed(f64),
}

/// Per-image state.
#[derive(Debug, Clone)]
pub struct ImageSide {
    size: ImageSize,
    mask: MaskRegion,
    viewport: Viewport,
    /// The next single press in a mask tool starts a fresh polygon.
    mask_reset_pending: bool,
}

impl ImageSide {
    pub fn new(size: ImageSize, magnification: f64) -> Self {
        Self {
            size,
            mask: MaskRegion::new(size),
            viewport: Viewport::new(magnification),
            mask_reset_pending: false,
        }
    }

    #[inline]
    pub fn size(&self) -> ImageSize {
        self.size
    }

    pub fn mask(&self) -> &MaskRegion {
        &self.mask
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }
}

pub struct PairSession {
    source: ImageSide,
    target: ImageSide,
    landmarks: LandmarkPairs,
    tool: ToolState,
    presses: RepeatDetector<Side>,
    run: RunFlag,
    repaint: Box<dyn RepaintSink>,
    file_menu: Box<dyn FileMenu>,
}

impl fmt::Debug for PairSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PairSession")
            .field("source", &self.source)
            .field("target", &self.target)
            .field("landmarks", &self.landmarks)
            .field("tool", &self.tool)
            .field("run", &self.run)
            .finish_non_exhaustive()
    }
}

impl PairSession {
    pub fn new(source: ImageSize, target: ImageSize, config: &SessionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            source: ImageSide::new(source, config.magnification),
            target: ImageSide::new(target, config.magnification),
            landmarks: LandmarkPairs::with_colors(source, target, config.colors.cycle()),
            tool: ToolState::new(config.initial_tool, config.gestures.clear_all_window()),
            presses: RepeatDetector::new(config.gestures.double_click_window()),
            run: RunFlag::new(),
            repaint: Box::new(NoRepaint),
            file_menu: Box::new(NoFileMenu),
        })
    }

    pub fn with_repaint(mut self, sink: Box<dyn RepaintSink>) -> Self {
        self.repaint = sink;
        self
    }

    pub fn with_file_menu(mut self, menu: Box<dyn FileMenu>) -> Self {
        self.file_menu = menu;
        self
    }

    pub fn into_shared(self) -> SharedSession {
        Shared::new(self)
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn side(&self, side: Side) -> &ImageSide {
        match side {
            Side::Source => &self.source,
            Side::Target => &self.target,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut ImageSide {
        match side {
            Side::Source => &mut self.source,
            Side::Target => &mut self.target,
        }
    }

    pub fn landmarks(&self) -> &LandmarkPairs {
        &self.landmarks
    }

    pub(crate) fn landmarks_mut(&mut self) -> &mut LandmarkPairs {
        &mut self.landmarks
    }

    pub fn mask(&self, side: Side) -> &MaskRegion {
        &self.side(side).mask
    }

    pub fn mask_mut(&mut self, side: Side) -> &mut MaskRegion {
        &mut self.side_mut(side).mask
    }

    /// Replaces the mask of `side`, e.g. with a raster loaded elsewhere.
    pub fn set_mask(&mut self, side: Side, mask: MaskRegion) -> Result<()> {
        let expected = self.side(side).size;
        if mask.size() != expected {
            return Err(Error::MaskSizeMismatch {
                expected,
                actual: mask.size(),
            });
        }
        self.side_mut(side).mask = mask;
        self.repaint.repaint(Repaint::Mask(side));
        Ok(())
    }

    pub fn tool(&self) -> ToolMode {
        self.tool.current()
    }

    /// Handle for the registration worker.
    pub fn run_flag(&self) -> RunFlag {
        self.run.clone()
    }

    // -------------------------------------------------------------------------
    // Registration run
    // -------------------------------------------------------------------------

    /// Marks the registration as running; only `Stop` stays selectable.
    pub fn start_run(&mut self) -> bool {
        if !self.run.start() {
            return false;
        }
        self.tool.force(ToolMode::Stop);
        self.repaint.repaint(Repaint::Tool);
        tracing::info!("Registration run started");
        true
    }

    pub fn finish_run(&mut self) {
        self.run.finish();
        self.tool.force(ToolMode::AddPoint);
        self.repaint.repaint(Repaint::Tool);
        tracing::info!("Registration run finished");
    }

    // -------------------------------------------------------------------------
    // Tools
    // -------------------------------------------------------------------------

    /// Toolbar selection at time `at`.
    ///
    /// Errors come only from the file menu; the tool is back to `AddPoint`
    /// either way.
    pub fn select_tool(&mut self, mode: ToolMode, at: Duration) -> Result<Transition> {
        let transition = self.tool.select(mode, self.run.is_active(), at);
        match transition {
            Transition::Rejected(_) => {}
            Transition::ClearAll => {
                self.landmarks.remove_all();
                self.repaint.repaint(Repaint::Landmarks);
                self.repaint.repaint(Repaint::Tool);
            }
            Transition::Entered { effect, .. } => {
                self.repaint.repaint(Repaint::Tool);
                self.enter(effect)?;
            }
        }
        Ok(transition)
    }

    fn enter(&mut self, effect: EntryEffect) -> Result<()> {
        match effect {
            EntryEffect::ArmLandmarks | EntryEffect::ArmZoom => {}
            EntryEffect::ArmMask(_) => {
                self.source.mask_reset_pending = true;
                self.target.mask_reset_pending = true;
                self.presses.reset();
            }
            EntryEffect::RequestStop => {
                if self.run.request_stop() {
                    tracing::info!("Stop requested");
                }
            }
            EntryEffect::OpenFileMenu => {
                let mut menu: Box<dyn FileMenu> =
                    std::mem::replace(&mut self.file_menu, Box::new(NoFileMenu));
                let result = menu.open(self);
                self.file_menu = menu;
                self.tool.force(ToolMode::AddPoint);
                self.repaint.repaint(Repaint::Tool);
                result?;
            }
        }
        Ok(())
    }

    /// Runs one file menu action. `ShowLandmarks` returns the table text.
    pub fn apply_file_action(&mut self, action: FileAction) -> Result<Option<String>> {
        match action {
            FileAction::LoadLandmarks(path) => {
                self.landmarks.load_file(&path)?;
                self.after_landmarks_changed();
            }
            FileAction::SaveLandmarks(path) => self.landmarks.save_file(&path)?,
            FileAction::ShowLandmarks => {
                return Ok(Some(format_landmark_table(&self.landmarks)));
            }
            FileAction::LoadMask { side, path } => {
                let mask = MaskRegion::from_image_file(&path, self.side(side).size)?;
                self.set_mask(side, mask)?;
            }
            FileAction::SaveMask { side, path } => self.mask(side).write_image(&path)?,
            FileAction::SwapImages => self.swap_sides(),
        }
        Ok(None)
    }

    /// Exchanges source and target: sizes, masks, views and landmarks.
    pub fn swap_sides(&mut self) {
        std::mem::swap(&mut self.source, &mut self.target);
        self.landmarks.swap();
        self.presses.reset();
        self.repaint.repaint(Repaint::Landmarks);
        self.repaint.repaint(Repaint::Mask(Side::Source));
        self.repaint.repaint(Repaint::Mask(Side::Target));
        tracing::info!("Source and target swapped");
    }

    // -------------------------------------------------------------------------
    // Input
    // -------------------------------------------------------------------------

    pub fn dispatch(&mut self, event: InputEvent) -> DispatchOutcome {
        if self.run.is_active() {
            return DispatchOutcome::RunActive;
        }
        match event {
            InputEvent::Press {
                side,
                screen,
                modifiers,
                at,
            } => self.press(side, screen, modifiers, at),
            InputEvent::Drag { side, screen } => self.drag(side, screen),
            InputEvent::Key { side, key } => self.key(side, key),
        }
    }

    fn press(
        &mut self,
        side: Side,
        screen: IVec2,
        modifiers: Modifiers,
        at: Duration,
    ) -> DispatchOutcome {
        let image = self.side(side);
        let p = image.viewport.to_image(screen);
        let in_image = image.size.contains(p);

        match self.tool.current().click_action() {
            ClickAction::AddLandmark if in_image => {
                let idx = self.landmarks.add(side, p);
                self.repaint.repaint(Repaint::Landmarks);
                DispatchOutcome::LandmarkAdded(idx)
            }
            ClickAction::SelectLandmark => match self.landmarks.select_closest(side, p) {
                Some(idx) => {
                    self.repaint.repaint(Repaint::Landmarks);
                    DispatchOutcome::LandmarkSelected(idx)
                }
                None => DispatchOutcome::Ignored,
            },
            ClickAction::RemoveLandmark => {
                let Some(idx) = self.landmarks.set(side).find_closest(p) else {
                    return DispatchOutcome::Ignored;
                };
                self.landmarks.remove(idx);
                self.after_landmarks_changed();
                DispatchOutcome::LandmarkRemoved(idx)
            }
            ClickAction::MaskVertex(mode) => self.mask_press(side, p, mode, at),
            ClickAction::Zoom => {
                let viewport = &mut self.side_mut(side).viewport;
                let zoomed = if modifiers.any() {
                    viewport.zoom_out(screen)
                } else {
                    viewport.zoom_in(screen)
                };
                if !zoomed {
                    return DispatchOutcome::Ignored;
                }
                let magnification = viewport.magnification();
                self.repaint.repaint(Repaint::View(side));
                DispatchOutcome::Zoomed(magnification)
            }
            ClickAction::AddLandmark | ClickAction::None => DispatchOutcome::Ignored,
        }
    }

    fn mask_press(&mut self, side: Side, p: IVec2, mode: FillMode, at: Duration) -> DispatchOutcome {
        if !self.side(side).mask.is_editable() {
            return DispatchOutcome::MaskLocked;
        }
        let double = self.presses.register(side, at);
        let image = self.side_mut(side);

        let outcome = if double {
            if !image.mask.close(mode) {
                return DispatchOutcome::Ignored;
            }
            DispatchOutcome::MaskClosed(mode)
        } else {
            if image.mask_reset_pending {
                image.mask.clear();
                image.mask_reset_pending = false;
            }
            if !image.mask.add_vertex(p) {
                return DispatchOutcome::Ignored;
            }
            DispatchOutcome::MaskVertexAdded
        };
        self.repaint.repaint(Repaint::Mask(side));
        outcome
    }

    fn drag(&mut self, side: Side, screen: IVec2) -> DispatchOutcome {
        if self.tool.current() != ToolMode::MovePoint {
            return DispatchOutcome::Ignored;
        }
        let p = self.side(side).viewport.to_image(screen);
        if !self.landmarks.move_current(side, p) {
            return DispatchOutcome::Ignored;
        }
        self.repaint.repaint(Repaint::Landmarks);
        DispatchOutcome::LandmarkMoved
    }

    fn key(&mut self, side: Side, key: Key) -> DispatchOutcome {
        if self.tool.current().is_mask_tool() {
            return DispatchOutcome::Ignored;
        }
        let Some(idx) = self.landmarks.set(side).current_index() else {
            return DispatchOutcome::Ignored;
        };

        match key {
            Key::Delete | Key::Backspace => {
                self.landmarks.remove(idx);
                self.after_landmarks_changed();
                DispatchOutcome::LandmarkRemoved(idx)
            }
            Key::Tab => {
                self.landmarks.next();
                self.repaint.repaint(Repaint::Landmarks);
                DispatchOutcome::LandmarkAdvanced
            }
            Key::Up | Key::Down | Key::Left | Key::Right => {
                let Some(direction) = key.direction() else {
                    return DispatchOutcome::Ignored;
                };
                let step = self.side(side).viewport.nudge_step();
                self.landmarks.nudge_current(side, direction * step);
                self.repaint.repaint(Repaint::Landmarks);
                DispatchOutcome::LandmarkMoved
            }
        }
    }

    fn after_landmarks_changed(&mut self) {
        self.repaint.repaint(Repaint::Landmarks);
        if self.landmarks.is_empty() {
            self.tool.force(ToolMode::AddPoint);
            self.repaint.repaint(Repaint::Tool);
        }
    }
}
