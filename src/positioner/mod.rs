//! Crop positioner session: wires image loading, display-frame fitting, the
//! drag controller and keyboard shortcuts into one confirm/cancel contract.

mod overlay;

pub use overlay::{CursorHint, Overlay};

use crate::config::PositionerConfig;
use crate::crop::{
    self, AspectRatio, CropRect, FocalPoint, GeometryError, ImageSize, Point, Size,
};
use crate::input::{
    resolve_shortcut, DragController, DragUpdate, InputContext, NudgeDirection, PointerEvent,
    ShortcutAction, ShortcutKey, ShortcutModifiers,
};
use crate::loader::{ImageLoader, LoadError};
use crate::state::{SessionEvent, SessionState, StateError, StateMachine};
use thiserror::Error;

/// Reports the space currently available to the editor.
///
/// Called once per session, when the image's natural size arrives.
pub trait MeasureContainer {
    fn measure_container(&self) -> Size;
}

impl<F> MeasureContainer for F
where
    F: Fn() -> Size,
{
    fn measure_container(&self) -> Size {
        self()
    }
}

/// A container whose size never changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedContainer(pub Size);

impl MeasureContainer for FixedContainer {
    fn measure_container(&self) -> Size {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    pub const fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Error)]
pub enum PositionerError {
    #[error("no crop session is open")]
    NoSession,
    #[error("crop session is not ready (state {0:?})")]
    NotReady(SessionState),
    #[error("cannot edit this image: {0}")]
    Geometry(#[from] GeometryError),
    #[error("image failed to load: {0}")]
    Load(#[from] LoadError),
    #[error(transparent)]
    State(#[from] StateError),
}

pub type PositionerResult<T> = std::result::Result<T, PositionerError>;

/// Whether an asynchronous load completion reached a live session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    Ignored,
}

/// How an editing session ended, as seen by the form that opened it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditOutcome {
    Confirmed(FocalPoint),
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyOutcome {
    Finished(EditOutcome),
    Moved(Point),
    Ignored,
}

/// Data owned by one open editing session. Dropped when the session ends.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    source: String,
    aspect: AspectRatio,
    initial_focal: Option<FocalPoint>,
    image: Option<ImageSize>,
    crop: Option<CropRect>,
    drag: DragController,
    failure: Option<String>,
}

impl Session {
    pub const fn id(&self) -> SessionId {
        self.id
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub const fn aspect(&self) -> AspectRatio {
        self.aspect
    }

    pub const fn image_size(&self) -> Option<ImageSize> {
        self.image
    }

    pub fn display_frame(&self) -> Option<Size> {
        self.crop.map(|crop| crop.frame())
    }

    pub const fn crop_rect(&self) -> Option<&CropRect> {
        self.crop.as_ref()
    }

    /// Focal point the session would emit if confirmed now.
    pub fn focal_preview(&self) -> Option<FocalPoint> {
        self.crop.as_ref().map(CropRect::focal_point)
    }

    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    pub const fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }
}

pub struct CropPositioner<M> {
    config: PositionerConfig,
    measure: M,
    machine: StateMachine,
    session: Option<Session>,
    next_session_id: u64,
}

impl<M: MeasureContainer> CropPositioner<M> {
    pub fn new(config: PositionerConfig, measure: M) -> Self {
        Self {
            config: config.validated(),
            measure,
            machine: StateMachine::new(),
            session: None,
            next_session_id: 1,
        }
    }

    pub fn config(&self) -> &PositionerConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.machine.state()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn can_confirm(&self) -> bool {
        self.state().can_confirm()
    }

    pub fn overlay(&self) -> Option<Overlay> {
        self.session
            .as_ref()
            .and_then(|session| session.crop.as_ref())
            .map(Overlay::from_crop)
    }

    pub fn input_context(&self) -> InputContext {
        InputContext {
            session_open: self.state().is_open(),
            image_ready: self.can_confirm(),
            dragging: self.session.as_ref().is_some_and(Session::is_dragging),
        }
    }

    fn allocate_session_id(&mut self) -> SessionId {
        let id = SessionId(self.next_session_id);
        self.next_session_id = self.next_session_id.saturating_add(1);
        id
    }

    /// Starts a session for `source` with a centered crop rectangle.
    pub fn open(
        &mut self,
        source: impl Into<String>,
        aspect: AspectRatio,
    ) -> PositionerResult<SessionId> {
        self.open_with_focal(source, aspect, None)
    }

    /// Starts a session, placing the crop rectangle over `initial_focal` when
    /// the image was positioned before.
    pub fn open_with_focal(
        &mut self,
        source: impl Into<String>,
        aspect: AspectRatio,
        initial_focal: Option<FocalPoint>,
    ) -> PositionerResult<SessionId> {
        if self.state().is_open() {
            tracing::warn!(state = ?self.state(), "opening a new crop session over an open one");
            self.cancel();
        }

        self.machine = StateMachine::new();
        self.machine.transition(SessionEvent::Open)?;

        let id = self.allocate_session_id();
        let source = source.into();
        tracing::info!(session = id.get(), %source, %aspect, "crop session opened");
        self.session = Some(Session {
            id,
            source,
            aspect,
            initial_focal,
            image: None,
            crop: None,
            drag: DragController::new(),
            failure: None,
        });
        Ok(id)
    }

    fn live_session(&self, id: SessionId) -> bool {
        self.state() == SessionState::Loading
            && self
                .session
                .as_ref()
                .is_some_and(|session| session.id == id)
    }

    /// Applies the natural size reported by an image load.
    ///
    /// Loads for sessions that were closed or replaced are ignored. Degenerate
    /// dimensions fail the session instead of producing a NaN frame.
    pub fn image_loaded(
        &mut self,
        id: SessionId,
        natural: ImageSize,
    ) -> PositionerResult<LoadOutcome> {
        if !self.live_session(id) {
            tracing::debug!(session = id.get(), "ignoring load for inactive crop session");
            return Ok(LoadOutcome::Ignored);
        }

        let bounds = self
            .config
            .container_bounds(self.measure.measure_container());
        let fill = self.config.crop_fill_factor;
        let Some(session) = self.session.as_mut() else {
            return Ok(LoadOutcome::Ignored);
        };

        let placed = crop::compute_display_frame(natural, bounds).and_then(|frame| {
            let size = crop::compute_crop_size_with_fill(frame, session.aspect.value(), fill)?;
            Ok(match session.initial_focal {
                Some(focal) => CropRect::centered_on(frame, size, focal),
                None => CropRect::centered(frame, size),
            })
        });

        match placed {
            Ok(rect) => {
                session.image = Some(natural);
                session.crop = Some(rect);
                tracing::info!(
                    session = id.get(),
                    width = natural.width,
                    height = natural.height,
                    "crop session ready"
                );
                self.machine.transition(SessionEvent::ImageLoaded)?;
                Ok(LoadOutcome::Applied)
            }
            Err(err) => {
                tracing::warn!(session = id.get(), %err, "cannot edit this image");
                session.failure = Some(err.to_string());
                self.machine.transition(SessionEvent::ImageFailed)?;
                Err(err.into())
            }
        }
    }

    /// Marks the session's image as unloadable. The editor stays inert until
    /// cancelled.
    pub fn image_failed(
        &mut self,
        id: SessionId,
        error: &LoadError,
    ) -> PositionerResult<LoadOutcome> {
        if !self.live_session(id) {
            tracing::debug!(session = id.get(), "ignoring load failure for inactive crop session");
            return Ok(LoadOutcome::Ignored);
        }
        if let Some(session) = self.session.as_mut() {
            tracing::warn!(
                session = id.get(),
                source = %session.source,
                %error,
                "crop image failed to load"
            );
            session.failure = Some(error.to_string());
        }
        self.machine.transition(SessionEvent::ImageFailed)?;
        Ok(LoadOutcome::Applied)
    }

    /// Resolves the open session's image through `loader` synchronously.
    pub fn load_with<L: ImageLoader + ?Sized>(
        &mut self,
        loader: &L,
    ) -> PositionerResult<LoadOutcome> {
        let session = self.session.as_ref().ok_or(PositionerError::NoSession)?;
        let id = session.id;
        match loader.natural_size(&session.source) {
            Ok(natural) => self.image_loaded(id, natural),
            Err(err) => {
                self.image_failed(id, &err)?;
                Err(err.into())
            }
        }
    }

    fn ready_crop_mut(&mut self) -> PositionerResult<&mut CropRect> {
        let state = self.state();
        let session = self.session.as_mut().ok_or(PositionerError::NoSession)?;
        if !state.can_confirm() {
            return Err(PositionerError::NotReady(state));
        }
        session
            .crop
            .as_mut()
            .ok_or(PositionerError::NotReady(state))
    }

    pub fn on_pointer(&mut self, event: PointerEvent) -> DragUpdate {
        if !self.can_confirm() {
            return DragUpdate::Ignored;
        }
        let Some(session) = self.session.as_mut() else {
            return DragUpdate::Ignored;
        };
        let Some(crop) = session.crop.as_mut() else {
            return DragUpdate::Ignored;
        };
        session.drag.handle(event, crop)
    }

    pub fn nudge(&mut self, direction: NudgeDirection, large: bool) -> PositionerResult<Point> {
        let step = self.config.nudge_step(large);
        let (unit_x, unit_y) = direction.unit();
        let crop = self.ready_crop_mut()?;
        let landed = crop.move_by(unit_x * step, unit_y * step);
        tracing::debug!(?direction, x = landed.x, y = landed.y, "crop rect nudged");
        Ok(landed)
    }

    pub fn reset_position(&mut self) -> PositionerResult<Point> {
        let landed = self.ready_crop_mut()?.recenter();
        tracing::debug!(x = landed.x, y = landed.y, "crop rect recentered");
        Ok(landed)
    }

    /// Switches the target ratio. A ready session resizes its rectangle
    /// around the current center; a loading one just records the new ratio.
    pub fn set_aspect_ratio(&mut self, aspect: AspectRatio) -> PositionerResult<()> {
        let state = self.state();
        let fill = self.config.crop_fill_factor;
        let session = self.session.as_mut().ok_or(PositionerError::NoSession)?;
        match state {
            SessionState::Loading => {}
            SessionState::Ready => {
                let rect = session
                    .crop
                    .as_mut()
                    .ok_or(PositionerError::NotReady(state))?;
                let size = crop::compute_crop_size_with_fill(rect.frame(), aspect.value(), fill)?;
                rect.resize_keeping_center(size);
                session.drag.reset();
            }
            _ => return Err(PositionerError::NotReady(state)),
        }
        tracing::debug!(session = session.id.get(), %aspect, "crop aspect ratio changed");
        session.aspect = aspect;
        Ok(())
    }

    /// Emits the focal point under the crop rectangle and ends the session.
    pub fn confirm(&mut self) -> PositionerResult<FocalPoint> {
        let focal = self.ready_crop_mut()?.focal_point();
        self.machine.transition(SessionEvent::Confirm)?;
        if let Some(session) = self.session.take() {
            tracing::info!(
                session = session.id.get(),
                source = %session.source,
                x = focal.x,
                y = focal.y,
                "crop session confirmed"
            );
        }
        Ok(focal)
    }

    /// Ends the session without emitting anything. Closing an already closed
    /// positioner is a no-op.
    pub fn cancel(&mut self) {
        if !self.state().is_open() {
            tracing::debug!("cancel requested with no open crop session");
            return;
        }
        if let Err(err) = self.machine.transition(SessionEvent::Cancel) {
            tracing::warn!(%err, "crop session cancel rejected");
            return;
        }
        if let Some(session) = self.session.take() {
            tracing::info!(
                session = session.id.get(),
                source = %session.source,
                "crop session cancelled"
            );
        }
    }

    pub fn on_key(
        &mut self,
        key: ShortcutKey,
        modifiers: ShortcutModifiers,
    ) -> PositionerResult<KeyOutcome> {
        let Some(action) = resolve_shortcut(key, modifiers, self.input_context()) else {
            return Ok(KeyOutcome::Ignored);
        };
        match action {
            ShortcutAction::Confirm => Ok(KeyOutcome::Finished(EditOutcome::Confirmed(
                self.confirm()?,
            ))),
            ShortcutAction::Cancel => {
                self.cancel();
                Ok(KeyOutcome::Finished(EditOutcome::Cancelled))
            }
            ShortcutAction::ResetPosition => self.reset_position().map(KeyOutcome::Moved),
            ShortcutAction::Nudge { direction, large } => {
                self.nudge(direction, large).map(KeyOutcome::Moved)
            }
        }
    }
}
