// session.rs — mount/unmount lifecycle around a viewer and its GPU resources
//
// `R` is whatever owns the GPU-backed objects (the wgpu renderer in the
// binary). Unmount takes it out of the session and drops it, so it is
// released exactly once; afterwards every entry point reports
// `ViewerError::Unmounted` without touching viewer state.

use crate::error::{Result, ViewerError};
use crate::viewer::{FrameState, PanoramaViewer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Mounted,
    Unmounted,
}

pub struct ViewerSession<R> {
    viewer: PanoramaViewer,
    resources: Option<R>,
    state: SessionState,
}

impl<R> ViewerSession<R> {
    pub fn mount(viewer: PanoramaViewer, resources: R) -> Self {
        log::info!(
            "viewer mounted: {} marker(s), {} panorama slot(s)",
            viewer.scene.markers.len(),
            viewer.scene.sphere.texture_count()
        );
        Self {
            viewer,
            resources: Some(resources),
            state: SessionState::Mounted,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_mounted(&self) -> bool {
        self.state == SessionState::Mounted
    }

    /// Read-only access stays available after unmount.
    pub fn viewer(&self) -> &PanoramaViewer {
        &self.viewer
    }

    /// Mutable access for event handlers; `event` names the caller for diagnostics.
    pub fn viewer_mut(&mut self, event: &'static str) -> Result<&mut PanoramaViewer> {
        match self.state {
            SessionState::Mounted => Ok(&mut self.viewer),
            SessionState::Unmounted => Err(ViewerError::Unmounted(event)),
        }
    }

    pub fn resources_mut(&mut self, event: &'static str) -> Result<&mut R> {
        self.resources.as_mut().ok_or(ViewerError::Unmounted(event))
    }

    /// Split borrow for drawing: viewer state plus the GPU resources.
    pub fn parts_mut(&mut self, event: &'static str) -> Result<(&mut PanoramaViewer, &mut R)> {
        match self.resources.as_mut() {
            Some(r) => Ok((&mut self.viewer, r)),
            None => Err(ViewerError::Unmounted(event)),
        }
    }

    /// One tick of the frame loop.
    pub fn frame(&mut self, dt: f32) -> Result<FrameState> {
        Ok(self.viewer_mut("frame")?.frame(dt))
    }

    /// Cancel the frame loop and release resources. Idempotent.
    pub fn unmount(&mut self) {
        if self.state == SessionState::Unmounted {
            return;
        }
        self.state = SessionState::Unmounted;
        if let Some(resources) = self.resources.take() {
            drop(resources);
            log::info!("viewer unmounted, GPU resources released");
        }
    }
}
