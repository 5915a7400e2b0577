//! Headless rendering backend
//!
//! Draws nothing. Each pass is recorded into a shared [`RenderLog`] so tests
//! and offline runs can inspect exactly what a GPU backend would have been
//! asked to draw.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::foundation::math::Vec3;
use crate::scene::object::{NodeKind, ObjectId};

use super::backend::{FrameView, PassKind, RenderBackend};
use super::material::Material;
use super::viewport::Viewport;
use super::{BackendResult, RenderError};

/// One mesh leaf as it was drawn
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRecord {
    pub object: ObjectId,
    pub material: Material,
}

/// Snapshot of a single pass
#[derive(Debug, Clone, PartialEq)]
pub struct PassRecord {
    pub pass: PassKind,
    pub viewport: Viewport,
    pub camera_position: Vec3,
    /// Scene graph roots present during the pass
    pub attached: Vec<ObjectId>,
    /// Mesh leaves reached from the roots
    pub meshes: Vec<DrawRecord>,
    /// Lights reached from the roots
    pub lights: Vec<ObjectId>,
}

impl PassRecord {
    /// Material a mesh was drawn with in this pass
    pub fn material_of(&self, object: ObjectId) -> Option<&Material> {
        self.meshes.iter().find(|record| record.object == object).map(|record| &record.material)
    }

    /// True when the object was a scene graph root during this pass
    pub fn is_attached(&self, object: ObjectId) -> bool {
        self.attached.contains(&object)
    }
}

/// Shared, bounded history of recorded passes
#[derive(Debug, Clone)]
pub struct RenderLog {
    records: Rc<RefCell<VecDeque<PassRecord>>>,
    capacity: usize,
}

impl RenderLog {
    /// Keep at most `capacity` most recent passes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Rc::new(RefCell::new(VecDeque::with_capacity(capacity))),
            capacity: capacity.max(1),
        }
    }

    fn push(&self, record: PassRecord) {
        let mut records = self.records.borrow_mut();
        if records.len() == self.capacity {
            records.pop_front();
        }
        records.push_back(record);
    }

    /// Recorded passes, oldest first
    pub fn passes(&self) -> Vec<PassRecord> {
        self.records.borrow().iter().cloned().collect()
    }

    /// Most recent pass of the given kind
    pub fn last(&self, pass: PassKind) -> Option<PassRecord> {
        self.records.borrow().iter().rev().find(|record| record.pass == pass).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.records.borrow_mut().clear();
    }
}

impl Default for RenderLog {
    fn default() -> Self {
        Self::with_capacity(64)
    }
}

/// Backend that records passes instead of drawing them
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    log: RenderLog,
    size: Option<Viewport>,
    failing_pass: Option<PassKind>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record into an existing log
    pub fn with_log(log: RenderLog) -> Self {
        Self {
            log,
            ..Self::default()
        }
    }

    /// Make every pass of the given kind fail
    pub fn failing_on(mut self, pass: PassKind) -> Self {
        self.failing_pass = Some(pass);
        self
    }

    /// Handle to the pass history
    pub fn log(&self) -> RenderLog {
        self.log.clone()
    }

    /// Size of the render targets, once set
    pub fn size(&self) -> Option<Viewport> {
        self.size
    }

    fn record(&mut self, frame: &FrameView<'_>) -> BackendResult<()> {
        if self.failing_pass == Some(frame.pass) {
            return Err(RenderError::RenderingFailed(format!("{:?} pass rejected by headless backend", frame.pass)));
        }

        let mut meshes = Vec::new();
        let mut lights = Vec::new();
        for root in frame.attached {
            for id in frame.objects.descendants(*root) {
                match frame.objects.get(id).map(|node| &node.kind) {
                    Some(NodeKind::Mesh(mesh)) => meshes.push(DrawRecord {
                        object: id,
                        material: mesh.material.clone(),
                    }),
                    Some(NodeKind::Light(_)) => lights.push(id),
                    Some(NodeKind::Group) | None => {}
                }
            }
        }

        log::trace!("{:?} pass: {} meshes, {} lights", frame.pass, meshes.len(), lights.len());
        self.log.push(PassRecord {
            pass: frame.pass,
            viewport: *frame.viewport,
            camera_position: frame.camera.position,
            attached: frame.attached.to_vec(),
            meshes,
            lights,
        });
        Ok(())
    }
}

impl RenderBackend for HeadlessBackend {
    fn set_size(&mut self, viewport: &Viewport) -> BackendResult<()> {
        if self.size != Some(*viewport) {
            log::debug!("Headless targets resized to {}x{}", viewport.width, viewport.height);
            self.size = Some(*viewport);
        }
        Ok(())
    }

    fn render_bloom(&mut self, frame: &FrameView<'_>) -> BackendResult<()> {
        self.record(frame)
    }

    fn render_final(&mut self, frame: &FrameView<'_>) -> BackendResult<()> {
        self.record(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_is_bounded() {
        let log = RenderLog::with_capacity(2);
        for pass in [PassKind::Bloom, PassKind::Final, PassKind::Bloom] {
            log.push(PassRecord {
                pass,
                viewport: Viewport::new(1, 1),
                camera_position: Vec3::zeros(),
                attached: Vec::new(),
                meshes: Vec::new(),
                lights: Vec::new(),
            });
        }

        assert_eq!(log.len(), 2);
        assert_eq!(log.passes()[0].pass, PassKind::Final);
        assert!(log.last(PassKind::Bloom).is_some());
    }
}
