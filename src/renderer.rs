use log::debug;

use crate::point_cloud::PointCloudStore;

/// Where the renderer's GPU-side point data lives.
pub trait PointMeshBackend {
    type Mesh;
    /// A ready-made buffer of packed point records supplied from outside the store.
    type ExternalBuffer;

    fn create_mesh(&mut self) -> Self::Mesh;
    fn upload(&mut self, mesh: &mut Self::Mesh, positions: &[[f32; 3]], colors: &[[f32; 4]]);
}

pub enum PointDraw<'a, M, E> {
    Mesh { mesh: &'a M, count: u32 },
    External(&'a E),
}

pub const DEFAULT_POINT_TINT: [f32; 4] = [0.5, 0.5, 0.5, 1.0];

/// Keeps a GPU mirror of a `PointCloudStore`, rebuilt only when the store's point count or
/// data version moves away from the cached tags.
pub struct PointCloudRenderer<B: PointMeshBackend> {
    mesh: Option<B::Mesh>,
    mesh_count: Option<usize>,
    mesh_version: Option<u64>,
    source_buffer: Option<B::ExternalBuffer>,
    point_tint: [f32; 4],
    rebuilds: u64,
}

impl<B: PointMeshBackend> Default for PointCloudRenderer<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: PointMeshBackend> PointCloudRenderer<B> {
    pub fn new() -> Self {
        Self {
            mesh: None,
            mesh_count: None,
            mesh_version: None,
            source_buffer: None,
            point_tint: DEFAULT_POINT_TINT,
            rebuilds: 0,
        }
    }

    pub fn point_tint(&self) -> [f32; 4] {
        self.point_tint
    }

    /// An external buffer takes precedence over the store's data while set.
    pub fn set_source_buffer(&mut self, buffer: Option<B::ExternalBuffer>) {
        self.source_buffer = buffer;
    }

    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }

    pub fn has_mesh(&self) -> bool {
        self.mesh.is_some()
    }

    pub fn is_stale(&self, store: &PointCloudStore) -> bool {
        self.mesh_count != Some(store.point_count()) || self.mesh_version != Some(store.data_version())
    }

    fn try_update_mesh(&mut self, backend: &mut B, store: &PointCloudStore) -> bool {
        if store.is_empty() {
            return false;
        }

        let stale = self.is_stale(store);
        let mesh = self.mesh.get_or_insert_with(|| backend.create_mesh());

        if stale {
            let Some((positions, colors)) = store.try_get_points() else {
                return false;
            };
            backend.upload(mesh, &positions, &colors);
            self.mesh_count = Some(positions.len());
            self.mesh_version = Some(store.data_version());
            self.rebuilds += 1;
            debug!(
                "point cloud mirror rebuilt: {} points at version {}",
                positions.len(),
                store.data_version()
            );
        }

        self.mesh_count.is_some_and(|count| count > 0)
    }

    /// Called once per frame. Returns what to draw, if anything.
    pub fn prepare(
        &mut self,
        backend: &mut B,
        store: Option<&PointCloudStore>,
    ) -> Option<PointDraw<'_, B::Mesh, B::ExternalBuffer>> {
        if store.is_none() && self.source_buffer.is_none() {
            return None;
        }
        if store.is_some_and(PointCloudStore::is_empty) {
            return None;
        }

        if self.source_buffer.is_some() {
            return self.source_buffer.as_ref().map(PointDraw::External);
        }

        let store = store?;
        if !self.try_update_mesh(backend, store) {
            return None;
        }
        let count = self.mesh_count.unwrap_or(0) as u32;
        self.mesh.as_ref().map(|mesh| PointDraw::Mesh { mesh, count })
    }

    /// Drops the GPU mirror and any external buffer; the next `prepare` recreates the mirror.
    pub fn release(&mut self) {
        if self.mesh.take().is_some() {
            debug!("point cloud mirror released");
        }
        if self.source_buffer.take().is_some() {
            debug!("external point buffer released");
        }
        self.mesh_count = None;
        self.mesh_version = None;
    }
}
