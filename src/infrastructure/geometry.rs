use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::SceneObject;

/// Opaque handle on the native geometry kernel. Only shape re-creation is
/// visible to the lifecycle stores; booleans, meshing, and projections never
/// cross this boundary.
#[async_trait]
pub trait GeometryBackend {
    /// Rebuilds the kernel-side shape for a persisted scene object and
    /// returns the process-local backend shape id.
    async fn recreate_shape(&self, object: &SceneObject) -> Result<String>;
}

pub type GeometryBox = Box<dyn GeometryBackend + Send + Sync>;

/// Headless stand-in that derives backend ids from the stable scene id.
#[derive(Default)]
pub struct NullGeometry {}

#[async_trait]
impl GeometryBackend for NullGeometry {
    async fn recreate_shape(&self, object: &SceneObject) -> Result<String> {
        return Ok(format!("shape-{}", object.id));
    }
}
