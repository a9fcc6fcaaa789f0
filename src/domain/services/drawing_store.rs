#[cfg(test)]
#[path = "drawing_store_test.rs"]
mod tests;

use super::SceneStore;
use crate::domain::models::Drawing;
use crate::domain::models::DrawingsData;
use crate::domain::models::ShapeRef;

/// Technical drawings scoped to the open project.
#[derive(Default)]
pub struct DrawingStore {
    drawings: Vec<Drawing>,
}

impl DrawingStore {
    pub fn reset(&mut self) {
        self.drawings.clear();
    }

    pub fn load_drawings(&mut self, data: DrawingsData) {
        self.drawings = data.drawings;
    }

    pub fn drawings_data(&self) -> DrawingsData {
        return DrawingsData {
            drawings: self.drawings.clone(),
        };
    }

    pub fn drawings(&self) -> &[Drawing] {
        return &self.drawings;
    }

    pub fn drawing_ids(&self) -> Vec<String> {
        return self
            .drawings
            .iter()
            .map(|drawing| return drawing.id.clone())
            .collect::<Vec<String>>();
    }

    /// Drops every cached projection of the drawing so the kernel recomputes
    /// them on next render.
    pub fn regenerate_all_views(&mut self, drawing_id: &str) {
        if let Some(drawing) = self
            .drawings
            .iter_mut()
            .find(|drawing| return drawing.id == drawing_id)
        {
            for view in &mut drawing.views {
                view.projection = None;
            }
        }
    }

    /// One-time migration of views that still reference kernel-assigned
    /// backend shape ids over to stable scene-object ids. When no mapping
    /// exists and the scene holds exactly one shape, that shape is assumed
    /// to be the match; this is a best-effort heuristic, not a correctness
    /// guarantee. Anything still unresolved is logged and left in place.
    pub fn migrate_legacy_refs(&mut self, scene: &SceneStore) -> usize {
        let mut resolved = 0;

        for drawing in &mut self.drawings {
            for view in &mut drawing.views {
                let backend_shape_id = match &view.source {
                    ShapeRef::BackendShape(id) => id.clone(),
                    ShapeRef::SceneObject(_) => continue,
                };

                if let Some(object) = scene.find_by_backend_shape(&backend_shape_id) {
                    view.source = ShapeRef::SceneObject(object.id.clone());
                    resolved += 1;
                    continue;
                }

                if let Some(object) = scene.sole_object() {
                    tracing::warn!(
                        drawing_id = drawing.id.as_str(),
                        view_id = view.id.as_str(),
                        backend_shape_id = backend_shape_id.as_str(),
                        object_id = object.id.as_str(),
                        "no mapping for legacy shape reference, assuming the only shape in the scene"
                    );
                    view.source = ShapeRef::SceneObject(object.id.clone());
                    resolved += 1;
                    continue;
                }

                tracing::error!(
                    drawing_id = drawing.id.as_str(),
                    view_id = view.id.as_str(),
                    backend_shape_id = backend_shape_id.as_str(),
                    "unable to resolve legacy shape reference, leaving it in place"
                );
            }
        }

        return resolved;
    }
}
