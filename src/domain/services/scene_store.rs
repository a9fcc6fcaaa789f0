use crate::domain::models::SceneData;
use crate::domain::models::SceneObject;

/// Bookkeeping for the modeled structures of the open project. Geometry
/// itself lives in the kernel; this store only tracks identity, dirtiness,
/// and the backend-shape mapping the drawings migration needs.
#[derive(Default)]
pub struct SceneStore {
    objects: Vec<SceneObject>,
    dirty: bool,
}

impl SceneStore {
    pub fn reset(&mut self) {
        self.objects.clear();
        self.dirty = false;
    }

    pub fn load_scene(&mut self, data: SceneData) {
        self.objects = data.objects;
        self.dirty = false;
    }

    pub fn scene_data(&self) -> SceneData {
        return SceneData {
            objects: self.objects.clone(),
        };
    }

    pub fn objects(&self) -> &[SceneObject] {
        return &self.objects;
    }

    pub fn add_object(&mut self, object: SceneObject) {
        self.objects.push(object);
        self.dirty = true;
    }

    pub fn set_backend_shape_id(&mut self, object_id: &str, backend_shape_id: &str) {
        if let Some(object) = self.objects.iter_mut().find(|obj| return obj.id == object_id) {
            object.backend_shape_id = Some(backend_shape_id.to_string());
        }
    }

    pub fn find_by_backend_shape(&self, backend_shape_id: &str) -> Option<&SceneObject> {
        return self
            .objects
            .iter()
            .find(|obj| return obj.backend_shape_id.as_deref() == Some(backend_shape_id));
    }

    /// The single object of a one-shape scene, if that is what this is.
    pub fn sole_object(&self) -> Option<&SceneObject> {
        if self.objects.len() == 1 {
            return self.objects.first();
        }

        return None;
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        return self.dirty;
    }
}
