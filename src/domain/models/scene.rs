use serde_derive::Deserialize;
use serde_derive::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ShapeKind {
    Channel,
    Transition,
    Chute,
    StillingBasin,
}

/// One modeled structure in the scene. `id` is stable across restarts;
/// `backend_shape_id` is assigned by the geometry kernel per process and is
/// re-created on every open.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneObject {
    pub id: String,
    pub name: String,
    pub kind: ShapeKind,
    pub backend_shape_id: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneData {
    pub objects: Vec<SceneObject>,
}
