use serde_derive::Deserialize;
use serde_derive::Serialize;

/// Reference from a drawing view to the shape it depicts. `BackendShape` is
/// the legacy form predating stable scene-object ids; opening a project
/// migrates these where a match can be found.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "kebab-case")]
pub enum ShapeRef {
    SceneObject(String),
    BackendShape(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawingView {
    pub id: String,
    pub label: String,
    pub source: ShapeRef,
    /// Cached projection payload from the geometry kernel. Cleared whenever
    /// views are regenerated; recomputation happens outside these stores.
    pub projection: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drawing {
    pub id: String,
    pub title: String,
    pub views: Vec<DrawingView>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawingsData {
    pub drawings: Vec<Drawing>,
}
