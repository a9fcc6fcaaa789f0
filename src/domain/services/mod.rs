mod chat_store;
mod drawing_store;
mod project_store;
mod recent_projects;
mod scene_store;

pub use chat_store::*;
pub use drawing_store::*;
pub use project_store::*;
pub use recent_projects::*;
pub use scene_store::*;
