mod drawing;
mod event;
mod message;
mod project;
mod recent;
mod scene;
mod session;

pub use drawing::*;
pub use event::*;
pub use message::*;
pub use project::*;
pub use recent::*;
pub use scene::*;
pub use session::*;
