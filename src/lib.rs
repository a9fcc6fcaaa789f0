#![deny(clippy::implicit_return)]
#![allow(clippy::needless_return)]

//! Penstock is the state-coordination core of a desktop CAD workbench for
//! hydraulic structures. It owns the open project's identity and settings,
//! the AI chat sessions scoped to that project, the technical drawings and
//! scene bookkeeping the lifecycle needs, and the bounded recent-projects
//! record. Geometry, rendering, and projection generation stay behind opaque
//! collaborator traits.

pub mod configuration;
pub mod domain;
pub mod infrastructure;
