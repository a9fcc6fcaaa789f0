pub mod geometry;
pub mod persistence;
pub mod projects;
