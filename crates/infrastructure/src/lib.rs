//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod dependency_track_client;
mod in_memory_dependency_track;
mod wire;

pub use dependency_track_client::{ClientSettings, DependencyTrackClient};
pub use in_memory_dependency_track::InMemoryDependencyTrack;
