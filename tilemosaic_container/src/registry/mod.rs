//! Shared ownership of open containers.
//!
//! [`ActiveContainers`] maps container ids to open containers. Each entry is counted by
//! the [`ContainerRef`] handles pointing at it; dropping the last handle removes the
//! entry and disposes the container. Lock order is always the registry map first, then
//! the entry count.

mod active_containers;
pub use active_containers::*;

mod container_ref;
pub use container_ref::*;
