//! Collaborator seams.
//!
//! Everything the engine reaches over the network sits behind one of these
//! traits so strategies can run against mocks in tests.

pub mod directory;
pub mod fetcher;
pub mod mx;
pub mod renderer;
pub mod search;
