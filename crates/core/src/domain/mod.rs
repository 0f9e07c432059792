pub mod recommendation;
pub mod scoring;
pub mod snapshot;
