//! Follow graph.
//!
//! A follow relationship is one edge row indexed in both directions, so the
//! follower and following views of the graph can never drift apart the way
//! two mirrored id lists can.

mod repository;
mod service;

pub use repository::*;
pub use service::*;
