#![forbid(unsafe_code)]

//! Deterministic automatic layout for entity-relationship diagrams.
//!
//! Given entities and typed relationships, `nicolas` clusters related entities into communities
//! (Leiden-style modularity optimization), draws each community as a layered top-to-bottom graph
//! (Sugiyama), and strip-packs the community rectangles (optionally grouped one level further)
//! without overlap. The engine is a pure function: no I/O, no randomness, no state between calls.

pub mod community;
pub mod config;
pub mod error;
pub mod graph;
pub mod layout;
pub mod pack;
pub mod rect;
pub mod sugiyama;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use community::{CommunityAssignment, HierarchyDepth};
pub use config::LayoutConfig;
pub use error::{Error, Result};
pub use graph::{LayoutResult, Point, Relationship, RelationshipKind};
pub use layout::{LayoutInput, LayoutReport, PlacedBox, compute_layout, compute_layout_detailed};
