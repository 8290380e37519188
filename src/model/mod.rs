//! Data model shared by the compiler, the verifier and the pipeline.
//!
//! Inputs (graph, manifests, project metadata) are read-only views handed
//! over by the build. Outputs are the SPDX 2.3 entities in [`document`],
//! built once per compilation and immutable afterwards.
//!
//! ```ignore
//! let graph: DependencyGraph = snapshot.components.into_iter().collect();
//! let node = graph.node(&ComponentId::project(":app"));
//! ```

mod document;
mod graph;
mod identifiers;
mod license;
mod manifest;
mod project;

pub use document::*;
pub use graph::*;
pub use identifiers::*;
pub use license::*;
pub use manifest::*;
pub use project::*;
