//! Scene graph module
//!
//! Provides the node hierarchy, poses and transform spaces, and the
//! top-down update pass that propagates pose changes.

mod pose;
mod scene_node;
mod scene_graph;

pub use pose::{Pose, TransformSpace};
pub use scene_node::{NodeChanges, SceneNode, SceneNodeKey};
pub use scene_graph::{pose_from_properties, SceneGraph, SCENE_NODE_CLASS};
