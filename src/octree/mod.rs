//! This module defines the [`Octree`], its [`OctreeNode`]s and the [`OctreeBuilder`]
//! that subdivides a scene into them.
//!
//! [`Octree`]: struct.Octree.html
//! [`OctreeNode`]: enum.OctreeNode.html
//! [`OctreeBuilder`]: struct.OctreeBuilder.html
//!

mod builder;
mod config;
mod node;
mod octree_impl;
mod traverse;

pub use self::builder::*;
pub use self::config::*;
pub use self::node::*;
pub use self::octree_impl::*;
