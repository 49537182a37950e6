//! Stateless helpers for walking, copying, deleting and chmod'ing filesystem
//! trees, built on a pure path normalizer.

pub mod ext;
pub mod filesystem;
pub mod path;
