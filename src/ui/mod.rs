//! Rendering primitives shared by the timeline and its entity models.
//!
//! Key submodules:
//! - [`theme`]: the style slots every entity draws from, plus the stable
//!   signature that keys cached renders.
//! - [`wrap`]: width-aware pre-wrapping so reported heights always match
//!   the terminal output.
//! - [`markdown`]: styled markdown rendering and code block extraction.
//! - [`yaml`]: display-YAML formatting for tool inputs and log metadata.
//! - [`span`]: flattening styled lines back into plain strings for copy
//!   requests.
//!
//! Ownership boundary: this layer is stateless. All entity and selection
//! state lives in [`crate::timeline`].

pub mod markdown;
pub mod span;
pub mod theme;
pub mod wrap;
pub mod yaml;
