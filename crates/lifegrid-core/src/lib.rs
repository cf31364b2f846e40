//! Core types for the lifegrid cellular automaton engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by every other crate in the workspace: grid
//! dimensions and the overlap-preserving resize, topology, the Life-like
//! transition rule, cell and colour constants, id newtypes, and the
//! error enums surfaced by the engine.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cell;
pub mod dims;
pub mod error;
pub mod id;
pub mod life_rule;
pub mod topology;

pub use cell::{is_alive, Rgb, ALIVE, DEAD};
pub use dims::{clamp_dims, resize_preserving, Dims};
pub use error::{EngineError, LifeRuleParseError, RuleError, RuleKind};
pub use id::{Epoch, Generation};
pub use life_rule::LifeRule;
pub use topology::Topology;
