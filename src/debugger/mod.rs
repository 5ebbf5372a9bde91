pub mod disasm;
pub mod error;
pub mod registry;
pub mod source;
pub mod step_into;

pub use error::Error;
pub use registry::NameRegistry;
pub use step_into::{StepIntoCandidate, StepIntoResolver};
