//! Step-into disambiguation.
//!
//! A source line may contain several nested calls, like `z := f(g(x), h(y))`. To find out
//! which of them a step-into request targets, calls found in source are correlated with
//! call instructions generated for the line:
//!
//! 1. function calls ending on the line are extracted from a syntax tree ([`extract`]),
//!    type conversions and builtins are dropped ([`classify`]),
//! 2. calls are reordered into evaluation order ([`reorder`]),
//! 3. call instructions of the line are filtered from compiler housekeeping calls ([`filter`]),
//! 4. calls and instructions are paired one-to-one and validated ([`matcher`]),
//! 5. each pair gets a unique name ([`naming`]),
//! 6. candidates are sorted by callee width and the innermost not executed call
//!    under a column is selected ([`resolver`]).
//!
//! Any disagreement between static and dynamic views makes the whole line unavailable.

pub mod candidate;
pub mod classify;
pub mod extract;
pub mod filter;
pub mod matcher;
pub mod naming;
pub mod reorder;
pub mod resolver;

pub use candidate::StepIntoCandidate;
pub use classify::CallKind;
pub use resolver::StepIntoResolver;
