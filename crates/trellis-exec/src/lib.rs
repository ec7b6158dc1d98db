//! Command dispatch for Trellis CLI
//!
//! Maps command names to registry packages and runs them: the package is
//! installed or updated in the shared store, its entry point resolved and the
//! loaded command driven through its lifecycle.

pub mod dispatcher;
pub mod registry;

pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use registry::{CommandRegistry, CORE_PACKAGE, INIT_PACKAGE};
