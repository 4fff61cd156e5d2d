mod errors;
mod traits;
mod types;

pub use errors::ModelError;
pub(crate) use traits::{start_state_checked, step_checked};
pub use traits::Model;
pub use types::{ModelOut, State};
