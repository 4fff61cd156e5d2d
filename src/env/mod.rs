mod errors;
mod traits;
mod types;
mod vec_env;

pub use errors::EnvError;
pub use traits::{BatchedEnv, Env};
pub use types::EnvStep;
pub use vec_env::VecEnv;
