pub mod error;
pub mod format;
pub mod label;
pub mod traits;
pub mod types;

pub use error::*;
pub use label::*;
pub use traits::*;
pub use types::*;
