pub mod error;
pub mod narrative;
pub mod traits;
pub mod types;

pub use error::*;
pub use narrative::*;
pub use traits::*;
pub use types::*;
