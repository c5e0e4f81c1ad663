pub mod core;
pub mod form;
pub mod utils;

pub use self::core::{config::*, error::*, query::*, store::*, traits::*, types::*};
pub use form::*;
pub use utils::*;
