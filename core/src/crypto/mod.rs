pub mod types;
pub mod page_cipher;

pub use types::*;
pub use page_cipher::*;
