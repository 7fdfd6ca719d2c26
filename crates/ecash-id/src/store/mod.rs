mod interface;
mod memory;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use interface::*;
pub use memory::*;
#[cfg_attr(docsrs, doc(cfg(feature = "sqlite")))]
#[cfg(feature = "sqlite")]
pub use sqlite::*;
