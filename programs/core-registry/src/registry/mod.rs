pub mod layout;
pub mod plugin_set;
pub mod records;

pub use layout::*;
pub use plugin_set::*;
pub use records::*;
