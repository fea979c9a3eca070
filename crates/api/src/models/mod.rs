pub mod enum_type;
pub mod file;
pub mod language;
pub mod message;
pub mod name;
pub mod option;
pub mod service;

pub use enum_type::*;
pub use file::*;
pub use language::*;
pub use message::*;
pub use name::*;
pub use option::*;
pub use service::*;
