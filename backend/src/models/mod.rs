pub mod entities;
pub mod macros;
pub mod profile;
pub mod schedule;
pub mod time;

pub use entities::*;
pub use profile::*;
pub use schedule::*;
pub use time::*;
