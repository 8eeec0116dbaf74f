//! Data types shared by the grid engine.

mod callback;
mod cell;
mod config;
mod range;
mod region;
mod scroll;
mod value;

pub use callback::*;
pub use cell::*;
pub use config::*;
pub use range::*;
pub use region::*;
pub use scroll::*;
pub use value::*;
