//! Application state module

mod dialog;
mod forms;
mod session;

pub use dialog::*;
pub use forms::*;
pub use session::*;
