//! Signal types of the Softex controller.

mod ctrl;
mod lane;
mod regs;
mod slot;

pub use ctrl::*;
pub use lane::*;
pub use regs::*;
pub use slot::*;
