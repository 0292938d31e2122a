//! Domain types of the checkout: the submission lock, the cart flag, the
//! purchase response and the instructions it carries, plus the ports the
//! submitter talks through.

pub mod cart;
pub mod instruction;
pub mod lock;
pub mod ports;
pub mod response;
