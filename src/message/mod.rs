//! Message-related types (`Message`, `Param`) and the `message!` helper.

mod msg;

pub use msg::{into_param, Message, Param};
