//! EXTI interrupt dispatch.
//!
//! The vector-table entries for the EXTI groups all land in
//! [`LineDispatcher::dispatch`], which looks up the action registered for
//! each pending line, runs it and clears the line.

pub mod dispatch;
pub mod handlers;

pub use handlers::{DispatchError, LineAction, LineDispatcher};
