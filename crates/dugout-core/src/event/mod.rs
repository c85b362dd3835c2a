//! Event distribution for workflow lifecycle events.

pub mod bus;
