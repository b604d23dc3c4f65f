//! Backend side of the GUI: command queue types and the worker runtime.

pub mod commands;
pub mod runtime;
