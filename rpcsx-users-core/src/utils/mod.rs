//! Utility function module

pub mod validator;
