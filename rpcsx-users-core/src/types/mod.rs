//! 类型定义模块

mod account;
mod emulator;
mod outcome;

pub use account::{Account, AccountKey, AccountsMap};
pub use emulator::EmulatorState;
pub use outcome::{CreateAccountResult, OperationOutcome, Rejection};
