//! 类型定义模块

mod account;

pub use account::{
    Account, AccountErrors, AccountId, AccountLabel, AccountPatch, AccountType, LABEL_SEPARATOR,
};
