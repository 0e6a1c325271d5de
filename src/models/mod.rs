mod account;

pub use account::{Account, AccountResponse, Role};
