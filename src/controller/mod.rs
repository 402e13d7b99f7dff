//! Controllers: validate request data, call the store, build a `Reply` or an `AppError`.

mod address;
mod user;

pub use address::{AddressBody, AddressController, AddressList, CreatedAddressBody, UpdatedAddressBody};
pub use user::{CreatedUserBody, UpdatedUserBody, UserBody, UserController, UserList};

use crate::error::AppError;

/// Path ids must be positive integers.
pub fn parse_id(raw: &str) -> Result<i32, AppError> {
    match raw.trim().parse::<i32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::InvalidId(raw.to_string())),
    }
}
