use anchor_lang::error::Error;
use anchor_lang::prelude::*;

use crate::errors::RegistryError;

/// Numeric code of an Anchor error; panics on anything else.
pub(crate) fn code(error: Error) -> u32 {
    match error {
        Error::AnchorError(error) => error.error_code_number,
        other => panic!("unexpected error: {other:?}"),
    }
}

pub(crate) fn expect_err<T: std::fmt::Debug>(result: Result<T>, expected: RegistryError) {
    assert_eq!(code(result.unwrap_err()), u32::from(expected));
}
