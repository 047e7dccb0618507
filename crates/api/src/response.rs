//! The `{ "data": ... }` envelope every successful API response uses.
//!
//! The payment webhook is the one exception: the provider only looks at the
//! status code, so it gets a bare `{ "received": true }`.

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
