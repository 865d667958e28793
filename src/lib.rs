// Library root
// -----------
// The binary (`main.rs`) parses arguments and wires these modules together.
//
// Module responsibilities:
// - `config`: loads credentials and word lists from `config.json`.
// - `oauth`: one-legged OAuth1 signing for search requests.
// - `api`: blocking search client and the decoded response model.
// - `wheel`: category selection and the spin itself.
// - `ui`: narrative and result rendering, progress spinner.
// - `error`: the library's error type.
pub mod api;
pub mod config;
pub mod error;
pub mod oauth;
pub mod ui;
pub mod wheel;

pub use error::{Result, WheelError};
