pub mod file_format;
pub mod log_setup;
pub mod shared;
pub mod test_utils;

pub use file_format::{FormatError, FormatResult, SerdeFormat};
pub use shared::Shared;

pub const EPSILON: f64 = 1e-6;

pub fn is_debug() -> bool {
    cfg!(debug_assertions)
}
