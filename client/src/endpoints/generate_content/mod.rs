pub mod request_types;
pub mod response_types;

pub use request_types::*;
pub use response_types::*;

/// URL path of the `generateContent` method for `model`
pub fn path(model: &str) -> String {
    format!("/v1beta/models/{model}:generateContent")
}
