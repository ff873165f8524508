pub mod json_list;
pub mod validation;

pub use json_list::{decode_optional_string_list, decode_string_list, encode_string_list};
pub use validation::ValidatedJson;
