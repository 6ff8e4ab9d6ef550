// Core modules implementing native ownership wrappers, decoding, and error modeling.
pub mod error;
pub mod handle;
pub mod libfoo;
pub mod out_string;
pub mod text;
