pub mod range;
pub mod sha1;
