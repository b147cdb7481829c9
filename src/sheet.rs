pub mod model;
pub mod parse;
pub mod serialize;
pub mod split;
