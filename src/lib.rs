pub mod error;
pub mod layout;
pub mod parse;
pub mod statute;
pub mod validate;
pub mod wasm;
