pub mod domain;
pub mod error;
pub mod invitation;
pub mod protocol;
