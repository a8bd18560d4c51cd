//! `Decode`/`Encode` implementations per MySQL column type.
//!
//! Each submodule groups one type family (integers, floats, strings, temporal, ...);
//! text-protocol values always arrive as ASCII decimal / ISO-ish strings regardless of the
//! column's declared type, so every `Decode` impl branches on [`MySqlValueFormat`].

mod binary;
mod bit;
mod boolean;
mod decimal;
mod float;
mod int;
mod string;
mod temporal;
mod uint;

pub use decimal::MySqlDecimal;
pub use temporal::{decode_year, MySqlTime};
