//! Built-in Theory Plugins.
//!
//! One plugin per family, installed together by `Context::new`. Each owns
//! the candidate values of its sorts, answers repair requests for terms of
//! its family, and reports consistency during the final check.

mod arith;
mod array;
mod basic;
mod bv;
mod datatype;
mod euf;
mod model_value;
mod user_sort;

pub use arith::ArithPlugin;
pub use array::ArrayPlugin;
pub use basic::BasicPlugin;
pub use bv::BvPlugin;
pub use datatype::DatatypePlugin;
pub use euf::EufPlugin;
pub use model_value::ModelValuePlugin;
pub use user_sort::UserSortPlugin;
