pub mod attribute;
pub mod set;

pub use attribute::{Attribute, AttributeName};
pub use set::{AttributeSet, AttributeValues};
