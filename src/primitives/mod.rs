mod any;
mod boolean;
mod enumeration;
pub mod iso;
mod literal;
mod number;
mod string;

pub use any::ZAny;
pub use boolean::ZBool;
pub use enumeration::ZEnum;
pub use literal::{IntoLiteral, LiteralValue, ZLiteral};
pub use number::ZNumber;
pub use string::ZString;
