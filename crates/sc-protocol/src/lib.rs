pub mod chat;
pub mod facts;
pub mod intent;
pub mod product;

pub use chat::*;
pub use facts::*;
pub use intent::*;
pub use product::*;
