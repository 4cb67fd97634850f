pub mod args;
pub mod op;
pub mod ops;
pub mod passphrase;

pub use ops::{Forget, Graph, Import, Init, Keys, Select, Sign, Verify, Version};
