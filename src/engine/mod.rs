pub mod cipher_map;
pub mod history;
pub mod mnemonic;
pub mod scheduler;
pub mod translator;

pub use cipher_map::CipherMap;
pub use scheduler::{DrillItem, ItemScheduler, Verdict};
