pub mod skypicker;
pub mod synthetic;

pub use skypicker::{SkypickerConfig, SkypickerProvider};
pub use synthetic::SyntheticProvider;
