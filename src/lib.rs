#![doc = include_str!("../README.md")]

mod capturer;
pub use capturer::*;

mod captured;
pub use captured::*;

mod collector;
pub use collector::*;
