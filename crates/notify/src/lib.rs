//! Delivery adapters for analysis events: console reports and Telegram pushes.

pub mod console;
pub mod render;
pub mod telegram;
