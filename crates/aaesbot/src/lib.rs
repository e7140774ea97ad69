//! aaesbot - Telegram front end and operator CLI for the AAES study bot
//!
//! Search, ranking, drive access and GPA maths live in `aaescore`; this crate
//! only turns chat updates and CLI arguments into calls on it.

pub mod cli;
pub mod telegram;
