//! Companion daemon and cli for a browser extension tracking how much time is
//! spent on which websites. The daemon runs as the browser's native-messaging
//! host and owns the authoritative counters, the cli renders and manages them
//! from a terminal.

pub mod cli;
pub mod daemon;
pub mod utils;
