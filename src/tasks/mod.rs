//! Background Tasks Module
//!
//! Contains tasks the cache spawns off the request path.
//!
//! # Tasks
//! - Background refresh: reloads a soon-to-expire entry without blocking the caller

mod refresh;

pub(crate) use refresh::spawn_refresh_task;
