//! Background Tasks Module
//!
//! Contains the polling tasks that keep cached upstream data current.
//!
//! # Tasks
//! - Poll subscription: refetches one URL on a fixed interval and publishes
//!   each result to its observer

mod poll;

pub use poll::{FetchState, PollRequest, PollingCache, Subscription, MIN_POLL_INTERVAL};
