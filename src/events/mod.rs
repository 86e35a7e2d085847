//! Event handling module.
//!
//! This module contains the queue that feeds store actions one at a time.

pub mod action;
