//! Inbox Digest — scan unread mail and produce structured summaries.
//!
//! One-shot batch pipeline: list unread messages, extract and
//! normalize each body, ask a language model for a structured
//! analysis, report it, and mark the message read.

pub mod analysis;
pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod mailbox;
pub mod normalize;
pub mod report;
pub mod scanner;
