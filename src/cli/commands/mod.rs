//! CLI command implementations.

pub mod arsenal;
pub mod attempt;
pub mod init;
pub mod profile;
pub mod quest;
pub mod recommend;
pub mod review;
pub mod tags;
pub mod task;
pub mod template;
