//! # rapidclick-shared
//!
//! Types shared by the RapidClick game client and the score server:
//! difficulty profiles, the persisted score record, and the JSON bodies of
//! the score API.

pub mod constants;
pub mod error;
pub mod protocol;
pub mod types;
