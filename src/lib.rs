#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::unnecessary_literal_bound,
    clippy::module_name_repetitions,
    clippy::struct_field_names,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use
)]

pub mod coach;
pub mod config;
pub mod conversation;
pub mod error;
pub mod llm;
pub mod safety;
pub mod storage;
pub mod usage;

pub use coach::{CoachEngine, CoachResponse, UserContext};
pub use config::Config;
pub use error::{CoachError, Result};
