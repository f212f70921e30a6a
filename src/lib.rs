#![warn(clippy::needless_pass_by_value)]
#![warn(clippy::redundant_clone)]
#![warn(clippy::unnecessary_box_returns)]
#![warn(clippy::option_if_let_else)]
#![warn(clippy::manual_let_else)]
#![warn(clippy::checked_conversions)]
#![warn(clippy::implicit_clone)]
#![warn(clippy::cloned_instead_of_copied)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::uninlined_format_args)]

pub mod classify;
pub mod config;
pub mod dct;
pub mod display;
pub mod error;
pub mod loader;
pub mod motion;
pub mod plane_store;
pub mod playback;
pub mod render;
