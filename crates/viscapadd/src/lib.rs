pub mod logging;

pub mod axis;
pub mod camera;
pub mod cli;
pub mod config;
pub mod controls;
pub mod curve;
pub mod dispatch;
pub mod event;
pub mod hold;
pub mod session;
pub mod source;
