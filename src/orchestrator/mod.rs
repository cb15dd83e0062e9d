//! 编排层
//!
//! 负责资源装配和后台任务的生命周期

pub mod app;

pub use app::App;
