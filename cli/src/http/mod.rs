//! HTTP服务器模块 - 暴露 worker 调用与 chunk 查询API

pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;
pub mod state;

pub use models::*;
pub use server::*;
pub use state::*;
