//! Rust LMS - 多角色在线学习平台后端服务
//!
//! 基于 Actix Web 构建，支持管理员、教师、学生与家长四种角色：
//! 课程审核发布、选课与结业证书、作业与测验评分、徽章、家长关联与通知。
//!
//! # 架构
//! - `cache`: 缓存层（Moka/Redis）
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `middlewares`: 认证授权中间件
//! - `models`: 数据模型定义
//! - `policies`: 纯函数形式的访问控制策略
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod cache;
pub mod config;
pub mod entity;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod policies;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
