// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 全局常量模块
//!
//! 页面渲染、配置加载与密码哈希共用的默认值。

/// 共享页头模板的默认标识
pub const HEADER_TEMPLATE: &str = "header.template";

/// 模板文件的默认根目录
pub const TEMPLATE_ROOT: &str = "templates";

/// 默认配置文件路径
pub const CONFIG_PATH: &str = "config/development.toml";

/// 默认日志配置文件路径
pub const LOG_CONFIG_PATH: &str = "config/log4rs.yaml";

/// 默认 bcrypt 成本因子
pub const DEFAULT_PASSWORD_STRENGTH: u32 = 10;

/// bcrypt 允许的最小成本因子
pub const MIN_PASSWORD_STRENGTH: u32 = 4;

/// bcrypt 允许的最大成本因子
pub const MAX_PASSWORD_STRENGTH: u32 = 31;

/// `SafeHtml` 序列化时使用的 newtype 名称，模板数据转换时据此识别可信标记
pub(crate) const SAFE_HTML_NAME: &str = "$site_helpers::SafeHtml";
