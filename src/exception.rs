// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # Exception 模块
//!
//! 该模块定义了页面渲染、密码处理与 JSON 序列化过程中可能出现的各类异常情况。
//!
//! ## 分类
//! - **模板错误**：模板缺失、语法错误、执行时字段不匹配，统一由 [`Exception::is_template_error`] 归类。
//! - **序列化错误**：值无法被编码为 JSON。
//! - **配置错误**：bcrypt 成本因子越界，属于启动阶段的致命错误。
//! - **会话错误**：外部用户存储查询失败。该错误通常会被调用方吞掉并转换为默认值。

use std::fmt;

/// 渲染与认证辅助函数返回的异常类型。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exception {
    /// 模板提供者找不到指定的模板。
    TemplateNotFound(String),
    /// 模板文本无法被解析，例如 `{{` 未闭合或 `if/end` 不配对。
    TemplateSyntax(String),
    /// 模板执行失败，通常是模板引用了数据中不存在的字段。
    TemplateExecute(String),
    /// 值无法被编码为 JSON。
    Serialization(String),
    /// bcrypt 成本因子超出允许范围。
    HashConfig(u32),
    /// 外部用户存储查询失败。
    UserLookupFailed(String),
}

use Exception::*;

impl Exception {
    /// 是否属于模板相关的错误（缺失、语法、执行）。
    pub fn is_template_error(&self) -> bool {
        matches!(self, TemplateNotFound(_) | TemplateSyntax(_) | TemplateExecute(_))
    }

    /// 面向最终用户的通用描述，不包含任何模板或内部细节。
    pub fn public_message(&self) -> &'static str {
        match self {
            TemplateNotFound(_) | TemplateSyntax(_) | TemplateExecute(_) => {
                "The page could not be displayed"
            }
            Serialization(_) => "The response could not be produced",
            HashConfig(_) | UserLookupFailed(_) => "Internal server error",
        }
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateNotFound(id) => write!(f, "Template not found: {}", id),
            TemplateSyntax(msg) => write!(f, "Template syntax error: {}", msg),
            TemplateExecute(msg) => write!(f, "Template execution failed: {}", msg),
            Serialization(msg) => write!(f, "Value can't be encoded as JSON: {}", msg),
            HashConfig(cost) => write!(f, "Password strength {} is out of range", cost),
            UserLookupFailed(msg) => write!(f, "User lookup failed: {}", msg),
        }
    }
}

impl std::error::Error for Exception {}
