// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 页面渲染模块
//!
//! 负责把命名模板与数据组合为最终的 HTML 文档：
//! 1. 通过 [`TemplateProvider`] 取得模板文本（每次渲染都重新读取，不做缓存）。
//! 2. 根据会话状态生成 [`HeaderData`]，先渲染共享页头。
//! 3. 再渲染正文模板，两者按“页头 + 正文”拼接。
//!
//! 会话与用户存储属于外部协作者，这里只通过 [`RequestContext`] 调用。

use std::{
    collections::HashMap,
    fs,
    io,
    path::{Component, Path, PathBuf},
};

use log::{debug, error, warn};
use serde::Serialize;

use crate::{
    config::Config,
    exception::Exception,
    response::HeaderData,
    template::Template,
};

/// 根据标识取得模板文本。
pub trait TemplateProvider {
    fn load(&self, template_id: &str) -> Result<String, Exception>;
}

/// 从某个根目录读取模板文件。
#[derive(Debug, Clone)]
pub struct FileTemplateProvider {
    root: PathBuf,
}

impl FileTemplateProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TemplateProvider for FileTemplateProvider {
    fn load(&self, template_id: &str) -> Result<String, Exception> {
        let relative = Path::new(template_id);
        // 只接受根目录之下的普通相对路径
        if template_id.is_empty()
            || relative
                .components()
                .any(|c| !matches!(c, Component::Normal(_)))
        {
            warn!("拒绝加载非法的模板路径：{}", template_id);
            return Err(Exception::TemplateNotFound(template_id.to_string()));
        }
        let full_path = self.root.join(relative);
        match fs::read_to_string(&full_path) {
            Ok(text) => {
                debug!("已读取模板文件：{}", full_path.display());
                Ok(text)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                error!("模板文件不存在：{}", full_path.display());
                Err(Exception::TemplateNotFound(template_id.to_string()))
            }
            Err(e) => {
                error!("读取模板文件{}失败：{}", full_path.display(), e);
                Err(Exception::TemplateNotFound(template_id.to_string()))
            }
        }
    }
}

/// 内存中的模板表，用于测试和预览。
#[derive(Debug, Clone, Default)]
pub struct MemoryTemplateProvider {
    templates: HashMap<String, String>,
}

impl MemoryTemplateProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, template_id: &str, text: &str) {
        self.templates
            .insert(template_id.to_string(), text.to_string());
    }

    pub fn with_template(mut self, template_id: &str, text: &str) -> Self {
        self.insert(template_id, text);
        self
    }
}

impl TemplateProvider for MemoryTemplateProvider {
    fn load(&self, template_id: &str) -> Result<String, Exception> {
        self.templates
            .get(template_id)
            .cloned()
            .ok_or_else(|| Exception::TemplateNotFound(template_id.to_string()))
    }
}

impl<P: TemplateProvider + ?Sized> TemplateProvider for &P {
    fn load(&self, template_id: &str) -> Result<String, Exception> {
        (**self).load(template_id)
    }
}

/// 用户存储中的一条用户记录。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub display_name: String,
}

/// 当前请求的会话上下文，由外部的会话/用户存储实现。
#[cfg_attr(test, mockall::automock)]
pub trait RequestContext {
    fn is_user_logged_in(&self) -> bool;
    fn user_id(&self) -> u64;
    fn get_user(&self, id: u64) -> Result<User, Exception>;
}

/// 当前登录用户的显示名。
///
/// 未登录或用户查询失败时返回空字符串；查询错误只记录日志，不向上传播，
/// 页头渲染不能因为用户记录暂时不可用而失败。
pub fn display_name<C: RequestContext + ?Sized>(ctx: &C) -> String {
    if !ctx.is_user_logged_in() {
        return String::new();
    }
    let id = ctx.user_id();
    match ctx.get_user(id) {
        Ok(user) => user.display_name,
        Err(e) => {
            warn!("无法获取用户{}的显示名，使用空字符串：{}", id, e);
            String::new()
        }
    }
}

/// 由会话状态生成页头数据。
pub fn header_data<C: RequestContext + ?Sized>(ctx: &C) -> HeaderData {
    HeaderData {
        is_user_logged_in: ctx.is_user_logged_in(),
        display_name: display_name(ctx),
    }
}

pub struct PageRenderer<P> {
    provider: P,
    header_template: String,
}

impl PageRenderer<FileTemplateProvider> {
    /// 使用配置中的模板根目录和页头模板。
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            FileTemplateProvider::new(config.template_root()),
            config.header_template(),
        )
    }
}

impl<P: TemplateProvider> PageRenderer<P> {
    pub fn new(provider: P, header_template: &str) -> Self {
        Self {
            provider,
            header_template: header_template.to_string(),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn header_template(&self) -> &str {
        &self.header_template
    }

    /// 读取、解析并执行模板。
    pub fn render<T: Serialize + ?Sized>(
        &self,
        template_id: &str,
        data: &T,
    ) -> Result<String, Exception> {
        let text = self.provider.load(template_id)?;
        let template = Template::parse(template_id, &text).map_err(|e| {
            error!("解析模板{}失败：{}", template_id, e);
            e
        })?;
        template.execute_serialize(data).map_err(|e| {
            error!("执行模板{}失败：{}", template_id, e);
            e
        })
    }

    /// 先渲染共享页头，再渲染正文，返回两者拼接的结果。
    ///
    /// 页头渲染失败时不会再尝试正文。
    pub fn render_with_header<T, C>(
        &self,
        template_id: &str,
        data: &T,
        ctx: &C,
    ) -> Result<String, Exception>
    where
        T: Serialize + ?Sized,
        C: RequestContext + ?Sized,
    {
        let header = header_data(ctx);
        debug!(
            "渲染页头：登录状态={}，显示名={}",
            header.is_user_logged_in, header.display_name
        );
        let mut html = self.render(&self.header_template, &header)?;
        html.push_str(&self.render(template_id, data)?);
        Ok(html)
    }
}
