//! 页面数据与 JSON 响应模型。

use std::collections::BTreeMap;

use log::error;
use serde::ser::Serializer;
use serde_derive::{Deserialize, Serialize};

use crate::{exception::Exception, param::SAFE_HTML_NAME};

/// 调用方保证安全的、已经渲染好的 HTML 片段。
///
/// 模板引擎输出它时不会再次转义。JSON 中编码为普通字符串。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SafeHtml(String);

impl SafeHtml {
    pub fn new(markup: impl Into<String>) -> Self {
        Self(markup.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for SafeHtml {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_newtype_struct(SAFE_HTML_NAME, &self.0)
    }
}

/// 样式表或脚本的引用，原样交给模板。
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "PascalCase")]
pub struct Link {
    pub path: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl Link {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: &str, value: &str) -> Self {
        self.attributes.insert(key.to_string(), value.to_string());
        self
    }
}

/// 页面模板的数据。模板中以 `.Title`、`.Body`、`.StyleSrc`、`.ScriptSrc` 访问。
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct PageData {
    pub title: String,
    pub body: SafeHtml,
    pub style_src: Vec<Link>,
    pub script_src: Vec<Link>,
}

impl PageData {
    /// `body_html` 被视为可信标记，渲染时不会转义。
    pub fn new(title: &str, body_html: &str, style_src: Vec<Link>, script_src: Vec<Link>) -> Self {
        Self {
            title: title.to_string(),
            body: SafeHtml::new(body_html),
            style_src,
            script_src,
        }
    }
}

/// 共享页头模板的数据，每次渲染时由会话状态生成。
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "PascalCase")]
pub struct HeaderData {
    pub is_user_logged_in: bool,
    pub display_name: String,
}

/// 最简单的 JSON 响应包装：`{"message": "..."}`。
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct JsonResponse {
    pub message: String,
}

pub fn json_response(message: &str) -> JsonResponse {
    JsonResponse {
        message: message.to_string(),
    }
}

/// 把任意可序列化的值编码为紧凑 JSON 字符串。
pub fn marshal_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, Exception> {
    serde_json::to_string(value).map_err(|e| {
        error!("JSON序列化失败：{}", e);
        Exception::Serialization(e.to_string())
    })
}
