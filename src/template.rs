// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 模板引擎模块
//!
//! 一个体量很小的 `{{ }}` 模板语言，执行时以 [`Data`] 作为数据源：
//!
//! | 语法 | 含义 |
//! |------|------|
//! | `{{.}}` / `{{.Title}}` / `{{.User.Name}}` | 输出当前值或其字段，默认进行 HTML 转义 |
//! | `{{if .X}} … {{else}} … {{end}}` | 条件分支 |
//! | `{{range .List}} … {{else}} … {{end}}` | 遍历数组（或映射的值），`.` 绑定为当前元素 |
//! | `{{/* 注释 */}}` | 忽略，注释内部可以出现 `}}` |
//! | `{{- .X -}}` | 去掉动作左侧/右侧紧邻文本中的空白 |
//!
//! 只有 `response::SafeHtml` 的值原样输出，不会再次转义。
//!
//! 字段查找区分结构体与映射：引用结构体中不存在的字段属于执行错误；
//! 映射中不存在的键得到空值，在 `if` 中为假，输出为空串。

use std::fmt::Write;

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use serde::Serialize;

use crate::{
    data::{Data, DataSerializer},
    exception::Exception,
};

lazy_static! {
    /// 匹配一个完整的 `{{ … }}` 动作，注释优先匹配到 `*/}}` 为止。
    static ref ACTION: Regex =
        Regex::new(r"(?s)\{\{(-?\s*/\*.*?\*/\s*-?)\}\}|\{\{(.*?)\}\}").unwrap();
}

/// 映射中缺失的键
static MISSING: Data = Data::Null;

/// 字段访问路径，空路径代表 `.` 本身。
#[derive(Debug, Clone, PartialEq)]
struct FieldPath(Vec<String>);

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Text(String),
    Output(FieldPath),
    If {
        cond: FieldPath,
        then: Vec<Node>,
        otherwise: Vec<Node>,
    },
    Range {
        over: FieldPath,
        body: Vec<Node>,
        otherwise: Vec<Node>,
    },
}

#[derive(Debug)]
enum Token {
    Text(String),
    Action(String),
}

/// `parse_list` 遇到的块结束标记
#[derive(Debug, PartialEq)]
enum Terminator {
    Else,
    End,
}

/// 解析完成、可重复执行的模板。
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    nodes: Vec<Node>,
}

impl Template {
    /// 解析模板文本。`name` 仅用于错误信息。
    pub fn parse(name: &str, text: &str) -> Result<Self, Exception> {
        let tokens = tokenize(name, text)?;
        let mut iter = tokens.into_iter();
        let (nodes, terminator) = parse_list(name, &mut iter)?;
        if let Some(t) = terminator {
            return Err(Exception::TemplateSyntax(format!(
                "{}: unexpected {{{{{}}}}}",
                name,
                terminator_name(&t)
            )));
        }
        debug!("模板{}解析完成，共{}个顶层节点", name, nodes.len());
        Ok(Self {
            name: name.to_string(),
            nodes,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 以 `data` 作为 `.` 执行模板。
    pub fn execute(&self, data: &Data) -> Result<String, Exception> {
        let mut out = String::new();
        self.exec_nodes(&self.nodes, data, &mut out)?;
        Ok(out)
    }

    /// 先把 `data` 转换为 [`Data`] 再执行。
    pub fn execute_serialize<T: Serialize + ?Sized>(&self, data: &T) -> Result<String, Exception> {
        let value = data.serialize(DataSerializer).map_err(|e| {
            Exception::TemplateExecute(format!("{}: can't convert data: {}", self.name, e))
        })?;
        self.execute(&value)
    }

    fn exec_nodes(&self, nodes: &[Node], dot: &Data, out: &mut String) -> Result<(), Exception> {
        for node in nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Output(path) => {
                    let value = self.resolve(path, dot)?;
                    self.write_value(value, out)?;
                }
                Node::If {
                    cond,
                    then,
                    otherwise,
                } => {
                    let value = self.resolve(cond, dot)?;
                    if is_truthy(value) {
                        self.exec_nodes(then, dot, out)?;
                    } else {
                        self.exec_nodes(otherwise, dot, out)?;
                    }
                }
                Node::Range {
                    over,
                    body,
                    otherwise,
                } => {
                    let value = self.resolve(over, dot)?;
                    let items: Vec<&Data> = match value {
                        Data::Null => Vec::new(),
                        Data::Seq(items) => items.iter().collect(),
                        Data::Map(map) => map.values().collect(),
                        other => {
                            return Err(Exception::TemplateExecute(format!(
                                "{}: range can't iterate over {}",
                                self.name,
                                other.type_name()
                            )))
                        }
                    };
                    if items.is_empty() {
                        self.exec_nodes(otherwise, dot, out)?;
                    }
                    for item in items {
                        self.exec_nodes(body, item, out)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn resolve<'a>(&self, path: &FieldPath, dot: &'a Data) -> Result<&'a Data, Exception> {
        let mut current = dot;
        for field in &path.0 {
            current = match current {
                Data::Struct(fields) => match fields.iter().find(|(k, _)| k == field) {
                    Some((_, v)) => v,
                    None => {
                        return Err(Exception::TemplateExecute(format!(
                            "{}: can't evaluate field {}",
                            self.name, field
                        )))
                    }
                },
                Data::Map(map) => map.get(field).unwrap_or(&MISSING),
                other => {
                    return Err(Exception::TemplateExecute(format!(
                        "{}: can't evaluate field {} in type {}",
                        self.name,
                        field,
                        other.type_name()
                    )))
                }
            };
        }
        Ok(current)
    }

    fn write_value(&self, value: &Data, out: &mut String) -> Result<(), Exception> {
        match value {
            Data::Null => {}
            Data::Bool(b) => {
                let _ = write!(out, "{}", b);
            }
            Data::Number(n) => {
                let _ = write!(out, "{}", n);
            }
            Data::String(s) => out.push_str(&escape_html(s)),
            Data::SafeHtml(raw) => out.push_str(raw),
            other => {
                return Err(Exception::TemplateExecute(format!(
                    "{}: can't print a {}",
                    self.name,
                    other.type_name()
                )))
            }
        }
        Ok(())
    }
}

/// HTML 转义：`& < > " '`。
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&#34;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn is_truthy(value: &Data) -> bool {
    match value {
        Data::Null => false,
        Data::Bool(b) => *b,
        Data::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Data::String(s) | Data::SafeHtml(s) => !s.is_empty(),
        Data::Seq(items) => !items.is_empty(),
        Data::Map(map) => !map.is_empty(),
        Data::Struct(_) => true,
    }
}

fn terminator_name(t: &Terminator) -> &'static str {
    match t {
        Terminator::Else => "else",
        Terminator::End => "end",
    }
}

fn tokenize(name: &str, text: &str) -> Result<Vec<Token>, Exception> {
    let mut tokens = Vec::new();
    let mut last = 0;
    let mut trim_next = false;
    for caps in ACTION.captures_iter(text) {
        let whole = caps.get(0).map_or(0..0, |m| m.range());
        let mut inner = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map_or("", |m| m.as_str());

        let mut literal = &text[last..whole.start];
        if trim_next {
            literal = literal.trim_start();
        }
        if let Some(rest) = inner.strip_prefix("- ") {
            literal = literal.trim_end();
            inner = rest;
        }
        trim_next = false;
        if let Some(rest) = inner.strip_suffix(" -") {
            trim_next = true;
            inner = rest;
        }
        if !literal.is_empty() {
            tokens.push(Token::Text(literal.to_string()));
        }
        tokens.push(Token::Action(inner.trim().to_string()));
        last = whole.end;
    }

    let mut rest = &text[last..];
    if trim_next {
        rest = rest.trim_start();
    }
    if rest.contains("{{") {
        return Err(Exception::TemplateSyntax(format!(
            "{}: unclosed action",
            name
        )));
    }
    if !rest.is_empty() {
        tokens.push(Token::Text(rest.to_string()));
    }
    Ok(tokens)
}

fn parse_list(
    name: &str,
    tokens: &mut std::vec::IntoIter<Token>,
) -> Result<(Vec<Node>, Option<Terminator>), Exception> {
    let mut nodes = Vec::new();
    while let Some(token) = tokens.next() {
        let action = match token {
            Token::Text(text) => {
                nodes.push(Node::Text(text));
                continue;
            }
            Token::Action(action) => action,
        };

        if action.starts_with("/*") && action.ends_with("*/") {
            continue;
        }
        if action == "end" {
            return Ok((nodes, Some(Terminator::End)));
        }
        if action == "else" {
            return Ok((nodes, Some(Terminator::Else)));
        }

        let (keyword, argument) = match action.split_once(char::is_whitespace) {
            Some((k, a)) => (k, a.trim()),
            None => (action.as_str(), ""),
        };
        match keyword {
            "if" => {
                let cond = parse_field_path(name, argument)?;
                let (then, otherwise) = parse_block(name, "if", tokens)?;
                nodes.push(Node::If {
                    cond,
                    then,
                    otherwise,
                });
            }
            "range" => {
                let over = parse_field_path(name, argument)?;
                let (body, otherwise) = parse_block(name, "range", tokens)?;
                nodes.push(Node::Range {
                    over,
                    body,
                    otherwise,
                });
            }
            _ => nodes.push(Node::Output(parse_field_path(name, &action)?)),
        }
    }
    Ok((nodes, None))
}

/// 解析 `if`/`range` 的主体与可选的 `else` 分支，直到对应的 `end`。
fn parse_block(
    name: &str,
    keyword: &str,
    tokens: &mut std::vec::IntoIter<Token>,
) -> Result<(Vec<Node>, Vec<Node>), Exception> {
    let (body, terminator) = parse_list(name, tokens)?;
    match terminator {
        Some(Terminator::End) => Ok((body, Vec::new())),
        Some(Terminator::Else) => {
            let (otherwise, terminator) = parse_list(name, tokens)?;
            match terminator {
                Some(Terminator::End) => Ok((body, otherwise)),
                Some(Terminator::Else) => Err(Exception::TemplateSyntax(format!(
                    "{}: more than one {{{{else}}}} in {{{{{}}}}}",
                    name, keyword
                ))),
                None => Err(unexpected_eof(name, keyword)),
            }
        }
        None => Err(unexpected_eof(name, keyword)),
    }
}

fn unexpected_eof(name: &str, keyword: &str) -> Exception {
    Exception::TemplateSyntax(format!("{}: missing {{{{end}}}} for {{{{{}}}}}", name, keyword))
}

fn parse_field_path(name: &str, text: &str) -> Result<FieldPath, Exception> {
    if text == "." {
        return Ok(FieldPath(Vec::new()));
    }
    let fields = match text.strip_prefix('.') {
        Some(rest) => rest.split('.'),
        None => {
            return Err(Exception::TemplateSyntax(format!(
                "{}: unknown action \"{}\"",
                name, text
            )))
        }
    };
    let mut path = Vec::new();
    for field in fields {
        if field.is_empty() || !field.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Err(Exception::TemplateSyntax(format!(
                "{}: bad field name in \"{}\"",
                name, text
            )));
        }
        path.push(field.to_string());
    }
    Ok(FieldPath(path))
}
