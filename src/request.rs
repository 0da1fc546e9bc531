// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 请求路径解析模块
//!
//! 将请求行中的原始路径（可能带有 `?query`）拆分为路由段，供上层路由器分发使用。
//! 本模块只处理路径字符串本身，不读取请求头、Cookie 或请求体。
//!
//! 所有函数都是纯函数，永不失败：无法解析的输入只会得到空结果。

use std::collections::BTreeMap;

/// 查询参数：每个键对应按出现顺序排列的全部取值。
pub type QueryParams = BTreeMap<String, Vec<String>>;

/// 按 `/` 拆分路径并丢弃空段。
///
/// 前导、末尾以及连续的 `/` 都不会产生额外的元素。
pub fn split_routes(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// 返回最后一个路由段，并去掉其中 `?` 之后的查询部分。
///
/// 路径中没有任何路由段时返回空字符串。
pub fn last_route(path: &str) -> &str {
    match split_routes(path).last() {
        Some(last) => strip_query(last),
        None => "",
    }
}

/// 与 [`split_routes`] 相同，但最后一个路由段会去掉查询部分。
///
/// 只有最后一段会被清理；出现在更早路由段中的 `?` 原样保留。
/// 若最后一段去掉查询后为空（例如 `/users/?page=2`），则不再保留该段。
pub fn routes(path: &str) -> Vec<&str> {
    let mut routes = split_routes(path);
    if let Some(last) = routes.pop() {
        let cleaned = strip_query(last);
        if !cleaned.is_empty() {
            routes.push(cleaned);
        }
    }
    routes
}

/// 去掉一个前导 `/`（如果存在）。
pub fn remove_leading_slash(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}

/// 解析路径中第一个 `?` 之后的查询字符串。
///
/// 按 `application/x-www-form-urlencoded` 规则解码（`%XX` 与 `+`），同名键的多个值按出现顺序保留。
pub fn query_params(path: &str) -> QueryParams {
    let mut params = QueryParams::new();
    let query = match path.split_once('?') {
        Some((_, q)) => q,
        None => return params,
    };
    // 片段标识不属于查询
    let query = query.split('#').next().unwrap_or("");
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        params
            .entry(key.into_owned())
            .or_default()
            .push(value.into_owned());
    }
    params
}

fn strip_query(segment: &str) -> &str {
    match segment.find('?') {
        Some(index) => &segment[..index],
        None => segment,
    }
}
