use std::collections::BTreeMap;
use std::fmt::Write;

/// 线性扫描，`list` 中存在与 `value` 相等的元素时返回 `true`。
pub fn contains<T: PartialEq>(value: &T, list: &[T]) -> bool {
    list.iter().any(|v| v == value)
}

/// 保序过滤，总是返回一个新的（可能为空的）序列。
pub fn filter<T, F>(list: &[T], predicate: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> bool,
{
    list.iter().filter(|v| predicate(*v)).cloned().collect()
}

/// 去掉所有空字符串。
pub fn remove_empty<S: AsRef<str> + Clone>(list: &[S]) -> Vec<S> {
    filter(list, |v| !v.as_ref().is_empty())
}

pub fn first_or_default<S: AsRef<str>>(list: &[S]) -> String {
    match list.first() {
        Some(first) => first.as_ref().to_string(),
        None => String::new(),
    }
}

pub fn to_lower(value: &str) -> String {
    value.to_lowercase()
}

/// 把字符串序列格式化为 `["a", "b"]` 形式，空序列为 `[]`。
///
/// 仅用于日志与调试输出，不是数据交换格式：元素中的引号不做转义。
pub fn stringify<S: AsRef<str>>(list: &[S]) -> String {
    let mut buffer = String::from("[");
    for (i, item) in list.iter().enumerate() {
        if i > 0 {
            buffer.push_str(", ");
        }
        buffer.push('"');
        buffer.push_str(item.as_ref());
        buffer.push('"');
    }
    buffer.push(']');
    buffer
}

/// 每个键值对一行：`"key": "value"`，按键排序。
pub fn stringify_map(map: &BTreeMap<String, String>) -> String {
    let mut buffer = String::new();
    for (key, value) in map {
        let _ = writeln!(buffer, "\"{}\": \"{}\"", key, value);
    }
    buffer
}

/// 每个键一行：`"key": ["v1", "v2"]`，按键排序。适用于查询参数。
pub fn stringify_multi_map(map: &BTreeMap<String, Vec<String>>) -> String {
    let mut buffer = String::new();
    for (key, values) in map {
        let _ = writeln!(buffer, "\"{}\": {}", key, stringify(values));
    }
    buffer
}
