// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 模板数据模块
//!
//! 模板执行时使用的数据树，由任意 `Serialize` 值通过 [`DataSerializer`] 生成。
//!
//! 与 `serde_json::Value` 不同，这里保留了两类区别：
//! - **结构体与映射**：结构体（`serialize_struct`）缺少字段是执行错误；
//!   映射（`serialize_map`）缺少的键视为空值。
//! - **可信标记**：只有以保留名称序列化的 newtype（即 `response::SafeHtml`）
//!   会变成 [`Data::SafeHtml`]。映射中的任何键都无法伪造它。

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::{self, Serialize};
use serde_json::Number;

use crate::{exception::Exception, param::SAFE_HTML_NAME};

#[derive(Debug, Clone, PartialEq)]
pub enum Data {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    /// 可信的 HTML 标记，输出时不转义
    SafeHtml(String),
    Seq(Vec<Data>),
    /// 映射，按键排序
    Map(BTreeMap<String, Data>),
    /// 结构体字段，保持声明顺序
    Struct(Vec<(String, Data)>),
}

impl Data {
    pub fn type_name(&self) -> &'static str {
        match self {
            Data::Null => "null",
            Data::Bool(_) => "bool",
            Data::Number(_) => "number",
            Data::String(_) => "string",
            Data::SafeHtml(_) => "html",
            Data::Seq(_) => "array",
            Data::Map(_) => "map",
            Data::Struct(_) => "struct",
        }
    }
}

/// 把可序列化的值转换为模板数据。
pub fn to_data<T: Serialize + ?Sized>(value: &T) -> Result<Data, Exception> {
    value
        .serialize(DataSerializer)
        .map_err(|e| Exception::TemplateExecute(format!("can't convert data: {}", e)))
}

#[derive(Debug)]
pub struct DataError(String);

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for DataError {}

impl ser::Error for DataError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        DataError(msg.to_string())
    }
}

pub struct DataSerializer;

impl ser::Serializer for DataSerializer {
    type Ok = Data;
    type Error = DataError;

    type SerializeSeq = SeqBuilder;
    type SerializeTuple = SeqBuilder;
    type SerializeTupleStruct = SeqBuilder;
    type SerializeTupleVariant = TupleVariantBuilder;
    type SerializeMap = MapBuilder;
    type SerializeStruct = StructBuilder;
    type SerializeStructVariant = StructVariantBuilder;

    fn serialize_bool(self, v: bool) -> Result<Data, DataError> {
        Ok(Data::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Data, DataError> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i16(self, v: i16) -> Result<Data, DataError> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i32(self, v: i32) -> Result<Data, DataError> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i64(self, v: i64) -> Result<Data, DataError> {
        Ok(Data::Number(Number::from(v)))
    }

    fn serialize_u8(self, v: u8) -> Result<Data, DataError> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u16(self, v: u16) -> Result<Data, DataError> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u32(self, v: u32) -> Result<Data, DataError> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u64(self, v: u64) -> Result<Data, DataError> {
        Ok(Data::Number(Number::from(v)))
    }

    fn serialize_f32(self, v: f32) -> Result<Data, DataError> {
        self.serialize_f64(v as f64)
    }

    // NaN 与无穷大没有对应的数字，按空值处理
    fn serialize_f64(self, v: f64) -> Result<Data, DataError> {
        Ok(Number::from_f64(v).map_or(Data::Null, Data::Number))
    }

    fn serialize_char(self, v: char) -> Result<Data, DataError> {
        Ok(Data::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Data, DataError> {
        Ok(Data::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Data, DataError> {
        Ok(Data::Seq(
            v.iter().map(|b| Data::Number(Number::from(*b))).collect(),
        ))
    }

    fn serialize_none(self) -> Result<Data, DataError> {
        Ok(Data::Null)
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<Data, DataError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Data, DataError> {
        Ok(Data::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Data, DataError> {
        Ok(Data::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Data, DataError> {
        Ok(Data::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<Data, DataError> {
        let inner = value.serialize(self)?;
        if name != SAFE_HTML_NAME {
            return Ok(inner);
        }
        match inner {
            Data::String(markup) => Ok(Data::SafeHtml(markup)),
            other => Err(DataError(format!(
                "safe html must wrap a string, got {}",
                other.type_name()
            ))),
        }
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Data, DataError> {
        let mut map = BTreeMap::new();
        map.insert(variant.to_string(), value.serialize(DataSerializer)?);
        Ok(Data::Map(map))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqBuilder, DataError> {
        Ok(SeqBuilder {
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqBuilder, DataError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SeqBuilder, DataError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<TupleVariantBuilder, DataError> {
        Ok(TupleVariantBuilder {
            variant,
            items: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<MapBuilder, DataError> {
        Ok(MapBuilder {
            entries: BTreeMap::new(),
            pending_key: None,
        })
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<StructBuilder, DataError> {
        Ok(StructBuilder {
            fields: Vec::with_capacity(len),
        })
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<StructVariantBuilder, DataError> {
        Ok(StructVariantBuilder {
            variant,
            fields: Vec::with_capacity(len),
        })
    }
}

pub struct SeqBuilder {
    items: Vec<Data>,
}

impl ser::SerializeSeq for SeqBuilder {
    type Ok = Data;
    type Error = DataError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), DataError> {
        self.items.push(value.serialize(DataSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Data, DataError> {
        Ok(Data::Seq(self.items))
    }
}

impl ser::SerializeTuple for SeqBuilder {
    type Ok = Data;
    type Error = DataError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), DataError> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Data, DataError> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SeqBuilder {
    type Ok = Data;
    type Error = DataError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), DataError> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Data, DataError> {
        ser::SerializeSeq::end(self)
    }
}

pub struct TupleVariantBuilder {
    variant: &'static str,
    items: Vec<Data>,
}

impl ser::SerializeTupleVariant for TupleVariantBuilder {
    type Ok = Data;
    type Error = DataError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), DataError> {
        self.items.push(value.serialize(DataSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Data, DataError> {
        let mut map = BTreeMap::new();
        map.insert(self.variant.to_string(), Data::Seq(self.items));
        Ok(Data::Map(map))
    }
}

pub struct MapBuilder {
    entries: BTreeMap<String, Data>,
    pending_key: Option<String>,
}

impl ser::SerializeMap for MapBuilder {
    type Ok = Data;
    type Error = DataError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<(), DataError> {
        let key = match key.serialize(DataSerializer)? {
            Data::String(s) => s,
            Data::Number(n) => n.to_string(),
            Data::Bool(b) => b.to_string(),
            other => {
                return Err(DataError(format!(
                    "map key must be a string, got {}",
                    other.type_name()
                )))
            }
        };
        self.pending_key = Some(key);
        Ok(())
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), DataError> {
        let key = self
            .pending_key
            .take()
            .ok_or_else(|| DataError("map value without key".to_string()))?;
        self.entries.insert(key, value.serialize(DataSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Data, DataError> {
        Ok(Data::Map(self.entries))
    }
}

pub struct StructBuilder {
    fields: Vec<(String, Data)>,
}

impl ser::SerializeStruct for StructBuilder {
    type Ok = Data;
    type Error = DataError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), DataError> {
        self.fields
            .push((key.to_string(), value.serialize(DataSerializer)?));
        Ok(())
    }

    fn end(self) -> Result<Data, DataError> {
        Ok(Data::Struct(self.fields))
    }
}

pub struct StructVariantBuilder {
    variant: &'static str,
    fields: Vec<(String, Data)>,
}

impl ser::SerializeStructVariant for StructVariantBuilder {
    type Ok = Data;
    type Error = DataError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), DataError> {
        self.fields
            .push((key.to_string(), value.serialize(DataSerializer)?));
        Ok(())
    }

    fn end(self) -> Result<Data, DataError> {
        let mut map = BTreeMap::new();
        map.insert(self.variant.to_string(), Data::Struct(self.fields));
        Ok(Data::Map(map))
    }
}
