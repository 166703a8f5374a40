use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 论文描述文档
///
/// 任意 JSON 对象都是合法的论文文档，字段原样保留并随评审提示词一起发送；
/// 只有标题会被读取，且对类型不做要求。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaperData {
    fields: Map<String, Value>,
}

impl PaperData {
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// 全部字段
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// 论文标题
    ///
    /// 字符串原样返回，数字等其他类型按 JSON 文本返回，缺失或 `null` 时为 `None`
    pub fn title(&self) -> Option<String> {
        match self.fields.get("title")? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// 获取标题，不存在时返回 "Unknown"
    pub fn title_or_unknown(&self) -> String {
        self.title().unwrap_or_else(|| "Unknown".to_string())
    }
}
