use crate::context::{Context, ContextRef, Numeric};
pub use serde_json::Value as JsonValue;

impl Context for JsonValue {
    fn child(&self, name: &str) -> Option<ContextRef<'_>> {
        self.get(name).map(|value| value as ContextRef)
    }

    fn item(&self, index: usize) -> Option<ContextRef<'_>> {
        match self {
            JsonValue::Array(seq) => seq.get(index).map(|value| value as ContextRef),
            _ => None,
        }
    }

    fn value(&self) -> String {
        match self {
            JsonValue::String(s) => s.clone(),
            JsonValue::Number(n) => n.to_string(),
            JsonValue::Bool(b) => b.to_string(),
            _ => String::new(),
        }
    }

    fn number(&self) -> Option<Numeric> {
        match self {
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Some(Numeric::Int(i)),
                None => n.as_f64().map(Numeric::Float),
            },
            _ => None,
        }
    }

    fn is_truthy(&self) -> bool {
        match self {
            JsonValue::Null => false,
            JsonValue::Bool(b) => *b,
            JsonValue::Number(n) => n.as_f64() != Some(0.0),
            JsonValue::String(s) => !s.is_empty(),
            JsonValue::Array(seq) => !seq.is_empty(),
            JsonValue::Object(map) => !map.is_empty(),
        }
    }
}
