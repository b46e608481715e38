use crate::context::{Context, ContextRef, Numeric};
pub use serde_yaml::Value as YamlValue;

impl Context for YamlValue {
    fn child(&self, name: &str) -> Option<ContextRef<'_>> {
        self.get(name).map(|value| value as ContextRef)
    }

    fn item(&self, index: usize) -> Option<ContextRef<'_>> {
        match self {
            YamlValue::Sequence(seq) => seq.get(index).map(|value| value as ContextRef),
            _ => None,
        }
    }

    fn value(&self) -> String {
        match self {
            YamlValue::String(s) => s.clone(),
            YamlValue::Number(n) => n.to_string(),
            YamlValue::Bool(b) => b.to_string(),
            _ => String::new(),
        }
    }

    fn number(&self) -> Option<Numeric> {
        match self {
            YamlValue::Number(n) => match n.as_i64() {
                Some(i) => Some(Numeric::Int(i)),
                None => n.as_f64().map(Numeric::Float),
            },
            _ => None,
        }
    }

    fn is_truthy(&self) -> bool {
        match self {
            YamlValue::Null => false,
            YamlValue::Bool(b) => *b,
            YamlValue::Number(n) => n.as_f64() != Some(0.0),
            YamlValue::String(s) => !s.is_empty(),
            YamlValue::Sequence(seq) => !seq.is_empty(),
            YamlValue::Mapping(map) => !map.is_empty(),
            _ => true,
        }
    }
}
