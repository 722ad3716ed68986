//! Iteration over iterable values for template `for` loops.

use std::rc::Rc;

use super::Value;

/// Iterator over the items of a string or a string array.
#[derive(Clone, Debug)]
pub enum ValueIter {
    Chars { text: Rc<str>, offset: usize },
    Strings { items: Rc<[String]>, index: usize },
}

impl ValueIter {
    pub(super) fn new(value: &Value) -> Option<Self> {
        match value {
            Value::Str(text) => Some(Self::Chars {
                text: Rc::clone(text),
                offset: 0,
            }),
            Value::StrV(items) => Some(Self::Strings {
                items: Rc::clone(items),
                index: 0,
            }),
            other => {
                tracing::warn!(type_name = other.type_name(), "don't know how to iterate");
                None
            }
        }
    }
}

impl Iterator for ValueIter {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        match self {
            Self::Chars { text, offset } => {
                let c = text.get(*offset..)?.chars().next()?;
                *offset += c.len_utf8();
                Some(Value::string(c.to_string()))
            }
            Self::Strings { items, index } => {
                let item = items.get(*index)?;
                *index += 1;
                Some(Value::string(item.as_str()))
            }
        }
    }
}
