use alloc::borrow::ToOwned;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::Error;

/// The shared null value.
pub const NULL: Value = Value::Null;

/// An owned null/string/array value.
///
/// `Value` is what [`create`](crate::create) consumes and what
/// [`Tree::to_value`](crate::Tree::to_value) produces. It carries no parent
/// links and never aliases tree storage, so it is also the unit of deep
/// copying into and out of a tree.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Value {
    /// `null`.
    #[default]
    Null,
    /// A string leaf.
    String(String),
    /// An ordered array of values.
    Array(Vec<Value>),
}

impl Value {
    /// An empty array.
    #[must_use]
    pub const fn empty_array() -> Self {
        Value::Array(Vec::new())
    }

    /// `true` for [`Value::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The text of a [`Value::String`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// The members of a [`Value::Array`].
    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }
}

/// Renders the canonical bracketed form, e.g. `[null, "a", []]`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::String(text) => write!(f, "{text:?}"),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    fmt::Display::fmt(item, f)?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Conversion of caller-owned input into a [`Value`].
///
/// Every conversion produces a fresh structure: nothing in the result
/// borrows from or aliases the input. Inputs the null/string/array model
/// cannot hold are rejected with [`Error::UnsupportedType`].
pub trait IntoValue {
    /// Performs the conversion.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedType`] if the input, or anything nested in
    /// it, is not a null, a string or an ordered collection.
    fn into_value(self) -> Result<Value, Error>;
}

impl IntoValue for Value {
    fn into_value(self) -> Result<Value, Error> {
        Ok(self)
    }
}

impl IntoValue for &Value {
    fn into_value(self) -> Result<Value, Error> {
        Ok(self.clone())
    }
}

impl IntoValue for () {
    fn into_value(self) -> Result<Value, Error> {
        Ok(Value::Null)
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Result<Value, Error> {
        Ok(Value::String(self.to_owned()))
    }
}

impl IntoValue for String {
    fn into_value(self) -> Result<Value, Error> {
        Ok(Value::String(self))
    }
}

impl IntoValue for &String {
    fn into_value(self) -> Result<Value, Error> {
        Ok(Value::String(self.clone()))
    }
}

impl IntoValue for Box<str> {
    fn into_value(self) -> Result<Value, Error> {
        Ok(Value::String(self.into()))
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Result<Value, Error> {
        self.map_or(Ok(Value::Null), IntoValue::into_value)
    }
}

impl<T: IntoValue> IntoValue for Vec<T> {
    fn into_value(self) -> Result<Value, Error> {
        self.into_iter().map(IntoValue::into_value).collect::<Result<_, _>>().map(Value::Array)
    }
}

impl<T: IntoValue, const N: usize> IntoValue for [T; N] {
    fn into_value(self) -> Result<Value, Error> {
        self.into_iter().map(IntoValue::into_value).collect::<Result<_, _>>().map(Value::Array)
    }
}

impl<'a, T> IntoValue for &'a [T]
where
    &'a T: IntoValue,
{
    fn into_value(self) -> Result<Value, Error> {
        self.iter().map(IntoValue::into_value).collect::<Result<_, _>>().map(Value::Array)
    }
}

macro_rules! unsupported_primitive {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoValue for $ty {
                fn into_value(self) -> Result<Value, Error> {
                    Err(Error::UnsupportedType { type_name: stringify!($ty) })
                }
            }
        )*
    };
}

// Scalars other than strings have no node type.
unsupported_primitive!(bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::String(text.to_owned())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::String(text)
    }
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Value::Null
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(items: [T; N]) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> FromIterator<T> for Value {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Value::Array(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(feature = "serde_json")]
mod json {
    use alloc::borrow::ToOwned;

    use super::{IntoValue, Value};
    use crate::Error;

    impl IntoValue for serde_json::Value {
        fn into_value(self) -> Result<Value, Error> {
            match self {
                serde_json::Value::Null => Ok(Value::Null),
                serde_json::Value::String(text) => Ok(Value::String(text)),
                serde_json::Value::Array(items) => items.into_value(),
                serde_json::Value::Bool(_) => Err(Error::UnsupportedType { type_name: "bool" }),
                serde_json::Value::Number(_) => Err(Error::UnsupportedType { type_name: "number" }),
                serde_json::Value::Object(_) => Err(Error::UnsupportedType { type_name: "object" }),
            }
        }
    }

    impl IntoValue for &serde_json::Value {
        fn into_value(self) -> Result<Value, Error> {
            match self {
                serde_json::Value::String(text) => Ok(Value::String(text.to_owned())),
                serde_json::Value::Array(items) => items.as_slice().into_value(),
                scalar => scalar.clone().into_value(),
            }
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;

    #[test]
    fn nested_input_converts_structurally() {
        let input = vec![Some(vec![Some("a"), None]), None];
        assert_eq!(
            input.into_value(),
            Ok(Value::Array(vec![
                Value::Array(vec![Value::String("a".into()), Value::Null]),
                Value::Null,
            ]))
        );
    }

    #[test]
    fn borrowed_slices_are_copied() {
        let owned = vec![String::from("x"), String::from("y")];
        let value = owned.as_slice().into_value().unwrap();
        assert_eq!(value, Value::from(["x", "y"]));
        assert_eq!(owned.len(), 2);
    }

    #[test]
    fn scalars_are_rejected() {
        assert_eq!(true.into_value(), Err(Error::UnsupportedType { type_name: "bool" }));
        assert_eq!(1.5_f64.into_value(), Err(Error::UnsupportedType { type_name: "f64" }));
        assert_eq!(
            vec![vec![1_u8]].into_value(),
            Err(Error::UnsupportedType { type_name: "u8" })
        );
    }

    #[test]
    fn display_is_canonical() {
        let value = Value::Array(vec![Value::from("a"), Value::empty_array(), NULL]);
        assert_eq!(value.to_string(), "[\"a\", [], null]");
        assert_eq!(NULL.to_string(), "null");
        assert_eq!(Value::from("q\"uote").to_string(), "\"q\\\"uote\"");
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn json_null_string_array_convert() {
        let json = serde_json::json!([null, "a", [[]]]);
        let expected = Value::Array(vec![
            Value::Null,
            Value::from("a"),
            Value::Array(vec![Value::empty_array()]),
        ]);
        assert_eq!((&json).into_value(), Ok(expected.clone()));
        assert_eq!(json.into_value(), Ok(expected));
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn json_scalars_and_objects_are_rejected() {
        assert_eq!(
            serde_json::json!(["ok", 3]).into_value(),
            Err(Error::UnsupportedType { type_name: "number" })
        );
        assert_eq!(
            serde_json::json!(false).into_value(),
            Err(Error::UnsupportedType { type_name: "bool" })
        );
        assert_eq!(
            serde_json::json!({ "a": null }).into_value(),
            Err(Error::UnsupportedType { type_name: "object" })
        );
    }
}
