//! Key Builder Module
//!
//! Derives cache keys from call arguments.

use std::any::TypeId;

use serde::ser::{
    Serialize, SerializeMap, SerializeSeq, SerializeStruct, SerializeStructVariant,
    SerializeTuple, SerializeTupleStruct, SerializeTupleVariant, Serializer,
};

use crate::error::Result;

// == Public Constants ==
/// Key used for calls without arguments.
///
/// Not valid JSON, so no serialized argument list can produce it.
pub const ZERO_ARITY_KEY: &str = "__0aritykey__";

// == Key Builder ==
/// Maps a call's arguments to the string key used to index the cache.
///
/// Implementations are expected to be deterministic: equal arguments must
/// always produce the same key. This is relied upon but not enforced.
pub trait KeyBuilder<A: ?Sized>: Send + Sync {
    fn build(&self, args: &A) -> Result<String>;
}

/// Any `Fn(&A) -> String` closure can serve as a key builder.
impl<A, F> KeyBuilder<A> for F
where
    A: ?Sized,
    F: Fn(&A) -> String + Send + Sync,
{
    fn build(&self, args: &A) -> Result<String> {
        Ok(self(args))
    }
}

// == JSON Key ==
/// Default key builder: compact JSON of the argument list.
///
/// - `()` maps to [`ZERO_ARITY_KEY`], and nothing else does
/// - tuples are the argument list itself: `(2, 3)` gives `[2,3]`
/// - any other value is one argument and gets wrapped: `5` gives `[5]`,
///   `vec![5]` gives `[[5]]`, `None` gives `[null]`
///
/// Map keys are emitted in sorted order, so `HashMap` arguments are stable.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonKey;

impl<A> KeyBuilder<A> for JsonKey
where
    A: Serialize + ?Sized + 'static,
{
    fn build(&self, args: &A) -> Result<String> {
        if TypeId::of::<A>() == TypeId::of::<()>() {
            return Ok(ZERO_ARITY_KEY.to_string());
        }

        let value = serde_json::to_value(args)?;
        let key = match args.serialize(ShapeSerializer)? {
            ArgShape::List => serde_json::to_string(&value)?,
            ArgShape::Single => serde_json::to_string(&[value])?,
        };
        Ok(key)
    }
}

// == Argument Shape ==
/// Whether a value is an argument list (a tuple) or a single argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArgShape {
    List,
    Single,
}

type ShapeResult<T> = std::result::Result<T, serde_json::Error>;

/// Serializer recording only the top-level shape of a value.
struct ShapeSerializer;

/// Compound serializer that skips the contents.
struct SkipContents(ArgShape);

macro_rules! single_arg {
    ($($method:ident($ty:ty)),* $(,)?) => {
        $(
            fn $method(self, _: $ty) -> ShapeResult<ArgShape> {
                Ok(ArgShape::Single)
            }
        )*
    };
}

impl Serializer for ShapeSerializer {
    type Ok = ArgShape;
    type Error = serde_json::Error;
    type SerializeSeq = SkipContents;
    type SerializeTuple = SkipContents;
    type SerializeTupleStruct = SkipContents;
    type SerializeTupleVariant = SkipContents;
    type SerializeMap = SkipContents;
    type SerializeStruct = SkipContents;
    type SerializeStructVariant = SkipContents;

    single_arg!(
        serialize_bool(bool),
        serialize_i8(i8),
        serialize_i16(i16),
        serialize_i32(i32),
        serialize_i64(i64),
        serialize_i128(i128),
        serialize_u8(u8),
        serialize_u16(u16),
        serialize_u32(u32),
        serialize_u64(u64),
        serialize_u128(u128),
        serialize_f32(f32),
        serialize_f64(f64),
        serialize_char(char),
        serialize_str(&str),
        serialize_bytes(&[u8]),
        serialize_unit_struct(&'static str),
    );

    fn serialize_none(self) -> ShapeResult<ArgShape> {
        Ok(ArgShape::Single)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, _: &T) -> ShapeResult<ArgShape> {
        Ok(ArgShape::Single)
    }

    // `serde_json::Value::Null` lands here too; only `()` itself is zero-arity.
    fn serialize_unit(self) -> ShapeResult<ArgShape> {
        Ok(ArgShape::Single)
    }

    fn serialize_unit_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
    ) -> ShapeResult<ArgShape> {
        Ok(ArgShape::Single)
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _: &'static str,
        _: &T,
    ) -> ShapeResult<ArgShape> {
        Ok(ArgShape::Single)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: &T,
    ) -> ShapeResult<ArgShape> {
        Ok(ArgShape::Single)
    }

    fn serialize_seq(self, _: Option<usize>) -> ShapeResult<SkipContents> {
        Ok(SkipContents(ArgShape::Single))
    }

    fn serialize_tuple(self, _: usize) -> ShapeResult<SkipContents> {
        Ok(SkipContents(ArgShape::List))
    }

    fn serialize_tuple_struct(self, _: &'static str, _: usize) -> ShapeResult<SkipContents> {
        Ok(SkipContents(ArgShape::Single))
    }

    fn serialize_tuple_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> ShapeResult<SkipContents> {
        Ok(SkipContents(ArgShape::Single))
    }

    fn serialize_map(self, _: Option<usize>) -> ShapeResult<SkipContents> {
        Ok(SkipContents(ArgShape::Single))
    }

    fn serialize_struct(self, _: &'static str, _: usize) -> ShapeResult<SkipContents> {
        Ok(SkipContents(ArgShape::Single))
    }

    fn serialize_struct_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> ShapeResult<SkipContents> {
        Ok(SkipContents(ArgShape::Single))
    }
}

impl SerializeSeq for SkipContents {
    type Ok = ArgShape;
    type Error = serde_json::Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, _: &T) -> ShapeResult<()> {
        Ok(())
    }

    fn end(self) -> ShapeResult<ArgShape> {
        Ok(self.0)
    }
}

impl SerializeTuple for SkipContents {
    type Ok = ArgShape;
    type Error = serde_json::Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, _: &T) -> ShapeResult<()> {
        Ok(())
    }

    fn end(self) -> ShapeResult<ArgShape> {
        Ok(self.0)
    }
}

impl SerializeTupleStruct for SkipContents {
    type Ok = ArgShape;
    type Error = serde_json::Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, _: &T) -> ShapeResult<()> {
        Ok(())
    }

    fn end(self) -> ShapeResult<ArgShape> {
        Ok(self.0)
    }
}

impl SerializeTupleVariant for SkipContents {
    type Ok = ArgShape;
    type Error = serde_json::Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, _: &T) -> ShapeResult<()> {
        Ok(())
    }

    fn end(self) -> ShapeResult<ArgShape> {
        Ok(self.0)
    }
}

impl SerializeMap for SkipContents {
    type Ok = ArgShape;
    type Error = serde_json::Error;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, _: &T) -> ShapeResult<()> {
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, _: &T) -> ShapeResult<()> {
        Ok(())
    }

    fn end(self) -> ShapeResult<ArgShape> {
        Ok(self.0)
    }
}

impl SerializeStruct for SkipContents {
    type Ok = ArgShape;
    type Error = serde_json::Error;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        _: &'static str,
        _: &T,
    ) -> ShapeResult<()> {
        Ok(())
    }

    fn end(self) -> ShapeResult<ArgShape> {
        Ok(self.0)
    }
}

impl SerializeStructVariant for SkipContents {
    type Ok = ArgShape;
    type Error = serde_json::Error;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        _: &'static str,
        _: &T,
    ) -> ShapeResult<()> {
        Ok(())
    }

    fn end(self) -> ShapeResult<ArgShape> {
        Ok(self.0)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MemoError;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_zero_arity_uses_sentinel() {
        assert_eq!(JsonKey.build(&()).unwrap(), ZERO_ARITY_KEY);
    }

    #[test]
    fn test_only_unit_maps_to_sentinel() {
        assert_eq!(JsonKey.build(&Vec::<i32>::new()).unwrap(), "[[]]");
        assert_eq!(JsonKey.build(&None::<u8>).unwrap(), "[null]");
        assert_eq!(JsonKey.build(&serde_json::Value::Null).unwrap(), "[null]");
    }

    #[test]
    fn test_optional_sequence_values_are_distinct() {
        let none = JsonKey.build(&None::<Vec<i32>>).unwrap();
        let empty = JsonKey.build(&Some(Vec::<i32>::new())).unwrap();

        assert_ne!(none, empty);
        assert_eq!(none, "[null]");
        assert_eq!(empty, "[[]]");
    }

    #[test]
    fn test_json_scalar_and_array_are_distinct() {
        let scalar = JsonKey.build(&json!(5)).unwrap();
        let array = JsonKey.build(&json!([5])).unwrap();

        assert_ne!(scalar, array);
        assert_eq!(scalar, "[5]");
        assert_eq!(array, "[[5]]");
    }

    #[test]
    fn test_sequence_argument_is_not_an_argument_list() {
        assert_eq!(JsonKey.build(&vec![2, 3]).unwrap(), "[[2,3]]");
        assert_eq!(JsonKey.build(&(2, 3)).unwrap(), "[2,3]");
    }

    #[test]
    fn test_tuple_args_serialize_as_array() {
        assert_eq!(JsonKey.build(&(2, 3)).unwrap(), "[2,3]");
        assert_eq!(JsonKey.build(&(3, 2)).unwrap(), "[3,2]");
        assert_eq!(JsonKey.build(&("a", 1, true)).unwrap(), r#"["a",1,true]"#);
    }

    #[test]
    fn test_single_arg_is_wrapped() {
        assert_eq!(JsonKey.build(&5).unwrap(), "[5]");
        assert_eq!(JsonKey.build(&(5,)).unwrap(), "[5]");
        assert_eq!(JsonKey.build("text").unwrap(), r#"["text"]"#);
    }

    #[test]
    fn test_sentinel_string_argument_does_not_collide() {
        let key = JsonKey.build(&(ZERO_ARITY_KEY,)).unwrap();
        assert_ne!(key, ZERO_ARITY_KEY);
        assert_eq!(key, r#"["__0aritykey__"]"#);
    }

    #[test]
    fn test_nested_structures() {
        let key = JsonKey.build(&(vec![1, 2], Some("x"), None::<u8>)).unwrap();
        assert_eq!(key, r#"[[1,2],"x",null]"#);
    }

    #[test]
    fn test_map_keys_are_sorted() {
        let mut first = HashMap::new();
        let mut second = HashMap::new();
        for (k, v) in [("b", 2), ("a", 1), ("c", 3)] {
            first.insert(k, v);
        }
        for (k, v) in [("c", 3), ("a", 1), ("b", 2)] {
            second.insert(k, v);
        }

        let key = JsonKey.build(&(first,)).unwrap();
        assert_eq!(key, JsonKey.build(&(second,)).unwrap());
        assert_eq!(key, r#"[{"a":1,"b":2,"c":3}]"#);
    }

    #[test]
    fn test_unserializable_args_fail() {
        let mut map = HashMap::new();
        map.insert((1, 2), "tuple keys are not JSON object keys");

        let result = JsonKey.build(&(map,));
        assert!(matches!(result, Err(MemoError::KeyBuild(_))));
    }

    #[test]
    fn test_closure_key_builder() {
        let builder = |args: &(i32, i32)| format!("{}:{}", args.0.min(args.1), args.0.max(args.1));
        assert_eq!(builder.build(&(3, 2)).unwrap(), "2:3");
        assert_eq!(builder.build(&(2, 3)).unwrap(), "2:3");
    }
}
