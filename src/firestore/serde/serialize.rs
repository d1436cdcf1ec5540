use std::collections::HashMap;

use firestore_grpc::v1::{value::ValueType, ArrayValue, Document, MapValue, Value};
use serde::{
    ser::{
        Impossible, SerializeMap, SerializeSeq, SerializeStruct, SerializeTuple,
        SerializeTupleStruct,
    },
    Serialize, Serializer,
};

use super::Error;

/// Serializes `value` into a document named `name`. Timestamps are left
/// empty; Firestore assigns them on write.
pub(crate) fn serialize_to_document<T: ?Sized + Serialize>(
    value: &T,
    name: String,
) -> Result<Document, Error> {
    match serialize(value)? {
        ValueType::MapValue(map_value) => Ok(Document {
            name,
            fields: map_value.fields,
            ..Default::default()
        }),
        _ => Err(Error::InvalidDocument),
    }
}

fn serialize<T: ?Sized + Serialize>(value: &T) -> Result<ValueType, Error> {
    value.serialize(FirestoreValueSerializer)
}

fn wrap(value_type: ValueType) -> Value {
    Value {
        value_type: Some(value_type),
    }
}

struct FirestoreValueSerializer;

impl Serializer for FirestoreValueSerializer {
    type Ok = ValueType;
    type Error = Error;

    type SerializeSeq = ArraySerializer;
    type SerializeTuple = ArraySerializer;
    type SerializeTupleStruct = ArraySerializer;
    type SerializeTupleVariant = Impossible<ValueType, Error>;
    type SerializeMap = MapSerializer;
    type SerializeStruct = MapSerializer;
    type SerializeStructVariant = Impossible<ValueType, Error>;

    fn serialize_bool(self, v: bool) -> Result<Self::Ok, Self::Error> {
        Ok(ValueType::BooleanValue(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Self::Ok, Self::Error> {
        self.serialize_i64(v.into())
    }

    fn serialize_i16(self, v: i16) -> Result<Self::Ok, Self::Error> {
        self.serialize_i64(v.into())
    }

    fn serialize_i32(self, v: i32) -> Result<Self::Ok, Self::Error> {
        self.serialize_i64(v.into())
    }

    fn serialize_i64(self, v: i64) -> Result<Self::Ok, Self::Error> {
        Ok(ValueType::IntegerValue(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Self::Ok, Self::Error> {
        self.serialize_i64(v.into())
    }

    fn serialize_u16(self, v: u16) -> Result<Self::Ok, Self::Error> {
        self.serialize_i64(v.into())
    }

    fn serialize_u32(self, v: u32) -> Result<Self::Ok, Self::Error> {
        self.serialize_i64(v.into())
    }

    /// Firestore integers are signed 64-bit, so values above `i64::MAX` are
    /// rejected.
    fn serialize_u64(self, v: u64) -> Result<Self::Ok, Self::Error> {
        i64::try_from(v)
            .map(ValueType::IntegerValue)
            .map_err(|_| Error::Message(format!("{v} does not fit in a Firestore integer")))
    }

    fn serialize_f32(self, v: f32) -> Result<Self::Ok, Self::Error> {
        self.serialize_f64(v.into())
    }

    fn serialize_f64(self, v: f64) -> Result<Self::Ok, Self::Error> {
        Ok(ValueType::DoubleValue(v))
    }

    fn serialize_char(self, v: char) -> Result<Self::Ok, Self::Error> {
        let mut char_str = [0; 4];
        self.serialize_str(v.encode_utf8(&mut char_str))
    }

    fn serialize_str(self, v: &str) -> Result<Self::Ok, Self::Error> {
        Ok(ValueType::StringValue(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Self::Ok, Self::Error> {
        Ok(ValueType::BytesValue(v.to_vec()))
    }

    fn serialize_none(self) -> Result<Self::Ok, Self::Error> {
        self.serialize_unit()
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Self::Ok, Self::Error> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Self::Ok, Self::Error> {
        Ok(ValueType::NullValue(0))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Self::Ok, Self::Error> {
        self.serialize_unit()
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Self::Ok, Self::Error> {
        self.serialize_str(variant)
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Self::Ok, Self::Error> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Self::Ok, Self::Error> {
        let mut fields = HashMap::with_capacity(1);
        fields.insert(variant.to_string(), wrap(serialize(value)?));
        Ok(ValueType::MapValue(MapValue { fields }))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq, Self::Error> {
        Ok(ArraySerializer::new(len))
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple, Self::Error> {
        Ok(ArraySerializer::new(Some(len)))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct, Self::Error> {
        Ok(ArraySerializer::new(Some(len)))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, Self::Error> {
        Err(Error::Unsupported("tuple enum variant"))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap, Self::Error> {
        Ok(MapSerializer::new(len.unwrap_or(0)))
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStruct, Self::Error> {
        Ok(MapSerializer::new(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, Self::Error> {
        Err(Error::Unsupported("struct enum variant"))
    }
}

struct ArraySerializer {
    values: Vec<Value>,
}

impl ArraySerializer {
    fn new(len: Option<usize>) -> Self {
        Self {
            values: Vec::with_capacity(len.unwrap_or(0)),
        }
    }

    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Error> {
        self.values.push(wrap(serialize(value)?));
        Ok(())
    }

    fn finish(self) -> ValueType {
        ValueType::ArrayValue(ArrayValue {
            values: self.values,
        })
    }
}

impl SerializeSeq for ArraySerializer {
    type Ok = ValueType;
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Self::Error> {
        self.push(value)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(self.finish())
    }
}

impl SerializeTuple for ArraySerializer {
    type Ok = ValueType;
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Self::Error> {
        self.push(value)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(self.finish())
    }
}

impl SerializeTupleStruct for ArraySerializer {
    type Ok = ValueType;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Self::Error> {
        self.push(value)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(self.finish())
    }
}

struct MapSerializer {
    fields: HashMap<String, Value>,
    next_key: Option<String>,
}

impl MapSerializer {
    fn new(size: usize) -> Self {
        Self {
            fields: HashMap::with_capacity(size),
            next_key: None,
        }
    }

    fn insert<T: ?Sized + Serialize>(&mut self, key: String, value: &T) -> Result<(), Error> {
        self.fields.insert(key, wrap(serialize(value)?));
        Ok(())
    }

    fn finish(self) -> ValueType {
        ValueType::MapValue(MapValue {
            fields: self.fields,
        })
    }
}

impl SerializeMap for MapSerializer {
    type Ok = ValueType;
    type Error = Error;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), Self::Error> {
        match serialize(key)? {
            ValueType::StringValue(key) => {
                self.next_key = Some(key);
                Ok(())
            }
            _ => Err(Error::NonStringKey),
        }
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Self::Error> {
        let key = self
            .next_key
            .take()
            .ok_or_else(|| Error::Message("map value serialized before its key".to_string()))?;
        self.insert(key, value)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(self.finish())
    }
}

impl SerializeStruct for MapSerializer {
    type Ok = ValueType;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), Self::Error> {
        self.insert(key.to_string(), value)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(self.finish())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde::Serialize;

    use super::*;

    fn field<'a>(doc: &'a Document, key: &str) -> &'a ValueType {
        doc.fields[key].value_type.as_ref().unwrap()
    }

    #[test]
    fn serialize_struct_with_renamed_fields() {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Rental {
            model: &'static str,
            price_per_hour: f64,
            seats: u8,
            electric: bool,
            plate: Option<String>,
        }

        let doc = serialize_to_document(
            &Rental {
                model: "Honda Civic",
                price_per_hour: 12.0,
                seats: 5,
                electric: false,
                plate: None,
            },
            "projects/p/databases/(default)/documents/cars/civic".to_string(),
        )
        .unwrap();

        assert_eq!(doc.name, "projects/p/databases/(default)/documents/cars/civic");
        assert_eq!(doc.fields.len(), 5);
        assert_eq!(
            field(&doc, "model"),
            &ValueType::StringValue("Honda Civic".to_string())
        );
        assert_eq!(field(&doc, "pricePerHour"), &ValueType::DoubleValue(12.0));
        assert_eq!(field(&doc, "seats"), &ValueType::IntegerValue(5));
        assert_eq!(field(&doc, "electric"), &ValueType::BooleanValue(false));
        assert_eq!(field(&doc, "plate"), &ValueType::NullValue(0));
        assert!(doc.create_time.is_none());
    }

    #[test]
    fn serialize_nested_map_and_seq() {
        let doc = serialize_to_document(
            &serde_json::json!({
                "features": ["gps", "heated seats"],
                "dimensions": { "doors": 4 },
            }),
            String::new(),
        )
        .unwrap();

        let features = match field(&doc, "features") {
            ValueType::ArrayValue(array) => &array.values,
            other => panic!("expected array, got {other:?}"),
        };
        assert_eq!(
            features[1].value_type,
            Some(ValueType::StringValue("heated seats".to_string()))
        );

        match field(&doc, "dimensions") {
            ValueType::MapValue(map) => assert_eq!(
                map.fields["doors"].value_type,
                Some(ValueType::IntegerValue(4))
            ),
            other => panic!("expected map, got {other:?}"),
        }
    }

    #[test]
    fn serialize_newtype_variant_as_single_entry_map() {
        #[derive(Serialize)]
        enum Fuel {
            Electric(u32),
        }

        let mut fields = BTreeMap::new();
        fields.insert("fuel", Fuel::Electric(100));

        let doc = serialize_to_document(&fields, String::new()).unwrap();
        match field(&doc, "fuel") {
            ValueType::MapValue(map) => assert_eq!(
                map.fields["Electric"].value_type,
                Some(ValueType::IntegerValue(100))
            ),
            other => panic!("expected map, got {other:?}"),
        }
    }

    #[test]
    fn top_level_value_must_be_a_map() {
        let err = serialize_to_document(&vec![1, 2, 3], String::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidDocument));
    }

    #[test]
    fn non_string_keys_are_rejected() {
        let mut fields = BTreeMap::new();
        fields.insert(1, "one");

        let err = serialize_to_document(&fields, String::new()).unwrap_err();
        assert!(matches!(err, Error::NonStringKey));
    }

    #[test]
    fn u64_overflow_is_rejected() {
        let err = serialize_to_document(&serde_json::json!({ "odometer": u64::MAX }), String::new())
            .unwrap_err();
        assert!(matches!(err, Error::Message(_)));
    }

    #[test]
    fn struct_variants_are_unsupported() {
        #[derive(Serialize)]
        enum Engine {
            Combustion { litres: f64 },
        }

        let mut fields = BTreeMap::new();
        fields.insert("engine", Engine::Combustion { litres: 2.0 });

        let err = serialize_to_document(&fields, String::new()).unwrap_err();
        assert!(matches!(err, Error::Unsupported("struct enum variant")));
    }
}
