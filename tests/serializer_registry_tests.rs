use rpcwire::codec::{ClientCodec, ServerCodec};
use rpcwire::compressor::CompressType;
use rpcwire::serializer::{
    AnySerializer, SerializeType, Serializer, SerializerError, ValueSerializer, get_serializer,
    is_serializer_registered, register_serializer,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::io::duplex;

const TAG: &[u8] = b"RPCJ";

/// JSON behind a fixed four-byte tag; rejects untagged input.
struct TaggedJson;

impl ValueSerializer for TaggedJson {
    fn marshal_value(&self, value: &Value) -> Result<Vec<u8>, SerializerError> {
        let mut bytes = TAG.to_vec();
        serde_json::to_writer(&mut bytes, value)?;
        Ok(bytes)
    }

    fn unmarshal_value(&self, bytes: &[u8]) -> Result<Value, SerializerError> {
        let body = bytes
            .strip_prefix(TAG)
            .ok_or_else(|| SerializerError::custom("missing RPCJ tag"))?;
        Ok(serde_json::from_slice(body)?)
    }
}

#[test]
fn builtins_are_registered_at_startup() {
    for serialize_type in [SerializeType::Json, SerializeType::Bitcode] {
        let code = u8::from(serialize_type);
        assert!(is_serializer_registered(code));
        assert_eq!(get_serializer(code).unwrap().code(), code);
    }
}

#[test]
fn unknown_code_resolves_to_nothing() {
    assert!(!is_serializer_registered(0xEE));
    assert!(get_serializer(0xEE).is_none());
}

#[test]
fn custom_serializer_can_be_registered_and_replaced() {
    let code = 0x71;

    assert!(register_serializer(code, Arc::new(TaggedJson)).is_none());
    assert!(is_serializer_registered(code));

    let serializer = get_serializer(code).unwrap();
    assert_eq!(serializer.code(), code);
    assert!(matches!(serializer, AnySerializer::Custom { .. }));

    let bytes = serializer.marshal(&json!([1, 2])).unwrap();
    assert_eq!(bytes, b"RPCJ[1,2]");

    let err = serializer.unmarshal::<Value>(b"[1,2]").unwrap_err();
    assert!(matches!(err, SerializerError::Custom(_)));
    assert_eq!(err.to_string(), "serializer error: missing RPCJ tag");

    let previous = register_serializer(code, Arc::new(TaggedJson));
    assert_eq!(previous.map(|s| s.code()), Some(code));
}

#[tokio::test]
async fn codecs_round_trip_through_a_registered_serializer() {
    let code = 0x72;
    register_serializer(code, Arc::new(TaggedJson));

    let (client_io, server_io) = duplex(64 * 1024);
    let client = ClientCodec::new(client_io, CompressType::GZIP, get_serializer(code).unwrap());
    let server = ServerCodec::new(server_io, get_serializer(code).unwrap());

    client
        .write_request(4, "Svc.Echo", &json!({ "x": 5 }))
        .await
        .unwrap();

    let request = server.read_request_header().await.unwrap();
    let raw = server.read_request_payload().await.unwrap();
    assert!(raw.starts_with(TAG));

    let args: Value = server.serializer().unmarshal(&raw).unwrap();
    server.write_response(&request, Ok(&args)).await.unwrap();

    let response = client.read_response_header().await.unwrap();
    assert_eq!(response.seq, 4);
    let reply: Value = client.read_response_body().await.unwrap();
    assert_eq!(reply, json!({ "x": 5 }));
}
