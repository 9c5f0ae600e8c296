//! Conversions between the model types and the AWS SDK types.

use std::collections::HashMap;

use aws_sdk_dynamodb::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_dynamodb::primitives::Blob;
use aws_sdk_dynamodb::types as sdk;
use bytes::Bytes;
use tracing::warn;

use dynoql_model::types::{
    KeySchemaElement, KeyType, ReturnValue, SecondaryIndexDescription, TableDescription,
    TableStatus,
};
use dynoql_model::{AttributeValue, DynamoDBError, DynamoDBErrorCode};

/// Model value to SDK value.
#[must_use]
pub fn to_sdk_value(value: AttributeValue) -> sdk::AttributeValue {
    match value {
        AttributeValue::S(s) => sdk::AttributeValue::S(s),
        AttributeValue::N(n) => sdk::AttributeValue::N(n),
        AttributeValue::B(b) => sdk::AttributeValue::B(Blob::new(b.to_vec())),
        AttributeValue::Ss(v) => sdk::AttributeValue::Ss(v),
        AttributeValue::Ns(v) => sdk::AttributeValue::Ns(v),
        AttributeValue::Bs(v) => {
            sdk::AttributeValue::Bs(v.into_iter().map(|b| Blob::new(b.to_vec())).collect())
        }
        AttributeValue::Bool(b) => sdk::AttributeValue::Bool(b),
        AttributeValue::Null(b) => sdk::AttributeValue::Null(b),
        AttributeValue::L(list) => {
            sdk::AttributeValue::L(list.into_iter().map(to_sdk_value).collect())
        }
        AttributeValue::M(map) => sdk::AttributeValue::M(to_sdk_item(map)),
    }
}

/// SDK value to model value.
///
/// Value types this client does not know are logged and read as `NULL`.
#[must_use]
pub fn from_sdk_value(value: sdk::AttributeValue) -> AttributeValue {
    match value {
        sdk::AttributeValue::S(s) => AttributeValue::S(s),
        sdk::AttributeValue::N(n) => AttributeValue::N(n),
        sdk::AttributeValue::B(b) => AttributeValue::B(Bytes::from(b.into_inner())),
        sdk::AttributeValue::Ss(v) => AttributeValue::Ss(v),
        sdk::AttributeValue::Ns(v) => AttributeValue::Ns(v),
        sdk::AttributeValue::Bs(v) => {
            AttributeValue::Bs(v.into_iter().map(|b| Bytes::from(b.into_inner())).collect())
        }
        sdk::AttributeValue::Bool(b) => AttributeValue::Bool(b),
        sdk::AttributeValue::Null(b) => AttributeValue::Null(b),
        sdk::AttributeValue::L(list) => {
            AttributeValue::L(list.into_iter().map(from_sdk_value).collect())
        }
        sdk::AttributeValue::M(map) => AttributeValue::M(from_sdk_item(map)),
        other => {
            warn!(value = ?other, "unknown attribute value type");
            AttributeValue::Null(true)
        }
    }
}

/// Model item to SDK item.
#[must_use]
pub fn to_sdk_item(item: HashMap<String, AttributeValue>) -> HashMap<String, sdk::AttributeValue> {
    item.into_iter().map(|(k, v)| (k, to_sdk_value(v))).collect()
}

/// SDK item to model item.
#[must_use]
pub fn from_sdk_item(item: HashMap<String, sdk::AttributeValue>) -> HashMap<String, AttributeValue> {
    item.into_iter().map(|(k, v)| (k, from_sdk_value(v))).collect()
}

/// `None` for an empty map, so the SDK omits the parameter.
///
/// DynamoDB rejects empty expression attribute maps.
#[must_use]
pub fn non_empty<V>(map: HashMap<String, V>) -> Option<HashMap<String, V>> {
    (!map.is_empty()).then_some(map)
}

/// Model return value to SDK return value.
#[must_use]
pub fn to_sdk_return_value(value: ReturnValue) -> sdk::ReturnValue {
    match value {
        ReturnValue::None => sdk::ReturnValue::None,
        ReturnValue::AllOld => sdk::ReturnValue::AllOld,
        ReturnValue::UpdatedOld => sdk::ReturnValue::UpdatedOld,
        ReturnValue::AllNew => sdk::ReturnValue::AllNew,
        ReturnValue::UpdatedNew => sdk::ReturnValue::UpdatedNew,
    }
}

fn from_sdk_key_schema(elements: &[sdk::KeySchemaElement]) -> Vec<KeySchemaElement> {
    elements
        .iter()
        .filter_map(|e| {
            let key_type = match e.key_type() {
                sdk::KeyType::Hash => KeyType::Hash,
                sdk::KeyType::Range => KeyType::Range,
                other => {
                    warn!(key_type = other.as_str(), "unknown key type");
                    return None;
                }
            };
            Some(KeySchemaElement {
                attribute_name: e.attribute_name().to_owned(),
                key_type,
            })
        })
        .collect()
}

/// SDK table description to model table description.
#[must_use]
pub fn from_sdk_table(table: &sdk::TableDescription) -> TableDescription {
    TableDescription {
        table_name: table.table_name().map(str::to_owned),
        table_status: table
            .table_status()
            .and_then(|s| TableStatus::from_name(s.as_str())),
        key_schema: from_sdk_key_schema(table.key_schema()),
        creation_date_time: table.creation_date_time().map(|t| t.as_secs_f64()),
        item_count: table.item_count(),
        table_size_bytes: table.table_size_bytes(),
        table_arn: table.table_arn().map(str::to_owned),
        global_secondary_indexes: table
            .global_secondary_indexes()
            .iter()
            .map(|gsi| SecondaryIndexDescription {
                index_name: gsi.index_name().map(str::to_owned),
                key_schema: from_sdk_key_schema(gsi.key_schema()),
                index_status: gsi.index_status().map(|s| s.as_str().to_owned()),
                item_count: gsi.item_count(),
            })
            .collect(),
        local_secondary_indexes: table
            .local_secondary_indexes()
            .iter()
            .map(|lsi| SecondaryIndexDescription {
                index_name: lsi.index_name().map(str::to_owned),
                key_schema: from_sdk_key_schema(lsi.key_schema()),
                index_status: None,
                item_count: lsi.item_count(),
            })
            .collect(),
    }
}

/// Normalize an SDK failure into a [`DynamoDBError`].
///
/// Service errors keep their code and message; a code this client does not
/// know is kept at the front of the message. Anything that never produced a
/// service response (dispatch, timeout, unreadable response) becomes
/// [`DynamoDBErrorCode::Transport`]. The SDK error is kept as the source.
#[must_use]
pub fn from_sdk_error<E, R>(err: SdkError<E, R>) -> DynamoDBError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug + Send + Sync + 'static,
{
    let normalized = match (err.as_service_error(), err.code()) {
        (Some(_), Some(code)) => {
            let message = err.message().unwrap_or(code);
            match DynamoDBErrorCode::from_code(code) {
                DynamoDBErrorCode::Unknown => DynamoDBError::with_message(
                    DynamoDBErrorCode::Unknown,
                    format!("{code}: {message}"),
                ),
                known => DynamoDBError::with_message(known, message),
            }
        }
        _ => DynamoDBError::transport(DisplayErrorContext(&err).to_string()),
    };
    normalized.with_source(err)
}

#[cfg(test)]
mod tests {
    use aws_sdk_dynamodb::error::ErrorMetadata;
    use aws_sdk_dynamodb::operation::get_item::GetItemError;

    use super::*;

    #[test]
    fn test_should_convert_nested_values_both_ways() {
        let value = AttributeValue::M(HashMap::from([
            ("n".to_owned(), AttributeValue::number(1)),
            (
                "l".to_owned(),
                AttributeValue::L(vec![
                    AttributeValue::Bool(true),
                    AttributeValue::B(Bytes::from_static(b"hi")),
                ]),
            ),
        ]));
        assert_eq!(from_sdk_value(to_sdk_value(value.clone())), value);
    }

    #[test]
    fn test_should_drop_empty_maps() {
        assert!(non_empty::<String>(HashMap::new()).is_none());
        let names = HashMap::from([("#n0".to_owned(), "age".to_owned())]);
        assert_eq!(non_empty(names.clone()), Some(names));
    }

    #[test]
    fn test_should_convert_table_description() {
        let table = sdk::TableDescription::builder()
            .table_name("user")
            .item_count(3)
            .table_status(sdk::TableStatus::Active)
            .key_schema(
                sdk::KeySchemaElement::builder()
                    .attribute_name("id")
                    .key_type(sdk::KeyType::Hash)
                    .build()
                    .unwrap(),
            )
            .global_secondary_indexes(
                sdk::GlobalSecondaryIndexDescription::builder()
                    .index_name("category-index")
                    .key_schema(
                        sdk::KeySchemaElement::builder()
                            .attribute_name("category")
                            .key_type(sdk::KeyType::Hash)
                            .build()
                            .unwrap(),
                    )
                    .build(),
            )
            .build();

        let desc = from_sdk_table(&table);
        assert_eq!(desc.table_name.as_deref(), Some("user"));
        assert_eq!(desc.table_status, Some(TableStatus::Active));
        assert_eq!(desc.item_count, Some(3));
        assert_eq!(desc.key_schema, vec![KeySchemaElement::hash("id")]);
        assert_eq!(
            desc.global_secondary_indexes[0].key_schema,
            vec![KeySchemaElement::hash("category")]
        );
    }

    fn service_error(code: &str, message: &str) -> SdkError<GetItemError, ()> {
        let meta = ErrorMetadata::builder().code(code).message(message).build();
        SdkError::service_error(GetItemError::generic(meta), ())
    }

    #[test]
    fn test_should_keep_known_service_error_code() {
        let err = from_sdk_error(service_error("ResourceNotFoundException", "no table"));
        assert_eq!(err.code, DynamoDBErrorCode::ResourceNotFoundException);
        assert_eq!(err.message, "no table");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_should_keep_unknown_code_in_message() {
        let err = from_sdk_error(service_error("BrandNewException", "boom"));
        assert_eq!(err.code, DynamoDBErrorCode::Unknown);
        assert_eq!(err.message, "BrandNewException: boom");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_should_report_transport_failure_with_source() {
        let sdk: SdkError<GetItemError, ()> = SdkError::construction_failure("bad endpoint");
        let err = from_sdk_error(sdk);
        assert_eq!(err.code, DynamoDBErrorCode::Transport);
        assert!(err.message.contains("bad endpoint"), "{}", err.message);
        assert!(std::error::Error::source(&err).is_some());
    }
}
