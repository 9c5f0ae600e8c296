//! Statements run end to end through the dispatcher and the AWS store.

#[cfg(test)]
mod tests {
    use dynoql_aws::AwsDynamoStore;
    use dynoql_core::{DynoqlError, StatementResult, list_tables};
    use dynoql_model::AttributeValue;

    use crate::{
        cleanup_table, create_event_table, create_user_table, dispatcher, dynamodb_client, n,
        put, s, test_table_name,
    };

    async fn seed_users(client: &aws_sdk_dynamodb::Client, table: &str) {
        for (id, name, category, age) in [
            (1, "ada", "admin", 36),
            (2, "bob", "guest", 19),
            (3, "cy", "guest", 27),
            (4, "di", "admin", 45),
        ] {
            put(
                client,
                table,
                &[
                    ("id", n(id)),
                    ("name", s(name)),
                    ("category", s(category)),
                    ("age", n(age)),
                ],
            )
            .await
            .unwrap();
        }
    }

    fn rows(result: StatementResult) -> Vec<dynoql_model::Item> {
        match result {
            StatementResult::Items(items) => items,
            StatementResult::Item(item) => item.into_iter().collect(),
            other => panic!("expected rows, got {other:?}"),
        }
    }

    #[tokio::test]
    #[ignore = "requires running DynamoDB endpoint"]
    async fn test_should_describe_table_with_index_field() {
        let client = dynamodb_client();
        let table = test_table_name("desc");
        create_user_table(&client, &table).await.unwrap();

        let result = dispatcher(&client)
            .run(&format!("DESC TABLE {table}"))
            .await
            .unwrap();
        let StatementResult::Table(schema) = result else {
            panic!("expected table metadata");
        };
        assert_eq!(schema.hash_key, "id");
        assert_eq!(schema.range_key, None);
        assert_eq!(schema.secondary_indexes.len(), 1);
        assert_eq!(schema.secondary_indexes[0].field, "category");

        cleanup_table(&client, &table).await;
    }

    #[tokio::test]
    #[ignore = "requires running DynamoDB endpoint"]
    async fn test_should_point_get_by_hash_key() {
        let client = dynamodb_client();
        let table = test_table_name("get");
        create_user_table(&client, &table).await.unwrap();
        seed_users(&client, &table).await;

        let result = dispatcher(&client)
            .run(&format!("SELECT name FROM {table} WHERE id = 3"))
            .await
            .unwrap();
        let found = rows(result);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].get("name"), Some(&AttributeValue::string("cy")));
        assert!(!found[0].contains_key("age"));

        cleanup_table(&client, &table).await;
    }

    #[tokio::test]
    #[ignore = "requires running DynamoDB endpoint"]
    async fn test_should_query_index_with_filter() {
        let client = dynamodb_client();
        let table = test_table_name("index");
        create_user_table(&client, &table).await.unwrap();
        seed_users(&client, &table).await;

        let result = dispatcher(&client)
            .run(&format!(
                "SELECT * FROM {table} WHERE category = \"admin\" AND age > 40 LIMIT ALL"
            ))
            .await
            .unwrap();
        let found = rows(result);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].get("id"), Some(&AttributeValue::number(4)));

        cleanup_table(&client, &table).await;
    }

    #[tokio::test]
    #[ignore = "requires running DynamoDB endpoint"]
    async fn test_should_scan_until_limit() {
        let client = dynamodb_client();
        let table = test_table_name("scan");
        create_user_table(&client, &table).await.unwrap();
        seed_users(&client, &table).await;
        let dispatcher = dispatcher(&client);

        let all = dispatcher
            .run(&format!("SELECT id FROM {table} WHERE age >= 20 LIMIT ALL"))
            .await
            .unwrap();
        assert_eq!(all.row_count(), 3);

        let two = dispatcher
            .run(&format!("SELECT id FROM {table} WHERE age >= 20 LIMIT 2"))
            .await
            .unwrap();
        assert_eq!(two.row_count(), 2);

        let like = dispatcher
            .run(&format!("SELECT * FROM {table} WHERE name LIKE \"b\" LIMIT ALL"))
            .await
            .unwrap();
        assert_eq!(like.row_count(), 1);

        cleanup_table(&client, &table).await;
    }

    #[tokio::test]
    #[ignore = "requires running DynamoDB endpoint"]
    async fn test_should_query_hash_and_range_key() {
        let client = dynamodb_client();
        let table = test_table_name("event");
        create_event_table(&client, &table).await.unwrap();
        for sk in 1..=5 {
            put(&client, &table, &[("pk", s("a")), ("sk", n(sk)), ("kind", s("click"))])
                .await
                .unwrap();
        }
        put(&client, &table, &[("pk", s("b")), ("sk", n(1))])
            .await
            .unwrap();

        let result = dispatcher(&client)
            .run(&format!(
                "SELECT sk FROM {table} WHERE pk = \"a\" AND sk > 2 LIMIT ALL"
            ))
            .await
            .unwrap();
        assert_eq!(result.row_count(), 3);

        cleanup_table(&client, &table).await;
    }

    #[tokio::test]
    #[ignore = "requires running DynamoDB endpoint"]
    async fn test_should_update_and_return_projection() {
        let client = dynamodb_client();
        let table = test_table_name("update");
        create_user_table(&client, &table).await.unwrap();
        seed_users(&client, &table).await;
        let dispatcher = dispatcher(&client);

        let result = dispatcher
            .run(&format!(
                "UPDATE {table} SET age = 37, name = \"ada l\" WHERE id = 1 RETURNING age"
            ))
            .await
            .unwrap();
        let StatementResult::Item(Some(item)) = result else {
            panic!("expected updated item");
        };
        assert_eq!(item.len(), 1);
        assert_eq!(item.get("age"), Some(&AttributeValue::number(37)));

        let err = dispatcher
            .run(&format!("UPDATE {table} SET age = 1 WHERE id = 2 AND age > 90"))
            .await
            .unwrap_err();
        assert!(matches!(err, DynoqlError::StoreCall { .. }), "{err}");

        cleanup_table(&client, &table).await;
    }

    #[tokio::test]
    #[ignore = "requires running DynamoDB endpoint"]
    async fn test_should_list_tables_by_prefix() {
        let client = dynamodb_client();
        let table = test_table_name("list");
        create_user_table(&client, &table).await.unwrap();

        let store = AwsDynamoStore::from_client(client.clone());
        let names = list_tables(&store, Some("dynoql-list-")).await.unwrap();
        assert!(names.contains(&table));
        assert!(names.iter().all(|name| name.starts_with("dynoql-list-")));

        cleanup_table(&client, &table).await;
    }

    #[tokio::test]
    #[ignore = "requires running DynamoDB endpoint"]
    async fn test_should_fail_schema_fetch_for_missing_table() {
        let client = dynamodb_client();
        let table = test_table_name("missing");

        let err = dispatcher(&client)
            .run(&format!("SELECT * FROM {table} WHERE id = 1"))
            .await
            .unwrap_err();
        assert!(matches!(err, DynoqlError::SchemaFetch { .. }), "{err}");
    }
}
