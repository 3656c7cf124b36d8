//! Port-level contracts: the mocks stand in for real adapters behind
//! `Arc<dyn ...>`, and both document-store adapters agree on the merge
//! semantics of `update`.

use std::sync::Arc;

use domains::ports::MockDocumentGateway;
use domains::{AppError, DocumentGateway};
use serde_json::json;
use storage_adapters::{JsonDocStore, MemoryStore};
use uuid::Uuid;

#[tokio::test]
async fn mocked_gateway_satisfies_the_port() {
    let mut mock = MockDocumentGateway::new();
    mock.expect_get()
        .withf(|collection, id| collection == "threads" && id == "absent")
        .returning(|_, _| Ok(None));

    // Consumers only ever see the object-safe trait.
    let gateway: Arc<dyn DocumentGateway> = Arc::new(mock);
    assert!(gateway.get("threads", "absent").await.unwrap().is_none());
}

#[test]
fn adapters_share_update_merge_semantics() {
    tokio_test::block_on(async {
        let root = std::env::temp_dir().join(format!("forum-contract-{}", Uuid::now_v7()));
        let adapters: Vec<(&str, Arc<dyn DocumentGateway>)> = vec![
            ("memory", Arc::new(MemoryStore::new())),
            ("json", Arc::new(JsonDocStore::new(root.clone()))),
        ];

        for (name, store) in adapters {
            store
                .set("threads", "doc1", json!({ "title": "a", "isLocked": false }))
                .await
                .unwrap();
            store
                .update(
                    "threads",
                    "doc1",
                    json!({ "isLocked": true, "answeredCommentId": null }),
                )
                .await
                .unwrap();

            let doc = store.get("threads", "doc1").await.unwrap().unwrap();
            assert_eq!(doc["title"], "a", "untouched field lost on {name}");
            assert_eq!(doc["isLocked"], json!(true), "merge failed on {name}");
            assert!(
                doc["answeredCommentId"].is_null(),
                "explicit null dropped on {name}"
            );

            let err = store
                .update("threads", "missing", json!({ "isLocked": true }))
                .await
                .unwrap_err();
            assert!(
                matches!(err, AppError::NotFound(..)),
                "update invented a document on {name}"
            );

            // Delete is idempotent on both.
            store.delete("threads", "doc1").await.unwrap();
            store.delete("threads", "doc1").await.unwrap();
            assert!(store.get("threads", "doc1").await.unwrap().is_none());
        }

        tokio::fs::remove_dir_all(root).await.ok();
    });
}
