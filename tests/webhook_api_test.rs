mod common;

#[cfg(test)]
mod webhook_api_tests {
    use super::common::*;
    use axum::{body::Body, http::{Request, StatusCode}};
    use serde_json::json;
    use sms_inbox_ws::webhook::sign;

    const HELLO: &str = r#"{"message_id":"m1","from":"+123","to":"+456","ts":"2025-01-15T10:00:00Z","text":"Hello"}"#;

    #[tokio::test]
    async fn valid_signed_message_is_stored() {
        let app = spawn_app(Some(SECRET)).await;

        let (status, body) = app.post_signed(HELLO).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok"}));

        let (status, page) = app.get("/messages").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["total"], 1);
        let item = &page["data"][0];
        assert_eq!(item["message_id"], "m1");
        assert_eq!(item["from_msisdn"], "+123");
        assert_eq!(item["to_msisdn"], "+456");
        assert_eq!(item["ts"], "2025-01-15T10:00:00Z");
        assert_eq!(item["text"], "Hello");
        assert!(item["created_at"].as_str().unwrap().ends_with('Z'));
    }

    #[tokio::test]
    async fn duplicate_delivery_is_acknowledged_once_stored() {
        let app = spawn_app(Some(SECRET)).await;

        for _ in 0..3 {
            let (status, body) = app.post_signed(HELLO).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, json!({"status": "ok"}));
        }

        // Same id with different content must not replace the first write
        let changed = message_json("m1", "+999", "2026-01-01T00:00:00Z", Some("other"));
        let (status, _) = app.post_signed(&changed).await;
        assert_eq!(status, StatusCode::OK);

        let (_, page) = app.get("/messages").await;
        assert_eq!(page["total"], 1);
        assert_eq!(page["data"][0]["from_msisdn"], "+123");
        assert_eq!(page["data"][0]["text"], "Hello");
    }

    #[tokio::test]
    async fn bad_or_missing_signature_is_rejected() {
        let app = spawn_app(Some(SECRET)).await;

        let (status, body) = app.send(webhook_request(HELLO, Some("bad"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({"detail": "invalid signature"}));

        let (status, body) = app.send(webhook_request(HELLO, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({"detail": "invalid signature"}));

        let wrong_key = sign(b"not-the-secret", HELLO.as_bytes()).unwrap();
        let (status, _) = app.send(webhook_request(HELLO, Some(&wrong_key))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (_, page) = app.get("/messages").await;
        assert_eq!(page["total"], 0);
    }

    #[tokio::test]
    async fn signature_covers_exact_body_bytes() {
        let app = spawn_app(Some(SECRET)).await;
        let signature = sign(SECRET.as_bytes(), HELLO.as_bytes()).unwrap();

        // Semantically identical JSON with different whitespace
        let reformatted = HELLO.replace(",", ", ");
        let (status, _) = app.send(webhook_request(&reformatted, Some(&signature))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn invalid_payload_with_valid_signature_is_422() {
        let app = spawn_app(Some(SECRET)).await;

        let bad_bodies = [
            message_json("m2", "123", "2025-01-15T10:00:00Z", None),
            message_json("m2", "+123", "2025-01-15 10:00:00", None),
            message_json("", "+123", "2025-01-15T10:00:00Z", None),
            message_json("m2", "+123", "2025-01-15T10:00:00Z", Some("x".repeat(4097).as_str())),
            r#"{"message_id":"m2","from":"+1","to":"+2"}"#.to_string(),
            "[]".to_string(),
            "not json".to_string(),
        ];

        for body in bad_bodies.iter() {
            let (status, json_body) = app.post_signed(body).await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{body}");
            assert_eq!(json_body, json!({"detail": "validation error"}));
        }

        let (_, page) = app.get("/messages").await;
        assert_eq!(page["total"], 0);
    }

    #[tokio::test]
    async fn every_field_wrong_at_once_is_422() {
        let app = spawn_app(Some(SECRET)).await;
        let body = r#"{"message_id":"","from":"nope","to":"+456","ts":"not-a-ts"}"#;

        let (status, json_body) = app.post_signed(body).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json_body, json!({"detail": "validation error"}));
    }

    #[tokio::test]
    async fn signature_is_checked_before_payload() {
        let app = spawn_app(Some(SECRET)).await;
        let (status, body) = app.send(webhook_request("not json", Some("bad"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({"detail": "invalid signature"}));
    }

    #[tokio::test]
    async fn missing_secret_rejects_every_webhook() {
        let app = spawn_app(None).await;
        let empty_key_sig = sign(b"", HELLO.as_bytes()).unwrap();

        let (status, body) = app.send(webhook_request(HELLO, Some(&empty_key_sig))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({"detail": "invalid signature"}));
    }

    #[tokio::test]
    async fn oversized_body_is_refused() {
        let app = spawn_app(Some(SECRET)).await;
        let huge = "x".repeat(app.state.config.app.max_body_bytes + 1);
        let signature = sign(SECRET.as_bytes(), huge.as_bytes()).unwrap();

        let (status, _) = app.send(webhook_request(&huge, Some(&signature))).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn concurrent_deliveries_store_one_row() {
        let app = spawn_app(Some(SECRET)).await;

        let requests = (0..10).map(|_| app.post_signed(HELLO));
        let results = futures::future::join_all(requests).await;
        assert!(results.iter().all(|(status, _)| *status == StatusCode::OK));

        let (_, stats) = app.get("/stats").await;
        assert_eq!(stats["total_messages"], 1);
    }

    #[tokio::test]
    async fn request_id_is_echoed() {
        let app = spawn_app(Some(SECRET)).await;
        let request = Request::get("/health/live")
            .header("x-request-id", "req-42")
            .body(Body::empty())
            .unwrap();

        let (status, headers, _) = app.send_raw(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers.get("x-request-id").unwrap(), "req-42");
    }
}
