use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::common::{TestApp, t0};

mod upload {
    use super::*;

    #[tokio::test]
    async fn returns_link_and_expiry() {
        let app = TestApp::spawn().await;

        let res = app.upload("a.txt", b"0123456789".to_vec()).await;

        assert_eq!(res.status, 201);
        assert_eq!(res.body["filename"].as_str().unwrap(), "a.txt");

        let file_id = res.body["file_id"].as_str().unwrap();
        assert!(Uuid::parse_str(file_id).is_ok());

        assert_eq!(
            res.body["shareable_link"].as_str().unwrap(),
            format!("{}/api/v1/download/{file_id}", app.address)
        );

        let expiry: DateTime<Utc> = res.body["expiry_date"]
            .as_str()
            .unwrap()
            .parse()
            .expect("expiry_date is ISO-8601");
        assert_eq!(expiry, t0() + Duration::days(7));
    }

    #[tokio::test]
    async fn missing_file_field_is_rejected() {
        let app = TestApp::spawn().await;

        let form = reqwest::multipart::Form::new().text("comment", "no file here");
        let res = app.upload_form(form).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"].as_str().unwrap(), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn file_field_without_filename_is_rejected() {
        let app = TestApp::spawn().await;

        let form = reqwest::multipart::Form::new()
            .part("file", reqwest::multipart::Part::bytes(b"data".to_vec()));
        let res = app.upload_form(form).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"].as_str().unwrap(), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn same_filename_gets_distinct_links() {
        let app = TestApp::spawn().await;

        let first = app.upload("a.txt", b"first".to_vec()).await;
        let second = app.upload("a.txt", b"second".to_vec()).await;

        assert_eq!(first.status, 201);
        assert_eq!(second.status, 201);
        assert_ne!(
            first.body["file_id"].as_str().unwrap(),
            second.body["file_id"].as_str().unwrap()
        );

        // Neither upload clobbered the other.
        let id = first.body["file_id"].as_str().unwrap();
        let body = app.download(id).await.bytes().await.unwrap();
        assert_eq!(&body[..], b"first");
    }
}

mod download {
    use super::*;

    #[tokio::test]
    async fn round_trips_content_with_headers() {
        let app = TestApp::spawn().await;

        let uploaded = app.upload("notes.txt", b"hello, sharing".to_vec()).await;
        let file_id = uploaded.body["file_id"].as_str().unwrap();

        let res = app.download(file_id).await;
        assert_eq!(res.status().as_u16(), 200);

        let headers = res.headers().clone();
        assert_eq!(
            headers.get("content-type").unwrap().to_str().unwrap(),
            "text/plain"
        );
        assert_eq!(
            headers.get("content-length").unwrap().to_str().unwrap(),
            "14"
        );
        assert!(
            headers
                .get("content-disposition")
                .unwrap()
                .to_str()
                .unwrap()
                .contains("filename=\"notes.txt\"")
        );
        assert!(headers.get("etag").is_some());

        assert_eq!(&res.bytes().await.unwrap()[..], b"hello, sharing");
    }

    #[tokio::test]
    async fn unknown_identifier_is_404() {
        let app = TestApp::spawn().await;

        let res = app.download_error(&Uuid::now_v7().to_string()).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"].as_str().unwrap(), "NOT_FOUND");
    }

    #[tokio::test]
    async fn malformed_identifier_is_400() {
        let app = TestApp::spawn().await;

        let res = app.download_error("not-a-valid-id-format").await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"].as_str().unwrap(), "INVALID_IDENTIFIER");
    }

    #[tokio::test]
    async fn etag_revalidation_returns_304() {
        let app = TestApp::spawn().await;

        let uploaded = app.upload("a.bin", vec![7u8; 32]).await;
        let file_id = uploaded.body["file_id"].as_str().unwrap();

        let first = app.download(file_id).await;
        let etag = first.headers().get("etag").unwrap().to_str().unwrap().to_string();

        let revalidated = app
            .client
            .get(format!("{}/api/v1/download/{file_id}", app.address))
            .header("if-none-match", &etag)
            .send()
            .await
            .unwrap();

        assert_eq!(revalidated.status().as_u16(), 304);
    }
}

mod expiry {
    use super::*;

    #[tokio::test]
    async fn link_works_until_the_exact_expiry_instant() {
        let app = TestApp::spawn().await;

        let uploaded = app.upload("a.txt", b"0123456789".to_vec()).await;
        let file_id = uploaded.body["file_id"].as_str().unwrap().to_string();

        app.clock
            .set(t0() + Duration::days(6) + Duration::hours(23) + Duration::minutes(59));
        assert_eq!(app.download(&file_id).await.status().as_u16(), 200);

        app.clock.set(t0() + Duration::days(7));
        assert_eq!(app.download(&file_id).await.status().as_u16(), 200);
    }

    #[tokio::test]
    async fn lapsed_link_is_403_expired() {
        let app = TestApp::spawn().await;

        let uploaded = app.upload("a.txt", b"0123456789".to_vec()).await;
        let file_id = uploaded.body["file_id"].as_str().unwrap().to_string();

        app.clock.set(t0() + Duration::days(7) + Duration::seconds(1));

        let res = app.download_error(&file_id).await;
        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"].as_str().unwrap(), "EXPIRED");
    }

    #[tokio::test]
    async fn expiry_beats_etag_revalidation() {
        let app = TestApp::spawn().await;

        let uploaded = app.upload("a.txt", b"cache me".to_vec()).await;
        let file_id = uploaded.body["file_id"].as_str().unwrap().to_string();

        let first = app.download(&file_id).await;
        let etag = first.headers().get("etag").unwrap().to_str().unwrap().to_string();

        app.clock.advance(Duration::days(8));

        let revalidated = app
            .client
            .get(format!("{}/api/v1/download/{file_id}", app.address))
            .header("if-none-match", &etag)
            .send()
            .await
            .unwrap();

        assert_eq!(revalidated.status().as_u16(), 403);
    }
}
