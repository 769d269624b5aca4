mod common;

use common::{blocking, client_for, mount_token, ok, service_error, TOKEN};
use feishu_export::{
    DocumentType, Error, ExportJobStatus, UNAUTHORIZED_MESSAGE, UNSUPPORTED_TYPE_MESSAGE,
};
use serde_json::json;
use std::collections::HashSet;
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test(flavor = "multi_thread")]
async fn docx_export_is_a_single_docx_task() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/drive/v1/export_tasks"))
        .and(body_json(json!({ "file_extension": "docx", "token": "doxcn1", "type": "docx" })))
        .respond_with(ok(json!({ "ticket": "6933093124755423251" })))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let tasks = blocking(move || {
        client_for(&uri).create_export_task("doxcn1", &DocumentType::Docx, Some(TOKEN))
    })
    .await
    .unwrap();

    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].ticket, "6933093124755423251");
    assert_eq!(tasks[0].sub_id, None);
}

#[tokio::test(flavor = "multi_thread")]
async fn legacy_doc_keeps_its_type_but_exports_docx() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/drive/v1/export_tasks"))
        .and(body_partial_json(json!({ "file_extension": "docx", "type": "doc" })))
        .respond_with(ok(json!({ "ticket": "t-doc" })))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let tasks = blocking(move || {
        client_for(&uri).create_export_task("doccn1", &DocumentType::Doc, Some(TOKEN))
    })
    .await
    .unwrap();
    assert_eq!(tasks[0].ticket, "t-doc");
}

#[tokio::test(flavor = "multi_thread")]
async fn bitable_export_creates_one_csv_task_per_table() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bitable/v1/apps/bascn1/tables"))
        .respond_with(ok(json!({
            "has_more": false,
            "items": [{ "table_id": "tblA" }, { "table_id": "tblB" }, { "table_id": "tblC" }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    for table in ["tblA", "tblB", "tblC"] {
        Mock::given(method("POST"))
            .and(path("/drive/v1/export_tasks"))
            .and(body_json(json!({
                "file_extension": "csv",
                "token": "bascn1",
                "type": "bitable",
                "sub_id": table
            })))
            .respond_with(ok(json!({ "ticket": format!("ticket-{table}") })))
            .expect(1)
            .mount(&server)
            .await;
    }

    let uri = server.uri();
    let tasks = blocking(move || {
        client_for(&uri).create_export_task("bascn1", &DocumentType::Bitable, Some(TOKEN))
    })
    .await
    .unwrap();

    assert_eq!(tasks.len(), 3);
    let tickets: Vec<&str> = tasks.iter().map(|t| t.ticket.as_str()).collect();
    assert_eq!(tickets, vec!["ticket-tblA", "ticket-tblB", "ticket-tblC"]);
    let sub_ids: HashSet<_> = tasks.iter().filter_map(|t| t.sub_id.clone()).collect();
    assert_eq!(sub_ids.len(), 3);
}

#[tokio::test(flavor = "multi_thread")]
async fn sheets_export_forces_sheet_type_per_sheet() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sheets/v3/spreadsheets/shtcn1/sheets/query"))
        .respond_with(ok(json!({ "sheets": [{ "sheet_id": "s1" }, { "sheet_id": "s2" }] })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/drive/v1/export_tasks"))
        .and(body_partial_json(json!({ "file_extension": "csv", "type": "sheet" })))
        .respond_with(ok(json!({ "ticket": "t-sheet" })))
        .expect(2)
        .mount(&server)
        .await;

    let uri = server.uri();
    let tasks = blocking(move || {
        client_for(&uri).create_export_task("shtcn1", &DocumentType::Sheets, Some(TOKEN))
    })
    .await
    .unwrap();

    let sub_ids: Vec<_> = tasks.iter().map(|t| t.sub_id.as_deref()).collect();
    assert_eq!(sub_ids, vec![Some("s1"), Some("s2")]);
}

#[tokio::test(flavor = "multi_thread")]
async fn unsupported_type_fails_without_any_request() {
    let server = MockServer::start().await;

    let uri = server.uri();
    let err = blocking(move || {
        client_for(&uri).create_export_task("x", &DocumentType::from("unsupported"), None)
    })
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        Error::Internal { status: 500, ref message } if message == UNSUPPORTED_TYPE_MESSAGE
    ));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn export_forbidden_code_is_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/drive/v1/export_tasks"))
        .respond_with(service_error(1069902, "no permission"))
        .mount(&server)
        .await;

    let uri = server.uri();
    let err = blocking(move || {
        client_for(&uri).create_export_task("doxcn1", &DocumentType::Docx, Some(TOKEN))
    })
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        Error::Unauthorized { status: 401, ref message } if message == UNAUTHORIZED_MESSAGE
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn export_creation_does_not_treat_wiki_code_as_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/drive/v1/export_tasks"))
        .respond_with(service_error(131006, "other failure"))
        .mount(&server)
        .await;

    let uri = server.uri();
    let err = blocking(move || {
        client_for(&uri).create_export_task("doxcn1", &DocumentType::Docx, Some(TOKEN))
    })
    .await
    .unwrap_err();
    assert!(matches!(err, Error::Internal { ref message, .. } if message == "other failure"));
}

#[tokio::test(flavor = "multi_thread")]
async fn export_creation_non_ok_status_carries_raw_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/drive/v1/export_tasks"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let err = blocking(move || {
        client_for(&uri).create_export_task("doxcn1", &DocumentType::Docx, Some(TOKEN))
    })
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        Error::Internal { status: 500, ref message } if message == "bad gateway"
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn one_failed_sub_task_aborts_the_batch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sheets/v3/spreadsheets/shtcn1/sheets/query"))
        .respond_with(ok(json!({
            "sheets": [{ "sheet_id": "s1" }, { "sheet_id": "s2" }, { "sheet_id": "s3" }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/drive/v1/export_tasks"))
        .and(body_partial_json(json!({ "sub_id": "s1" })))
        .respond_with(ok(json!({ "ticket": "t1" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/drive/v1/export_tasks"))
        .and(body_partial_json(json!({ "sub_id": "s2" })))
        .respond_with(service_error(1069914, "export busy"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/drive/v1/export_tasks"))
        .and(body_partial_json(json!({ "sub_id": "s3" })))
        .respond_with(ok(json!({ "ticket": "t3" })))
        .expect(0)
        .mount(&server)
        .await;

    let uri = server.uri();
    let err = blocking(move || {
        client_for(&uri).create_export_task("shtcn1", &DocumentType::Sheet, Some(TOKEN))
    })
    .await
    .unwrap_err();
    assert!(matches!(err, Error::Internal { ref message, .. } if message == "export busy"));
}

#[tokio::test(flavor = "multi_thread")]
async fn token_is_fetched_once_for_a_multi_table_export() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v3/tenant_access_token/internal"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "tenant_access_token": "t-once" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/bitable/v1/apps/bascn1/tables"))
        .and(header("Authorization", "Bearer t-once"))
        .respond_with(ok(json!({ "items": [{ "table_id": "tbl1" }, { "table_id": "tbl2" }] })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/drive/v1/export_tasks"))
        .and(header("Authorization", "Bearer t-once"))
        .respond_with(ok(json!({ "ticket": "t" })))
        .expect(2)
        .mount(&server)
        .await;

    let uri = server.uri();
    let tasks = blocking(move || {
        client_for(&uri).create_export_task("bascn1", &DocumentType::Bitable, None)
    })
    .await
    .unwrap();
    assert_eq!(tasks.len(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn export_status_returns_result_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/drive/v1/export_tasks/6933093124755423251"))
        .and(query_param("token", "doxcn1"))
        .respond_with(ok(json!({
            "result": {
                "file_extension": "docx",
                "type": "docx",
                "file_name": "Weekly notes",
                "file_token": "boxcnxe5OdjlAkNgSNdsJvabcef",
                "file_size": 34356,
                "job_error_msg": "success",
                "job_status": 0
            }
        })))
        .mount(&server)
        .await;

    let uri = server.uri();
    let result = blocking(move || {
        client_for(&uri).get_export_status("6933093124755423251", "doxcn1", Some(TOKEN))
    })
    .await
    .unwrap();

    assert_eq!(result.status(), ExportJobStatus::Success);
    assert_eq!(result.file_token.as_deref(), Some("boxcnxe5OdjlAkNgSNdsJvabcef"));
    assert_eq!(result.file_size, Some(34356));
}

#[tokio::test(flavor = "multi_thread")]
async fn export_status_non_ok_status_carries_raw_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/drive/v1/export_tasks/t1"))
        .respond_with(
            ResponseTemplate::new(500).set_body_string(r#"{"code":99991400,"msg":"rate limited"}"#),
        )
        .mount(&server)
        .await;

    let uri = server.uri();
    let err = blocking(move || client_for(&uri).get_export_status("t1", "doxcn1", Some(TOKEN)))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Internal { ref message, .. } if message.contains("rate limited")));
}

#[tokio::test(flavor = "multi_thread")]
async fn download_returns_exact_bytes() {
    let server = MockServer::start().await;
    mount_token(&server, "t-dl").await;
    let payload: Vec<u8> = vec![0x50, 0x4b, 0x03, 0x04, 0x00, 0xff, 0x10];
    Mock::given(method("GET"))
        .and(path("/drive/v1/export_tasks/file/boxcn1/download"))
        .and(header("Authorization", "Bearer t-dl"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "application/octet-stream")
                .set_body_bytes(payload.clone()),
        )
        .mount(&server)
        .await;

    let uri = server.uri();
    let file = blocking(move || client_for(&uri).download_exported_file("boxcn1", None))
        .await
        .unwrap();

    assert_eq!(file.content, payload);
    assert_eq!(file.file_token, "boxcn1");
    assert_eq!(file.content_type.as_deref(), Some("application/octet-stream"));
}

#[tokio::test(flavor = "multi_thread")]
async fn download_failure_carries_raw_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/drive/v1/export_tasks/file/boxcn1/download"))
        .respond_with(ResponseTemplate::new(404).set_body_string("file expired"))
        .mount(&server)
        .await;

    let uri = server.uri();
    let err = blocking(move || client_for(&uri).download_exported_file("boxcn1", Some(TOKEN)))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Internal { status: 500, ref message } if message == "file expired"
    ));
}
