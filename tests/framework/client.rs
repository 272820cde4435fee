//! Client operations over a recording transport

use scrive::{Client, ClientConfig, DocumentStatus, Error};
use serde_json::{json, Value as JsonValue};

use crate::common::{document_json, RecordingTransport};

fn client() -> (Client, RecordingTransport) {
    let transport = RecordingTransport::new();
    let config = ClientConfig::for_host("api-testbed.scrive.com");
    (Client::new(config, transport.clone()), transport)
}

#[test]
fn create_from_file_uploads_pdf() {
    let (client, transport) = client();
    transport.respond(document_json("9", "preparation"));

    let doc = client
        .create_document_from_file("lease.pdf", b"%PDF-1.4".to_vec())
        .unwrap();

    let requests = transport.requests();
    assert_eq!(
        requests[0].endpoint,
        "https://api-testbed.scrive.com/api/v1/documents/new"
    );
    assert_eq!(requests[0].attachments[0].file_name, "lease.pdf");
    assert_eq!(requests[0].attachments[0].content_type, "application/pdf");
    assert_eq!(doc.id(), Ok(Some("9".into())));
    assert!(doc.api().is_some());
}

#[test]
fn update_sends_wire_form_and_supersedes() {
    let (client, transport) = client();
    transport
        .respond(document_json("9", "preparation"))
        .respond(document_json("9", "preparation"));

    let doc = client.get_document("9").unwrap();
    doc.set_title("Renamed").unwrap();
    let saved = client.update_document(&doc).unwrap();

    let request = &transport.requests()[1];
    assert!(request.endpoint.ends_with("documents/9/update"));
    let sent: JsonValue = match &request.payload["document"] {
        JsonValue::String(text) => serde_json::from_str(text).unwrap(),
        other => panic!("document payload should be text, not {other}"),
    };
    assert_eq!(sent["title"], json!("Renamed"));
    assert!(sent.get("status").is_none());

    assert!(doc.is_invalid());
    assert!(matches!(doc.set_title("again"), Err(Error::ObjectInvalid(_))));
    assert!(!saved.is_invalid());
}

#[test]
fn signing_flow() {
    let (client, transport) = client();
    transport
        .respond(document_json("9", "preparation"))
        .respond(document_json("9", "pending"))
        .respond(document_json("9", "canceled"))
        .respond(document_json("9", "canceled"));

    let draft = client.create_document_from_template("3").unwrap();
    let pending = client.ready(&draft).unwrap();
    assert_eq!(pending.status(), Ok(Some(DocumentStatus::Pending)));
    assert!(pending.is_read_only());

    let canceled = client.cancel_document(&pending).unwrap();
    assert!(pending.is_invalid());
    let trashed = client.trash_document(&canceled).unwrap();
    assert!(canceled.is_invalid());
    assert!(trashed.is_read_only());

    assert_eq!(
        transport.endpoints(),
        vec![
            "https://api-testbed.scrive.com/api/v1/documents/newfromtemplate/3",
            "https://api-testbed.scrive.com/api/v1/documents/9/start",
            "https://api-testbed.scrive.com/api/v1/documents/9/cancel",
            "https://api-testbed.scrive.com/api/v1/documents/9/trash",
        ]
    );
}

#[test]
fn transport_failure_propagates_unchanged() {
    let (client, transport) = client();
    transport.fail("connection reset");
    assert_eq!(
        client.get_document("1"),
        Err(Error::Transport("connection reset".into()))
    );
}

#[test]
fn malformed_response_leaves_document_valid() {
    let (client, transport) = client();
    transport
        .respond(document_json("9", "preparation"))
        .respond(json!({"id": "9"}));
    let doc = client.get_document("9").unwrap();
    assert!(matches!(
        client.ready(&doc),
        Err(Error::MalformedResponse { .. })
    ));
    assert!(!doc.is_invalid());
}

#[test]
fn list_and_delete() {
    let (client, transport) = client();
    transport
        .respond(json!({"list": [document_json("1", "closed"), document_json("2", "preparation")]}))
        .respond(json!({}));

    let docs = client.list_documents().unwrap();
    assert_eq!(docs.len(), 2);
    assert!(docs.iter().all(|d| d.api().is_some()));

    client.delete_document(&docs[1]).unwrap();
    assert!(docs[1].is_invalid());
    assert!(!docs[0].is_invalid());
    assert!(transport.endpoints()[1].ends_with("documents/2/delete"));
}
