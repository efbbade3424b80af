mod harness;

use reqwest::StatusCode;

use common::crypto::envelope;
use service::http_server::api::client::ApiError;
use service::http_server::api::v0::entry::create::CreateRequest;
use service::http_server::api::v0::entry::delete::{DeleteBody, DeleteRequest};
use service::http_server::api::v0::entry::get::GetRequest;
use service::http_server::api::v0::entry::get_all::ListRequest;
use service::http_server::api::v0::entry::update::{UpdateBody, UpdateRequest};

use crate::harness::{create_entry, spawn_server, test_keypair};

fn assert_bad_request(err: ApiError) {
    match err {
        ApiError::HttpStatus(status, _) => assert_eq!(status, StatusCode::BAD_REQUEST),
        other => panic!("expected HTTP 400, got {:?}", other),
    }
}

/// The whole lifecycle with real encryption: the server round-trips
/// ciphertext it cannot read, and the client recovers the plaintext.
#[tokio::test]
async fn full_lifecycle() {
    let client = spawn_server().await;
    let keypair = test_keypair();

    let ciphertext = envelope::encrypt(&keypair.public_key(), b"hello").unwrap();
    let id = create_entry(&client, &keypair, &ciphertext).await;

    let fetched = client.call(GetRequest { id }).await.unwrap();
    assert_eq!(fetched.data, ciphertext);
    assert_eq!(envelope::decrypt(&keypair, &fetched.data).unwrap(), b"hello");

    let new_ciphertext = envelope::encrypt(&keypair.public_key(), b"world").unwrap();
    let update = UpdateRequest {
        id,
        body: UpdateBody {
            data: new_ciphertext.clone(),
            sign_old: envelope::sign_possession(&keypair, &fetched.data).unwrap(),
            sign_new: envelope::sign_content(&keypair, &new_ciphertext).unwrap(),
        },
    };
    client.call(update).await.unwrap();

    let fetched = client.call(GetRequest { id }).await.unwrap();
    assert_eq!(envelope::decrypt(&keypair, &fetched.data).unwrap(), b"world");

    let delete = DeleteRequest {
        id,
        body: DeleteBody {
            sign: envelope::sign_possession(&keypair, &fetched.data).unwrap(),
        },
    };
    client.call(delete).await.unwrap();

    let err = client.call(GetRequest { id }).await.unwrap_err();
    assert!(err.is_not_found());
}

/// The server never inspects payloads: arbitrary bytes go in and come back
/// byte-for-byte, as long as the proofs check out.
#[tokio::test]
async fn server_stores_payload_opaquely() {
    let client = spawn_server().await;
    let keypair = test_keypair();

    let data = vec![1u8, 2, 3, 4, 5];
    let id = create_entry(&client, &keypair, &data).await;

    let fetched = client.call(GetRequest { id }).await.unwrap();
    assert_eq!(fetched.data, data);
}

/// Reads are not gated on identity: any caller who knows the id receives
/// the ciphertext.
#[tokio::test]
async fn get_requires_no_credentials() {
    let client = spawn_server().await;
    let keypair = test_keypair();

    let id = create_entry(&client, &keypair, b"opaque").await;

    // GetRequest carries nothing but the id.
    let fetched = client.call(GetRequest { id }).await.unwrap();
    assert_eq!(fetched.data, b"opaque");
}

#[tokio::test]
async fn list_is_scoped_to_the_owner_key() {
    let client = spawn_server().await;
    let alice = test_keypair();
    let bob = test_keypair();

    let alice_id = create_entry(&client, &alice, b"alice-1").await;
    create_entry(&client, &bob, b"bob-1").await;
    create_entry(&client, &bob, b"bob-2").await;

    let listed = client
        .call(ListRequest {
            public_key: alice.owner_key().to_vec(),
        })
        .await
        .unwrap();
    assert_eq!(listed.entries.len(), 1);
    assert_eq!(listed.entries[0].id, alice_id);
    assert_eq!(listed.entries[0].data, b"alice-1");

    let listed = client
        .call(ListRequest {
            public_key: bob.owner_key().to_vec(),
        })
        .await
        .unwrap();
    assert_eq!(listed.entries.len(), 2);
}

/// An unknown key lists as empty, not as an error.
#[tokio::test]
async fn list_unknown_key_is_empty() {
    let client = spawn_server().await;
    let keypair = test_keypair();

    let listed = client
        .call(ListRequest {
            public_key: keypair.owner_key().to_vec(),
        })
        .await
        .unwrap();
    assert!(listed.entries.is_empty());
}

/// A create whose content proof was made by a different key is rejected.
#[tokio::test]
async fn create_rejects_foreign_proof() {
    let client = spawn_server().await;
    let owner = test_keypair();
    let imposter = test_keypair();

    let data = b"payload".to_vec();
    let err = client
        .call(CreateRequest {
            public_key: owner.owner_key().to_vec(),
            data: data.clone(),
            sign: envelope::sign_content(&imposter, &data).unwrap(),
        })
        .await
        .unwrap_err();
    assert_bad_request(err);
}

/// Garbage bytes where the proof should be never pass verification.
#[tokio::test]
async fn create_rejects_garbage_signature() {
    let client = spawn_server().await;
    let keypair = test_keypair();

    let err = client
        .call(CreateRequest {
            public_key: keypair.owner_key().to_vec(),
            data: b"payload".to_vec(),
            sign: vec![0u8; 16],
        })
        .await
        .unwrap_err();
    assert_bad_request(err);
}

/// A delete proof must be a possession proof over the stored payload; a
/// content proof over the same bytes does not qualify, and the rejected
/// request leaves the row untouched.
#[tokio::test]
async fn delete_rejects_wrong_scheme_and_leaves_row() {
    let client = spawn_server().await;
    let keypair = test_keypair();

    let data = b"keep me".to_vec();
    let id = create_entry(&client, &keypair, &data).await;

    let err = client
        .call(DeleteRequest {
            id,
            body: DeleteBody {
                sign: envelope::sign_content(&keypair, &data).unwrap(),
            },
        })
        .await
        .unwrap_err();
    assert_bad_request(err);

    let fetched = client.call(GetRequest { id }).await.unwrap();
    assert_eq!(fetched.data, data);
}

#[tokio::test]
async fn delete_rejects_foreign_key() {
    let client = spawn_server().await;
    let owner = test_keypair();
    let imposter = test_keypair();

    let data = b"mine".to_vec();
    let id = create_entry(&client, &owner, &data).await;

    let err = client
        .call(DeleteRequest {
            id,
            body: DeleteBody {
                sign: envelope::sign_possession(&imposter, &data).unwrap(),
            },
        })
        .await
        .unwrap_err();
    assert_bad_request(err);

    let fetched = client.call(GetRequest { id }).await.unwrap();
    assert_eq!(fetched.data, data);
}

/// A rejected update must not write either payload or partial state.
#[tokio::test]
async fn update_rejects_bad_old_proof_and_leaves_row() {
    let client = spawn_server().await;
    let keypair = test_keypair();

    let data = b"version one".to_vec();
    let id = create_entry(&client, &keypair, &data).await;

    let replacement = b"version two".to_vec();
    let err = client
        .call(UpdateRequest {
            id,
            body: UpdateBody {
                data: replacement.clone(),
                // Possession proof over the wrong bytes.
                sign_old: envelope::sign_possession(&keypair, b"not the stored payload").unwrap(),
                sign_new: envelope::sign_content(&keypair, &replacement).unwrap(),
            },
        })
        .await
        .unwrap_err();
    assert_bad_request(err);

    let fetched = client.call(GetRequest { id }).await.unwrap();
    assert_eq!(fetched.data, data);
}

#[tokio::test]
async fn update_rejects_bad_new_proof_and_leaves_row() {
    let client = spawn_server().await;
    let keypair = test_keypair();

    let data = b"version one".to_vec();
    let id = create_entry(&client, &keypair, &data).await;

    let replacement = b"version two".to_vec();
    let err = client
        .call(UpdateRequest {
            id,
            body: UpdateBody {
                data: replacement.clone(),
                sign_old: envelope::sign_possession(&keypair, &data).unwrap(),
                sign_new: envelope::sign_content(&keypair, b"some other payload").unwrap(),
            },
        })
        .await
        .unwrap_err();
    assert_bad_request(err);

    let fetched = client.call(GetRequest { id }).await.unwrap();
    assert_eq!(fetched.data, data);
}

/// After an update lands, a possession proof over the previous payload is
/// stale and no longer authorizes anything.
#[tokio::test]
async fn stale_possession_proof_is_rejected() {
    let client = spawn_server().await;
    let keypair = test_keypair();

    let v1 = b"first".to_vec();
    let id = create_entry(&client, &keypair, &v1).await;
    let stale_proof = envelope::sign_possession(&keypair, &v1).unwrap();

    let v2 = b"second".to_vec();
    client
        .call(UpdateRequest {
            id,
            body: UpdateBody {
                data: v2.clone(),
                sign_old: envelope::sign_possession(&keypair, &v1).unwrap(),
                sign_new: envelope::sign_content(&keypair, &v2).unwrap(),
            },
        })
        .await
        .unwrap();

    let err = client
        .call(DeleteRequest {
            id,
            body: DeleteBody { sign: stale_proof },
        })
        .await
        .unwrap_err();
    assert_bad_request(err);

    let fetched = client.call(GetRequest { id }).await.unwrap();
    assert_eq!(fetched.data, v2);
}

#[tokio::test]
async fn sequential_updates_last_writer_wins() {
    let client = spawn_server().await;
    let keypair = test_keypair();

    let mut current = b"v0".to_vec();
    let id = create_entry(&client, &keypair, &current).await;

    for next in [b"v1".to_vec(), b"v2".to_vec(), b"v3".to_vec()] {
        client
            .call(UpdateRequest {
                id,
                body: UpdateBody {
                    data: next.clone(),
                    sign_old: envelope::sign_possession(&keypair, &current).unwrap(),
                    sign_new: envelope::sign_content(&keypair, &next).unwrap(),
                },
            })
            .await
            .unwrap();
        current = next;
    }

    let fetched = client.call(GetRequest { id }).await.unwrap();
    assert_eq!(fetched.data, b"v3");
}

/// Two racing deletes with the same valid proof: exactly one wins, the
/// other observes NotFound, and the entry is gone.
#[tokio::test]
async fn concurrent_delete_has_exactly_one_winner() {
    let client = spawn_server().await;
    let keypair = test_keypair();

    let data = b"contested".to_vec();
    let id = create_entry(&client, &keypair, &data).await;
    let sign = envelope::sign_possession(&keypair, &data).unwrap();

    let first = client.call(DeleteRequest {
        id,
        body: DeleteBody { sign: sign.clone() },
    });
    let second = client.call(DeleteRequest {
        id,
        body: DeleteBody { sign },
    });
    let (first, second) = tokio::join!(first, second);

    let successes = [&first, &second].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);
    for result in [first, second] {
        if let Err(e) = result {
            assert!(e.is_not_found());
        }
    }

    let err = client.call(GetRequest { id }).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn unknown_id_is_not_found() {
    let client = spawn_server().await;
    let keypair = test_keypair();
    let id = uuid::Uuid::new_v4();

    let err = client.call(GetRequest { id }).await.unwrap_err();
    assert!(err.is_not_found());

    let err = client
        .call(UpdateRequest {
            id,
            body: UpdateBody {
                data: b"x".to_vec(),
                sign_old: envelope::sign_possession(&keypair, b"x").unwrap(),
                sign_new: envelope::sign_content(&keypair, b"x").unwrap(),
            },
        })
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let err = client
        .call(DeleteRequest {
            id,
            body: DeleteBody {
                sign: envelope::sign_possession(&keypair, b"x").unwrap(),
            },
        })
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

/// A syntactically invalid id never reaches the store.
#[tokio::test]
async fn malformed_id_is_rejected() {
    let client = spawn_server().await;

    let url = client.remote.join("/api/v0/entry/not-a-uuid").unwrap();
    let response = reqwest::get(url).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Requests outside the entry API land on the fallback, which names the
/// missing path and honors the Accept header.
#[tokio::test]
async fn unknown_route_falls_back_to_not_found() {
    let client = spawn_server().await;
    let url = client.remote.join("/api/v1/nope").unwrap();

    let response = reqwest::get(url.clone()).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.text().await.unwrap().contains("/api/v1/nope"));

    let response = reqwest::Client::new()
        .get(url)
        .header("Accept", "application/json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("no such endpoint"));
}
