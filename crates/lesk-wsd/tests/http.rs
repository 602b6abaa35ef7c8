use std::path::PathBuf;
use std::sync::Arc;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use tower::util::ServiceExt;

use lesk_wsd::handlers::{AppState, router};
use lesk_wsd::{Lesk, PlainAnnotator, PredictOptions, StopWords, WordNetInventory};
use wordnet_db::WordNet;

const RIVER: &str = "The%20river%20bank%20was%20flooded%20by%20water%20flow%20.";

fn make_state() -> AppState {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("wn");
    let wordnet = Arc::new(WordNet::load(&dir).unwrap());
    let lesk = Lesk::new(
        Arc::new(WordNetInventory::new(wordnet)),
        Arc::new(PlainAnnotator),
        Arc::new(StopWords::from_words([
            "a", "the", "was", "by", "beside", "that", "of", "or", "to",
        ])),
    );
    AppState {
        lesk: Arc::new(lesk),
        defaults: PredictOptions::default(),
    }
}

async fn get(uri: &str) -> (StatusCode, serde_json::Value) {
    let response = router(make_state())
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body_bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let body = serde_json::from_slice(&body_bytes).unwrap_or(serde_json::Value::Null);
    (status, body)
}

#[tokio::test]
async fn healthz_ok() {
    let app = router(make_state());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), 1024).await.unwrap();
    assert_eq!(&body[..], b"ok");
}

#[tokio::test]
async fn disambiguate_ranks_senses() {
    let (status, body) = get(&format!(
        "/v1/disambiguate?sentence={RIVER}&position=2&lemma=bank&pos=NOUN"
    ))
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["lemma"], "bank");
    assert_eq!(body["pos"], "NOUN");
    let senses = body["senses"].as_array().unwrap();
    assert_eq!(senses.len(), 2);
    assert_eq!(senses[0]["sense_key"], "bank%1:17:01::");
    assert_eq!(senses[0]["frequency"], 5);
    assert_eq!(senses[1]["score"], 0.0);
    let context: Vec<&str> = body["context"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|w| w.as_str())
        .collect();
    assert!(context.contains(&"river"));
    assert!(!context.contains(&"the"));
}

#[tokio::test]
async fn disambiguate_accepts_request_options() {
    let (status, body) = get(&format!(
        "/v1/disambiguate?sentence={RIVER}&position=2&lemma=bank&pos=NOUN&context=window&window=3&metric=cosine"
    ))
    .await;
    assert_eq!(status, StatusCode::OK);
    let context: Vec<&str> = body["context"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|w| w.as_str())
        .collect();
    assert_eq!(context, vec!["bank", "river"]);
}

#[tokio::test]
async fn disambiguate_rejects_bad_options() {
    let (status, body) = get(&format!(
        "/v1/disambiguate?sentence={RIVER}&position=2&lemma=bank&pos=NOUN&context=WINDOW&window=4"
    ))
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("window"));

    let (status, _) = get(&format!(
        "/v1/disambiguate?sentence={RIVER}&position=2&lemma=bank&pos=NOUN&metric=dice"
    ))
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn disambiguate_rejects_positions_outside_the_sentence() {
    let (status, body) = get(&format!(
        "/v1/disambiguate?sentence={RIVER}&position=40&lemma=bank&pos=NOUN"
    ))
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("position 40"));
}

#[tokio::test]
async fn unknown_lemmas_have_no_senses() {
    let (status, body) = get(&format!(
        "/v1/disambiguate?sentence={RIVER}&position=1&lemma=zorblax&pos=NOUN"
    ))
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["senses"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn senses_lists_inventory_entries() {
    let (status, body) = get("/v1/senses?lemma=take&pos=verb").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pos"], "VERB");
    let senses = body["senses"].as_array().unwrap();
    assert_eq!(senses.len(), 3);
    assert_eq!(senses[0]["sense_key"], "take%2:30:01::");
    assert_eq!(senses[0]["frequency"], 61);
    assert!(senses[2]["frequency"].is_null());
}

#[tokio::test]
async fn senses_rejects_closed_class_tags() {
    let (status, body) = get("/v1/senses?lemma=take&pos=PRON").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("PRON"));
}
