//! reqwest-backed clients against a local responder.

mod common;

use common::spawn_responder;
use pixgen::models::MODEL_LIST_WARNING;
use pixgen::{
    GenerationParameters, GeneratorConfig, ImageFetcher, ImageLoader, ModelSource, PixgenError,
    PollinationsClient,
};

async fn client_for(base_url: &str) -> PollinationsClient {
    PollinationsClient::new(&GeneratorConfig::new().with_base_url(base_url)).unwrap()
}

#[tokio::test]
async fn model_list_is_parsed() {
    let base = spawn_responder(|path| match path {
        "/models" => (200, br#"["flux", "turbo"]"#.to_vec()),
        _ => (404, Vec::new()),
    })
    .await;
    let client = client_for(&base).await;

    let catalog = client.models().fetch_models().await;
    assert_eq!(catalog.models, vec!["flux", "turbo"]);
    assert!(!catalog.is_fallback());
}

#[tokio::test]
async fn model_list_server_error_falls_back() {
    let base = spawn_responder(|_| (503, b"unavailable".to_vec())).await;
    let client = client_for(&base).await;

    let err = client.models().try_fetch_models().await.unwrap_err();
    assert!(matches!(err, PixgenError::ModelListFetchFailure(_)));

    let catalog = client.models().fetch_models().await;
    assert_eq!(catalog.models, vec!["flux"]);
    assert_eq!(catalog.warning.as_deref(), Some(MODEL_LIST_WARNING));
}

#[tokio::test]
async fn model_list_garbage_falls_back() {
    let base = spawn_responder(|_| (200, b"<html>nope</html>".to_vec())).await;
    let catalog = client_for(&base).await.models().fetch_models().await;
    assert!(catalog.is_fallback());
}

#[tokio::test]
async fn unreachable_model_endpoint_falls_back() {
    // Port 9 (discard) on localhost is not expected to accept HTTP.
    let client = client_for("http://127.0.0.1:9").await;
    let catalog = client.models().fetch_models().await;
    assert_eq!(catalog.models, vec!["flux"]);
    assert!(catalog.is_fallback());
}

#[tokio::test]
async fn image_load_succeeds_with_body() {
    let base = spawn_responder(|path| {
        if path.starts_with("/prompt/a%20red%20fox?") && path.ends_with("&nologo=true") {
            (200, vec![0xFF, 0xD8, 0xFF, 0xE0])
        } else {
            (404, Vec::new())
        }
    })
    .await;
    let client = client_for(&base).await;
    let url = client
        .image()
        .url_for(&GenerationParameters::new("a red fox"), 5);

    assert_eq!(client.image().load(&url).await.unwrap(), url);
    assert_eq!(
        client.image().fetch_bytes(&url).await.unwrap(),
        vec![0xFF, 0xD8, 0xFF, 0xE0]
    );
}

#[tokio::test]
async fn image_load_failures() {
    let base = spawn_responder(|path| {
        if path.contains("empty") {
            (200, Vec::new())
        } else {
            (500, b"model overloaded".to_vec())
        }
    })
    .await;
    let client = client_for(&base).await;

    let broken = client.image().url_for(&GenerationParameters::new("broken"), 1);
    assert!(matches!(
        client.image().load(&broken).await,
        Err(PixgenError::ImageLoadFailure(_))
    ));
    assert!(matches!(
        client.image().fetch_bytes(&broken).await,
        Err(PixgenError::DownloadFailure(_))
    ));

    let empty = client.image().url_for(&GenerationParameters::new("empty"), 1);
    assert!(matches!(
        client.image().load(&empty).await,
        Err(PixgenError::ImageLoadFailure(_))
    ));
}
