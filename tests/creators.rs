mod common;

use common::{http_client, spawn_app};
use serde_json::json;

fn names(data: &serde_json::Value) -> Vec<String> {
    data["creators"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_search_fitness_returns_john() {
    let app = spawn_app().await;
    let client = http_client();

    let resp = client
        .get(app.url("/api/v1/creators/search?query=fitness"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let data: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(names(&data), vec!["John Fitness"]);
    assert_eq!(data["total"], 1);
    assert_eq!(data["has_next"], false);

    let john = &data["creators"][0];
    assert_eq!(john["email"], "@john_fitness");
    assert_eq!(john["category"], "Fitness");
    assert_eq!(john["tags"], json!([]));
    assert_eq!(john["platforms"]["instagram"]["followers"], 125_000);
    assert_eq!(john["platforms"]["instagram"]["verified"], true);
    assert_eq!(john["creator_stats"]["engagement_rate"], 0.045);
}

#[tokio::test]
async fn test_search_without_matches_is_empty() {
    let app = spawn_app().await;
    let client = http_client();

    let resp = client
        .get(app.url("/api/v1/creators/search?query=zzz-no-match"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let data: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(data["creators"], json!([]));
    assert_eq!(data["total"], 0);
}

#[tokio::test]
async fn test_search_filters() {
    let app = spawn_app().await;
    let client = http_client();

    let resp = client
        .get(app.url("/api/v1/creators/search?platforms=instagram,TikTok&min_followers=150000"))
        .send()
        .await
        .unwrap();
    let data: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(names(&data), vec!["Mike's Kitchen", "Emma Explores"]);

    let resp = client
        .get(app.url("/api/v1/creators/search?location=austin&limit=1"))
        .send()
        .await
        .unwrap();
    let data: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(names(&data), vec!["Alex Business"]);
}

#[tokio::test]
async fn test_get_creator() {
    let app = spawn_app().await;
    let client = http_client();

    let resp = client
        .get(app.url("/api/v1/creators/mock_2"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let data: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(data["name"], "Sarah Tech");
    assert_eq!(data["platforms"]["youtube"]["handle"], "sarah_tech");

    let resp = client
        .get(app.url("/api/v1/creators/unknown"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let data: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(data["message"], "Creator 'unknown' not found");
}
