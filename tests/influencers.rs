mod common;

use common::*;
use serde_json::json;

fn names(data: &serde_json::Value) -> Vec<String> {
    data["influencers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_create_influencer() {
    let app = spawn_app().await;
    let client = http_client();

    let data = create_influencer(
        &client,
        &app,
        json!({
            "name": "Ava Stone",
            "username": "@ava.yoga",
            "email": "ava@example.com",
            "bio": "Morning flows",
            "category": "fitness",
            "location": "Lisbon",
            "profile_url": "https://instagram.com/ava.yoga",
            "tags": [" yoga ", "", "Wellness", "yoga"]
        }),
    )
    .await;

    assert!(data["id"].is_string());
    assert_eq!(data["name"], "Ava Stone");
    assert_eq!(data["category"], "Fitness");
    assert_eq!(data["tags"], json!(["yoga", "Wellness"]));
    assert_eq!(data["platforms"]["instagram"]["handle"], "ava.yoga");
    assert_eq!(
        data["platforms"]["instagram"]["url"],
        "https://instagram.com/ava.yoga"
    );
    assert_eq!(data["platforms"]["instagram"]["followers"], 0);

    let id = data["id"].as_str().unwrap();
    let resp = client
        .get(app.url(&format!("/api/v1/influencers/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let fetched: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(fetched, data);
}

#[tokio::test]
async fn test_create_influencer_requires_auth() {
    let app = spawn_app().await;
    let client = http_client();
    let body = json!({"name": "Ava", "username": "ava"});

    let resp = client
        .post(app.url("/api/v1/influencers"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);

    let resp = client
        .post(app.url("/api/v1/influencers"))
        .header(
            "Authorization",
            format!("Bearer {}", generate_expired_token("test_user")),
        )
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn test_create_influencer_validation() {
    let app = spawn_app().await;
    let client = http_client();

    for body in [
        json!({"name": "", "username": "ava"}),
        json!({"name": "Ava", "username": "not a handle!"}),
        json!({"name": "Ava", "username": "ava", "email": "not-an-email"}),
        json!({"name": "Ava", "username": "ava", "profile_url": "nope"}),
        json!({"name": "Ava", "username": "ava", "category": "Astrology"}),
    ] {
        let resp = client
            .post(app.url("/api/v1/influencers"))
            .header("Authorization", auth_header("test_user"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 422, "body {body}");
        let data: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(data["error"], "validation_error");
    }
}

#[tokio::test]
async fn test_blank_optional_fields_are_accepted() {
    let app = spawn_app().await;
    let client = http_client();

    let data = create_influencer(
        &client,
        &app,
        json!({"name": "Bo", "username": "bo", "email": "", "category": " ", "profile_url": ""}),
    )
    .await;
    assert!(data["email"].is_null());
    assert!(data["category"].is_null());
}

#[tokio::test]
async fn test_get_influencer_not_found() {
    let app = spawn_app().await;
    let client = http_client();

    let resp = client
        .get(app.url("/api/v1/influencers/does-not-exist"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_list_empty() {
    let app = spawn_app().await;
    let client = http_client();

    let resp = client
        .get(app.url("/api/v1/influencers"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let data: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(data["influencers"], json!([]));
    assert_eq!(data["total"], 0);
    assert_eq!(data["has_next"], false);
    assert!(data["cursor"].is_null());
}

#[tokio::test]
async fn test_search_matches_fields_and_tags() {
    let app = spawn_app().await;
    let client = http_client();

    create_influencer(
        &client,
        &app,
        json!({"name": "Chef Cal", "username": "chefcal", "tags": ["Vegan", "baking"]}),
    )
    .await;
    create_influencer(
        &client,
        &app,
        json!({"name": "Vegan Val", "username": "veganval"}),
    )
    .await;
    create_influencer(
        &client,
        &app,
        json!({"name": "Gamer Gus", "username": "gus", "tags": ["esports"]}),
    )
    .await;

    let resp = client
        .get(app.url("/api/v1/influencers?search=vegan"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let data: serde_json::Value = resp.json().await.unwrap();

    // Server-side match first, tag-only match after it.
    assert_eq!(names(&data), vec!["Vegan Val", "Chef Cal"]);
    assert_eq!(data["query"], "vegan");
    assert_eq!(data["total"], 2);

    let resp = client
        .get(app.url("/api/v1/influencers?search=zzz-no-match"))
        .send()
        .await
        .unwrap();
    let data: serde_json::Value = resp.json().await.unwrap();
    assert!(names(&data).is_empty());
}

#[tokio::test]
async fn test_search_treats_wildcards_literally() {
    let app = spawn_app().await;
    let client = http_client();

    create_influencer(&client, &app, json!({"name": "Plain", "username": "plain"})).await;

    let resp = client
        .get(app.url("/api/v1/influencers?search=%25"))
        .send()
        .await
        .unwrap();
    let data: serde_json::Value = resp.json().await.unwrap();
    assert!(names(&data).is_empty());
}

#[tokio::test]
async fn test_cursor_pagination() {
    let app = spawn_app().await;
    let client = http_client();

    for name in ["First", "Second", "Third"] {
        create_influencer(
            &client,
            &app,
            json!({"name": name, "username": name.to_lowercase()}),
        )
        .await;
    }

    let resp = client
        .get(app.url("/api/v1/influencers?limit=2"))
        .send()
        .await
        .unwrap();
    let first: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(names(&first), vec!["Third", "Second"]);
    assert_eq!(first["has_next"], true);
    assert_eq!(first["total"], 3);

    let cursor = first["cursor"].as_str().unwrap();
    let resp = client
        .get(app.url(&format!("/api/v1/influencers?limit=2&cursor={cursor}")))
        .send()
        .await
        .unwrap();
    let second: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(names(&second), vec!["First"]);
    assert_eq!(second["has_next"], false);
    assert!(second["cursor"].is_null());
}

#[tokio::test]
async fn test_invalid_cursor_is_rejected() {
    let app = spawn_app().await;
    let client = http_client();

    let resp = client
        .get(app.url("/api/v1/influencers?cursor=not-a-cursor"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_tag_match_past_the_first_page_is_found() {
    let app = spawn_app().await;
    let client = http_client();

    create_influencer(
        &client,
        &app,
        json!({"name": "Old Timer", "username": "oldtimer", "tags": ["vegan"]}),
    )
    .await;
    for name in ["Ann", "Ben", "Cid"] {
        create_influencer(
            &client,
            &app,
            json!({"name": name, "username": name.to_lowercase()}),
        )
        .await;
    }

    let resp = client
        .get(app.url("/api/v1/influencers?search=vegan&limit=2"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let data: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(names(&data), vec!["Old Timer"]);
    assert_eq!(data["total"], 1);
}

#[tokio::test]
async fn test_search_ignores_case_beyond_ascii() {
    let app = spawn_app().await;
    let client = http_client();

    create_influencer(
        &client,
        &app,
        json!({"name": "ÉMILIE Café", "username": "emilie", "tags": ["PÂTISSERIE"]}),
    )
    .await;

    for term in ["émilie", "CAFÉ", "pâtisserie"] {
        let resp = client
            .get(app.url("/api/v1/influencers"))
            .query(&[("search", term)])
            .send()
            .await
            .unwrap();
        let data: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(names(&data), vec!["ÉMILIE Café"], "term {term}");
        assert_eq!(data["total"], 1);
    }
}

#[tokio::test]
async fn test_search_total_is_stable_across_pages() {
    let app = spawn_app().await;
    let client = http_client();

    create_influencer(
        &client,
        &app,
        json!({"name": "Chef Cal", "username": "chefcal", "tags": ["vegan"]}),
    )
    .await;
    for name in ["Vegan A", "Vegan B", "Vegan C"] {
        create_influencer(
            &client,
            &app,
            json!({"name": name, "username": name.replace(' ', "_").to_lowercase()}),
        )
        .await;
    }

    let resp = client
        .get(app.url("/api/v1/influencers?search=vegan&limit=2"))
        .send()
        .await
        .unwrap();
    let first: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(names(&first), vec!["Vegan C", "Vegan B", "Chef Cal"]);
    assert_eq!(first["total"], 4);
    assert_eq!(first["has_next"], true);

    let cursor = first["cursor"].as_str().unwrap();
    let resp = client
        .get(app.url(&format!(
            "/api/v1/influencers?search=vegan&limit=2&cursor={cursor}"
        )))
        .send()
        .await
        .unwrap();
    let second: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(names(&second), vec!["Vegan A"]);
    assert_eq!(second["total"], 4);
    assert_eq!(second["has_next"], false);
}
