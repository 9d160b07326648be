use axum::http::StatusCode;

use crate::tests::helper;

#[tokio::test]
async fn test_list_urls() {
    let mut app = helper::setup_test_app().await;

    let alice = helper::premium_user(&mut app, "alice").await;
    let bob = helper::premium_user(&mut app, "bob").await;

    for slug in ["first", "second", "third"] {
        helper::shorten(&mut app, &alice, "https://example.com", slug).await;
    }
    helper::shorten(&mut app, &bob, "https://example.org", "bobs").await;

    let (status_code, links) = helper::list_urls(&mut app, &alice, "").await;
    assert_eq!(StatusCode::OK, status_code);
    let (links, pagination) = links.unwrap();
    assert_eq!(3, links.len());
    assert!(links.iter().all(|link| link.url_id != "bobs"));
    assert_eq!(Some(3), pagination["totalLinks"].as_u64());
    assert_eq!(Some(1), pagination["page"].as_u64());
    assert_eq!(Some(20), pagination["pageSize"].as_u64());

    // newest first, two per page
    let (_, links) = helper::list_urls(&mut app, &alice, "?page=1&pageSize=2").await;
    let (links, pagination) = links.unwrap();
    assert_eq!(
        vec!["third", "second"],
        links.iter().map(|link| link.url_id.as_str()).collect::<Vec<_>>()
    );
    assert_eq!(Some(2), pagination["totalPages"].as_u64());
    assert_eq!(Some(true), pagination["hasNext"].as_bool());
    assert_eq!(Some(false), pagination["hasPrev"].as_bool());

    let (_, links) = helper::list_urls(&mut app, &alice, "?page=2&pageSize=2").await;
    let (links, pagination) = links.unwrap();
    assert_eq!(1, links.len());
    assert_eq!("first", links[0].url_id);
    assert_eq!(Some(false), pagination["hasNext"].as_bool());
    assert_eq!(Some(true), pagination["hasPrev"].as_bool());

    let (status_code, _) = helper::list_urls(&mut app, &alice, "?page=nope").await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
}

#[tokio::test]
async fn test_list_urls_of_free_user() {
    let mut app = helper::setup_test_app().await;

    helper::register(&mut app, "alice").await;
    let access_token = helper::login(&mut app, "alice").await;

    let (status_code, links) = helper::list_urls(&mut app, &access_token, "").await;
    assert_eq!(StatusCode::OK, status_code);
    let (links, pagination) = links.unwrap();
    assert!(links.is_empty());
    assert_eq!(Some(0), pagination["totalPages"].as_u64());
}

#[tokio::test]
async fn test_stats_of_someone_else() {
    let mut app = helper::setup_test_app().await;

    let alice = helper::premium_user(&mut app, "alice").await;
    let bob = helper::premium_user(&mut app, "bob").await;

    helper::shorten(&mut app, &alice, "https://example.com", "alices").await;

    let (status_code, stats, error) = helper::stats(&mut app, &bob, "alices").await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
    assert!(stats.is_none());
    assert_eq!(Some("not_found_or_forbidden".to_string()), error.unwrap().kind);
}

#[tokio::test]
async fn test_toggle_status_of_someone_else() {
    let mut app = helper::setup_test_app().await;

    let alice = helper::premium_user(&mut app, "alice").await;
    let bob = helper::premium_user(&mut app, "bob").await;

    helper::shorten(&mut app, &alice, "https://example.com", "alices").await;

    let (status_code, link) = helper::maybe_toggle_status(&mut app, &bob, "alices").await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
    assert!(link.is_none());

    let (status_code, _, _) = helper::root(&mut app, "alices").await;
    assert_eq!(StatusCode::FOUND, status_code);
}

#[tokio::test]
async fn test_delete_url() {
    let mut app = helper::setup_test_app().await;

    let alice = helper::premium_user(&mut app, "alice").await;
    let bob = helper::premium_user(&mut app, "bob").await;

    helper::shorten(&mut app, &alice, "https://example.com", "doomed").await;

    let (_, user) = helper::current_user(&mut app, &alice).await;
    assert_eq!(1, user.unwrap().link_count);

    // not yours
    let status_code = helper::maybe_delete_url(&mut app, &bob, "doomed").await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);

    let status_code = helper::maybe_delete_url(&mut app, &alice, "doomed").await;
    assert_eq!(StatusCode::OK, status_code);

    let (status_code, _, _) = helper::root(&mut app, "doomed").await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);

    let (_, user) = helper::current_user(&mut app, &alice).await;
    assert_eq!(0, user.unwrap().link_count);

    // already gone
    let status_code = helper::maybe_delete_url(&mut app, &alice, "doomed").await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);

    // the slug is free again
    let link = helper::shorten(&mut app, &bob, "https://example.org", "doomed").await;
    assert_eq!("doomed", link.url_id);
}
