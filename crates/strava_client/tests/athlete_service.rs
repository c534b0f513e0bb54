use std::sync::Arc;

use secrecy::SecretString;
use serde_json::json;
use strava_client::http_client::ReqwestStravaApi;
use strava_client::services::AthleteService;
use strava_client::{
    AthleteUpdate, AuthorisationScope, Paging, Precondition, ResourceState, StravaError, Token,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn service(server: &MockServer, scopes: Vec<AuthorisationScope>) -> AthleteService {
    let api = ReqwestStravaApi::new(&server.uri(), SecretString::new("tok".into()));
    AthleteService::new(
        Arc::new(api),
        Token::new(SecretString::new("tok".into()), scopes),
    )
}

#[tokio::test]
async fn get_athlete_maps_missing_and_private() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/athletes/1"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/athletes/2"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/athletes/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 3, "resource_state": 2, "firstname": "Marianne", "city": "Lyon"
        })))
        .mount(&server)
        .await;

    let svc = service(&server, vec![]);
    assert_eq!(svc.get_athlete(1).await.unwrap(), None);
    let private = svc.get_athlete(2).await.unwrap().unwrap();
    assert_eq!(private.id, 2);
    assert_eq!(private.resource_state, Some(ResourceState::Private));
    let visible = svc.get_athlete(3).await.unwrap().unwrap();
    assert_eq!(visible.city.as_deref(), Some("Lyon"));
}

#[tokio::test]
async fn update_authenticated_athlete_requires_write() {
    let server = MockServer::start().await;
    let update = AthleteUpdate {
        weight: Some(71.5),
        ..Default::default()
    };

    let err = service(&server, vec![AuthorisationScope::ViewPrivate])
        .update_authenticated_athlete(&update)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StravaError::PreconditionFailed {
            precondition: Precondition::WriteAccess,
            ..
        }
    ));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn update_authenticated_athlete_sends_only_set_fields() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/athlete"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 10, "resource_state": 3, "weight": 71.5
        })))
        .expect(1)
        .mount(&server)
        .await;

    let update = AthleteUpdate {
        weight: Some(71.5),
        ..Default::default()
    };
    let athlete = service(&server, vec![AuthorisationScope::Write])
        .update_authenticated_athlete(&update)
        .await
        .unwrap();
    assert_eq!(athlete.weight, Some(71.5));

    let received = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
    assert_eq!(body, json!({"weight": 71.5}));
}

#[tokio::test]
async fn friend_lists_redact_private_athletes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/athletes/5/friends"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 6, "resource_state": 2, "firstname": "Ana"},
            {"id": 7, "resource_state": 100, "firstname": "hidden"}
        ])))
        .mount(&server)
        .await;

    let friends = service(&server, vec![])
        .list_athlete_friends(5, Some(Paging::first(10).unwrap()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(friends.len(), 2);
    assert_eq!(friends[0].firstname.as_deref(), Some("Ana"));
    assert_eq!(friends[1].firstname, None);
    assert!(friends[1].is_private());
}

#[tokio::test]
async fn koms_of_missing_athlete_are_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/athletes/404/koms"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let svc = service(&server, vec![]);
    assert_eq!(svc.list_athlete_koms(404, None).await.unwrap(), None);
}

#[tokio::test]
async fn oversize_page_is_assembled_from_api_pages() {
    let server = MockServer::start().await;
    let page = |range: std::ops::Range<i64>| -> Vec<serde_json::Value> {
        range.map(|id| json!({"id": id, "resource_state": 2})).collect()
    };
    Mock::given(method("GET"))
        .and(path("/athlete/friends"))
        .and(query_param("page", "2"))
        .and(query_param("per_page", "200"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(200..400)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/athlete/friends"))
        .and(query_param("page", "3"))
        .and(query_param("per_page", "200"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(400..450)))
        .expect(1)
        .mount(&server)
        .await;

    // page 2 of 250 covers records 250..500; only 450 exist
    let friends = service(&server, vec![])
        .list_authenticated_athlete_friends(Some(Paging::new(2, 250).unwrap()))
        .await
        .unwrap();
    let ids: Vec<i64> = friends.iter().map(|a| a.id).collect();
    assert_eq!(ids, (250..450).collect::<Vec<_>>());
}
