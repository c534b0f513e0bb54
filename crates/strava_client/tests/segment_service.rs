use std::sync::Arc;

use secrecy::SecretString;
use serde_json::json;
use strava_client::http_client::ReqwestStravaApi;
use strava_client::services::{SegmentEffortService, SegmentService};
use strava_client::{
    AuthorisationScope, EffortFilter, Paging, Precondition, ResourceState, StravaApi, StravaError,
    Token,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api(server: &MockServer) -> Arc<dyn StravaApi> {
    Arc::new(ReqwestStravaApi::new(
        &server.uri(),
        SecretString::new("tok".into()),
    ))
}

fn token(scopes: Vec<AuthorisationScope>) -> Token {
    Token::new(SecretString::new("tok".into()), scopes)
}

async fn mount_segment(server: &MockServer, id: i64, private: bool) {
    Mock::given(method("GET"))
        .and(path(format!("/segments/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": id, "resource_state": 3, "name": "Hawk Hill", "private": private
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn private_segment_is_redacted_without_view_private() {
    let server = MockServer::start().await;
    mount_segment(&server, 1, true).await;
    Mock::given(method("GET"))
        .and(path("/segments/starred"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "resource_state": 2, "name": "mine", "private": true},
            {"id": 2, "resource_state": 2, "name": "public", "private": false}
        ])))
        .mount(&server)
        .await;

    let svc = SegmentService::new(api(&server), token(vec![]));
    let starred = svc
        .list_starred_segments(Some(Paging::first(10).unwrap()))
        .await
        .unwrap();
    assert!(starred[0].is_private());
    assert_eq!(starred[1].name.as_deref(), Some("public"));

    let with_view = SegmentService::new(api(&server), token(vec![AuthorisationScope::ViewPrivate]));
    let starred = with_view
        .list_starred_segments(Some(Paging::first(10).unwrap()))
        .await
        .unwrap();
    assert_eq!(starred[0].name.as_deref(), Some("mine"));
}

#[tokio::test]
async fn efforts_on_private_segment_are_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/segments/3"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let svc = SegmentService::new(api(&server), token(vec![]));
    let efforts = svc
        .list_segment_efforts(3, &EffortFilter::default(), None)
        .await
        .unwrap();
    assert_eq!(efforts, Some(vec![]));
}

#[tokio::test]
async fn efforts_are_filtered_by_athlete() {
    let server = MockServer::start().await;
    mount_segment(&server, 4, false).await;
    Mock::given(method("GET"))
        .and(path("/segments/4/all_efforts"))
        .and(query_param("athlete_id", "77"))
        .and(query_param("per_page", "200"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 100, "resource_state": 2, "elapsed_time": 401},
            {"id": 101, "resource_state": 2, "elapsed_time": 399}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let filter = EffortFilter {
        athlete_id: Some(77),
        ..Default::default()
    };
    let efforts = SegmentService::new(api(&server), token(vec![]))
        .list_segment_efforts(4, &filter, None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(efforts.len(), 2);
    assert_eq!(efforts[1].elapsed_time, Some(399));
}

#[tokio::test]
async fn star_segment_preconditions() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/segments/5"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/segments/6"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let read_only = SegmentService::new(api(&server), token(vec![]));
    assert!(matches!(
        read_only.star_segment(5, true).await,
        Err(StravaError::PreconditionFailed {
            precondition: Precondition::WriteAccess,
            ..
        })
    ));
    assert!(server.received_requests().await.unwrap().is_empty());

    let writer = SegmentService::new(api(&server), token(vec![AuthorisationScope::Write]));
    assert!(matches!(
        writer.star_segment(5, true).await,
        Err(StravaError::PreconditionFailed {
            precondition: Precondition::ResourceExists,
            ..
        })
    ));
    assert!(matches!(
        writer.star_segment(6, true).await,
        Err(StravaError::PreconditionFailed {
            precondition: Precondition::ResourceAccessible,
            ..
        })
    ));
}

#[tokio::test]
async fn star_segment_returns_updated_segment() {
    let server = MockServer::start().await;
    mount_segment(&server, 7, false).await;
    Mock::given(method("PUT"))
        .and(path("/segments/7/starred"))
        .and(query_param("starred", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7, "resource_state": 3, "starred": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let segment = SegmentService::new(api(&server), token(vec![AuthorisationScope::Write]))
        .star_segment(7, false)
        .await
        .unwrap();
    assert_eq!(segment.starred, Some(false));
}

#[tokio::test]
async fn segment_effort_lookup() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/segment_efforts/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1, "resource_state": 3, "name": "Hawk Hill", "kom_rank": 1
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/segment_efforts/2"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/segment_efforts/3"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let svc = SegmentEffortService::new(api(&server), token(vec![]));
    let effort = svc.get_segment_effort(1).await.unwrap().unwrap();
    assert_eq!(effort.kom_rank, Some(1));
    let hidden = svc.get_segment_effort(2).await.unwrap().unwrap();
    assert_eq!(hidden.resource_state, Some(ResourceState::Private));
    assert_eq!(svc.get_segment_effort(3).await.unwrap(), None);
}
