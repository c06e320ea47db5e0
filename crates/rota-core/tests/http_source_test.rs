#![allow(clippy::unwrap_used)]
// Controller wired to the HTTP client, against a wiremock backend.

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rota_api::{CalendarClient, TransportConfig};
use rota_core::{
    Command, CommandResult, Controller, CoreError, EventKind, EventType, FilterDelta, LeaveStatus,
};

async fn setup() -> (MockServer, Controller) {
    let server = MockServer::start().await;
    let client = CalendarClient::new(&server.uri(), &TransportConfig::default()).unwrap();
    let controller = Controller::builder(Arc::new(client))
        .anchor(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
        .build();
    (server, controller)
}

fn backend_events() -> serde_json::Value {
    json!([
        {
            "id": "leave-12",
            "title": "Ada Martin - Congé",
            "start": "2024-03-11T00:00:00.000Z",
            "end": "2024-03-15T23:59:59.999Z",
            "allDay": true,
            "type": "LEAVE",
            "userId": 5,
            "user": { "id": 5, "prenom": "Ada", "nom": "Martin", "role": "MAR" },
            "leaveType": "ANNUAL",
            "status": "PENDING",
            "countedDays": 5
        },
        {
            "id": 31,
            "title": "Garde",
            "start": "2024-03-02T08:00:00.000Z",
            "end": "2024-03-02T20:00:00.000Z",
            "type": "DUTY",
            "userId": 7,
            "locationId": 3,
            "locationName": "Bloc Sud"
        },
        {
            "id": "broken",
            "title": "Inverted",
            "start": "2024-03-05T10:00:00.000Z",
            "end": "2024-03-05T09:00:00.000Z",
            "type": "MEETING"
        },
        {
            "id": "leave-13",
            "title": "Unknown status",
            "start": "2024-03-07T00:00:00.000Z",
            "end": "2024-03-07T23:59:59.999Z",
            "type": "LEAVE",
            "userId": 5,
            "status": "ARCHIVED"
        }
    ])
}

#[tokio::test]
async fn query_sends_window_and_converts_events() {
    let (server, controller) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/calendar"))
        .and(query_param("eventTypes", "LEAVE"))
        .and(query_param("startDate", "2024-03-01T00:00:00.000Z"))
        .and(query_param("endDate", "2024-03-31T23:59:59.999Z"))
        .respond_with(ResponseTemplate::new(200).set_body_json(backend_events()))
        .expect(1)
        .mount(&server)
        .await;

    let snap = controller
        .query(FilterDelta::none().event_types([EventType::Leave]))
        .await
        .unwrap();

    // Invalid wire events are dropped, the rest are ordered by start.
    let ids: Vec<&str> = snap.events.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["31", "leave-12"]);
    assert_eq!(snap.filtered_events.len(), 1);

    let leave = &snap.filtered_events[0];
    assert_eq!(leave.user.as_ref().unwrap().full_name(), "Ada Martin");
    assert!(matches!(
        leave.kind,
        EventKind::Leave {
            status: LeaveStatus::Pending,
            ..
        }
    ));
}

#[tokio::test]
async fn backend_error_is_reported_in_the_snapshot() {
    let (server, controller) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/calendar"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": "Erreur serveur",
            "details": "database unreachable"
        })))
        .mount(&server)
        .await;

    let snap = controller.query(FilterDelta::none()).await.unwrap();

    assert!(snap.events.is_empty());
    let Some(CoreError::Fetch { message, status }) = snap.error.clone() else {
        panic!("expected a fetch error, got {:?}", snap.error);
    };
    assert_eq!(status, Some(500));
    assert!(message.contains("database unreachable"));
}

#[tokio::test]
async fn status_update_goes_through_the_backend() {
    let (server, controller) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/calendar"))
        .respond_with(ResponseTemplate::new(200).set_body_json(backend_events()))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/calendar/events/leave-12/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "leave-12",
            "title": "Ada Martin - Congé",
            "start": "2024-03-11T00:00:00.000Z",
            "end": "2024-03-15T23:59:59.999Z",
            "type": "LEAVE",
            "userId": 5,
            "leaveType": "ANNUAL",
            "status": "APPROVED"
        })))
        .expect(1)
        .mount(&server)
        .await;

    controller.start().await.unwrap();
    controller.query(FilterDelta::none()).await.unwrap();

    let result = controller
        .execute(Command::UpdateLeaveStatus {
            id: "leave-12".into(),
            status: LeaveStatus::Approved,
        })
        .await
        .unwrap();
    let CommandResult::Updated(event) = result else {
        panic!("expected Updated");
    };
    assert_eq!(event.kind.leave_status().value(), Some(LeaveStatus::Approved));
    assert!(controller.cache().is_empty());

    controller.shutdown().await;
}
