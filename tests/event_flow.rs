//! End-to-end event flows through `handle_event`, with HTTP responses fed
//! back the way the plugin shim does.

use kirjastokaveri::app::AuthMode;
use kirjastokaveri::infrastructure::HttpRequest;
use kirjastokaveri::ui::viewmodel::AvailabilityView;
use kirjastokaveri::ui::Body;
use kirjastokaveri::{handle_event, initialize, Action, AppState, Config, Event, ViewMode};
use std::collections::BTreeMap;

fn state() -> AppState {
    initialize(&Config {
        api_base_url: "http://api".to_string(),
        ..Config::default()
    })
}

fn send(state: &mut AppState, event: Event) -> Vec<Action> {
    handle_event(state, &event).unwrap().1
}

fn requests(actions: &[Action]) -> Vec<&HttpRequest> {
    actions
        .iter()
        .filter_map(|a| match a {
            Action::WebRequest(r) => Some(r),
            _ => None,
        })
        .collect()
}

fn respond(state: &mut AppState, request: &HttpRequest, status: u16, body: &str) -> bool {
    handle_event(
        state,
        &Event::HttpResponse {
            status,
            body: body.as_bytes().to_vec(),
            context: request.context.to_map(),
        },
    )
    .unwrap()
    .0
}

fn search(state: &mut AppState, query: &str) -> HttpRequest {
    send(state, Event::SearchMode);
    state.search_query = query.to_string();
    let actions = send(state, Event::SubmitSearch);
    requests(&actions)[0].clone()
}

fn search_body(records: &[(&str, &str)]) -> String {
    let records: Vec<String> = records
        .iter()
        .map(|(id, title)| {
            format!(
                r#"{{"record_id":"{id}","title":"{title}","authors":["Tove Jansson"],"buildings":["Oodi","Kallio"]}}"#
            )
        })
        .collect();
    format!(r#"{{"total_hits":{},"records":[{}]}}"#, records.len(), records.join(","))
}

fn availability_body(id: &str, library: &str) -> String {
    format!(
        r#"{{"record_id":"{id}","items":[{{"library":"{library}","status":"Available","available_count":1,"total_count":1}}]}}"#
    )
}

fn loaded_names(state: &AppState) -> Option<Vec<String>> {
    state
        .availability
        .buildings()
        .map(|b| b.iter().map(|x| x.name.clone()).collect())
}

#[test]
fn search_then_open_detail_shows_live_availability() {
    let mut s = state();
    let request = search(&mut s, "muumi");
    assert!(request.url.starts_with("http://api/search?query=muumi"));

    assert!(respond(&mut s, &request, 200, &search_body(&[("m1", "Muumipappa")])));
    assert_eq!(s.results.len(), 1);
    assert_eq!(s.submitted_query, "muumi");

    let actions = send(&mut s, Event::Select);
    let fetch = requests(&actions)[0].clone();
    assert_eq!(s.view_mode, ViewMode::Detail);
    assert!(s.availability.is_loading());

    assert!(respond(&mut s, &fetch, 200, &availability_body("m1", "Oodi")));
    assert_eq!(loaded_names(&s), Some(vec!["Oodi".to_string()]));

    let Body::Detail(detail) = s.compute_viewmodel(40, 100).body else {
        panic!("expected detail view");
    };
    let AvailabilityView::Loaded { badge, rows, .. } = detail.availability else {
        panic!("expected loaded availability");
    };
    assert_eq!(badge.text, "Available now · 1/1 library");
    assert!(rows[0].is_available);
}

#[test]
fn closing_mid_fetch_then_reopening_applies_only_second_fetch() {
    let mut s = state();
    let request = search(&mut s, "kalevala");
    respond(&mut s, &request, 200, &search_body(&[("k1", "Kalevala")]));

    let first = requests(&send(&mut s, Event::Select))[0].clone();
    send(&mut s, Event::Back);
    assert_eq!(s.view_mode, ViewMode::Results);
    assert!(!s.availability.is_loading());

    let second = requests(&send(&mut s, Event::Select))[0].clone();
    assert_ne!(first.context, second.context);

    assert!(!respond(&mut s, &first, 200, &availability_body("k1", "Stale")));
    assert!(s.availability.is_loading());
    assert_eq!(loaded_names(&s), None);

    assert!(respond(&mut s, &second, 200, &availability_body("k1", "Fresh")));
    assert_eq!(loaded_names(&s), Some(vec!["Fresh".to_string()]));
}

#[test]
fn switching_books_discards_earlier_fetch() {
    let mut s = state();
    let request = search(&mut s, "tove");
    respond(
        &mut s,
        &request,
        200,
        &search_body(&[("x", "Muumipeikko"), ("y", "Taikatalvi")]),
    );

    let fetch_x = requests(&send(&mut s, Event::Select))[0].clone();
    send(&mut s, Event::Back);
    send(&mut s, Event::KeyDown);
    let fetch_y = requests(&send(&mut s, Event::Select))[0].clone();

    respond(&mut s, &fetch_y, 200, &availability_body("y", "For Y"));
    respond(&mut s, &fetch_x, 200, &availability_body("x", "For X"));
    assert_eq!(loaded_names(&s), Some(vec!["For Y".to_string()]));
    assert_eq!(s.detail.as_ref().map(|b| b.id.as_str()), Some("y"));
}

#[test]
fn failed_fetch_falls_back_to_search_buildings() {
    let mut s = state();
    let request = search(&mut s, "kalevala");
    respond(&mut s, &request, 200, &search_body(&[("k1", "Kalevala")]));

    let fetch = requests(&send(&mut s, Event::Select))[0].clone();
    assert!(respond(&mut s, &fetch, 500, "internal error"));

    assert_eq!(
        loaded_names(&s),
        Some(vec!["Oodi".to_string(), "Kallio".to_string()])
    );
    assert!(!s.availability.is_loading());
}

#[test]
fn stale_search_response_never_replaces_newer_results() {
    let mut s = state();
    let old = search(&mut s, "muumi");
    let new = search(&mut s, "kalevala");

    assert!(respond(&mut s, &new, 200, &search_body(&[("k1", "Kalevala")])));
    assert!(!respond(&mut s, &old, 200, &search_body(&[("m1", "Muumipappa")])));

    assert_eq!(s.results[0].id, "k1");
    assert_eq!(s.submitted_query, "kalevala");
}

fn fill_signup(state: &mut AppState, name: &str, email: &str, password: &str, confirm: &str) {
    send(state, Event::OpenAuth(AuthMode::Login));
    send(state, Event::SwitchAuthMode);
    for value in [name, email, password, confirm] {
        for c in value.chars() {
            send(state, Event::Char(c));
        }
        send(state, Event::NextField);
    }
}

fn toast_messages(state: &AppState) -> Vec<String> {
    state.notifications.iter().map(|t| t.message.clone()).collect()
}

#[test]
fn mismatched_signup_passwords_send_nothing() {
    let mut s = state();
    fill_signup(&mut s, "Aino", "aino@example.fi", "secret1", "secret2");

    let actions = send(&mut s, Event::SubmitAuth);
    assert!(requests(&actions).is_empty());
    assert_eq!(toast_messages(&s), ["Passwords do not match"]);
    assert!(!s.auth.as_ref().unwrap().submitting);
}

#[test]
fn five_character_signup_password_is_rejected_locally() {
    let mut s = state();
    fill_signup(&mut s, "Aino", "aino@example.fi", "abcde", "abcde");

    let actions = send(&mut s, Event::SubmitAuth);
    assert!(requests(&actions).is_empty());
    assert_eq!(toast_messages(&s), ["Password must be at least 6 characters"]);
}

#[test]
fn valid_signup_posts_derived_username() {
    let mut s = state();
    fill_signup(&mut s, "Aino Virtanen", "aino@example.fi", "secret1", "secret1");

    let actions = send(&mut s, Event::SubmitAuth);
    let request = requests(&actions)[0];
    assert_eq!(request.url, "http://api/auth/signup");
    let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
    assert_eq!(body["username"], "aino_virtanen");
    assert_eq!(body["full_name"], "Aino Virtanen");

    let accepted = r#"{"access_token":"a","refresh_token":"r","token_type":"bearer"}"#;
    respond(&mut s, request, 201, accepted);
    assert_eq!(s.session.as_ref().map(|x| x.email.as_str()), Some("aino@example.fi"));
    assert!(s.auth.is_none());
}

#[test]
fn foreign_responses_are_ignored() {
    let mut s = state();
    let (redraw, actions) = handle_event(
        &mut s,
        &Event::HttpResponse {
            status: 200,
            body: Vec::new(),
            context: BTreeMap::new(),
        },
    )
    .unwrap();
    assert!(!redraw);
    assert!(actions.is_empty());
}
