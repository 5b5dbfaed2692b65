use axum::{
    body::Body,
    http::{
        header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE},
        Request, StatusCode,
    },
    response::Response,
    Router,
};
use tower::ServiceExt;

use super::common::*;

const FORM: &str = "application/x-www-form-urlencoded";

fn session_cookie(response: &Response) -> String {
    let set_cookie = response
        .headers()
        .get(SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .expect("session cookie issued");
    set_cookie
        .split(';')
        .next()
        .expect("cookie pair")
        .to_string()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .expect("redirect location")
}

async fn get(app: &Router, uri: &str, cookie: Option<&str>) -> Response {
    let mut request = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        request = request.header(COOKIE, cookie);
    }
    app.clone()
        .oneshot(request.body(Body::empty()).expect("request"))
        .await
        .expect("router response")
}

async fn post(app: &Router, uri: &str, cookie: &str, body: &str) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(COOKIE, cookie)
        .header(CONTENT_TYPE, FORM)
        .body(Body::from(body.to_string()))
        .expect("request");
    app.clone().oneshot(request).await.expect("router response")
}

async fn open_wizard(app: &Router) -> String {
    let response = get(app, "/apply", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    session_cookie(&response)
}

#[tokio::test]
async fn first_visit_issues_session_cookie_and_renders_step_one() {
    let (service, _, _) = build_service();
    let app = router_with_service(service);

    let response = get(&app, "/apply", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response);
    assert!(cookie.starts_with("candidature_session="));

    let body = read_json_body(response).await;
    assert_eq!(body["step"], 1);
    assert_eq!(body["title"], "Postuler - Étape 1 sur 5");
    assert_eq!(body["label"], "Informations personnelles");
    assert_eq!(body["submit_label"], "Suivant");
    assert_eq!(body["can_go_back"], false);
    assert!(body.get("errors").is_none());

    let again = get(&app, "/apply", Some(&cookie)).await;
    assert_eq!(again.status(), StatusCode::OK);
    assert!(again.headers().get(SET_COOKIE).is_none());
}

#[tokio::test]
async fn full_wizard_redirects_to_confirmation() {
    let (service, repository, _) = build_service();
    let app = router_with_service(service);
    let cookie = open_wizard(&app).await;

    let steps = [
        "firstName=Test&lastName=User&email=test.user%40example.com&phone=0123456789&hasExperience=1",
        "experienceDetails=2+years+as+a+developer.",
        "isImmediatelyAvailable=1",
    ];
    for body in steps {
        let response = post(&app, "/apply", &cookie, body).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{body}");
        assert_eq!(location(&response), "/apply");
    }

    let step_four = read_json_body(get(&app, "/apply", Some(&cookie)).await).await;
    assert_eq!(step_four["step"], 4);
    assert_eq!(step_four["submit_label"], "CONFIRMER LA MISSION");

    let response = post(&app, "/apply", &cookie, "consentRGPD=1").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/success/1");
    assert_eq!(repository.count(), 1);

    let confirmation = get(&app, "/success/1", None).await;
    assert_eq!(confirmation.status(), StatusCode::OK);
    let body = read_json_body(confirmation).await;
    assert_eq!(body["title"], "Candidature envoyée avec succès !");
    assert_eq!(body["status"], "submitted");
    let summary: Vec<&str> = body["summary"]
        .as_array()
        .expect("summary lines")
        .iter()
        .filter_map(|line| line.as_str())
        .collect();
    assert!(summary.contains(&"Prénom : Test"));
    assert!(summary.contains(&"Expérience : Oui"));
    assert!(summary.contains(&"Disponibilité : Immédiate"));
    assert!(summary.contains(&"Consentement RGPD : Accepté"));
}

#[tokio::test]
async fn invalid_step_returns_unprocessable_with_messages() {
    let (service, _, _) = build_service();
    let app = router_with_service(service);
    let cookie = open_wizard(&app).await;

    let response = post(
        &app,
        "/apply",
        &cookie,
        "firstName=Test&lastName=User&email=not-an-email",
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = read_json_body(response).await;
    assert_eq!(body["step"], 1);
    assert_eq!(body["values"]["email"], "not-an-email");
    assert_eq!(body["errors"][0]["field"], "email");
    assert_eq!(
        body["errors"][0]["message"],
        "L'adresse email \"not-an-email\" n'est pas valide."
    );

    let still_first = read_json_body(get(&app, "/apply", Some(&cookie)).await).await;
    assert_eq!(still_first["step"], 1);
}

#[tokio::test]
async fn back_and_reset_transitions_redirect_to_wizard() {
    let (service, _, _) = build_service();
    let app = router_with_service(service);
    let cookie = open_wizard(&app).await;

    let response = post(
        &app,
        "/apply",
        &cookie,
        "firstName=Test&lastName=User&email=test.user%40example.com",
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let step_three = read_json_body(get(&app, "/apply", Some(&cookie)).await).await;
    assert_eq!(step_three["step"], 3);
    assert_eq!(step_three["progress"][1]["state"], "skipped");

    let response = post(&app, "/apply", &cookie, "transition=back").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let back = read_json_body(get(&app, "/apply", Some(&cookie)).await).await;
    assert_eq!(back["step"], 1);
    assert_eq!(back["values"]["firstName"], "Test");

    let response = post(&app, "/apply/reset", &cookie, "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/apply");
    let fresh = read_json_body(get(&app, "/apply", Some(&cookie)).await).await;
    assert_eq!(fresh["step"], 1);
    assert!(fresh["values"].as_object().expect("values").is_empty());
}

#[tokio::test]
async fn unknown_or_malformed_candidate_is_not_found() {
    let (service, _, _) = build_service();
    let app = router_with_service(service);

    for uri in ["/success/42", "/success/abc"] {
        let response = get(&app, uri, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        let body = read_json_body(response).await;
        assert_eq!(body["error"], "candidature not found");
    }
}
