mod common;

use common::{filled_intake_form, form_path, refused_api, StubServer, TestEnv};
use serde_json::json;
use std::fs;
use std::io::ErrorKind;
use std::net::TcpListener;

#[test]
fn builder_propose_sizes_roles_from_description_and_budget() {
    let env = TestEnv::new();
    let out = env.run_json(&[
        "builder",
        "propose",
        "--description",
        "we are drowning in customer support tickets",
        "--budget",
        "$5,000",
    ]);

    assert_eq!(out["ok"], true);
    let data = &out["data"];
    assert_eq!(data["roles"][0]["title"], "Customer Support Specialists");
    assert_eq!(data["roles"][0]["count"], 2);
    assert_eq!(data["roles"][0]["monthly_cost"], 2000.0);
    assert_eq!(data["total_monthly_cost"], 2000.0);
    assert_eq!(data["estimated_savings"], 4600.0);
}

#[test]
fn builder_propose_falls_back_to_generalists() {
    let env = TestEnv::new();
    let out = env.run_json(&[
        "builder",
        "propose",
        "--description",
        "something entirely unrelated",
        "--budget",
        "3000",
    ]);

    assert_eq!(out["ok"], true);
    assert_eq!(
        out["data"]["roles"][0]["title"],
        "General Virtual Assistants"
    );
    assert_eq!(out["data"]["roles"][0]["count"], 2);
}

#[test]
fn intake_validate_reports_every_step_ok_for_a_filled_form() {
    let env = TestEnv::new();
    let file = form_path(&env, "intake.json", &filled_intake_form());

    let out = env.run_json(&["intake", "validate", "--file", &file]);
    assert_eq!(out["ok"], true);
    let steps = out["data"].as_array().expect("step reports");
    assert_eq!(steps.len(), 4);
    for report in steps {
        assert_eq!(report["check"]["status"], "ok", "step {}", report["step"]);
    }
}

#[test]
fn intake_validate_flags_short_challenge_text_on_step_three() {
    let env = TestEnv::new();
    let mut form = filled_intake_form();
    form["current_challenges"] = json!("too short");
    let file = form_path(&env, "intake.json", &form);

    let out = env.run_json(&["intake", "validate", "--file", &file, "--step", "3"]);
    assert_eq!(out["ok"], true);
    let report = &out["data"][0];
    assert_eq!(report["step"], 3);
    assert_eq!(report["check"]["status"], "fail");
    let errors = report["check"]["errors"].as_array().expect("field errors");
    assert!(errors
        .iter()
        .any(|e| e["field"] == "current_challenges"
            && e["message"].as_str().unwrap().contains("minimum 20 characters")));
}

#[test]
fn intake_validate_rejects_out_of_range_step() {
    let env = TestEnv::new();
    let file = form_path(&env, "intake.json", &filled_intake_form());

    let out = env.run_json_err(None, &["intake", "validate", "--file", &file, "--step", "9"]);
    assert_eq!(out["ok"], false);
    assert_eq!(out["error"]["code"], "STEP_OUT_OF_RANGE");
}

#[test]
fn intake_submit_posts_wire_shape_and_reports_receipt() {
    let env = TestEnv::new();
    let file = form_path(&env, "intake.json", &filled_intake_form());
    let server = StubServer::json(200, r#"{"id":"lead_123"}"#);
    let base = server.base.clone();

    let out = env.run_json_api(&base, &["intake", "submit", "--file", &file]);
    assert_eq!(out["ok"], true);
    assert_eq!(out["data"]["id"], "lead_123");

    let request = server.finish();
    assert!(request.starts_with("POST /api/lead-intake HTTP/1.1"));
    // wire renames: contact_name -> full_name, timeline -> start_timeline
    assert!(request.contains("\"full_name\":\"Dana Cruz\""));
    assert!(request.contains("\"start_timeline\":\"within a month\""));
    assert!(!request.contains("contact_name"));
    // budget crosses the wire as a number
    assert!(request.contains("\"monthly_budget\":5000.0"));
}

#[test]
fn intake_submit_with_invalid_form_never_touches_the_network() {
    let env = TestEnv::new();
    let mut form = filled_intake_form();
    form["email"] = json!("not-an-email");
    let file = form_path(&env, "intake.json", &form);

    let listener = TcpListener::bind("127.0.0.1:0").expect("bind sentinel");
    listener.set_nonblocking(true).expect("nonblocking sentinel");
    let base = format!("http://{}", listener.local_addr().expect("sentinel addr"));

    let out = env.run_json_err(Some(&base), &["intake", "submit", "--file", &file]);
    assert_eq!(out["ok"], false);
    assert_eq!(out["error"]["code"], "VALIDATION_FAILED");

    // nothing ever connected to the sentinel
    match listener.accept() {
        Err(e) if e.kind() == ErrorKind::WouldBlock => {}
        other => panic!("unexpected connection attempt: {:?}", other),
    }
}

#[test]
fn intake_draft_save_resume_discard_cycle() {
    let env = TestEnv::new();
    let file = form_path(&env, "intake.json", &filled_intake_form());

    let saved = env.run_json(&["intake", "save", "--file", &file]);
    assert_eq!(saved["ok"], true);

    let resumed = env.run_json(&["intake", "resume"]);
    assert_eq!(resumed["data"]["form"]["contact_name"], "Dana Cruz");
    assert_eq!(resumed["data"]["step"], 0);

    let discarded = env.run_json(&["intake", "discard"]);
    assert_eq!(discarded["data"], true);

    let empty = env.run_json(&["intake", "resume"]);
    assert!(empty["data"].is_null());
}

#[test]
fn intake_next_and_back_move_the_saved_cursor() {
    let env = TestEnv::new();
    let file = form_path(&env, "intake.json", &filled_intake_form());
    env.run_json(&["intake", "save", "--file", &file]);

    let moved = env.run_json(&["intake", "next"]);
    assert_eq!(moved["data"]["step"], 2);
    assert_eq!(moved["data"]["title"], "Company");
    assert_eq!(moved["data"]["check"]["status"], "ok");
    assert_eq!(moved["data"]["at_end"], false);

    let back = env.run_json(&["intake", "back"]);
    assert_eq!(back["data"]["step"], 1);

    // going back never runs validation and clamps at the first step
    let clamped = env.run_json(&["intake", "back"]);
    assert_eq!(clamped["data"]["step"], 1);
}

#[test]
fn intake_next_clamps_at_the_final_step() {
    let env = TestEnv::new();
    let file = form_path(&env, "intake.json", &filled_intake_form());
    env.run_json(&["intake", "save", "--file", &file]);

    for _ in 0..3 {
        env.run_json(&["intake", "next"]);
    }
    let last = env.run_json(&["intake", "next"]);
    assert_eq!(last["data"]["step"], 4);
    assert_eq!(last["data"]["at_end"], true);
}

#[test]
fn intake_next_holds_position_when_the_step_fails() {
    let env = TestEnv::new();
    let mut form = filled_intake_form();
    form["email"] = json!("nope");
    let file = form_path(&env, "intake.json", &form);
    env.run_json(&["intake", "save", "--file", &file]);

    let held = env.run_json(&["intake", "next"]);
    assert_eq!(held["data"]["step"], 1);
    assert_eq!(held["data"]["check"]["status"], "fail");

    // the saved draft did not move either
    let resumed = env.run_json(&["intake", "resume"]);
    assert_eq!(resumed["data"]["step"], 0);
}

#[test]
fn intake_submit_consumes_the_saved_draft() {
    let env = TestEnv::new();
    let file = form_path(&env, "intake.json", &filled_intake_form());
    env.run_json(&["intake", "save", "--file", &file]);

    let server = StubServer::json(200, r#"{"id":"lead_9"}"#);
    let base = server.base.clone();
    let out = env.run_json_api(&base, &["intake", "submit"]);
    assert_eq!(out["data"]["id"], "lead_9");
    server.finish();

    // successful submission drops the draft
    let resumed = env.run_json(&["intake", "resume"]);
    assert!(resumed["data"].is_null());
}

#[test]
fn profile_progress_counts_required_fields_only() {
    let env = TestEnv::new();
    let form = json!({
        "display_name": "Sam Rivera",
        "headline": "Support lead",
        "location": "Cebu",
        "skills": [],
        "years_experience": "",
        "hourly_rate": "",
        "availability": ""
    });
    let file = form_path(&env, "profile.json", &form);

    let out = env.run_json(&["profile", "progress", "--file", &file]);
    assert_eq!(out["ok"], true);
    assert_eq!(out["data"], 40.0);
}

#[test]
fn profile_submit_renames_display_name_on_the_wire() {
    let env = TestEnv::new();
    let form = json!({
        "display_name": "Sam Rivera",
        "headline": "Support lead with 6 years in SaaS",
        "location": "Manila",
        "skills": ["zendesk", "sql"],
        "years_experience": "6",
        "hourly_rate": "25",
        "availability": "full-time"
    });
    let file = form_path(&env, "profile.json", &form);
    let server = StubServer::json(200, r#"{"id":"talent_7"}"#);
    let base = server.base.clone();

    let out = env.run_json_api(&base, &["profile", "submit", "--file", &file]);
    assert_eq!(out["data"]["id"], "talent_7");

    let request = server.finish();
    assert!(request.starts_with("POST /api/talents/profile HTTP/1.1"));
    assert!(request.contains("\"name\":\"Sam Rivera\""));
    assert!(!request.contains("display_name"));
}

#[test]
fn roi_calc_reads_inputs_from_file() {
    let env = TestEnv::new();
    let inputs = json!({
        "roles": [
            { "title": "Support", "headcount": 4, "hourly_rate": 28.0, "hours_per_week": 40.0 }
        ],
        "outsource_pct": 50.0
    });
    let file = form_path(&env, "roi.json", &inputs);

    let out = env.run_json(&["roi", "calc", "--file", &file]);
    assert_eq!(out["ok"], true);
    let data = &out["data"];
    assert_eq!(data["total_headcount"], 4);
    assert_eq!(data["outsourced_headcount"], 2);
    assert_eq!(data["retained_headcount"], 2);
    assert!(data["annual_savings"].as_f64().expect("savings") > 0.0);
    assert_eq!(
        data["projections"].as_array().expect("projections").len(),
        3
    );
}

#[test]
fn onboarding_cycle_updates_state_sentinels() {
    let env = TestEnv::new();

    let status = env.run_json(&["--user", "u1", "onboarding", "status"]);
    assert_eq!(status["data"]["status"], "pending");

    env.run_json(&["--user", "u1", "onboarding", "skip"]);
    let status = env.run_json(&["--user", "u1", "onboarding", "status"]);
    assert_eq!(status["data"]["status"], "skipped");

    // state.json keeps the "true" string sentinel shape
    let raw = fs::read_to_string(env.home.join(".config/workbridge/state.json"))
        .expect("state file written");
    let state: serde_json::Value = serde_json::from_str(&raw).expect("state json");
    assert_eq!(state["flags"]["onboarding_skipped_u1"], "true");

    env.run_json(&["--user", "u1", "onboarding", "complete"]);
    let status = env.run_json(&["--user", "u1", "onboarding", "status"]);
    assert_eq!(status["data"]["status"], "completed");

    env.run_json(&["--user", "u1", "onboarding", "reset"]);
    let status = env.run_json(&["--user", "u1", "onboarding", "status"]);
    assert_eq!(status["data"]["status"], "pending");

    // flags are per user
    let other = env.run_json(&["--user", "u2", "onboarding", "status"]);
    assert_eq!(other["data"]["status"], "pending");
}

#[test]
fn cert_list_serves_cache_when_the_api_is_unreachable() {
    let env = TestEnv::new();
    let body = r#"[{"id":1,"name":"AWS SAA","issuer":"Amazon"}]"#;
    let server = StubServer::json(200, body);
    let base = server.base.clone();

    let live = env.run_json_api(&base, &["--user", "u1", "cert", "list"]);
    assert_eq!(live["data"][0]["name"], "AWS SAA");
    server.finish();

    // same resource, dead endpoint: the cached copy answers
    let offline = env.run_json_api(&refused_api(), &["--user", "u1", "cert", "list"]);
    assert_eq!(offline["data"][0]["name"], "AWS SAA");
}

#[test]
fn jobs_search_encodes_the_query() {
    let env = TestEnv::new();
    let server = StubServer::json(200, r#"[{"id":"j1","title":"Support Rep","company":"Acme"}]"#);
    let base = server.base.clone();

    let out = env.run_json_api(&base, &["jobs", "search", "customer support", "--remote"]);
    assert_eq!(out["data"][0]["id"], "j1");

    // reqwest's form encoding: spaces travel as '+'
    let request = server.finish();
    assert!(request.starts_with("GET /api/jobs/search?query=customer+support&remote=true"));
}

#[test]
fn auth_login_reports_the_redirect_url() {
    let env = TestEnv::new();
    let server = StubServer::json(200, r#"{"redirect_url":"https://accounts.example/consent"}"#);
    let base = server.base.clone();

    let out = env.run_json_api(&base, &["auth", "login", "--provider", "google"]);
    assert_eq!(out["data"]["provider"], "google");
    assert_eq!(out["data"]["redirect_url"], "https://accounts.example/consent");

    let request = server.finish();
    assert!(request.starts_with("POST /api/auth/google HTTP/1.1"));
}

#[test]
fn train_chat_streams_tokens_in_arrival_order() {
    let env = TestEnv::new();
    let body = "data: {\"text\":\"Hello\"}\n\ndata: {\"text\":\", world\"}\n\ndata: [DONE]\n\n";
    let server = StubServer::one_shot(200, "text/event-stream", body);
    let base = server.base.clone();

    env.cmd()
        .args(["--api", &base, "train", "chat", "hi"])
        .assert()
        .success()
        .stdout(predicates::str::contains("Hello, world"));

    let request = server.finish();
    assert!(request.starts_with("POST /api/train/chat/stream HTTP/1.1"));
    assert!(request.contains("\"message\":\"hi\""));
}

#[test]
fn train_chat_json_mode_returns_the_full_transcript() {
    let env = TestEnv::new();
    let body = "data: {\"text\":\"Hel\"}\n\ndata: {\"text\":\"lo\"}\n\ndata: [DONE]\n\n";
    let server = StubServer::one_shot(200, "text/event-stream", body);
    let base = server.base.clone();

    let out = env.run_json_api(&base, &["train", "chat", "hi"]);
    assert_eq!(out["ok"], true);
    assert_eq!(out["data"]["transcript"], "Hello");
    server.finish();
}

#[test]
fn train_feedback_posts_the_verdict() {
    let env = TestEnv::new();
    let server = StubServer::json(200, r#"{"ok":true}"#);
    let base = server.base.clone();

    let out = env.run_json_api(
        &base,
        &["train", "feedback", "log_42", "--verdict", "down", "--comment", "off topic"],
    );
    assert_eq!(out["ok"], true);

    let request = server.finish();
    assert!(request.starts_with("POST /api/feedback HTTP/1.1"));
    assert!(request.contains("\"log_id\":\"log_42\""));
    assert!(request.contains("\"verdict\":\"down\""));
}

#[test]
fn bearer_token_rides_the_authorization_header() {
    let env = TestEnv::new();
    let server = StubServer::json(200, r#"{"id":"talent_1"}"#);
    let base = server.base.clone();
    let form = json!({
        "display_name": "Sam Rivera",
        "headline": "Support lead with 6 years in SaaS",
        "location": "Manila",
        "skills": ["zendesk"],
        "years_experience": "6",
        "hourly_rate": "25",
        "availability": "full-time"
    });
    let file = form_path(&env, "profile.json", &form);

    env.run_json_api(
        &base,
        &["--token", "tok_abc", "profile", "submit", "--file", &file],
    );

    let request = server.finish();
    assert!(request
        .to_ascii_lowercase()
        .contains("authorization: bearer tok_abc"));
}
