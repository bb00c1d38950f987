use clap::Parser;
use flightdeck_cli::{Args, Command, run, summary_line};
use flightdeck_model::{Package, PackageKind, PrimaryKey};
use pretty_assertions::assert_eq;
use serde_json::json;
use serial_test::serial;
use std::io::Write;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Clears the env fallbacks so only the given flags reach clap.
fn clear_env() {
    // SAFETY: every test that touches the environment is `#[serial]`.
    unsafe {
        std::env::remove_var("FLIGHTDECK_URL");
        std::env::remove_var("FLIGHTDECK_TOKEN");
    }
}

fn parse(argv: &[&str]) -> Args {
    clear_env();
    Args::try_parse_from(std::iter::once("flightdeck").chain(argv.iter().copied())).unwrap()
}

async fn run_to_string(args: &Args) -> String {
    let mut out = Vec::new();
    run(args, &mut out).await.unwrap();
    String::from_utf8(out).unwrap()
}

// ── Argument parsing ────────────────────────────────────────────

#[test]
#[serial]
fn parse_list_with_filters() {
    let args = parse(&["list", "--type", "l", "--author", "sally"]);
    assert_eq!(
        args.command,
        Command::List {
            kind: Some(PackageKind::Library),
            author: Some("sally".to_string()),
        }
    );
}

#[test]
#[serial]
fn parse_type_accepts_names() {
    let args = parse(&["create", "--type", "addon", "--full-name", "My Addon"]);
    assert_eq!(
        args.command,
        Command::Create {
            kind: PackageKind::Addon,
            full_name: "My Addon".to_string(),
            description: None,
        }
    );
}

#[test]
#[serial]
fn parse_rejects_unknown_type() {
    clear_env();
    let result = Args::try_parse_from(["flightdeck", "list", "--type", "plugin"]);
    assert!(result.is_err());
}

#[test]
#[serial]
fn parse_requires_command() {
    clear_env();
    assert!(Args::try_parse_from(["flightdeck"]).is_err());
}

#[test]
#[serial]
fn primary_key_flag() {
    assert_eq!(parse(&["show", "1"]).primary_key(), PrimaryKey::Id);
    assert_eq!(
        parse(&["--by-id-number", "show", "1"]).primary_key(),
        PrimaryKey::IdNumber
    );
}

#[test]
#[serial]
fn env_supplies_url_and_token_when_flags_absent() {
    clear_env();
    // SAFETY: serialized with every other test that reads these variables.
    unsafe {
        std::env::set_var("FLIGHTDECK_URL", "https://env.example.com");
        std::env::set_var("FLIGHTDECK_TOKEN", "env-token");
    }
    let from_env = Args::try_parse_from(["flightdeck", "list"]).unwrap();
    let from_flags =
        Args::try_parse_from(["flightdeck", "--url", "https://flag.example.com", "list"]).unwrap();
    clear_env();

    let config = from_env.server_config().unwrap();
    assert_eq!(config.base_url, "https://env.example.com");
    assert_eq!(config.auth_token.as_deref(), Some("env-token"));
    assert_eq!(
        from_flags.server_config().unwrap().base_url,
        "https://flag.example.com"
    );

    let cleared = parse(&["list"]).server_config().unwrap();
    assert_eq!(cleared.base_url, "http://localhost:8000");
    assert_eq!(cleared.auth_token, None);
}

// ── Config resolution ───────────────────────────────────────────

#[test]
#[serial]
fn flags_override_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"base_url": "https://file.example.com", "timeout_secs": 3, "auth_token": "from-file"}}"#
    )
    .unwrap();
    let config_path = file.path().to_str().unwrap().to_string();

    let args = parse(&["--config", &config_path, "--url", "https://flag.example.com", "list"]);
    let config = args.server_config().unwrap();
    assert_eq!(config.base_url, "https://flag.example.com");
    assert_eq!(config.timeout_secs, 3);
    assert_eq!(config.auth_token.as_deref(), Some("from-file"));
}

#[test]
#[serial]
fn missing_config_file_is_an_error() {
    let args = parse(&["--config", "/nonexistent/flightdeck.json", "list"]);
    let err = args.server_config().unwrap_err();
    assert!(err.to_string().contains("failed to load config"));
}

// ── summary_line ────────────────────────────────────────────────

#[test]
#[serial]
fn summary_line_shows_selected_key() {
    let package = Package {
        id: Some(7),
        id_number: Some(1003),
        version_name: Some("0.3".to_string()),
        ..Package::new(PackageKind::Addon, "My Addon")
    };
    assert_eq!(
        summary_line(&package, PrimaryKey::Id),
        "     7  addon    My Addon (0.3)"
    );
    assert_eq!(
        summary_line(&package, PrimaryKey::IdNumber),
        "  1003  addon    My Addon (0.3)"
    );
}

#[test]
#[serial]
fn summary_line_unsaved_unknown_type() {
    let package = Package {
        package_type: Some("x".to_string()),
        full_name: Some("Odd".to_string()),
        ..Default::default()
    };
    assert_eq!(summary_line(&package, PrimaryKey::Id), "     -  x        Odd");
}

// ── Commands against a server ───────────────────────────────────

fn listed_ids(output: &str) -> Vec<String> {
    output
        .lines()
        .map(|line| line.split_whitespace().next().unwrap().to_string())
        .collect()
}

async fn mount_listing_and_member(server: &MockServer, member_path: &str) {
    Mock::given(method("GET"))
        .and(path("/api/0/packages"))
        .and(query_param("type", "a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 7, "id_number": 1003, "type": "a", "full_name": "One"}
        ])))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(member_path))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7, "id_number": 1003, "type": "a", "full_name": "One"
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
#[serial]
async fn listed_id_fetches_same_member() {
    let server = MockServer::start().await;
    mount_listing_and_member(&server, "/api/0/packages/7").await;

    let listing = run_to_string(&parse(&["--url", &server.uri(), "list", "--type", "a"])).await;
    assert_eq!(listing, "     7  addon    One\n");

    let ids = listed_ids(&listing);
    let shown = run_to_string(&parse(&["--url", &server.uri(), "show", &ids[0]])).await;
    let printed: serde_json::Value = serde_json::from_str(&shown).unwrap();
    assert_eq!(printed["full_name"], "One");
}

#[tokio::test]
#[serial]
async fn listed_id_number_fetches_same_member() {
    let server = MockServer::start().await;
    mount_listing_and_member(&server, "/api/0/packages/1003").await;

    let url = server.uri();
    let listing =
        run_to_string(&parse(&["--url", &url, "--by-id-number", "list", "--type", "a"])).await;
    assert_eq!(listing, "  1003  addon    One\n");

    let ids = listed_ids(&listing);
    let shown = run_to_string(&parse(&["--url", &url, "--by-id-number", "show", &ids[0]])).await;
    let printed: serde_json::Value = serde_json::from_str(&shown).unwrap();
    assert_eq!(printed["id"], 7);
}

#[tokio::test]
#[serial]
async fn show_prints_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/0/packages/5"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": 5, "type": "l", "full_name": "Lib"})),
        )
        .mount(&server)
        .await;

    let args = parse(&["--url", &server.uri(), "show", "5"]);
    let output = run_to_string(&args).await;
    let printed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(printed, json!({"id": 5, "type": "l", "full_name": "Lib"}));
}

#[tokio::test]
#[serial]
async fn create_posts_new_package() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/0/packages"))
        .and(body_json(json!({"full_name": "Fresh", "description": "New one", "type": "l"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 9, "id_number": 1009, "full_name": "Fresh", "type": "l"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let args = parse(&[
        "--url",
        &server.uri(),
        "create",
        "--type",
        "l",
        "--full-name",
        "Fresh",
        "--description",
        "New one",
    ]);
    let output = run_to_string(&args).await;
    assert_eq!(output, "created      9  library  Fresh\n");
}

#[tokio::test]
#[serial]
async fn rename_updates_fetched_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/0/packages/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 9, "full_name": "Old", "type": "a"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/0/packages/9"))
        .and(body_json(json!({"id": 9, "full_name": "New", "type": "a"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 9, "full_name": "New", "type": "a"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let args = parse(&["--url", &server.uri(), "rename", "9", "New"]);
    let output = run_to_string(&args).await;
    assert_eq!(output, "renamed      9  addon    New\n");
}

#[tokio::test]
#[serial]
async fn rename_never_creates_when_fetched_record_lacks_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/0/packages/9"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"full_name": "Old", "type": "a"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/0/packages/9"))
        .and(body_json(json!({"full_name": "New", "type": "a"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"full_name": "New", "type": "a"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 99})))
        .expect(0)
        .mount(&server)
        .await;

    let args = parse(&["--url", &server.uri(), "rename", "9", "New"]);
    let output = run_to_string(&args).await;
    assert_eq!(output, "renamed      -  addon    New\n");
}

#[tokio::test]
#[serial]
async fn delete_by_id_number() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/0/packages/1003"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let args = parse(&["--url", &server.uri(), "--by-id-number", "delete", "1003"]);
    let output = run_to_string(&args).await;
    assert_eq!(output, "deleted 1003\n");
}

#[tokio::test]
#[serial]
async fn server_errors_surface_with_context() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let args = parse(&["--url", &server.uri(), "show", "77"]);
    let mut out = Vec::new();
    let err = run(&args, &mut out).await.unwrap_err();
    assert_eq!(err.to_string(), "failed to fetch package 77");
    assert!(out.is_empty());
}
