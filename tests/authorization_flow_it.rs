#![cfg(all(feature = "reqwest", feature = "test"))]

// std
use std::collections::HashMap;
// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use tent_auth::{
	_preludet::*,
	app::{App, AppAuth},
	config::{AUTHORIZATION_STATE_LEN, POST_TYPE_APP, POST_TYPE_APP_AUTH},
	error::ConfigError,
	flows::{AuthorizationFlow, ExchangeState},
	post::{Post, PostType},
	server::ServerMeta,
};

fn url(value: &str) -> Url {
	Url::parse(value).expect("URL fixture should parse successfully.")
}

#[tokio::test]
async fn redirect_to_credentials_walkthrough() {
	let server = MockServer::start_async().await;
	let client = build_reqwest_test_client(&server.base_url());
	let mut flow = AuthorizationFlow::new("app-post-1");
	let request = flow.start(&client).expect("Fresh flows should start.").clone();
	let pairs: HashMap<_, _> = request.url.query_pairs().into_owned().collect();

	assert_eq!(request.url.path(), "/oauth");
	assert_eq!(pairs.get("client_id"), Some(&"app-post-1".into()));
	assert_eq!(pairs.get("state"), Some(&request.state));
	assert_eq!(request.state.len(), AUTHORIZATION_STATE_LEN);

	let redirect = url(&format!("https://app.example.com/cb?code=abc123&state={}", request.state));

	flow.receive_redirect(&redirect).expect("Redirect with matching state should be accepted.");

	assert_eq!(flow.state(), &ExchangeState::CodeReceived);

	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/oauth/token")
				.json_body(json!({ "code": "abc123", "token_type": "https://tent.io/oauth/hawk-token" }));
			then.status(200).json_body(json!({
				"access_token": "tok1",
				"hawk_key": "secret9",
				"hawk_algorithm": "sha256",
				"token_type": "https://tent.io/oauth/hawk-token"
			}));
		})
		.await;
	let credentials = flow.exchange(&client).await.expect("Exchange should succeed.");

	assert_eq!(credentials.id, "tok1");
	assert!(matches!(flow.state(), ExchangeState::Authorized(_)));

	let err = flow.exchange(&client).await.expect_err("A spent code must not be exchanged again.");

	assert!(matches!(err, Error::Config(ConfigError::InvalidTransition { .. })));

	mock.assert_async().await;
}

#[test]
fn app_registration_round_trips_through_post() {
	let app = App::builder(
		"Status",
		url("https://status.example.com"),
		url("https://status.example.com/oauth/callback"),
	)
	.description("Posts short status updates.")
	.scopes(["write_posts", "import_posts", "write_posts"])
	.read_post_type("https://tent.io/types/status/v0#")
	.write_post_type("https://tent.io/types/status/v0#")
	.build()
	.expect("App registration should build.");
	let post = app.to_post().expect("App should wrap into a post.");

	assert_eq!(post.post_type, PostType::App);
	assert!(post.permissions.public);
	assert_eq!(app.scopes.len(), 2);

	let wire = serde_json::to_value(&post).expect("Post should serialize.");

	assert_eq!(wire["type"], POST_TYPE_APP);
	assert_eq!(wire["content"]["name"], "Status");

	let decoded: Post = serde_json::from_value(wire).expect("Post should decode from the wire.");

	assert_eq!(App::from_post(&decoded).expect("App post should decode."), app);
}

#[test]
fn revoked_grants_are_refused() {
	let post: Post = serde_json::from_value(json!({
		"id": "auth-1",
		"type": POST_TYPE_APP_AUTH,
		"content": {
			"active": false,
			"scopes": ["write_posts"],
			"post_types": { "read": ["all"] }
		}
	}))
	.expect("App-auth post should decode.");
	let grant = AppAuth::from_post(&post).expect("Grant content should decode.");

	assert!(matches!(grant.ensure_active(), Err(Error::Revoked)));
	assert!(!grant.grants_scope("write_posts"));
	assert!(!grant.can_read("https://tent.io/types/status/v0#"));
	assert!(App::from_post(&post).is_err());
}

#[test]
fn preferred_server_is_used_for_endpoints() {
	let servers: Vec<ServerMeta> = serde_json::from_value(json!([
		{
			"preference": 1,
			"urls": {
				"oauth_auth": "https://backup.example.com/oauth",
				"oauth_token": "https://backup.example.com/oauth/token"
			}
		},
		{
			"version": "0.3",
			"preference": 0,
			"urls": {
				"oauth_auth": "https://primary.example.com/oauth",
				"oauth_token": "https://primary.example.com/oauth/token"
			}
		}
	]))
	.expect("Server list should decode.");
	let preferred = ServerMeta::preferred(&servers).expect("Server list is not empty.");

	assert_eq!(preferred.oauth_token_url().as_str(), "https://primary.example.com/oauth/token");
}
