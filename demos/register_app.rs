//! Builds an app registration post and the authorization redirect for it, then reads a
//! simulated redirect back into the flow.

// crates.io
use color_eyre::Result;
use url::Url;
// self
use tent_auth::{
	app::App,
	flows::{AuthorizationFlow, Client},
	server::ServerMeta,
};

fn main() -> Result<()> {
	color_eyre::install()?;

	let app = App::builder(
		"Demo Status",
		Url::parse("https://status.example.com")?,
		Url::parse("https://status.example.com/oauth/callback")?,
	)
	.description("Posts short status updates.")
	.scopes(["write_posts"])
	.write_post_type("https://tent.io/types/status/v0#")
	.build()?;
	let post = app.to_post()?;

	println!("POST this to the new_post endpoint:\n{}", serde_json::to_string_pretty(&post)?);

	let server = ServerMeta::builder()
		.oauth_auth(Url::parse("https://tent.example.com/oauth")?)
		.oauth_token(Url::parse("https://tent.example.com/oauth/token")?)
		.build()?;
	let client = Client::new(server);
	// The server answers the registration with the app post's id.
	let mut flow = AuthorizationFlow::new("demo-app-post");
	let request = flow.start(&client)?.clone();

	println!("Send your user to {}.", request.url);

	// Simulate the redirect handler receiving the user back.
	let redirect = Url::parse(&format!(
		"{}?code=demo-code&state={}",
		app.redirect_uri, request.state
	))?;

	flow.receive_redirect(&redirect)?;
	println!("Flow is now {}; call AuthorizationFlow::exchange to finish.", flow.state().as_str());

	Ok(())
}
