// Sign up, log in, read the user, search invoices and log out.
//
// Run with:
//   USERAPP_APP_ID=<your app id> cargo run -p userapp-client --example demo

use userapp_client::{
    logging, param_array, param_struct, Client, ClientOptions, ConfigError, UserAppError,
};

#[tokio::main]
async fn main() {
    logging::init_logging();

    if let Err(err) = run().await {
        match err {
            UserAppError::InvalidMethod(message) => {
                eprintln!("The method you are trying to call does not exist: {}", message)
            }
            UserAppError::InvalidService(message) => {
                eprintln!("The service you are trying to call does not exist: {}", message)
            }
            UserAppError::Service { message, .. } => {
                eprintln!("The API responded with an error: {}", message)
            }
            UserAppError::Transport(err) => {
                eprintln!("Something went wrong with the connection: {}", err)
            }
            other => eprintln!("General error: {}", other),
        }
    }
}

async fn run() -> Result<(), UserAppError> {
    let options = match ClientOptions::from_env() {
        Ok(options) => options,
        Err(ConfigError::MissingVar(_)) => ClientOptions::new("YOUR-USERAPP-APP-ID"),
        Err(err) => {
            eprintln!("Invalid configuration: {}", err);
            return Ok(());
        }
    };
    let client = Client::new(options)?;

    client
        .method("user.save")
        .parameter("login", "johndoe81")
        .parameter("password", "iwasfirst!111")
        .parameter("first_name", "John")
        .call()
        .await?;

    let result = client
        .method("user.login")
        .parameter("login", "johndoe81")
        .parameter("password", "iwasfirst!111")
        .call()
        .await?;
    println!("Logged in. Session Token: {}", result.get("token").as_string()?);

    let result = client.method("user.get").parameter("user_id", "self").call().await?;
    println!("Welcome, {}!", result.get(0).get("first_name").as_string()?);

    let invoices = client
        .method("user.invoice.search")
        .parameter("user_id", "self")
        .parameter(
            "sort",
            param_struct! {
                "created_at" => "asc",
                "updated_at" => "asc",
            },
        )
        .parameter("fields", param_array!["invoice_id", "created_at"])
        .call()
        .await?
        .get("items")
        .items();
    println!("Found {} invoices", invoices.len());

    client.method("user.logout").call().await?;
    println!("Logged out.");

    Ok(())
}
