use dotenvy::dotenv;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use maktab::modules::accounts::model::{CreateAccountRequest, RoleDetails};
use maktab::modules::accounts::service::AccountService;
use maktab::router::init_router;
use maktab::state::init_app_state;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 && args[1] == "create-admin" {
        handle_create_admin(args).await;
        return;
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                // axum logs rejections from built-in extractors with the
                // `axum::rejection` target at `TRACE` level.
                format!(
                    "{}=debug,tower_http=debug,axum::rejection=trace",
                    env!("CARGO_CRATE_NAME")
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = init_app_state().await;
    let app = init_router(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    println!("🚀 Server running on http://localhost:3000");
    println!("📚 Swagger UI available at http://localhost:3000/swagger-ui");
    axum::serve(listener, app).await.unwrap();
}

async fn handle_create_admin(args: Vec<String>) {
    if args.len() != 5 {
        eprintln!("Usage: {} create-admin <full_name> <email> <password>", args[0]);
        std::process::exit(1);
    }

    let full_name = args[2].clone();
    let email = args[3].clone();
    let password = args[4].clone();

    let state = init_app_state().await;

    let request = CreateAccountRequest {
        password: Some(password),
        full_name,
        phone: None,
        details: RoleDetails::Admin {
            email: email.clone(),
        },
    };

    match AccountService::provision(&state.db, &state.identity_config, request).await {
        Ok(account) => {
            println!("✅ Admin account created");
            println!("   Email: {}", account.login);
            println!("   Id: {}", account.id);
        }
        Err(e) => {
            eprintln!("❌ Error creating admin: {}", e.error);
            std::process::exit(1);
        }
    }
}
