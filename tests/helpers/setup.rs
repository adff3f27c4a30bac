use appointer_api::Application;
use appointer_infra::{AppointerContext, InMemoryNotificationSender, InMemoryUserDirectory};
use std::sync::Arc;

pub struct TestApp {
    pub ctx: AppointerContext,
    pub address: String,
    pub mailer: Arc<InMemoryNotificationSender>,
    pub users: Arc<InMemoryUserDirectory>,
}

// Launch the application as a background task
pub async fn spawn_app() -> TestApp {
    let mut ctx = AppointerContext::create_inmemory();
    ctx.config.port = 0; // Random port
    let mailer = Arc::new(InMemoryNotificationSender::new());
    let users = Arc::new(InMemoryUserDirectory::new());
    ctx.services.mailer = mailer.clone();
    ctx.services.users = users.clone();

    let application = Application::new(ctx.clone())
        .await
        .expect("Failed to build application.");

    let address = format!("http://localhost:{}", application.port());
    let _ = actix_web::rt::spawn(async move {
        application
            .start()
            .await
            .expect("Expected application to start");
    });

    TestApp {
        ctx,
        address,
        mailer,
        users,
    }
}
