mod appointment;
mod category;
mod job_schedulers;
mod reminder;
mod shared;
mod status;

use actix_cors::Cors;
use actix_web::{dev::Server, middleware, web, App, HttpServer};
use appointer_infra::AppointerContext;
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

pub use appointment::{
    create_appointment::CreateAppointmentUseCase, delete_appointment::DeleteAppointmentUseCase,
    get_appointments::GetAppointmentsUseCase, update_appointment::UpdateAppointmentUseCase,
    AppointmentDetails, AppointmentWithReminders,
};
pub use category::{create_category::CreateCategoryUseCase, get_categories::GetCategoriesUseCase};
pub use job_schedulers::{ReminderScheduler, SchedulerError};
pub use reminder::{
    replace_reminders::ReplaceRemindersUseCase,
    send_due_reminders::{SendDueRemindersUseCase, SweepReport},
};
pub use shared::usecase::{execute, UseCase};

pub fn configure_server_api(cfg: &mut web::ServiceConfig) {
    status::configure_routes(cfg);
}

pub struct Application {
    server: Server,
    port: u16,
    scheduler: ReminderScheduler,
}

impl Application {
    pub async fn new(context: AppointerContext) -> anyhow::Result<Self> {
        let (server, port) = Application::configure_server(context.clone()).await?;
        let scheduler = ReminderScheduler::start(context)?;

        Ok(Self {
            server,
            port,
            scheduler,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    async fn configure_server(context: AppointerContext) -> Result<(Server, u16), std::io::Error> {
        let port = context.config.port;
        let address = format!("0.0.0.0:{}", port);
        let listener = TcpListener::bind(&address)?;
        let port = listener.local_addr()?.port();

        let server = HttpServer::new(move || {
            let ctx = context.clone();

            App::new()
                .wrap(Cors::permissive())
                .wrap(middleware::Compress::default())
                .wrap(TracingLogger::default())
                .app_data(web::Data::new(ctx))
                .service(web::scope("/api/v1").configure(configure_server_api))
        })
        .listen(listener)?
        .workers(4)
        .run();

        Ok((server, port))
    }

    /// Runs the server until it is shut down, then stops the reminder dispatcher
    pub async fn start(self) -> Result<(), std::io::Error> {
        let res = self.server.await;
        self.scheduler.stop().await;
        res
    }
}
