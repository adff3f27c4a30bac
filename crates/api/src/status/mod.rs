use actix_web::{web, HttpResponse};
use appointer_infra::AppointerContext;
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusResponse {
    message: String,
    reminder_dispatcher_running: bool,
}

async fn status(ctx: web::Data<AppointerContext>) -> HttpResponse {
    HttpResponse::Ok().json(StatusResponse {
        message: "Yo! We are up!\r\n".into(),
        reminder_dispatcher_running: ctx.dispatch_lease.is_held(),
    })
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(status));
}
