pub mod auth;
pub mod health;
pub mod tasks;

use actix_web::web;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(auth::signup)
            .service(auth::login)
            .service(auth::logout),
    )
    .service(
        web::scope("/tasks")
            .service(tasks::create_task)
            .service(tasks::list_tasks)
            .service(tasks::update_task)
            .service(tasks::remove_task),
    );
}
