//! HTTP handlers and route configuration.

mod auth;
mod comments;
mod health;
mod posts;
mod users;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/logout", web::get().to(auth::logout))
                    .route("/me", web::get().to(auth::me))
                    .route("/refresh", web::post().to(auth::refresh))
                    .route("/updatedetails", web::put().to(auth::update_details))
                    .route("/updatepassword", web::put().to(auth::update_password))
                    .route("/forgotpassword", web::post().to(auth::forgot_password))
                    .route("/resetpassword/{token}", web::put().to(auth::reset_password)),
            )
            // Post routes
            .service(
                web::scope("/posts")
                    .route("", web::post().to(posts::create))
                    .route("/{id}", web::get().to(posts::get))
                    .route("/{id}", web::put().to(posts::update))
                    .route("/{id}/like", web::put().to(posts::toggle_like)),
            )
            // Comment routes
            .service(
                web::scope("/comments")
                    .route("", web::post().to(comments::create))
                    .route("/post/{post_id}", web::get().to(comments::list_for_post))
                    .route("/reply/{comment_id}", web::post().to(comments::create_reply))
                    .route("/{id}", web::get().to(comments::get))
                    .route("/{id}", web::put().to(comments::update))
                    .route("/{id}", web::delete().to(comments::soft_delete))
                    .route("/{id}/like", web::put().to(comments::toggle_like))
                    .route(
                        "/{id}/attachments/{filename}",
                        web::delete().to(comments::remove_attachment),
                    ),
            )
            // User routes
            .service(
                web::scope("/users")
                    .route("", web::get().to(users::list))
                    .route("/saved-items/toggle", web::post().to(users::toggle_saved))
                    .route("/saved-items/check", web::get().to(users::check_saved)),
            ),
    );
}
