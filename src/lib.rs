//! Root crate facade for the Sharuco snippet server.

pub use sharuco_server::{
    config, create_app, db, error, handlers, identity, models, resolve_bind_address, serve_router,
    AppError, AppState, Config, Database, WriterRegistry,
};
