use salvo::Router;

use agendaiq_core::constants::APP_ROUTE_COMPONENT;

mod healthcheck;
mod repeat;


#[must_use]
pub fn routes() -> Router {
    Router::with_path(APP_ROUTE_COMPONENT)
        .push(healthcheck::routes())
        .push(repeat::routes())
}
