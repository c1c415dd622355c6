use utoipa::OpenApi;

use crate::routes::{health, jokes};

#[derive(OpenApi)]
#[openapi(info(
    title = "jokebox-server",
    description = "Joke catalogue CRUD API",
    version = "0.1.0",
))]
pub struct ApiDoc;

pub fn get_docs() -> utoipa::openapi::OpenApi {
    let mut root = ApiDoc::openapi();
    root.merge(health::HealthApi::openapi());
    root.merge(jokes::JokesApi::openapi());
    root
}
