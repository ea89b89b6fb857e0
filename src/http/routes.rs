use actix_web::{delete, get, post, put, web, HttpResponse};
use database::{consts::consts::EntityId, store::PersonStore};

use super::{
    error::ApiError,
    validation::{NewPersonBody, PersonUpdateBody},
};

/// Every stored person, ordered by id
#[get("/people")]
pub async fn list_people(store: web::Data<dyn PersonStore>) -> Result<HttpResponse, ApiError> {
    let people = store.list_all().await?;

    Ok(HttpResponse::Ok().json(people))
}

/// A single person, or `null` when the id is unknown
#[get("/people/{id}")]
pub async fn get_person(
    store: web::Data<dyn PersonStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = EntityId::from(path.into_inner());

    let person = store.get_by_id(&id).await?;

    Ok(HttpResponse::Ok().json(person))
}

#[post("/people")]
pub async fn create_person(
    store: web::Data<dyn PersonStore>,
    body: web::Json<NewPersonBody>,
) -> Result<HttpResponse, ApiError> {
    let new_person = body.into_inner().validate()?;

    let person = store.create(new_person).await?;

    log::info!("Created person [id: {}]", person.id);

    Ok(HttpResponse::Ok().json(person))
}

/// Responds with the number of updated rows, 0 when the id is unknown
#[put("/people/{id}")]
pub async fn update_person(
    store: web::Data<dyn PersonStore>,
    path: web::Path<String>,
    body: web::Json<PersonUpdateBody>,
) -> Result<HttpResponse, ApiError> {
    let id = EntityId::from(path.into_inner());
    let update = body.into_inner().validate()?;

    let affected = store.update(&id, update).await?;

    log::info!("Updated person [id: {}, affected: {}]", id, affected);

    Ok(HttpResponse::Ok().json(affected))
}

#[delete("/people/{id}")]
pub async fn delete_person(
    store: web::Data<dyn PersonStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = EntityId::from(path.into_inner());

    let affected = store.remove(&id).await?;

    log::info!("Removed person [id: {}, affected: {}]", id, affected);

    Ok(HttpResponse::Ok().json(affected))
}
