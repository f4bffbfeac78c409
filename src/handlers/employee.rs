use actix_web::{web, HttpResponse};
use log::{error, info};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::db::{InsertOutcome, RecordStore};
use crate::errors::AppError;
use crate::models::employee::{Employee, Gender};
use crate::utils::validation::validate_payload;

const FIELD_ORDER: [&str; 4] = ["name", "email", "gender", "designation"];

#[derive(Deserialize, Validate, Debug)]
pub struct EmployeePayload {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "Employee Name is required"))]
    pub name: String,
    #[serde(default)]
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Invalid Email Address")
    )]
    pub email: String,
    #[serde(default)]
    #[validate(custom = "validate_gender")]
    pub gender: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Designation is required"))]
    pub designation: String,
    #[serde(default)]
    pub profile_image: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct StatusResponse {
    pub status: bool,
    pub message: String,
}

impl StatusResponse {
    fn ok(message: &str) -> Self {
        Self {
            status: true,
            message: message.to_string(),
        }
    }
}

fn validate_gender(gender: &str) -> Result<(), validator::ValidationError> {
    if gender.is_empty() {
        let mut err = validator::ValidationError::new("gender");
        err.message = Some("Gender is required".into());
        return Err(err);
    }
    if gender.parse::<Gender>().is_err() {
        let mut err = validator::ValidationError::new("gender");
        err.message = Some("Invalid gender".into());
        return Err(err);
    }
    Ok(())
}

impl EmployeePayload {
    /// Trims the text fields the way the form does.
    fn trimmed(self) -> Self {
        Self {
            id: self.id,
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            gender: self.gender,
            designation: self.designation.trim().to_string(),
            profile_image: self
                .profile_image
                .map(|image| image.trim().to_string())
                .filter(|image| !image.is_empty()),
        }
    }

    /// Validates and turns the payload into the record stored under `id`.
    fn into_employee(self, id: String) -> Result<Employee, AppError> {
        let payload = self.trimmed();
        validate_payload(&payload, &FIELD_ORDER)?;

        let gender = payload.gender.parse::<Gender>().map_err(AppError::BadRequest)?;

        Ok(Employee {
            id,
            name: payload.name,
            email: payload.email,
            gender,
            designation: payload.designation,
            profile_image: payload.profile_image,
        })
    }
}

pub async fn get_employees(store: web::Data<dyn RecordStore>) -> Result<HttpResponse, AppError> {
    let employees = store.list().await.map_err(|err| {
        error!("Failed to list employees: {}", err);
        AppError::InternalServerError("Failed to fetch employees - Error".to_string())
    })?;

    Ok(HttpResponse::Ok().json(employees))
}

pub async fn create_employee(
    store: web::Data<dyn RecordStore>,
    payload: web::Json<EmployeePayload>,
) -> Result<HttpResponse, AppError> {
    let payload = payload.into_inner();

    // Ids are generated here unless the client supplied one.
    let id = payload
        .id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let employee = payload.into_employee(id)?;

    let outcome = store.insert_unique(&employee).await.map_err(|err| {
        error!("Failed to create employee {}: {}", employee.id, err);
        AppError::InternalServerError("Failed to create employee - Error".to_string())
    })?;

    match outcome {
        InsertOutcome::Inserted => {
            info!("Employee {} added", employee.id);
            Ok(HttpResponse::Created().json(StatusResponse::ok("Employee Added Successfully")))
        }
        InsertOutcome::DuplicateEmail => Err(AppError::Conflict("Email already exists".to_string())),
        InsertOutcome::DuplicateId => {
            Err(AppError::Conflict("Employee already exists".to_string()))
        }
    }
}

pub async fn update_employee(
    store: web::Data<dyn RecordStore>,
    id: web::Path<String>,
    payload: web::Json<EmployeePayload>,
) -> Result<HttpResponse, AppError> {
    let employee = payload.into_inner().into_employee(id.into_inner())?;

    store.replace(&employee).await.map_err(|err| {
        error!("Failed to update employee {}: {}", employee.id, err);
        AppError::InternalServerError("Failed to update employee - Error".to_string())
    })?;

    info!("Employee {} updated", employee.id);
    Ok(HttpResponse::Ok().json(StatusResponse::ok("Employees data updated successfully")))
}

pub async fn delete_employee(
    store: web::Data<dyn RecordStore>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = id.into_inner();

    let existed = store.remove(&id).await.map_err(|err| {
        error!("Failed to delete employee {}: {}", id, err);
        AppError::InternalServerError("Failed to delete employee - Error".to_string())
    })?;

    if existed {
        info!("Employee {} deleted", id);
    } else {
        info!("Delete of unknown employee {} ignored", id);
    }

    Ok(HttpResponse::Ok().json(StatusResponse::ok("Employee Deleted")))
}
