use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::models::{NewPatient, Patient, PatientMap, PatientUpdate};
use crate::AppState;

use super::error::ApiError;

/// Query parameters for the sort endpoint.
#[derive(Debug, Deserialize)]
pub struct SortQuery {
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

/// Sortable record fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortBy {
    Height,
    Weight,
    Bmi,
}

impl SortBy {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "height" => Some(SortBy::Height),
            "weight" => Some(SortBy::Weight),
            "bmi" => Some(SortBy::Bmi),
            _ => None,
        }
    }

    fn key(&self, patient: &Patient) -> f64 {
        match self {
            SortBy::Height => patient.height,
            SortBy::Weight => patient.weight,
            SortBy::Bmi => patient.bmi,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

/// GET /view
/// Full store contents, keyed by patient id
pub async fn view(State(state): State<AppState>) -> Result<Json<PatientMap>, ApiError> {
    let patients = state.store.load()?;
    Ok(Json(patients))
}

/// GET /patients/{id}
/// Fetch one record
pub async fn get_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Patient>, ApiError> {
    let patients = state.store.load()?;
    patients
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Patient with id {} not found", id)))
}

/// GET /sort?sort_by=&order=
/// Records ordered by height, weight or bmi. Parameters are checked before the
/// store is read; ties keep ascending id order.
pub async fn sort_patients(
    State(state): State<AppState>,
    Query(query): Query<SortQuery>,
) -> Result<Json<Vec<Patient>>, ApiError> {
    let field = query
        .sort_by
        .as_deref()
        .and_then(SortBy::parse)
        .ok_or_else(|| {
            ApiError::invalid_argument("Invalid field, select from height, weight or bmi")
        })?;
    let order = match query.order.as_deref() {
        Some(value) => SortOrder::parse(value)
            .ok_or_else(|| ApiError::invalid_argument("Invalid order, select asc or desc"))?,
        None => SortOrder::Asc,
    };

    let patients = state.store.load()?;
    let mut records: Vec<Patient> = patients.into_values().collect();
    match order {
        SortOrder::Asc => records.sort_by(|a, b| field.key(a).total_cmp(&field.key(b))),
        SortOrder::Desc => records.sort_by(|a, b| field.key(b).total_cmp(&field.key(a))),
    }

    Ok(Json(records))
}

/// POST /create
/// Create a record from a full set of fields. Validation runs before the store
/// is touched, so a rejected request never reads or writes the file.
pub async fn create_patient(
    State(state): State<AppState>,
    Json(body): Json<NewPatient>,
) -> Result<(StatusCode, Json<Patient>), ApiError> {
    let record = body.fields.validate()?;

    let _guard = state.write_lock.lock().await;
    let mut patients = state.store.load()?;
    if patients.contains_key(&body.id) {
        return Err(ApiError::conflict("Patient already exists"));
    }
    patients.insert(body.id.clone(), record.clone());
    state.store.save(&patients)?;

    tracing::info!("✓ Patient created: {}", body.id);
    Ok((StatusCode::CREATED, Json(record)))
}

/// PUT /edit/{id}
/// Merge the supplied fields onto the stored record, re-validate and re-derive
/// the merged result, persist the whole record
pub async fn edit_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<PatientUpdate>,
) -> Result<Json<Patient>, ApiError> {
    let _guard = state.write_lock.lock().await;
    let mut patients = state.store.load()?;
    let existing = patients
        .get(&id)
        .ok_or_else(|| ApiError::not_found(format!("Patient with id {} not found", id)))?;

    let updated = body.merge_into(existing)?;
    patients.insert(id.clone(), updated.clone());
    state.store.save(&patients)?;

    tracing::info!("✓ Patient updated: {}", id);
    Ok(Json(updated))
}

/// DELETE /delete/{id}
/// Remove a record
pub async fn delete_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let _guard = state.write_lock.lock().await;
    let mut patients = state.store.load()?;
    if patients.remove(&id).is_none() {
        return Err(ApiError::not_found(format!("Patient with id {} not found", id)));
    }
    state.store.save(&patients)?;

    tracing::info!("✓ Patient deleted: {}", id);
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PatientInput, Verdict};
    use crate::store::{MemoryStore, PatientStore, StoreError};
    use std::sync::Arc;

    fn new_patient(id: &str, height: f64, weight: f64) -> NewPatient {
        NewPatient {
            id: id.to_string(),
            fields: PatientInput {
                name: "Neha Sharma".to_string(),
                city: "Kolkata".to_string(),
                age: 30,
                gender: "female".to_string(),
                height,
                weight,
            },
        }
    }

    fn setup() -> AppState {
        AppState::new(Arc::new(MemoryStore::new()))
    }

    fn seeded(entries: &[(&str, f64, f64)]) -> AppState {
        let mut patients = PatientMap::new();
        for (id, height, weight) in entries {
            let record = new_patient(id, *height, *weight).fields.validate().unwrap();
            patients.insert(id.to_string(), record);
        }
        AppState::new(Arc::new(MemoryStore::with_patients(patients)))
    }

    struct FailingStore;

    impl PatientStore for FailingStore {
        fn load(&self) -> Result<PatientMap, StoreError> {
            Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "backing file unavailable",
            )))
        }

        fn save(&self, _patients: &PatientMap) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "backing file unavailable",
            )))
        }
    }

    fn sort_query(sort_by: Option<&str>, order: Option<&str>) -> Query<SortQuery> {
        Query(SortQuery {
            sort_by: sort_by.map(String::from),
            order: order.map(String::from),
        })
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let state = setup();

        let (status, Json(record)) =
            create_patient(State(state.clone()), Json(new_patient("P001", 1.72, 65.0)))
                .await
                .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(record.bmi, 21.97);
        assert_eq!(record.verdict, Verdict::Normal);

        let Json(fetched) = get_patient(State(state), Path("P001".to_string()))
            .await
            .unwrap();
        assert_eq!(fetched, record);
    }

    #[tokio::test]
    async fn test_create_duplicate_is_conflict() {
        let state = setup();
        create_patient(State(state.clone()), Json(new_patient("P001", 1.72, 65.0)))
            .await
            .unwrap();

        let err = create_patient(State(state.clone()), Json(new_patient("P001", 1.72, 90.0)))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));

        let patients = state.store.load().unwrap();
        assert_eq!(patients.len(), 1);
        assert_eq!(patients["P001"].weight, 65.0);
    }

    #[tokio::test]
    async fn test_create_invalid_input_leaves_store_untouched() {
        let state = setup();
        let mut body = new_patient("P001", 1.72, 65.0);
        body.fields.age = 0;
        body.fields.gender = "robot".to_string();

        let err = create_patient(State(state.clone()), Json(body))
            .await
            .unwrap_err();
        match err {
            ApiError::Validation(issues) => {
                let fields: Vec<&str> = issues.iter().map(|i| i.field.as_str()).collect();
                assert_eq!(fields, vec!["age", "gender"]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(state.store.load().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let err = get_patient(State(setup()), Path("P404".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_edit_recomputes_derived_fields() {
        let state = seeded(&[("P001", 1.7, 80.0)]);
        let update = PatientUpdate {
            height: Some(1.9),
            ..PatientUpdate::default()
        };

        let Json(updated) = edit_patient(State(state.clone()), Path("P001".to_string()), Json(update))
            .await
            .unwrap();
        assert_eq!(updated.height, 1.9);
        assert_eq!(updated.weight, 80.0);
        assert_eq!(updated.bmi, 22.16);
        assert_eq!(updated.name, "Neha Sharma");

        let patients = state.store.load().unwrap();
        assert_eq!(patients["P001"].bmi, 22.16);
    }

    #[tokio::test]
    async fn test_edit_missing_is_not_found() {
        let err = edit_patient(
            State(setup()),
            Path("P404".to_string()),
            Json(PatientUpdate::default()),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_edit_invalid_merge_is_validation_error() {
        let state = seeded(&[("P001", 1.7, 80.0)]);
        let update = PatientUpdate {
            weight: Some(-1.0),
            ..PatientUpdate::default()
        };

        let err = edit_patient(State(state.clone()), Path("P001".to_string()), Json(update))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        let patients = state.store.load().unwrap();
        assert_eq!(patients["P001"].weight, 80.0);
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let state = seeded(&[("P001", 1.7, 80.0)]);

        let status = delete_patient(State(state.clone()), Path("P001".to_string()))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let err = get_patient(State(state.clone()), Path("P001".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err = delete_patient(State(state), Path("P001".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_view_returns_full_map() {
        let state = seeded(&[("P001", 1.7, 80.0), ("P002", 1.6, 50.0)]);
        let Json(patients) = view(State(state)).await.unwrap();
        assert_eq!(patients.len(), 2);
        assert!(patients.contains_key("P001"));
        assert!(patients.contains_key("P002"));
    }

    #[tokio::test]
    async fn test_sort_by_bmi_desc() {
        // height 1.0 makes bmi equal to weight
        let state = seeded(&[("P001", 1.0, 18.0), ("P002", 1.0, 30.5), ("P003", 1.0, 22.1)]);

        let Json(records) = sort_patients(State(state), sort_query(Some("bmi"), Some("desc")))
            .await
            .unwrap();
        let bmis: Vec<f64> = records.iter().map(|p| p.bmi).collect();
        assert_eq!(bmis, vec![30.5, 22.1, 18.0]);
    }

    #[tokio::test]
    async fn test_sort_defaults_to_ascending() {
        let state = seeded(&[("P001", 1.9, 80.0), ("P002", 1.5, 80.0), ("P003", 1.7, 80.0)]);

        let Json(records) = sort_patients(State(state), sort_query(Some("height"), None))
            .await
            .unwrap();
        let heights: Vec<f64> = records.iter().map(|p| p.height).collect();
        assert_eq!(heights, vec![1.5, 1.7, 1.9]);
    }

    #[tokio::test]
    async fn test_sort_ties_keep_id_order() {
        // height 1.0 makes bmi equal to weight; P001..P003 tie exactly
        let mut patients = PatientMap::new();
        for (id, name, weight) in [
            ("P001", "first", 22.0),
            ("P002", "second", 22.0),
            ("P003", "third", 22.0),
            ("P004", "heaviest", 35.0),
        ] {
            let record = PatientInput {
                name: name.to_string(),
                city: "Kolkata".to_string(),
                age: 30,
                gender: "female".to_string(),
                height: 1.0,
                weight,
            }
            .validate()
            .unwrap();
            patients.insert(id.to_string(), record);
        }
        let state = AppState::new(Arc::new(MemoryStore::with_patients(patients)));

        let Json(records) = sort_patients(State(state), sort_query(Some("bmi"), Some("desc")))
            .await
            .unwrap();
        let names: Vec<&str> = records.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["heaviest", "first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_sort_rejects_unknown_field_before_touching_store() {
        let state = AppState::new(Arc::new(FailingStore));

        let err = sort_patients(State(state), sort_query(Some("name"), None))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_sort_rejects_bad_order() {
        let state = seeded(&[("P001", 1.7, 80.0)]);

        let err = sort_patients(State(state), sort_query(Some("height"), Some("sideways")))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_storage_error_propagates() {
        let state = AppState::new(Arc::new(FailingStore));
        let err = view(State(state)).await.unwrap_err();
        assert!(matches!(err, ApiError::Storage(_)));
    }
}
