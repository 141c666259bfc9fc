#![allow(dead_code, unused_macros)]

use std::env;
use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use overtime_hub::database::models::{Role, Shift, ShiftInput, ShiftType, Staffing};
use overtime_hub::services::Claims;
use overtime_hub::{Config, MemoryStore, OvertimeStore};

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-key-that-is-long-enough";

pub fn setup_test_env() {
    unsafe {
        env::set_var("RUST_LOG", "debug");
    }
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn test_config() -> Config {
    Config {
        database_url: "memory://test".to_string(),
        database_max_connections: 1,
        jwt_secret: TEST_JWT_SECRET.to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        environment: "test".to_string(),
        client_base_url: "http://localhost:3000".to_string(),
    }
}

/// Builds the full API on top of the given in-memory store.
macro_rules! init_app {
    ($store:expr) => {{
        let store: std::sync::Arc<dyn overtime_hub::OvertimeStore> = $store.clone();
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new(overtime_hub::AppState::new(store)))
                .app_data(actix_web::web::Data::new(common::test_config()))
                .wrap(overtime_hub::middleware::RequestIdMiddleware)
                .configure(overtime_hub::routes::configure),
        )
        .await
    }};
}

// Authentication helpers
pub struct AuthHelper;

impl AuthHelper {
    pub fn create_test_token(user_id: Uuid) -> String {
        let claims = Claims {
            sub: user_id,
            email: None,
            exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(TEST_JWT_SECRET.as_ref()),
        )
        .expect("token encodes")
    }

    pub fn bearer(user_id: Uuid) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", Self::create_test_token(user_id)))
    }
}

/// Seeds the in-memory store with users and shifts.
pub struct TestContext {
    pub store: Arc<MemoryStore>,
}

impl TestContext {
    pub fn new() -> Self {
        setup_test_env();
        Self {
            store: Arc::new(MemoryStore::new()),
        }
    }

    pub async fn user(&self, full_name: &str, role: Role) -> Uuid {
        let id = Uuid::new_v4();
        self.store.insert_profile(id, Some(full_name), role).await;
        id
    }

    pub async fn assign_team(&self, user_id: Uuid, team: &str) {
        self.store
            .upsert_staffing(&Staffing {
                user_id,
                team: Some(team.to_string()),
                band: None,
            })
            .await
            .expect("staffing saved");
    }

    pub async fn shift(&self, shift_date: NaiveDate, shift_type: ShiftType, spots: i32) -> Shift {
        let input = ShiftInput {
            shift_date,
            shift_type,
            start_time: NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(15, 0, 0).unwrap(),
            department: "Dispatch".to_string(),
            spots_available: spots,
            notes: None,
        };
        self.store
            .upsert_shifts(&[input])
            .await
            .expect("shift saved")
            .remove(0)
    }
}

pub fn days_from_today(days: i64) -> NaiveDate {
    Utc::now().date_naive() + Duration::days(days)
}
