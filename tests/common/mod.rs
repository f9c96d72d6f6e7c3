#![allow(dead_code)]

use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;

use biobase::app::{app, AppState};
use biobase::auth;
use biobase::auth::password::hash_password;
use biobase::config::AppConfig;
use biobase::database::models::User;
use biobase::database::service::{self, NewUser};
use biobase::database::DatabaseManager;

pub const PASSWORD: &str = "password123";

/// The real router over a fresh in-memory database
pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    pub state: AppState,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn location(&self) -> Option<&str> {
        self.headers.get(header::LOCATION).and_then(|v| v.to_str().ok())
    }

    /// `name=value` of the session cookie set by this response, if any
    pub fn session_cookie(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|v| v.split(';').next())
            .find(|pair| pair.starts_with("biobase_session="))
            .map(str::to_string)
    }
}

impl TestApp {
    pub async fn new() -> Result<Self> {
        let config = AppConfig::testing();
        let pool = DatabaseManager::connect_and_migrate(&config.database)
            .await
            .context("failed to open test database")?;
        let state = AppState::new(pool.clone(), config);

        Ok(Self {
            router: app(state.clone()),
            pool,
            state,
        })
    }

    pub async fn create_user(&self, username: &str, superuser: bool) -> Result<User> {
        let user = service::create_user(
            &self.pool,
            NewUser {
                username: username.to_string(),
                password_hash: hash_password(PASSWORD, Some(4)).await?,
                first_name: "Test".to_string(),
                last_name: username.to_string(),
                email: format!("{}@example.com", username),
                is_superuser: superuser,
            },
        )
        .await?;
        Ok(user)
    }

    pub async fn token_for(&self, user: &User) -> Result<String> {
        Ok(auth::issue_token(&self.pool, user, &self.state.config.security).await?)
    }

    /// A superuser and a plain user with their bearer tokens
    pub async fn admin_and_reader(&self) -> Result<(String, String)> {
        let admin = self.create_user("admin", true).await?;
        let reader = self.create_user("reader", false).await?;
        Ok((self.token_for(&admin).await?, self.token_for(&reader).await?))
    }

    pub async fn send(&self, request: Request<Body>) -> Result<TestResponse> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
        };

        Ok(TestResponse { status, headers, body })
    }

    pub async fn api(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Result<TestResponse> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body)?))?,
            None => builder.body(Body::empty())?,
        };

        self.send(request).await
    }

    pub async fn get_page(&self, uri: &str, cookie: Option<&str>) -> Result<TestResponse> {
        let mut builder = Request::builder().method(Method::GET).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty())?).await
    }

    pub async fn post_form(&self, uri: &str, cookie: Option<&str>, fields: &[(&str, &str)]) -> Result<TestResponse> {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(serde_urlencoded::to_string(fields)?))?).await
    }

    /// Logs in through the browser form and returns the session cookie pair
    pub async fn login(&self, username: &str) -> Result<String> {
        let response = self
            .post_form("/", None, &[("username", username), ("password", PASSWORD)])
            .await?;
        anyhow::ensure!(response.status == StatusCode::FOUND, "login failed: {}", response.body);
        response.session_cookie().context("login set no session cookie")
    }

    pub async fn count(&self, table: &str) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

pub fn strain_json(uin: &str, name: &str, creation_date: &str) -> Value {
    serde_json::json!({
        "uin": uin,
        "name": name,
        "pedigree": "wild type",
        "mutations": "none",
        "transformations": "none",
        "creation_date": creation_date,
    })
}

/// Creates a strain through the API and returns its id
pub async fn create_strain(app: &TestApp, token: &str, uin: &str, name: &str, creation_date: &str) -> Result<String> {
    let response = app
        .api(Method::POST, "/api/strains/", Some(token), Some(strain_json(uin, name, creation_date)))
        .await?;
    anyhow::ensure!(response.status == StatusCode::CREATED, "strain create failed: {}", response.body);
    response.body["data"]["id"]
        .as_str()
        .map(str::to_string)
        .context("created strain has no id")
}

pub async fn create_record(app: &TestApp, token: &str, resource: &str, body: Value) -> Result<String> {
    let response = app
        .api(Method::POST, &format!("/api/{}/", resource), Some(token), Some(body))
        .await?;
    anyhow::ensure!(response.status == StatusCode::CREATED, "{} create failed: {}", resource, response.body);
    response.body["data"]["id"]
        .as_str()
        .map(str::to_string)
        .context("created record has no id")
}
