mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use common::{create_record, create_strain, strain_json, TestApp};

fn tomorrow() -> String {
    (chrono::Utc::now().date_naive() + chrono::Duration::days(1)).to_string()
}

/// One valid body per collection, plus the field that must not be in the future
fn bodies(strain_id: &str, project_id: &str) -> Vec<(&'static str, Value, &'static str)> {
    vec![
        ("strains", strain_json("S-9", "Spare", "2024-01-01"), "creation_date"),
        (
            "strain_processing",
            json!({"strain_id": strain_id, "processing_date": "2024-01-02", "description": "washed"}),
            "processing_date",
        ),
        (
            "substance_identification",
            json!({"strain_id": strain_id, "identification_date": "2024-01-03", "results": "ethanol"}),
            "identification_date",
        ),
        (
            "experiments",
            json!({"strain_id": strain_id, "start_date": "2024-01-04", "end_date": "2024-02-01", "growth_medium": "YPD", "results": "ok"}),
            "start_date",
        ),
        (
            "cultivation_planning",
            json!({"strain_id": strain_id, "planning_date": "2024-01-05", "completion_date": "2024-03-01", "growth_medium": "LB", "status": "planned"}),
            "planning_date",
        ),
        (
            "projects",
            json!({"name": "Fermentation", "start_date": "2024-01-06", "results": "pending"}),
            "start_date",
        ),
        (
            "cultures",
            json!({"project_id": project_id, "planning_date": "2024-01-07", "results": "inoculated"}),
            "planning_date",
        ),
    ]
}

async fn seed(app: &TestApp, admin: &str) -> Result<(String, String)> {
    let strain = create_strain(app, admin, "S-1", "Yeast", "2024-01-01").await?;
    let project = create_record(
        app,
        admin,
        "projects",
        json!({"name": "Seed", "start_date": "2024-01-01", "results": "-"}),
    )
    .await?;
    Ok((strain, project))
}

#[tokio::test]
async fn admin_crud_on_strains() -> Result<()> {
    let app = TestApp::new().await?;
    let (admin, _) = app.admin_and_reader().await?;

    let mut body = strain_json("N877", "New Strain", "2024-01-01");
    body["created_by"] = json!(uuid::Uuid::new_v4());
    let created = app.api(Method::POST, "/api/strains/", Some(&admin), Some(body)).await?;
    assert_eq!(created.status, StatusCode::CREATED, "{}", created.body);
    assert_eq!(created.body["success"], true);

    let id = created.body["data"]["id"].as_str().unwrap().to_string();
    let whoami = app.api(Method::GET, "/api/auth/whoami", Some(&admin), None).await?;
    assert_eq!(created.body["data"]["created_by"], whoami.body["data"]["id"]);

    let list = app.api(Method::GET, "/api/strains/", Some(&admin), None).await?;
    assert_eq!(list.status, StatusCode::OK);
    assert_eq!(list.body["data"].as_array().unwrap().len(), 1);

    let url = format!("/api/strains/{}/", id);
    let put = app
        .api(Method::PUT, &url, Some(&admin), Some(strain_json("N877", "Renamed", "2024-01-02")))
        .await?;
    assert_eq!(put.status, StatusCode::OK, "{}", put.body);
    assert_eq!(put.body["data"]["name"], "Renamed");
    assert_eq!(put.body["data"]["created_by"], whoami.body["data"]["id"]);

    let patch = app.api(Method::PATCH, &url, Some(&admin), Some(json!({"mutations": "ura3"}))).await?;
    assert_eq!(patch.status, StatusCode::OK, "{}", patch.body);
    assert_eq!(patch.body["data"]["mutations"], "ura3");
    assert_eq!(patch.body["data"]["name"], "Renamed");

    let deleted = app.api(Method::DELETE, &url, Some(&admin), None).await?;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let gone = app.api(Method::GET, &url, Some(&admin), None).await?;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn patch_with_null_clears_optional_fields() -> Result<()> {
    let app = TestApp::new().await?;
    let (admin, _) = app.admin_and_reader().await?;
    let (strain, _) = seed(&app, &admin).await?;

    let project = create_record(
        &app,
        &admin,
        "projects",
        json!({"name": "Closing", "start_date": "2024-01-01", "end_date": "2024-02-01", "results": "-"}),
    )
    .await?;
    let url = format!("/api/projects/{}/", project);

    let cleared = app.api(Method::PATCH, &url, Some(&admin), Some(json!({"end_date": null}))).await?;
    assert_eq!(cleared.status, StatusCode::OK, "{}", cleared.body);
    assert_eq!(cleared.body["data"]["end_date"], Value::Null);
    assert_eq!(cleared.body["data"]["name"], "Closing");

    let stored = app.api(Method::GET, &url, Some(&admin), None).await?;
    assert_eq!(stored.body["data"]["end_date"], Value::Null);

    let experiment = create_record(
        &app,
        &admin,
        "experiments",
        json!({"strain_id": strain, "start_date": "2024-01-04", "end_date": "2024-02-01", "growth_medium": "YPD", "results": "ok"}),
    )
    .await?;
    let url = format!("/api/experiments/{}/", experiment);
    let res = app.api(Method::PATCH, &url, Some(&admin), Some(json!({"end_date": null}))).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST, "{}", res.body);
    assert_eq!(res.body["field_errors"]["end_date"], "This field is required.");
    Ok(())
}

#[tokio::test]
async fn readers_cannot_write_any_collection() -> Result<()> {
    let app = TestApp::new().await?;
    let (admin, reader) = app.admin_and_reader().await?;
    let (strain, project) = seed(&app, &admin).await?;

    for (resource, body, _) in bodies(&strain, &project) {
        let id = create_record(&app, &admin, resource, body.clone()).await?;
        let before = app.count(resource).await?;
        let collection = format!("/api/{}/", resource);
        let member = format!("/api/{}/{}/", resource, id);

        let post = app.api(Method::POST, &collection, Some(&reader), Some(body.clone())).await?;
        assert_eq!(post.status, StatusCode::FORBIDDEN, "POST {}", resource);

        let put = app.api(Method::PUT, &member, Some(&reader), Some(body.clone())).await?;
        assert_eq!(put.status, StatusCode::FORBIDDEN, "PUT {}", resource);

        let patch = app.api(Method::PATCH, &member, Some(&reader), Some(json!({}))).await?;
        assert_eq!(patch.status, StatusCode::FORBIDDEN, "PATCH {}", resource);

        let delete = app.api(Method::DELETE, &member, Some(&reader), None).await?;
        assert_eq!(delete.status, StatusCode::FORBIDDEN, "DELETE {}", resource);

        assert_eq!(app.count(resource).await?, before, "{} changed", resource);

        for method in [Method::GET, Method::HEAD, Method::OPTIONS] {
            for uri in [&collection, &member] {
                let res = app.api(method.clone(), uri, Some(&reader), None).await?;
                assert_eq!(res.status, StatusCode::OK, "{} {}", method, uri);
            }
        }
    }
    Ok(())
}

#[tokio::test]
async fn anonymous_writes_are_unauthorized_and_change_nothing() -> Result<()> {
    let app = TestApp::new().await?;

    let res = app
        .api(Method::POST, "/api/strains/", None, Some(strain_json("X", "X", "2024-01-01")))
        .await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    // The body is never read, so even garbage gets the auth answer
    let res = app.api(Method::POST, "/api/projects/", None, Some(json!("not an object"))).await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    assert_eq!(app.count("strains").await?, 0);
    Ok(())
}

#[tokio::test]
async fn future_dates_are_rejected_for_every_collection() -> Result<()> {
    let app = TestApp::new().await?;
    let (admin, _) = app.admin_and_reader().await?;
    let (strain, project) = seed(&app, &admin).await?;
    let tomorrow = tomorrow();

    for (resource, mut body, date_field) in bodies(&strain, &project) {
        body[date_field] = json!(tomorrow);
        if resource == "experiments" {
            body["end_date"] = json!(tomorrow);
        }
        if resource == "cultivation_planning" {
            body["completion_date"] = json!(tomorrow);
        }

        let before = app.count(resource).await?;
        let res = app.api(Method::POST, &format!("/api/{}/", resource), Some(&admin), Some(body)).await?;

        assert_eq!(res.status, StatusCode::BAD_REQUEST, "{}: {}", resource, res.body);
        assert_eq!(res.body["field_errors"][date_field], "Date cannot be in the future.", "{}", resource);
        assert_eq!(app.count(resource).await?, before);
    }
    Ok(())
}

#[tokio::test]
async fn end_dates_may_equal_but_not_precede_start() -> Result<()> {
    let app = TestApp::new().await?;
    let (admin, _) = app.admin_and_reader().await?;
    let (strain, _) = seed(&app, &admin).await?;

    let cases = [
        ("experiments", "start_date", "end_date", json!({"strain_id": strain, "growth_medium": "YPD", "results": "ok"})),
        (
            "cultivation_planning",
            "planning_date",
            "completion_date",
            json!({"strain_id": strain, "growth_medium": "LB", "status": "planned"}),
        ),
        ("projects", "start_date", "end_date", json!({"name": "P", "results": "r"})),
    ];

    for (resource, start, end, base) in cases {
        let uri = format!("/api/{}/", resource);

        let mut before_start = base.clone();
        before_start[start] = json!("2024-03-10");
        before_start[end] = json!("2024-03-09");
        let res = app.api(Method::POST, &uri, Some(&admin), Some(before_start)).await?;
        assert_eq!(res.status, StatusCode::BAD_REQUEST, "{}", resource);
        assert_eq!(res.body["field_errors"][end], "End date cannot be before start date.");

        let mut same_day = base.clone();
        same_day[start] = json!("2024-03-10");
        same_day[end] = json!("2024-03-10");
        let res = app.api(Method::POST, &uri, Some(&admin), Some(same_day)).await?;
        assert_eq!(res.status, StatusCode::CREATED, "{}: {}", resource, res.body);
    }
    Ok(())
}

#[tokio::test]
async fn validation_reports_every_bad_field() -> Result<()> {
    let app = TestApp::new().await?;
    let (admin, _) = app.admin_and_reader().await?;

    let body = json!({
        "strain_id": uuid::Uuid::new_v4(),
        "start_date": "yesterday",
        "growth_medium": "",
    });
    let res = app.api(Method::POST, "/api/experiments/", Some(&admin), Some(body)).await?;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    let errors = &res.body["field_errors"];
    assert_eq!(errors["start_date"], "Enter a valid date.");
    assert_eq!(errors["end_date"], "This field is required.");
    assert_eq!(errors["growth_medium"], "This field is required.");
    assert_eq!(errors["results"], "This field is required.");

    let res = app
        .api(
            Method::POST,
            "/api/experiments/",
            Some(&admin),
            Some(json!({"strain_id": uuid::Uuid::new_v4(), "start_date": "2024-01-01", "end_date": "2024-01-02", "growth_medium": "x", "results": "y"})),
        )
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        res.body["field_errors"]["strain_id"],
        "Select a valid choice. That choice is not one of the available choices."
    );

    let long_name = "x".repeat(51);
    let res = app
        .api(
            Method::POST,
            "/api/projects/",
            Some(&admin),
            Some(json!({"name": long_name, "start_date": "2024-01-01", "results": "r"})),
        )
        .await?;
    assert_eq!(
        res.body["field_errors"]["name"],
        "Ensure this value has at most 50 characters (it has 51)."
    );
    Ok(())
}

#[tokio::test]
async fn unknown_and_malformed_ids_are_not_found() -> Result<()> {
    let app = TestApp::new().await?;
    let (admin, _) = app.admin_and_reader().await?;

    let malformed = app.api(Method::GET, "/api/strains/42/", Some(&admin), None).await?;
    assert_eq!(malformed.status, StatusCode::NOT_FOUND);

    let unknown = format!("/api/strains/{}/", uuid::Uuid::new_v4());
    let res = app.api(Method::GET, &unknown, Some(&admin), None).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = app
        .api(Method::PUT, &unknown, Some(&admin), Some(strain_json("A", "B", "2024-01-01")))
        .await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = app.api(Method::DELETE, &unknown, Some(&admin), None).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn deletes_cascade_to_dependents() -> Result<()> {
    let app = TestApp::new().await?;
    let (admin, _) = app.admin_and_reader().await?;
    let (strain, project) = seed(&app, &admin).await?;

    for (resource, body, _) in bodies(&strain, &project).into_iter().skip(1) {
        create_record(&app, &admin, resource, body).await?;
    }

    let res = app.api(Method::DELETE, &format!("/api/strains/{}/", strain), Some(&admin), None).await?;
    assert_eq!(res.status, StatusCode::NO_CONTENT);
    for table in ["strain_processing", "substance_identification", "experiments", "cultivation_planning"] {
        assert_eq!(app.count(table).await?, 0, "{} survived", table);
    }
    assert_eq!(app.count("cultures").await?, 1);

    let res = app.api(Method::DELETE, &format!("/api/projects/{}/", project), Some(&admin), None).await?;
    assert_eq!(res.status, StatusCode::NO_CONTENT);
    assert_eq!(app.count("cultures").await?, 0);
    Ok(())
}

#[tokio::test]
async fn options_describes_the_resource() -> Result<()> {
    let app = TestApp::new().await?;
    let (_, reader) = app.admin_and_reader().await?;

    let res = app.api(Method::OPTIONS, "/api/cultures/", Some(&reader), None).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["name"], "Cultures");
    assert_eq!(res.body["data"]["fields"][0]["name"], "project_id");
    assert_eq!(res.body["data"]["fields"][0]["type"], "reference");
    assert!(res.headers.get("allow").is_some());
    Ok(())
}
