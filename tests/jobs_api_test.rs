mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::spawn_app;

#[tokio::test]
async fn location_type_filter_returns_only_matching_jobs() {
    let app = spawn_app();
    let company = app.company("hr@acme.test", "Acme").await;
    app.create_job(&company, json!({ "title": "Remote Rustacean", "locationType": "REMOTE" }))
        .await;
    app.create_job(&company, json!({ "title": "Office Rustacean", "locationType": "ONSITE" }))
        .await;
    app.create_job(&company, json!({ "title": "Hybrid Rustacean", "locationType": "HYBRID" }))
        .await;

    let resp = app.get("/api/jobs?locationType%5B%5D=REMOTE", None).await;
    assert_eq!(resp.status, StatusCode::OK);
    let jobs = resp.body["jobs"].as_array().unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0]["locationType"], "REMOTE");
    assert_eq!(jobs[0]["locationTypeLabel"], "Remote");
    assert_eq!(resp.body["pagination"]["total"], 1);

    let resp = app
        .get("/api/jobs?locationType[]=REMOTE&locationType[]=HYBRID", None)
        .await;
    let jobs = resp.body["jobs"].as_array().unwrap();
    assert_eq!(jobs.len(), 2);
    assert!(jobs.iter().all(|j| j["locationType"] != "ONSITE"));

    let resp = app.get("/api/jobs?locationType[]=MOON", None).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert!(resp.body["error"].is_string());
}

#[tokio::test]
async fn search_only_lists_open_jobs_and_matches_text() {
    let app = spawn_app();
    let acme = app.company("hr@acme.test", "Acme Robotics").await;
    let globex = app.company("hr@globex.test", "Globex").await;
    app.create_job(&acme, json!({ "title": "Firmware engineer", "location": "Munich" }))
        .await;
    app.create_job(&globex, json!({ "title": "Data engineer", "experienceLevel": "JUNIOR" }))
        .await;
    app.create_job(&globex, json!({ "title": "Secret project", "status": "DRAFT" }))
        .await;

    let resp = app.get("/api/jobs", None).await;
    assert_eq!(resp.body["pagination"]["total"], 2);

    let resp = app.get("/api/jobs?q=robotics", None).await;
    let jobs = resp.body["jobs"].as_array().unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0]["company"]["name"], "Acme Robotics");

    let resp = app.get("/api/jobs?q=SECRET", None).await;
    assert_eq!(resp.body["pagination"]["total"], 0);

    let resp = app.get("/api/jobs?location=munich", None).await;
    assert_eq!(resp.body["jobs"][0]["title"], "Firmware engineer");

    let resp = app.get("/api/jobs?experienceLevel=JUNIOR", None).await;
    let jobs = resp.body["jobs"].as_array().unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0]["experienceLevelLabel"], "Junior");
}

#[tokio::test]
async fn search_text_is_matched_literally() {
    let app = spawn_app();
    let company = app.company("hr@acme.test", "Acme").await;
    app.create_job(&company, json!({ "title": "Rust engineer" })).await;
    app.create_job(&company, json!({ "title": "100% remote SRE" })).await;

    let resp = app.get("/api/jobs?q=%25", None).await;
    assert_eq!(resp.body["pagination"]["total"], 1);
    assert_eq!(resp.body["jobs"][0]["title"], "100% remote SRE");

    let resp = app.get("/api/jobs?q=_", None).await;
    assert_eq!(resp.body["pagination"]["total"], 0);

    let resp = app.get("/api/jobs?location=%25", None).await;
    assert_eq!(resp.body["pagination"]["total"], 0);
}

#[tokio::test]
async fn pagination_reports_totals() {
    let app = spawn_app();
    let company = app.company("hr@acme.test", "Acme").await;
    for i in 0..3 {
        app.create_job(&company, json!({ "title": format!("Role number {i}") }))
            .await;
    }

    let resp = app.get("/api/jobs?page=2&limit=2", None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["jobs"].as_array().unwrap().len(), 1);
    assert_eq!(
        resp.body["pagination"],
        json!({ "page": 2, "limit": 2, "total": 3, "totalPages": 2 })
    );
    // newest first
    assert_eq!(resp.body["jobs"][0]["title"], "Role number 0");

    let resp = app.get("/api/jobs?limit=1000", None).await;
    assert_eq!(resp.body["pagination"]["limit"], 50);
    assert_eq!(resp.body["pagination"]["page"], 1);
}

#[tokio::test]
async fn huge_page_number_returns_an_empty_page() {
    let app = spawn_app();
    let company = app.company("hr@acme.test", "Acme").await;
    app.create_job(&company, json!({})).await;

    let resp = app
        .get("/api/jobs?page=9223372036854775807&limit=50", None)
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body["jobs"].as_array().unwrap().is_empty());
    assert_eq!(resp.body["pagination"]["total"], 1);
}

#[tokio::test]
async fn viewing_a_job_counts_views() {
    let app = spawn_app();
    let company = app.company("hr@acme.test", "Acme").await;
    let job = app.create_job(&company, json!({})).await;
    assert_eq!(job["views"], 0);
    let uri = format!("/api/jobs/{}", job["id"].as_str().unwrap());

    let resp = app.get(&uri, None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["views"], 1);
    assert!(resp.body.get("hasApplied").is_none());
    assert!(resp.body.get("hasSaved").is_none());
    assert_eq!(resp.body["salaryText"], "$90,000 - $120,000");
    assert_eq!(resp.body["jobTypeLabel"], "Full-time");

    let resp = app.get(&uri, None).await;
    assert_eq!(resp.body["views"], 2);

    let resp = app.get(&format!("/api/jobs/{}", uuid::Uuid::new_v4()), None).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);

    let resp = app.get("/api/jobs/not-a-uuid", None).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unpublished_jobs_are_visible_to_their_owner_only() {
    let app = spawn_app();
    let company = app.company("hr@acme.test", "Acme").await;
    let rival = app.company("hr@globex.test", "Globex").await;
    let seeker = app.job_seeker("ada@example.test").await;
    let draft = app.create_job(&company, json!({ "status": "DRAFT" })).await;
    assert_eq!(draft["status"], "DRAFT");
    let uri = format!("/api/jobs/{}", draft["id"].as_str().unwrap());

    assert_eq!(app.get(&uri, None).await.status, StatusCode::NOT_FOUND);
    assert_eq!(app.get(&uri, Some(&seeker)).await.status, StatusCode::NOT_FOUND);
    assert_eq!(app.get(&uri, Some(&rival)).await.status, StatusCode::NOT_FOUND);
    assert_eq!(app.get(&uri, Some(&company)).await.status, StatusCode::OK);

    let resp = app.get("/api/company/jobs", Some(&company)).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body.as_array().unwrap().len(), 1);

    let resp = app.get("/api/company/jobs", Some(&seeker)).await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn only_the_owner_manages_a_job() {
    let app = spawn_app();
    let company = app.company("hr@acme.test", "Acme").await;
    let rival = app.company("hr@globex.test", "Globex").await;
    let seeker = app.job_seeker("ada@example.test").await;

    let resp = app
        .request(
            Method::POST,
            "/api/jobs",
            Some(&seeker.cookie()),
            Some(json!({
                "title": "Not allowed",
                "description": "Job seekers cannot post jobs.",
                "location": "Remote",
                "locationType": "REMOTE",
                "jobType": "CONTRACT",
                "experienceLevel": "MID"
            })),
        )
        .await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);
    assert_eq!(app.store.job_count().await, 0);

    let job = app.create_job(&company, json!({})).await;
    let uri = format!("/api/jobs/{}", job["id"].as_str().unwrap());

    let resp = app
        .request(
            Method::PATCH,
            &uri,
            Some(&rival.cookie()),
            Some(json!({ "title": "Hijacked title" })),
        )
        .await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);

    let resp = app
        .request(Method::DELETE, &uri, Some(&rival.cookie()), None)
        .await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);

    // salaryMin above the stored salaryMax fails on the merged result
    let resp = app
        .request(
            Method::PATCH,
            &uri,
            Some(&company.cookie()),
            Some(json!({ "salaryMin": 150000 })),
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let resp = app
        .request(
            Method::PATCH,
            &uri,
            Some(&company.cookie()),
            Some(json!({ "title": "Staff Rust engineer", "status": "PAUSED" })),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["title"], "Staff Rust engineer");
    assert_eq!(resp.body["status"], "PAUSED");
    assert_eq!(resp.body["location"], "Berlin");
    assert_eq!(resp.body["salaryMax"], job["salaryMax"]);

    // an explicit null clears a salary bound, an absent field keeps it
    let resp = app
        .request(
            Method::PATCH,
            &uri,
            Some(&company.cookie()),
            Some(json!({ "salaryMax": null })),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body["salaryMax"].is_null());
    assert_eq!(resp.body["salaryMin"], job["salaryMin"]);

    let resp = app
        .request(Method::DELETE, &uri, Some(&company.cookie()), None)
        .await;
    assert_eq!(resp.status, StatusCode::NO_CONTENT);
    assert_eq!(app.store.job_count().await, 0);

    let resp = app
        .request(Method::DELETE, &uri, Some(&company.cookie()), None)
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn inverted_salary_range_is_rejected_on_create() {
    let app = spawn_app();
    let company = app.company("hr@acme.test", "Acme").await;

    let resp = app
        .request(
            Method::POST,
            "/api/jobs",
            Some(&company.cookie()),
            Some(json!({
                "title": "Backwards pay",
                "description": "Salary range is upside down.",
                "salaryMin": 100000,
                "salaryMax": 50000,
                "location": "Remote",
                "locationType": "REMOTE",
                "jobType": "FULL_TIME",
                "experienceLevel": "MID"
            })),
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.store.job_count().await, 0);
}

#[tokio::test]
async fn salaries_beyond_the_stored_precision_are_rejected() {
    let app = spawn_app();
    let company = app.company("hr@acme.test", "Acme").await;

    let resp = app
        .request(
            Method::POST,
            "/api/jobs",
            Some(&company.cookie()),
            Some(json!({
                "title": "Oversized pay",
                "description": "Salary does not fit the column.",
                "salaryMax": 1_000_000_000_000_i64,
                "location": "Remote",
                "locationType": "REMOTE",
                "jobType": "FULL_TIME",
                "experienceLevel": "MID"
            })),
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.store.job_count().await, 0);

    let job = app.create_job(&company, json!({})).await;
    let resp = app
        .request(
            Method::PATCH,
            &format!("/api/jobs/{}", job["id"].as_str().unwrap()),
            Some(&company.cookie()),
            Some(json!({ "salaryMax": 10000000000_i64 })),
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn company_pages_and_profiles() {
    let app = spawn_app();
    let company = app.company("hr@acme.test", "Acme").await;
    app.create_job(&company, json!({ "title": "Open role" })).await;
    app.create_job(&company, json!({ "title": "Closed role", "status": "CLOSED" }))
        .await;

    let resp = app.get("/api/company/profile", Some(&company)).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["name"], "Acme");
    let company_id = resp.body["id"].as_str().unwrap().to_string();

    let resp = app
        .request(
            Method::PATCH,
            "/api/company/profile",
            Some(&company.cookie()),
            Some(json!({ "industry": "Robotics", "website": "https://acme.test" })),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["industry"], "Robotics");

    let resp = app
        .request(
            Method::PATCH,
            "/api/company/profile",
            Some(&company.cookie()),
            Some(json!({ "website": "not a website" })),
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let resp = app.get(&format!("/api/companies/{}", company_id), None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["company"]["website"], "https://acme.test");
    let jobs = resp.body["jobs"].as_array().unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0]["title"], "Open role");

    let resp = app
        .get(&format!("/api/companies/{}", uuid::Uuid::new_v4()), None)
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_and_openapi() {
    let app = spawn_app();

    let resp = app.get("/health", None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, json!({ "status": "ok" }));

    let resp = app.get("/api/openapi.json", None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body["paths"]["/api/jobs"].is_object());
}
