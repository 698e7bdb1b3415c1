use pretty_assertions::assert_eq;
use scribe_core::{ArticleRequest, JobId, JobStatus, ListQuery};
use scribe_engine::{ApiSettings, ContentApi, FailureKind, ReqwestContentApi};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_for(server: &MockServer) -> ReqwestContentApi {
    ReqwestContentApi::new(ApiSettings::new(&server.uri()).expect("settings")).expect("client")
}

fn job_json(id: &str, status: &str, progress: f64) -> Value {
    json!({
        "job_id": id,
        "status": status,
        "progress": progress,
        "current_step": null,
        "created_at": "2024-05-01T10:00:00.000123",
        "updated_at": "2024-05-01T10:00:05",
        "completed_at": null,
        "error_message": null,
        "result": null,
        "serp_data_collected": false,
        "outline_generated": false
    })
}

fn article_json() -> Value {
    json!({
        "title": "Best Productivity Tools",
        "sections": [
            { "heading": "Intro", "level": 2, "content": "Tools help.", "word_count": 2 }
        ],
        "full_content": "## Intro\n\nTools help.",
        "word_count": 2,
        "seo_metadata": {
            "title_tag": "Best Productivity Tools",
            "meta_description": "A guide",
            "focus_keyword": "productivity tools",
            "secondary_keywords": []
        },
        "keyword_analysis": {
            "primary_keyword": "productivity tools",
            "primary_keyword_count": 3,
            "primary_keyword_density": 1.5,
            "secondary_keywords": { "remote work": 2 },
            "lsi_keywords": []
        },
        "internal_links": [],
        "external_references": [],
        "faq_section": [ { "question": "Free?", "answer": "Some." } ],
        "quality_score": null,
        "seo_validation": {
            "is_valid": true,
            "score": 91.0,
            "checks": { "title_length": true },
            "issues": [],
            "suggestions": []
        },
        "generation_time_seconds": 12.5,
        "serp_analysis_summary": { "themes": 4 }
    })
}

#[tokio::test]
async fn create_job_posts_request_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/jobs"))
        .and(body_json(json!({
            "topic": "best productivity tools",
            "target_word_count": 1500,
            "language": "en"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "job_id": "abc123",
            "status": "pending",
            "message": "Job created successfully."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = ArticleRequest::new("best productivity tools")
        .with_word_count(1500)
        .with_language("en");
    let created = api_for(&server).create_job(&request).await.expect("create");

    assert_eq!(created.job_id, JobId::from("abc123"));
    assert_eq!(created.status, JobStatus::Pending);
}

#[tokio::test]
async fn get_job_decodes_naive_timestamps_and_result() {
    let server = MockServer::start().await;
    let mut body = job_json("done1", "completed", 100.0);
    body["result"] = article_json();
    body["completed_at"] = json!("2024-05-01T10:04:59");
    Mock::given(method("GET"))
        .and(path("/jobs/done1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let job = api_for(&server)
        .get_job(&JobId::from("done1"))
        .await
        .expect("job");

    assert_eq!(job.status, JobStatus::Completed);
    assert!(job.completed_at.is_some());
    let article = job.result.expect("article");
    assert_eq!(article.title, "Best Productivity Tools");
    assert_eq!(article.keyword_analysis.secondary_keywords["remote work"], 2);
    assert_eq!(article.faq_section.len(), 1);
    assert!(article.quality_score.is_none());
}

#[tokio::test]
async fn unknown_job_is_not_found_with_backend_detail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "detail": "Job not found" })))
        .mount(&server)
        .await;

    let err = api_for(&server)
        .get_job(&JobId::from("missing"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::NotFound);
    assert_eq!(err.message, "Job not found");
    assert_eq!(err.status_code(), Some(404));
}

#[tokio::test]
async fn list_jobs_sends_status_filter_and_limit() {
    let server = MockServer::start().await;
    let failed: Vec<Value> = (0..10)
        .map(|idx| job_json(&format!("f{idx}"), "failed", 40.0))
        .collect();
    Mock::given(method("GET"))
        .and(path("/jobs"))
        .and(query_param("status", "failed"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(failed)))
        .expect(1)
        .mount(&server)
        .await;

    let jobs = api_for(&server)
        .list_jobs(ListQuery {
            status: Some(JobStatus::Failed),
            limit: 10,
        })
        .await
        .expect("list");

    assert!(jobs.len() <= 10);
    assert!(jobs.iter().all(|job| job.status == JobStatus::Failed));
}

#[tokio::test]
async fn list_jobs_defaults_to_limit_50_without_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs"))
        .and(query_param("limit", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let jobs = api_for(&server)
        .list_jobs(ListQuery::default())
        .await
        .expect("list");
    assert!(jobs.is_empty());

    let received = server.received_requests().await.expect("recorded");
    assert_eq!(received[0].url.query(), Some("limit=50"));
}

#[tokio::test]
async fn resume_posts_to_resume_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/jobs/abc123/resume"))
        .respond_with(ResponseTemplate::new(200).set_body_json(job_json("abc123", "pending", 0.0)))
        .expect(1)
        .mount(&server)
        .await;

    let job = api_for(&server)
        .resume_job(&JobId::from("abc123"))
        .await
        .expect("resume");
    assert_eq!(job.status, JobStatus::Pending);
}

#[tokio::test]
async fn resume_rejection_surfaces_status_and_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/jobs/done/resume"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "detail": "Job already completed" })),
        )
        .mount(&server)
        .await;

    let err = api_for(&server)
        .resume_job(&JobId::from("done"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(400));
    assert_eq!(err.to_string(), "Job already completed");
}

#[tokio::test]
async fn research_encodes_topic_as_one_segment() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/research/remote%20work%20tools"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": "remote work tools",
            "total_results": 1,
            "results": [{
                "rank": 1,
                "url": "https://example.com",
                "title": "Top tools",
                "snippet": "A list",
                "domain": "example.com"
            }],
            "common_themes": [],
            "common_questions": ["Which is best?"],
            "avg_title_length": 9.0,
            "avg_content_indicators": { "lists": 3 },
            "top_domains": ["example.com"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let analysis = api_for(&server)
        .research_topic("remote work tools")
        .await
        .expect("research");
    assert_eq!(analysis.results[0].rank, 1);
    assert_eq!(analysis.common_questions, vec!["Which is best?".to_string()]);
}

#[tokio::test]
async fn outline_and_generate_post_the_article_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/outline"))
        .and(body_json(json!({ "topic": "rust" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "title": "Rust",
            "meta_description": "All about rust",
            "primary_keyword": "rust",
            "sections": [{ "heading": "Ownership", "level": 2, "key_points": ["moves"] }],
            "estimated_word_count": 1200
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(article_json()))
        .mount(&server)
        .await;

    let api = api_for(&server);
    let outline = api
        .generate_outline(&ArticleRequest::new("rust"))
        .await
        .expect("outline");
    assert_eq!(outline.sections[0].heading, "Ownership");
    assert_eq!(outline.sections[0].target_word_count, 0);

    let article = api
        .generate_article(&ArticleRequest::new("rust"))
        .await
        .expect("article");
    assert_eq!(article.word_count, 2);
}

#[tokio::test]
async fn validation_errors_are_flattened() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/jobs"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "detail": [
                { "loc": ["body", "topic"], "msg": "String should have at least 3 characters", "type": "string_too_short" }
            ]
        })))
        .mount(&server)
        .await;

    let err = api_for(&server)
        .create_job(&ArticleRequest::new("ab"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(422));
    assert_eq!(err.message, "String should have at least 3 characters");
}

#[tokio::test]
async fn malformed_body_is_a_decode_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs/weird"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "job_id": "weird" })))
        .mount(&server)
        .await;

    let err = api_for(&server)
        .get_job(&JobId::from("weird"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
    assert_eq!(err.status_code(), None);
}

#[tokio::test]
async fn unreachable_backend_is_a_network_failure() {
    // Nothing listens on the discard port.
    let api = ReqwestContentApi::new(ApiSettings::new("http://127.0.0.1:9").expect("settings"))
        .expect("client");
    let err = api.health().await.unwrap_err();
    assert!(matches!(err.kind, FailureKind::Network | FailureKind::Timeout));
}

#[tokio::test]
async fn health_returns_opaque_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "healthy",
            "service": "SEO Content Generation Platform",
            "version": "1.0.0"
        })))
        .mount(&server)
        .await;

    let payload = api_for(&server).health().await.expect("health");
    assert_eq!(payload["status"], "healthy");
}

#[test]
fn settings_reject_non_base_urls() {
    let err = ApiSettings::new("mailto:someone@example.com").unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
    assert!(ApiSettings::new("not a url").is_err());
}

#[test]
fn client_reports_configured_backend() {
    let api = ReqwestContentApi::new(ApiSettings::new("http://content.local:9000/api/").expect("settings"))
        .expect("client");
    assert_eq!(api.base_url().as_str(), "http://content.local:9000/api/");
}
