#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Once;

use chrono::{TimeZone, Utc};
use scribe_core::{
    update, AppState, Article, ArticleSection, Effect, FaqItem, FetchPurpose, Job, JobId,
    JobStatus, KeywordAnalysis, LinkSuggestion, Msg, OperationError, PollGeneration,
    QualityScore, SeoMetadata, SeoValidationResult,
};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(scribe_logging::initialize_for_tests);
}

pub fn job(id: &str, status: JobStatus, progress: f64) -> Job {
    let created = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
    Job {
        job_id: JobId::from(id),
        status,
        progress,
        current_step: None,
        created_at: created,
        updated_at: created,
        completed_at: None,
        error_message: None,
        result: None,
        serp_data_collected: false,
        outline_generated: false,
    }
}

pub fn failed_job(id: &str, message: &str) -> Job {
    Job {
        error_message: Some(message.to_string()),
        ..job(id, JobStatus::Failed, 35.0)
    }
}

pub fn completed_job(id: &str, article: Article) -> Job {
    Job {
        result: Some(article),
        completed_at: Some(Utc.with_ymd_and_hms(2024, 5, 1, 10, 5, 0).unwrap()),
        ..job(id, JobStatus::Completed, 100.0)
    }
}

pub fn article(title: &str) -> Article {
    Article {
        title: title.to_string(),
        sections: vec![ArticleSection {
            heading: "Why it matters".to_string(),
            level: 2,
            content: "Short body text.".to_string(),
            word_count: 3,
        }],
        full_content: "## Why it matters\n\nShort body text.".to_string(),
        word_count: 3,
        seo_metadata: SeoMetadata {
            title_tag: title.to_string(),
            meta_description: "A description".to_string(),
            og_title: None,
            og_description: None,
            canonical_url_suggestion: None,
            focus_keyword: "productivity tools".to_string(),
            secondary_keywords: vec!["remote work".to_string()],
        },
        keyword_analysis: KeywordAnalysis {
            primary_keyword: "productivity tools".to_string(),
            primary_keyword_count: 12,
            primary_keyword_density: 1.4,
            secondary_keywords: BTreeMap::from([("remote work".to_string(), 4)]),
            lsi_keywords: vec!["time tracking".to_string()],
        },
        internal_links: vec![LinkSuggestion {
            anchor_text: "time tracking".to_string(),
            suggested_target_topic: "time tracking apps".to_string(),
            context: "intro".to_string(),
            relevance_score: 0.8,
        }],
        external_references: Vec::new(),
        faq_section: vec![FaqItem {
            question: "Are they free?".to_string(),
            answer: "Some are.".to_string(),
        }],
        quality_score: Some(QualityScore {
            overall_score: 82.0,
            readability_score: 75.0,
            seo_score: 90.0,
            uniqueness_indicators: BTreeMap::new(),
            improvement_suggestions: Vec::new(),
            needs_revision: false,
        }),
        seo_validation: Some(SeoValidationResult {
            is_valid: true,
            score: 88.0,
            checks: BTreeMap::from([("title_length".to_string(), true)]),
            issues: Vec::new(),
            suggestions: Vec::new(),
        }),
        generation_time_seconds: 42.5,
        serp_analysis_summary: None,
    }
}

/// Selects `job` and returns the state tracking it plus the poll generation.
pub fn tracking(state: AppState, job: Job) -> (AppState, PollGeneration) {
    let job_id = job.job_id.clone();
    let (state, effects) = update(
        state,
        Msg::JobSelected {
            job_id: job_id.clone(),
        },
    );
    let purpose = only_fetch_purpose(&effects);
    let (state, effects) = update(
        state,
        Msg::JobFetched {
            job_id,
            purpose,
            result: Ok(job),
        },
    );
    let generation = effects
        .iter()
        .find_map(|effect| match effect {
            Effect::StartPolling { generation, .. } => Some(*generation),
            _ => None,
        })
        .expect("start polling effect");
    (state, generation)
}

pub fn only_fetch_purpose(effects: &[Effect]) -> FetchPurpose {
    match effects {
        [Effect::FetchJob { purpose, .. }] => *purpose,
        other => panic!("expected a single fetch effect, got {other:?}"),
    }
}

pub fn poll_result(
    state: AppState,
    job_id: &str,
    generation: PollGeneration,
    result: Result<Job, OperationError>,
) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::JobFetched {
            job_id: JobId::from(job_id),
            purpose: FetchPurpose::Poll { generation },
            result,
        },
    )
}

pub fn tick(state: AppState, job_id: &str, generation: PollGeneration) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::PollTick {
            job_id: JobId::from(job_id),
            generation,
        },
    )
}
