use askama::Template;
use axum::extract::{Multipart, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Json;
use serde::Deserialize;
use tracing::{debug, error};

use super::state::{ActiveDataset, AppState, UploadError};
use crate::analysis::types::score_dataset;
use crate::analysis::{DailyMetric, Report, ScoredComment};
use crate::storage::{export_csv, EXPORT_FILENAME};

const RAW_PREVIEW_ROWS: usize = 50;

#[derive(Debug, Deserialize)]
pub struct ThresholdQuery {
    pub threshold: Option<u32>,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    source: String,
    rows: usize,
    columns: String,
    error: Option<String>,
    threshold: u32,
    threshold_min: u32,
    threshold_max: u32,
    report: Option<ReportView>,
}

struct ReportView {
    raw_columns: Vec<String>,
    raw_rows: Vec<Vec<String>>,
    distribution: Vec<LabelView>,
    daily: Vec<DailyView>,
    spikes: Vec<DailyView>,
    negatives: Vec<CommentView>,
    keywords: Vec<KeywordView>,
    suggestions: Vec<String>,
}

struct LabelView {
    label: String,
    css: String,
    count: usize,
    share: String,
}

struct DailyView {
    date: String,
    total_comments: usize,
    avg_compound: String,
    negative_pct: String,
    neg_diff: String,
}

struct CommentView {
    timestamp: String,
    username: String,
    comment: String,
    compound: String,
}

struct KeywordView {
    word: String,
    count: usize,
}

impl From<&DailyMetric> for DailyView {
    fn from(d: &DailyMetric) -> Self {
        Self {
            date: d.date.format("%Y-%m-%d").to_string(),
            total_comments: d.total_comments,
            avg_compound: format!("{:.3}", d.avg_compound),
            negative_pct: format!("{:.1}%", d.negative_pct),
            neg_diff: format!("{:+.1}", d.neg_diff),
        }
    }
}

impl From<&ScoredComment> for CommentView {
    fn from(c: &ScoredComment) -> Self {
        Self {
            timestamp: c.comment.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            username: c.comment.username.clone(),
            comment: c.comment.comment.clone(),
            compound: format!("{:.4}", c.scores.compound),
        }
    }
}

impl ReportView {
    fn new(columns: &[String], report: &Report) -> Self {
        let raw_rows = report
            .scored
            .iter()
            .take(RAW_PREVIEW_ROWS)
            .map(|c| c.comment.fields.clone())
            .collect();

        let distribution = report
            .distribution
            .iter()
            .map(|lc| LabelView {
                label: lc.label.to_string(),
                css: lc.label.css_class().to_string(),
                count: lc.count,
                share: format!("{:.0}%", lc.count as f64 / report.rows as f64 * 100.0),
            })
            .collect();

        Self {
            raw_columns: columns.to_vec(),
            raw_rows,
            distribution,
            daily: report.daily.iter().map(DailyView::from).collect(),
            spikes: report.spikes.iter().map(DailyView::from).collect(),
            negatives: report.top_negative.iter().map(CommentView::from).collect(),
            keywords: report
                .keywords
                .iter()
                .map(|k| KeywordView {
                    word: k.word.clone(),
                    count: k.count,
                })
                .collect(),
            suggestions: report.suggestions.clone(),
        }
    }
}

fn render(template: DashboardTemplate) -> Html<String> {
    Html(template.render().unwrap_or_else(|e| format!("Template error: {}", e)))
}

async fn render_dashboard(state: &AppState, threshold: u32) -> Html<String> {
    let base = DashboardTemplate {
        source: String::new(),
        rows: 0,
        columns: String::new(),
        error: None,
        threshold,
        threshold_min: state.analysis.threshold_min,
        threshold_max: state.analysis.threshold_max,
        report: None,
    };

    let template = match state.active().await {
        ActiveDataset::Empty => base,
        ActiveDataset::Failed { name, error } => DashboardTemplate {
            source: name,
            error: Some(error),
            ..base
        },
        ActiveDataset::Ready { source, dataset } => {
            let report = Report::build(&dataset, state.scorer.as_ref(), threshold as f64);
            DashboardTemplate {
                source: source.describe(),
                rows: dataset.len(),
                columns: dataset.columns.join(", "),
                report: Some(ReportView::new(&dataset.columns, &report)),
                ..base
            }
        }
    };

    render(template)
}

pub async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<ThresholdQuery>,
) -> Html<String> {
    let threshold = state.set_threshold(query.threshold).await;
    render_dashboard(&state, threshold).await
}

pub async fn upload(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return (e.status(), e.body_text()).into_response(),
        };
        if field.name() != Some("file") {
            continue;
        }

        let name = field
            .file_name()
            .filter(|n| !n.is_empty())
            .unwrap_or("upload.csv")
            .to_string();
        let bytes = match field.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => return (e.status(), e.body_text()).into_response(),
        };
        debug!("Received upload - name={}, bytes={}", name, bytes.len());

        return match state.upload(name, bytes).await {
            Ok(_) => Redirect::to("/").into_response(),
            Err(UploadError::Worker(e)) => {
                error!("Upload worker failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "upload failed").into_response()
            }
            Err(UploadError::Schema(_)) => {
                let threshold = state.threshold().await;
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    render_dashboard(&state, threshold).await,
                )
                    .into_response()
            }
        };
    }

    (StatusCode::BAD_REQUEST, "missing multipart field \"file\"").into_response()
}

pub async fn reset(State(state): State<AppState>) -> Redirect {
    state.reset().await;
    Redirect::to("/")
}

pub async fn export(State(state): State<AppState>) -> Response {
    let dataset = match state.active().await {
        ActiveDataset::Ready { dataset, .. } => dataset,
        ActiveDataset::Empty => {
            return (StatusCode::CONFLICT, "no dataset loaded").into_response();
        }
        ActiveDataset::Failed { error, .. } => {
            return (StatusCode::UNPROCESSABLE_ENTITY, error).into_response();
        }
    };

    let scored = score_dataset(&dataset, state.scorer.as_ref());
    match export_csv(&dataset.columns, &scored) {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", EXPORT_FILENAME),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => {
            error!("Export failed: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "export failed").into_response()
        }
    }
}

pub async fn api_report(
    State(state): State<AppState>,
    Query(query): Query<ThresholdQuery>,
) -> Response {
    let threshold = match query.threshold {
        Some(t) => state.analysis.clamp_threshold(t),
        None => state.threshold().await,
    };

    match state.active().await {
        ActiveDataset::Ready { dataset, .. } => {
            Json(Report::build(&dataset, state.scorer.as_ref(), threshold as f64)).into_response()
        }
        ActiveDataset::Empty => (
            StatusCode::CONFLICT,
            Json(serde_json::json!({ "error": "no dataset loaded" })),
        )
            .into_response(),
        ActiveDataset::Failed { name, error } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({ "error": error, "source": name })),
        )
            .into_response(),
    }
}
