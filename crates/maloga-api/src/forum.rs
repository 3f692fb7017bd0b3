use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{error, warn};
use uuid::Uuid;

use maloga_types::api::{
    AnswerResponse, Claims, CreateAnswerRequest, CreateQuestionRequest, QuestionResponse,
};
use maloga_types::events::{ChangeOp, Watched};
use maloga_types::models::QuestionCategory;

use crate::auth::AppStateInner;
use crate::util::{parse_timestamp, parse_uuid};

/// Forum feed: questions newest first, each with its answers nested.
/// Nothing is cached — every call reads the authoritative rows.
pub async fn list_questions(
    State(state): State<Arc<AppStateInner>>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    // Run all blocking DB queries off the async runtime
    let db = state.clone();
    let (rows, answer_rows) = tokio::task::spawn_blocking(move || {
        let rows = db
            .db
            .list_questions()
            .map_err(|e| { error!("DB list_questions error: {}", e); StatusCode::INTERNAL_SERVER_ERROR })?;

        let question_ids: Vec<String> = rows.iter().map(|r| r.id.clone()).collect();
        let answer_rows = db
            .db
            .answers_for_questions(&question_ids)
            .map_err(|e| { error!("DB answers_for_questions error: {}", e); StatusCode::INTERNAL_SERVER_ERROR })?;

        Ok::<_, StatusCode>((rows, answer_rows))
    })
    .await
    .map_err(|e| { error!("spawn_blocking join error: {}", e); StatusCode::INTERNAL_SERVER_ERROR })??;

    // Group answers by question_id (cheap in-memory work, fine on async thread)
    let mut answer_map: HashMap<String, Vec<AnswerResponse>> = HashMap::new();
    for row in answer_rows {
        let question_id = row.question_id.clone();
        let answer = AnswerResponse {
            id: parse_uuid(&row.id, "answer"),
            question_id: parse_uuid(&row.question_id, "answer"),
            author_name: row.author_name.unwrap_or_else(|| "Unknown".to_string()),
            content: row.content,
            created_at: parse_timestamp(&row.created_at, "answer"),
        };
        answer_map.entry(question_id).or_default().push(answer);
    }

    let questions: Vec<QuestionResponse> = rows
        .into_iter()
        .map(|row| QuestionResponse {
            answers: answer_map.remove(&row.id).unwrap_or_default(),
            id: parse_uuid(&row.id, "question"),
            author_name: row.author_name.unwrap_or_else(|| "Unknown".to_string()),
            title: row.title,
            content: row.content,
            category: row.category.parse().unwrap_or_else(|e| {
                warn!("{}", e);
                QuestionCategory::General
            }),
            created_at: parse_timestamp(&row.created_at, "question"),
        })
        .collect();

    Ok(Json(questions))
}

pub async fn create_question(
    State(state): State<Arc<AppStateInner>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    if req.title.trim().is_empty() || req.content.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let question_id = Uuid::new_v4();

    state
        .db
        .insert_question(
            &question_id.to_string(),
            &claims.sub.to_string(),
            req.title.trim(),
            &req.content,
            req.category.as_str(),
        )
        .map_err(|e| {
            error!("DB insert_question error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    state.dispatcher.notify(Watched::Questions, ChangeOp::Insert);

    Ok((
        StatusCode::CREATED,
        Json(QuestionResponse {
            id: question_id,
            author_name: claims.full_name.clone(),
            title: req.title.trim().to_string(),
            content: req.content,
            category: req.category,
            created_at: chrono::Utc::now(),
            answers: vec![],
        }),
    ))
}

pub async fn create_answer(
    State(state): State<Arc<AppStateInner>>,
    Path(question_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateAnswerRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    if req.content.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let exists = state
        .db
        .question_exists(&question_id.to_string())
        .map_err(|e| {
            error!("DB question_exists error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
    if !exists {
        return Err(StatusCode::NOT_FOUND);
    }

    let answer_id = Uuid::new_v4();

    state
        .db
        .insert_answer(
            &answer_id.to_string(),
            &question_id.to_string(),
            &claims.sub.to_string(),
            &req.content,
        )
        .map_err(|e| {
            error!("DB insert_answer error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    state.dispatcher.notify(Watched::Answers, ChangeOp::Insert);

    Ok((
        StatusCode::CREATED,
        Json(AnswerResponse {
            id: answer_id,
            question_id,
            author_name: claims.full_name.clone(),
            content: req.content,
            created_at: chrono::Utc::now(),
        }),
    ))
}
