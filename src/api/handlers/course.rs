use axum::{extract::State, Json};

use crate::{api::state::AppState, domain::CourseDetails};

pub async fn details(State(state): State<AppState>) -> Json<CourseDetails> {
    Json(CourseDetails::new(state.settings.course.name.clone()))
}
