use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::AppState;
use risk_dashboard::{assemble_dashboard, DashboardView};

#[derive(Serialize)]
pub struct DistrictListResponse {
    pub districts: Vec<String>,
    pub count: usize,
}

#[derive(Serialize, Debug)]
pub struct ErrorMessage {
    pub message: String,
}

/// District names for the selector view.
pub async fn list_districts(State(state): State<AppState>) -> Json<DistrictListResponse> {
    let districts: Vec<String> = state.atlas.table.names().map(str::to_string).collect();
    let count = districts.len();
    Json(DistrictListResponse { districts, count })
}

/// Full dashboard payload for one district: tier summary, tier-distribution
/// chart, choropleth layer, and boundary highlight.
pub async fn district_dashboard(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<DashboardView>, (StatusCode, Json<ErrorMessage>)> {
    match assemble_dashboard(&state.atlas, &name) {
        Ok(view) => Ok(Json(view)),
        Err(err) => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorMessage {
                message: err.to_string(),
            }),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::sample_state;

    #[tokio::test]
    async fn test_list_districts() {
        let state = sample_state(vec![Ok("unused".to_string())]);
        let Json(response) = list_districts(State(state)).await;
        assert_eq!(response.count, 3);
        assert!(response.districts.contains(&"A".to_string()));
    }

    #[tokio::test]
    async fn test_dashboard_selects_and_highlights_tier() {
        let state = sample_state(vec![]);
        let Json(view) = district_dashboard(State(state), Path("A".to_string()))
            .await
            .expect("district A exists");

        assert_eq!(view.district, "A");
        assert_eq!(view.tier.label, "주의");
        assert_eq!(view.tier.display_label, "🟡 주의");

        let highlighted: Vec<_> = view
            .distribution
            .bars
            .iter()
            .filter(|b| b.highlighted)
            .collect();
        assert_eq!(highlighted.len(), 1);
        assert_eq!(highlighted[0].label, "주의");

        // "A" has geometry in the sample boundary file: outlined on the map
        let highlight = view.map.highlight.expect("highlight present");
        assert!(highlight.geometry.is_some());
        assert!(highlight.centroid.is_some());
    }

    #[tokio::test]
    async fn test_dashboard_unknown_district_is_404_message() {
        let state = sample_state(vec![]);
        let err = district_dashboard(State(state), Path("없는동".to_string()))
            .await
            .err()
            .expect("unknown district is an error");
        assert_eq!(err.0, StatusCode::NOT_FOUND);
        assert!(err.1.message.contains("없는동"));
    }

    #[tokio::test]
    async fn test_dashboard_tolerates_missing_geometry() {
        let state = sample_state(vec![]);
        // "C" has no feature in the boundary file
        let Json(view) = district_dashboard(State(state), Path("C".to_string()))
            .await
            .expect("district C exists");
        let highlight = view.map.highlight.expect("highlight entry present");
        assert!(highlight.geometry.is_none());
        assert_eq!(view.map.center, risk_dashboard::SEOUL_CENTER);
    }
}
