use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct VoteSummaryDoc {
    pub resource: String,
    pub count: i64,
    /// Count with explicit sign, e.g. `+3`
    pub count_display: String,
    /// -1, 0 or 1
    pub vote: i8,
    pub up_active: bool,
    pub down_active: bool,
}

#[derive(ToSchema)]
pub struct SetVoteRequest {
    /// -1, 0 or 1
    pub vote: i64,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::votes::get_summary,
        crate::routes::votes::cast_vote,
        crate::routes::votes::put_vote,
    ),
    components(
        schemas(
            HealthResponse,
            VoteSummaryDoc,
            SetVoteRequest,
        )
    ),
    tags(
        (name = "health"),
        (name = "votes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_vote_paths() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        assert!(paths.iter().any(|p| p.as_str() == "/votes/{resource}"));
        assert!(paths.iter().any(|p| p.as_str() == "/vote/{direction}/{resource}"));
    }
}
