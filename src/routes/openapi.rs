use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vetta Influencer API",
        version = "1.0.0",
        description = "Influencer discovery: listings, creator search and live search sessions"
    ),
    paths(
        // Health
        super::health::root,
        super::health::health,
        super::health::status,
        // Influencers
        super::influencers::list_influencers,
        super::influencers::get_influencer,
        super::influencers::create_influencer,
        // Creators
        super::creators::search_creators,
        super::creators::get_creator,
        // Analytics
        super::analytics::overview,
        // Search session
        super::websocket::search_ws,
    ),
    components(schemas(
        // Requests
        crate::models::requests::CreateInfluencerRequest,
        crate::models::requests::ListingSource,
        // Responses
        crate::models::responses::ListInfluencersResponse,
        crate::models::responses::CreatorSearchResponse,
        crate::models::responses::AnalyticsOverview,
        crate::models::responses::CategoryShare,
        crate::models::responses::ServiceHealth,
        crate::models::responses::HealthResponse,
        crate::models::responses::StatusResponse,
        crate::models::responses::SystemStatistics,
        // Entities
        crate::models::entities::Influencer,
        crate::models::entities::PlatformAccount,
        crate::models::entities::CreatorStats,
        crate::models::entities::Category,
        // Search session frames
        crate::search::SearchState,
        crate::search::SearchView,
        crate::search::EmptyState,
        // Error
        crate::error::ErrorBody,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health and status endpoints"),
        (name = "Influencers", description = "Stored influencer listing"),
        (name = "Creators", description = "Creator search"),
        (name = "Analytics", description = "Listing aggregates"),
        (name = "Search", description = "Live search sessions over WebSocket"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "BearerAuth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::Http::new(
                        utoipa::openapi::security::HttpAuthScheme::Bearer,
                    ),
                ),
            );
        }
    }
}

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/explore").url("/api-docs/openapi.json", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/api/v1/influencers",
            "/api/v1/influencers/{influencer_id}",
            "/api/v1/creators/search",
            "/api/v1/creators/{creator_id}",
            "/api/v1/analytics/overview",
            "/api/v1/search/ws",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
