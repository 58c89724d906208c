use utoipa::OpenApi;
use utoipa::{IntoParams, ToSchema};

#[derive(ToSchema)]
pub struct HealthDoc {
    pub success: bool,
    pub status: String,
    pub database: String,
    pub version: String,
    pub timestamp: String,
}

#[derive(ToSchema)]
pub struct FieldErrorDoc { pub field: String, pub message: String }

#[derive(ToSchema)]
pub struct ErrorDoc {
    pub success: bool,
    pub error: String,
    pub details: Option<Vec<FieldErrorDoc>>,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct SubscribeDoc { pub email: String, pub source: Option<String> }

#[derive(ToSchema)]
pub struct UnsubscribeDoc { pub email: String }

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct EarlyAccessDoc {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub country: String,
    /// individual | accredited | institutional | family_office
    pub investor_type: String,
    pub investment_range: Option<String>,
    pub interests: Option<Vec<String>>,
    pub message: Option<String>,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct AccessTokenDoc { pub user_id: String, pub level_name: Option<String> }

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct UpdateUserDoc {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub country: Option<String>,
    pub investor_type: Option<String>,
    /// not_started | pending | approved | rejected | action_required
    pub kyc_status: Option<String>,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct CreateDealDoc {
    pub slug: String,
    pub title: String,
    pub asset_class: String,
    pub jurisdiction: String,
    pub target_amount_cents: i64,
    pub min_investment_cents: i64,
    pub expected_yield_bps: Option<i32>,
    /// draft (default) | open | closed | funded
    pub status: Option<String>,
    pub description: Option<String>,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct UpdateDealDoc {
    pub title: Option<String>,
    pub asset_class: Option<String>,
    pub jurisdiction: Option<String>,
    pub target_amount_cents: Option<i64>,
    pub raised_amount_cents: Option<i64>,
    pub min_investment_cents: Option<i64>,
    pub expected_yield_bps: Option<i32>,
    pub status: Option<String>,
    pub description: Option<String>,
}

#[derive(IntoParams)]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct PageParams {
    /// 1-based, default 1
    pub page: Option<u64>,
    /// default 20, max 100
    pub per_page: Option<u64>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::health,
        crate::routes::newsletter::subscribe,
        crate::routes::newsletter::unsubscribe,
        crate::routes::early_access::submit,
        crate::routes::kyc::kyc_health,
        crate::routes::kyc::access_token,
        crate::routes::kyc::status,
        crate::routes::deals::list,
        crate::routes::deals::get,
        crate::routes::admin::stats,
        crate::routes::admin::early_access,
        crate::routes::admin::newsletter,
        crate::routes::admin::users,
        crate::routes::admin::user_detail,
        crate::routes::admin::update_user,
        crate::routes::admin::create_deal,
        crate::routes::admin::update_deal,
    ),
    components(
        schemas(
            HealthDoc,
            FieldErrorDoc,
            ErrorDoc,
            SubscribeDoc,
            UnsubscribeDoc,
            EarlyAccessDoc,
            AccessTokenDoc,
            UpdateUserDoc,
            CreateDealDoc,
            UpdateDealDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "newsletter"),
        (name = "early-access"),
        (name = "kyc"),
        (name = "deals"),
        (name = "admin")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_public_paths() {
        let doc = ApiDoc::openapi();
        for path in ["/api/health", "/api/newsletter/subscribe", "/api/early-access", "/api/kyc/status/{userId}"] {
            assert!(doc.paths.paths.contains_key(path), "{path}");
        }
    }
}
