use crate::context::AppContext;
use crate::error::{AppError, AppResult};

pub async fn list_orgs(ctx: &AppContext) -> AppResult<Vec<String>> {
    ctx.repository_host.list_user_orgs().await
}

pub async fn list_repos(ctx: &AppContext, org: &str) -> AppResult<Vec<String>> {
    let org = org.trim();
    if org.is_empty() {
        return Err(AppError::InvalidInput("no organization provided".to_string()));
    }
    ctx.repository_host.list_org_repos(org).await
}
