use crate::context::AppContext;
use crate::domain::summary::PipelineReport;
use crate::domain::window::MergeWindow;
use crate::error::AppResult;
use crate::workflow::pipeline::run_pipeline;

#[derive(Debug, Clone)]
pub struct SummarizeCommandArgs {
    pub org: String,
    pub repos: Vec<String>,
    pub start_date: String,
    pub end_date: String,
}

pub async fn run(ctx: &AppContext, args: SummarizeCommandArgs) -> AppResult<PipelineReport> {
    let window = MergeWindow::parse(&args.start_date, &args.end_date)?;
    run_pipeline(ctx, &args.org, &args.repos, &window).await
}
