//! Render every active fixture to `0.png`, `1.png`, ... without posting anything.
//!
//! Usage: `render-cards <request.json> [out_dir]`. The request uses the Lambda payload format;
//! `today_only` is forced off so the next fixture of every tracked team is drawn.

use std::path::PathBuf;

use football_fixtures_lambda_rust::handler::{Post, Request, run_cycle};
use football_fixtures_lambda_rust::render::FontPainter;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let mut args = std::env::args().skip(1);
    let request_path = args.next().ok_or("usage: render-cards <request.json> [out_dir]")?;
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| ".".to_string()));
    std::fs::create_dir_all(&out_dir)?;

    let mut request: Request = serde_json::from_str(&std::fs::read_to_string(&request_path)?)?;
    request.today_only = false;
    let font_path = request.font_path.clone().ok_or("request has no font_path")?;
    let painter = FontPainter::from_file(&font_path)?;

    let tz = request.timezone()?;
    let today = chrono::Utc::now().with_timezone(&tz).date_naive();
    let api = request.api_client();

    let mut index = 0;
    let report = run_cycle(&request, &api, Some(&painter), today, |post| {
        match post {
            Post::Card { png, .. } => {
                let path = out_dir.join(format!("{}.png", index));
                std::fs::write(&path, png)
                    .map_err(|e| football_fixtures_lambda_rust::FixtureError::DeliveryFailed(e.to_string()))?;
                info!(path = %path.display(), "Wrote card");
            }
            Post::Text(message) => println!("{}", message),
        }
        index += 1;
        Ok(())
    })?;

    if report.failed > 0 {
        error!(failed = report.failed, "Some cards could not be rendered");
    }
    println!("{}", report.summary(request.presentation));
    Ok(())
}
