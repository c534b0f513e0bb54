use strava_client::{Paging, config::Config, registry::ServiceRegistry};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = std::env::var("STRAVA_LOG_LEVEL")
        .map(EnvFilter::new)
        .unwrap_or_else(|_| EnvFilter::from_default_env());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cfg = Config::from_env()?;
    let registry = ServiceRegistry::from_config(&cfg);
    let token = cfg.token();

    let limit = std::env::var("STRAVA_LIMIT")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(5);

    let activities = registry
        .activities(&token)
        .await
        .list_authenticated_athlete_activities(None, None, Some(Paging::first(limit)?))
        .await
        .map_err(|e| format!("failed to fetch activities: {}", e))?;

    if activities.is_empty() {
        println!("No activities returned (check token scopes)");
        return Ok(());
    }

    println!("Recent activities (limit {}):", limit);
    for a in activities {
        if a.is_private() {
            println!("- {} (private)", a.id);
            continue;
        }
        let name = a.name.unwrap_or_else(|| "(no name)".to_string());
        let kind = a.activity_type.unwrap_or_default();
        println!("- {}: {} [{}]", a.id, name, kind);
    }

    Ok(())
}
