use strava_client::{config::Config, registry::ServiceRegistry};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Example: expects STRAVA_ACCESS_TOKEN in env
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("config error: {}", e);
            return Ok(());
        }
    };
    let registry = ServiceRegistry::from_config(&cfg);
    let athlete = registry
        .athletes(&cfg.token())
        .await
        .get_authenticated_athlete()
        .await?;
    println!(
        "Athlete: {} {} ({})",
        athlete.firstname.unwrap_or_default(),
        athlete.lastname.unwrap_or_default(),
        athlete.id
    );
    Ok(())
}
