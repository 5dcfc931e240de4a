use std::sync::Arc;

use prolinq_matching::db::{establish_connection_pool, run_migrations};
use prolinq_matching::embedding::EmbeddingGenerator;
use prolinq_matching::models::config::ServerConfig;
use prolinq_matching::processing::ZMQMessage;
use prolinq_matching::processing::embedding::{
    process_embed_all_message, process_embed_job_message, process_embed_missing_message,
    process_embed_user_message,
};
use prolinq_matching::processing::recommendation::{
    process_cleanup_recommendations_message, process_daily_recommendations_message,
    process_refresh_recommendations_message,
};
use prolinq_matching::repository::DieselRepository;
use prolinq_matching::scheduler::run_daily_recommendations;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = run_migrations(&pool) {
        log::error!("Failed to prepare database schema: {e}");
        std::process::exit(1);
    }
    let repo = DieselRepository::new(pool);

    let generator = Arc::new(EmbeddingGenerator::from_settings(&config.embedding));
    let matching = config.matching.clone();

    if config.scheduler.enabled {
        tokio::spawn(run_daily_recommendations(
            repo.clone(),
            matching.daily_policy(),
            config.scheduler.daily_hour_utc,
        ));
    }

    let context = zmq::Context::new();
    let responder = match context.socket(zmq::PULL) {
        Ok(socket) => socket,
        Err(e) => {
            log::error!("Cannot create zmq socket: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = responder.bind(&config.zmq_address) {
        log::error!("Cannot bind to zmq address {}: {e}", config.zmq_address);
        std::process::exit(1);
    }
    log::info!("Listening for work on {}", config.zmq_address);

    loop {
        let msg = match responder.recv_bytes(0) {
            Ok(msg) => msg,
            Err(e) => {
                log::error!("Failed to receive zmq message: {e}");
                continue;
            }
        };
        match serde_json::from_slice::<ZMQMessage>(&msg) {
            Ok(parsed) => {
                let repo = repo.clone();
                let generator = Arc::clone(&generator);
                let matching = matching.clone();
                tokio::spawn(async move {
                    match parsed {
                        ZMQMessage::EmbedJob(job_id) => {
                            process_embed_job_message(job_id, repo, &generator).await
                        }
                        ZMQMessage::EmbedUser(user_id) => {
                            process_embed_user_message(user_id, repo, &generator).await
                        }
                        ZMQMessage::EmbedAll => process_embed_all_message(repo, &generator).await,
                        ZMQMessage::EmbedMissing => {
                            process_embed_missing_message(repo, &generator).await
                        }
                        ZMQMessage::DailyRecommendations => {
                            process_daily_recommendations_message(repo, matching.daily_policy())
                                .await
                        }
                        ZMQMessage::RefreshRecommendations(user_id) => {
                            process_refresh_recommendations_message(
                                user_id,
                                repo,
                                matching.refresh_policy(),
                            )
                            .await
                        }
                        ZMQMessage::CleanupRecommendations(user_id) => {
                            process_cleanup_recommendations_message(user_id, repo).await
                        }
                    }
                });
            }
            Err(e) => log::error!("Failed to parse JSON: {e}"),
        }
    }
}
