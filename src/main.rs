// src/main.rs
use std::sync::Arc;

use anyhow::{Context, Result};
use log::info;
use tokio::io::{AsyncBufReadExt, BufReader};

use posts_feed::config::FeedConfig;
use posts_feed::handlers::{Flow, HELP, handle_command, parse_command, render};
use posts_feed::repositories::HttpPostRepository;
use posts_feed::services::{FileCamera, PostFeedController};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    dotenv::dotenv().ok();

    let config = FeedConfig::from_env().context("failed to load configuration")?;
    info!("Posts API: {}", config.api_url);

    let repo = HttpPostRepository::with_timeout(config.api_url.clone(), config.http_timeout)
        .context("failed to build http client")?;
    let camera = FileCamera::new(config.camera_image_path.clone());
    let controller = PostFeedController::new(Arc::new(repo), Arc::new(camera));

    controller.activate().await;
    show(&controller);
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{} ({})", e, HELP);
                continue;
            }
        };

        if handle_command(&controller, command).await == Flow::Quit {
            break;
        }
        show(&controller);
    }

    info!("Bye");
    Ok(())
}

fn show(controller: &PostFeedController) {
    let view = controller.view();
    print!("{}", render(&view));
    if let Some(notice) = view.notice {
        println!("!! {}", notice);
        controller.acknowledge_notice();
    }
}
