use std::sync::Arc;

use anyhow::{Context, bail};
use uuid::Uuid;

use meditate_core::config::AppConfig;
use meditate_core::generation::{
    AVAILABLE_THEMES, GenerationRequest, HttpMeditationGenerator, MeditationCredits,
    MeditationService,
};
use meditate_core::library::AudioLibraryStore;
use meditate_core::logging::init_logging;
use meditate_core::onboarding::OnboardingManager;
use meditate_core::store::{DirectoryPayloadStore, FileStore, KeyValueStore, PayloadStore};

const USAGE: &str = "Usage: meditate-core <command>

Commands:
  list                                  List generated meditations, newest first
  generate <message> [--theme NAME]...  Generate a new meditation
  favorite <id>                         Toggle favorite
  played <id>                           Mark as played
  delete <id>                           Delete a meditation and its audio
  status                                Show onboarding status and credits";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    let _log_guard = init_logging(config.log_dir.as_deref())?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        eprintln!("{USAGE}");
        return Ok(());
    };

    // ── Storage ─────────────────────────────────────────────────────────
    let file_store = FileStore::new(config.store_dir());
    file_store.ensure_dirs().await?;
    let payload_store = DirectoryPayloadStore::new(config.audio_dir());
    payload_store.ensure_dirs().await?;

    let storage: Arc<dyn KeyValueStore> = Arc::new(file_store);
    let payloads: Arc<dyn PayloadStore> = Arc::new(payload_store);
    let library = AudioLibraryStore::load(Arc::clone(&storage), Arc::clone(&payloads)).await;

    match command.as_str() {
        "list" => {
            let files = library.all().await;
            if files.is_empty() {
                println!("No meditations yet.");
            }
            for file in files {
                println!(
                    "{}  {}  {}{}  [{}]  {}",
                    file.id,
                    file.creation_date.format("%Y-%m-%d %H:%M"),
                    if file.is_favorite { "★" } else { " " },
                    if file.has_been_played { "▶" } else { " " },
                    file.themes.join(", "),
                    file.message,
                );
            }
        }
        "generate" => {
            let (message, themes) = parse_generate_args(&args[1..])?;
            let user_name = OnboardingManager::stored_user_name(storage.as_ref()).await;
            let generator = Arc::new(HttpMeditationGenerator::from_config(&config));
            let credits = Arc::new(MeditationCredits::load(Arc::clone(&storage)).await);
            let service = MeditationService::new(generator, Arc::clone(&library))
                .with_credits(Arc::clone(&credits));

            match service.generate(GenerationRequest::new(message, themes, user_name)).await {
                Ok(file) => {
                    println!("Created {} ({})", file.id, library.payload_path(&file).display());
                    println!("{}", credits.summary().await);
                }
                Err(meditate_core::Error::Generation(e)) => {
                    eprintln!("{}", e.user_message());
                    return Err(e.into());
                }
                Err(e) => return Err(e.into()),
            }
        }
        "favorite" => {
            let id = parse_id(args.get(1))?;
            match library.toggle_favorite(id).await? {
                Some(true) => println!("Added {id} to favorites"),
                Some(false) => println!("Removed {id} from favorites"),
                None => println!("No meditation with id {id}"),
            }
        }
        "played" => {
            let id = parse_id(args.get(1))?;
            library.mark_played(id).await?;
            println!("Marked {id} as played");
        }
        "delete" => {
            let id = parse_id(args.get(1))?;
            library.delete(id).await?;
            println!("Deleted {id}");
        }
        "status" => {
            let complete = OnboardingManager::is_complete(storage.as_ref()).await;
            let name = OnboardingManager::stored_user_name(storage.as_ref()).await;
            println!("Onboarding complete: {complete}");
            if !name.is_empty() {
                println!("User: {name}");
            }
            println!("Meditations: {}", library.len().await);
            let credits = MeditationCredits::load(Arc::clone(&storage)).await;
            println!("{}", credits.summary().await);
        }
        other => bail!("unknown command {other:?}\n\n{USAGE}"),
    }

    Ok(())
}

fn parse_id(raw: Option<&String>) -> anyhow::Result<Uuid> {
    let raw = raw.context("missing meditation id")?;
    Uuid::parse_str(raw).with_context(|| format!("invalid meditation id {raw:?}"))
}

fn parse_generate_args(args: &[String]) -> anyhow::Result<(String, Vec<String>)> {
    let mut message = Vec::new();
    let mut themes = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--theme" {
            let theme = iter.next().context("--theme needs a value")?;
            if !AVAILABLE_THEMES.contains(&theme.as_str()) {
                bail!("unknown theme {theme:?}, expected one of: {}", AVAILABLE_THEMES.join(", "));
            }
            if !themes.contains(theme) {
                themes.push(theme.clone());
            }
        } else {
            message.push(arg.as_str());
        }
    }
    if message.is_empty() && themes.is_empty() {
        bail!("give a message or at least one --theme");
    }
    Ok((message.join(" "), themes))
}
